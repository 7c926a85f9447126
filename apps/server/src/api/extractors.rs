//! Custom Axum extractors.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};
use roster_search::SearchQuery;
use serde::{de::DeserializeOwned, Deserialize};

use crate::Error;

/// JSON body whose rejections use the API error envelope.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Error {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            Error::Validation("Expected 'Content-Type: application/json'".to_string())
        }
        other => Error::Validation(format!("Invalid JSON body: {}", other.body_text())),
    }
}

/// Raw `/list` query-string parameters.
///
/// Toggles stay raw strings: only the exact value `on` switches them on.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub s: Option<String>,
    pub ur: Option<String>,
    pub senior: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    pub fn query(&self) -> SearchQuery {
        SearchQuery::from_params(self.s.as_deref(), self.ur.as_deref(), self.senior.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub q: String,
}
