use anyhow::Result;
use roster::{AppState, Config};
use roster_search::SearchQuery;

pub async fn run(config: Config, text: Option<String>, ur: bool, senior: bool) -> Result<()> {
    let state = AppState::new(config).await?;

    let mut query = SearchQuery::default().under_represented(ur).senior(senior);
    query.text = text;

    let profiles = state.directory_service.search_all(&query).await?;
    for profile in &profiles {
        println!("{}", serde_json::to_string(profile)?);
    }

    tracing::info!(matched = profiles.len(), "Search finished");
    Ok(())
}
