//! PostgreSQL-backed directory store

mod query_builder;

use super::traits::{CountryCount, NewUser, PositionCount, ProfileStore};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use query_builder::{
    build_search_sql, LIST_COUNTRIES_SQL, PROFILE_COLUMNS, PROFILE_FROM, PUBLIC_BY_COUNTRY_SQL,
    PUBLIC_BY_POSITION_SQL,
};
use roster_models::{Country, Profile, ProfileDraft, User};
use roster_search::Predicate;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::{Duration, Instant};

use crate::config::DatabaseConfig;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized from `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.pool_min_size)
            .max_connections(config.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM {PROFILE_FROM} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(profile_from_row).transpose()
    }
}

fn observe(query_type: &str, started: Instant) {
    crate::metrics::DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_type])
        .observe(started.elapsed().as_secs_f64());
}

fn profile_from_row(row: &PgRow) -> Result<Profile> {
    let country = match row.try_get::<Option<i64>, _>("country_id")? {
        Some(id) => Some(Country {
            id,
            code: row.try_get("country_code")?,
            name: row.try_get("country_name")?,
            is_under_represented: row.try_get("country_is_under_represented")?,
        }),
        None => None,
    };

    let methods: Vec<String> = row.try_get("methods")?;
    let applications: Vec<String> = row.try_get("applications")?;

    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        is_public: row.try_get("is_public")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        contact_email: row.try_get("contact_email")?,
        webpage: row.try_get("webpage")?,
        institution: row.try_get("institution")?,
        country,
        position: row.try_get("position")?,
        grad_month: row.try_get("grad_month")?,
        grad_year: row.try_get("grad_year")?,
        methods: methods.into_iter().collect(),
        applications: applications.into_iter().collect(),
        keywords: row.try_get("keywords")?,
        publish_date: row.try_get("publish_date")?,
        last_updated: row.try_get("last_updated")?,
    })
}

fn country_from_row(row: &PgRow) -> Result<Country> {
    Ok(Country {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        is_under_represented: row.try_get("is_under_represented")?,
    })
}

/// Unique-constraint violations surface as 409s.
fn conflict_or_database(err: sqlx::Error, what: &str) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Error::Conflict(what.to_string()),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Error::Validation(format!("{what}: referenced row does not exist"))
        }
        _ => Error::Database(err),
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_profiles(&self, predicate: &Predicate) -> Result<Vec<Profile>> {
        let started = Instant::now();
        let (sql, bind_values) = build_search_sql(predicate);

        let mut query = sqlx::query(&sql);
        for values in bind_values {
            query = query.bind(values);
        }

        let rows = query.fetch_all(&self.pool).await?;
        observe("search", started);

        rows.iter().map(profile_from_row).collect()
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        self.profile_by_id(id).await
    }

    async fn create_profile(&self, draft: ProfileDraft, country_id: Option<i64>) -> Result<Profile> {
        let started = Instant::now();
        let now = Utc::now();
        let publish_date: DateTime<Utc> = draft.publish_date.unwrap_or(now);

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO profiles (
                user_id, is_public, first_name, last_name, contact_email, webpage,
                institution, country_id, position, grad_month, grad_year,
                methods, applications, keywords, publish_date, last_updated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(draft.user_id)
        .bind(draft.is_public)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.contact_email)
        .bind(&draft.webpage)
        .bind(&draft.institution)
        .bind(country_id)
        .bind(&draft.position)
        .bind(&draft.grad_month)
        .bind(&draft.grad_year)
        .bind(draft.methods.iter().cloned().collect::<Vec<_>>())
        .bind(draft.applications.iter().cloned().collect::<Vec<_>>())
        .bind(&draft.keywords)
        .bind(publish_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "profile"))?;
        observe("create_profile", started);

        self.profile_by_id(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Profile {id} vanished after insert")))
    }

    async fn update_profile(
        &self,
        id: i64,
        draft: ProfileDraft,
        country_id: Option<i64>,
    ) -> Result<Profile> {
        let started = Instant::now();

        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                user_id = $2, is_public = $3, first_name = $4, last_name = $5,
                contact_email = $6, webpage = $7, institution = $8, country_id = $9,
                position = $10, grad_month = $11, grad_year = $12, methods = $13,
                applications = $14, keywords = $15,
                publish_date = COALESCE($16, publish_date),
                last_updated = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(draft.user_id)
        .bind(draft.is_public)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.contact_email)
        .bind(&draft.webpage)
        .bind(&draft.institution)
        .bind(country_id)
        .bind(&draft.position)
        .bind(&draft.grad_month)
        .bind(&draft.grad_year)
        .bind(draft.methods.iter().cloned().collect::<Vec<_>>())
        .bind(draft.applications.iter().cloned().collect::<Vec<_>>())
        .bind(&draft.keywords)
        .bind(draft.publish_date)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "profile"))?;
        observe("update_profile", started);

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Profile {id}")));
        }
        self.profile_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Profile {id}")))
    }

    async fn delete_profile(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_countries(&self) -> Result<Vec<Country>> {
        let rows = sqlx::query(LIST_COUNTRIES_SQL)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(country_from_row).collect()
    }

    async fn get_country_by_code(&self, code: &str) -> Result<Option<Country>> {
        let row = sqlx::query(
            "SELECT id, code, name, is_under_represented FROM countries WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(country_from_row).transpose()
    }

    async fn upsert_country(
        &self,
        code: &str,
        name: &str,
        is_under_represented: bool,
    ) -> Result<Country> {
        let row = sqlx::query(
            r#"
            INSERT INTO countries (code, name, is_under_represented)
            VALUES ($1, $2, $3)
            ON CONFLICT (code) DO UPDATE
                SET name = EXCLUDED.name,
                    is_under_represented = EXCLUDED.is_under_represented
            RETURNING id, code, name, is_under_represented
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(is_under_represented)
        .fetch_one(&self.pool)
        .await?;
        country_from_row(&row)
    }

    async fn count_public_by_country(&self) -> Result<Vec<CountryCount>> {
        let rows: Vec<(i64, String, i64)> = sqlx::query_as(PUBLIC_BY_COUNTRY_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, profiles_count)| CountryCount {
                id,
                name,
                profiles_count,
            })
            .collect())
    }

    async fn count_public_by_position(&self) -> Result<Vec<PositionCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(PUBLIC_BY_POSITION_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(position, profiles_count)| PositionCount {
                position,
                profiles_count,
            })
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, name, email, is_active, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &format!("User {} already exists", user.username)))?;

        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn clear_directory(&self) -> Result<()> {
        sqlx::query("TRUNCATE profiles, users, countries RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
