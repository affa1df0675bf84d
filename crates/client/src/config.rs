use monynha_core::filter::FacetQuery;
use monynha_core::threshold::{VoteThreshold, VOTE_THRESHOLD_ENV};
use monynha_core::types::DbId;

use crate::error::{ClientError, ClientResult};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Postgres connection string (required).
    pub database_url: String,
    /// Pool size (default: `5`).
    pub max_connections: u32,
    /// Publish threshold shared by the evaluator and the store.
    pub vote_threshold: VoteThreshold,
    /// Signed-in user, if any. Authentication happens outside this client.
    pub session_user: Option<DbId>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `DATABASE_URL`       | (required) |
    /// | `DB_MAX_CONNECTIONS` | `5`        |
    /// | `VOTES_TO_PUBLISH`   | `10`       |
    /// | `SESSION_USER_ID`    | (none)     |
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ClientError::Config("DATABASE_URL must be set".into()))?;

        let max_connections: u32 = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Config("DB_MAX_CONNECTIONS must be a valid u32".into())
            })?,
            None => 5,
        };

        // Invalid thresholds fall back to the default instead of failing.
        let vote_threshold = VoteThreshold::parse_or_default(lookup(VOTE_THRESHOLD_ENV).as_deref());

        let session_user = match lookup("SESSION_USER_ID").filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(raw.trim().parse().map_err(|_| {
                ClientError::Config("SESSION_USER_ID must be a UUID".into())
            })?),
            None => None,
        };

        Ok(Self {
            database_url,
            max_connections,
            vote_threshold,
            session_user,
        })
    }
}

/// Build the initial facet query from `FILTER_*` variables.
///
/// | Env Var           | Meaning                      |
/// |-------------------|------------------------------|
/// | `FILTER_CATEGORY` | category slug                |
/// | `FILTER_TAGS`     | comma-separated tag names    |
/// | `FILTER_LANGUAGE` | language code                |
/// | `FILTER_SEARCH`   | free-text search             |
pub fn facet_query_from_lookup<F>(lookup: F) -> FacetQuery
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

    let mut query = FacetQuery::new();
    query.category = present("FILTER_CATEGORY").map(|s| s.trim().to_string());
    query.language = present("FILTER_LANGUAGE").map(|s| s.trim().to_string());
    query.search = present("FILTER_SEARCH");
    if let Some(tags) = present("FILTER_TAGS") {
        query = query.with_tags(
            tags.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }
    query
}
