/// Errors raised while processing a single feed. They never escape the feed loop: they end up
/// in the feed's [`FeedOutcome`](crate::model::FeedOutcome) and in the logs.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("Non OK Http status returned: {0}")]
    NonOkStatus(u16),
    #[error("Error while fetching the feed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseFeedError(#[from] rss::Error),
    #[error("Database error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Errors that abort a whole run.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("Could not connect to the store: {0}")]
    ConnectionError(#[source] sqlx::Error),
    #[error("Could not create the Updates table: {0}")]
    SchemaError(#[source] sqlx::Error),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0} environment variable is mandatory")]
    MissingVariable(&'static str),
    #[error("{name} environment variable is invalid: {reason}")]
    InvalidVariable { name: &'static str, reason: String },
}
