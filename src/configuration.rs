use std::env;
use std::time::Duration;

use secrecy::Secret;

use crate::errors::ConfigurationError;
use crate::model::FeedSource;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const FETCH_TIMEOUT_SECONDS: &str = "FETCH_TIMEOUT_SECONDS";
pub const FETCH_CRON: &str = "FETCH_CRON";
pub const RUN_ONCE: &str = "RUN_ONCE";

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SCHEDULE: &str = "0 0 * * * *";

/// # Ingestor configuration
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Connection string of the store holding the `Updates` table
    pub store_connection_string: Secret<String>,
    /// Ceiling of a single feed download
    pub fetch_timeout: Duration,
    /// Cron expression of the runs
    pub schedule: String,
    /// Feeds to ingest, in order
    pub feeds: Vec<FeedSource>,
    /// Perform a single run instead of following the schedule
    pub run_once: bool,
}

impl Configuration {
    pub fn new(store_connection_string: &str, feeds: Vec<FeedSource>) -> Self {
        Configuration {
            store_connection_string: Secret::new(store_connection_string.to_owned()),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            schedule: DEFAULT_SCHEDULE.to_owned(),
            feeds,
            run_once: false,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Build the configuration from the environment. `DATABASE_URL` is mandatory.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection_string = lookup(DATABASE_URL)
            .filter(|x| !x.trim().is_empty())
            .ok_or(ConfigurationError::MissingVariable(DATABASE_URL))?;

        let fetch_timeout = match lookup(FETCH_TIMEOUT_SECONDS) {
            None => DEFAULT_FETCH_TIMEOUT,
            Some(value) => parse_timeout(&value)?,
        };

        let schedule = lookup(FETCH_CRON)
            .filter(|x| !x.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEDULE.to_owned());

        let run_once = lookup(RUN_ONCE).is_some_and(|x| is_enabled(&x));

        Ok(Configuration {
            schedule,
            run_once,
            ..Configuration::new(&connection_string, default_feeds()).with_fetch_timeout(fetch_timeout)
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidVariable {
        name: FETCH_TIMEOUT_SECONDS,
        reason,
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid("the timeout must be positive".to_owned())),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(err) => Err(invalid(err.to_string())),
    }
}

/// `1`, `true` and `yes` enable a flag, anything else disables it
fn is_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// The feeds watched by the ingestor
pub fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new(
            "Azure Updates",
            "https://azurecomcdn.azureedge.net/en-us/updates/feed/",
            "Azure",
        ),
        FeedSource::new(
            "AzureAD Blog",
            "https://techcommunity.microsoft.com/feed.xml?board.id=azure-activedirectory",
            "AzureAD",
        ),
    ]
}
