use reqwest::Client;
use tracing::{error, info, warn};

use crate::configuration::Configuration;
use crate::database::{self, Pool};
use crate::errors::{FeedError, RunError};
use crate::fetching::get_and_parse_feed;
use crate::model::{FeedOutcome, FeedSource, NewUpdate};

#[derive(Clone)]
pub struct Ingestor {
    client: Client,
    db: Pool,
}

impl Ingestor {
    pub fn new(client: Client, db: Pool) -> Self {
        Self { client, db }
    }

    /// Create the `Updates` table if needed. Nothing else can be done if this fails.
    pub async fn ensure_schema(&self) -> Result<(), RunError> {
        database::ensure_schema(&self.db)
            .await
            .map_err(RunError::SchemaError)
    }

    /// Ingest the feeds one after the other. A failing feed is logged and the next one is processed.
    #[tracing::instrument(skip_all)]
    pub async fn ingest_all(&self, sources: &[FeedSource]) -> Vec<FeedOutcome> {
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            let result = self.ingest_feed(source).await;
            if let Err(error) = &result {
                error!("Error processing feed {}: {}", source.name, error);
            }

            outcomes.push(FeedOutcome {
                feed_name: source.name.clone(),
                result,
            });
        }

        outcomes
    }

    /// Insert the items of the feed not seen yet, in one transaction. Returns the number of inserted updates.
    ///
    /// Items are checked against what is already committed, so two items sharing a key in the
    /// same document are both inserted.
    #[tracing::instrument(skip_all, fields(feed = %source.name), level = "debug")]
    async fn ingest_feed(&self, source: &FeedSource) -> Result<usize, FeedError> {
        let items = get_and_parse_feed(&self.client, &source.url).await?;

        let mut new_updates = vec![];
        for item in items {
            let Some(update) = NewUpdate::from_feed_item(item, source) else {
                warn!("Skipping an item of {} without guid nor link", source.name);
                continue;
            };

            if !database::link_exists(&self.db, &update.link).await? {
                new_updates.push(update);
            }
        }

        let inserted = database::insert_updates(&self.db, new_updates).await?;
        for update in &inserted {
            info!(
                "Inserted update: {}",
                update.title.as_deref().unwrap_or(&update.link)
            );
        }

        Ok(inserted.len())
    }

    /// Release the store connection
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// Perform one complete run: connect, make sure the table exists, ingest every configured feed
/// and release the connection.
#[tracing::instrument(skip_all)]
pub async fn run(configuration: &Configuration, client: Client) -> Result<Vec<FeedOutcome>, RunError> {
    info!("Update run started");

    let result = match database::init_connection(configuration).await {
        Ok(db) => {
            let ingestor = Ingestor::new(client, db);
            let result = match ingestor.ensure_schema().await {
                Ok(()) => Ok(ingestor.ingest_all(&configuration.feeds).await),
                Err(error) => Err(error),
            };
            ingestor.close().await;
            result
        }
        Err(error) => Err(RunError::ConnectionError(error)),
    };

    match &result {
        Ok(outcomes) => {
            let failed = outcomes.iter().filter(|x| !x.is_success()).count();
            info!(
                "Update run completed ({} feeds, {} failed)",
                outcomes.len(),
                failed
            );
        }
        Err(error) => error!("Update run aborted: {}", error),
    }

    result
}
