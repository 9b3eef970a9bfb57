use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feed_ingestor::configuration::Configuration;
use feed_ingestor::database::{self, Pool};
use feed_ingestor::fetching::build_client;
use feed_ingestor::ingestor::Ingestor;
use feed_ingestor::model::FeedSource;

pub const FEED: &str = include_str!("feed.xml");
pub const DUPLICATES: &str = include_str!("duplicates.xml");

/// An in-memory store, with its `Updates` table
pub async fn configure_database() -> Pool {
    let db = database::init_connection(&Configuration::new("sqlite::memory:", vec![]))
        .await
        .unwrap();
    database::ensure_schema(&db).await.unwrap();

    db
}

pub fn build_ingestor(db: &Pool) -> Ingestor {
    Ingestor::new(build_client(Duration::from_secs(2)).unwrap(), db.clone())
}

/// Serve `body` as an RSS document on `route`, `times` times
pub async fn serve_feed(mock: &MockServer, route: &str, body: &str, times: u64) {
    let response = ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/xml");
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(mock)
        .await;
}

pub fn source(mock: &MockServer, name: &str, route: &str, tag: &str) -> FeedSource {
    FeedSource::new(name, &format!("{}{}", mock.uri(), route), tag)
}
