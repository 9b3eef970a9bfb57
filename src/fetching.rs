use std::time::Duration;

use reqwest::Client;
use rss::Channel;

use crate::errors::FeedError;
use crate::model::FeedItem;

/// Build the HTTP client used to download the feeds. No download may last longer than `timeout`.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    reqwest::ClientBuilder::new()
        .timeout(timeout)
        .user_agent("feed-ingestor (+https://github.com/fistons/rss-aggregator)")
        .build()
}

/// Download the feed at `url`
#[tracing::instrument(skip(client))]
pub async fn fetch_feed(client: &Client, url: &str) -> Result<Vec<u8>, FeedError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FeedError::NonOkStatus(response.status().as_u16()));
    }

    Ok(response.bytes().await?.to_vec())
}

/// Extract the items of an RSS document, in document order
pub fn parse_items(content: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    let channel = Channel::read_from(content)?;

    Ok(channel
        .items()
        .iter()
        .map(|item| FeedItem {
            title: item.title().map(String::from),
            link: item.link().map(String::from),
            published: item.pub_date().map(String::from),
            guid: item.guid().map(|x| x.value().to_owned()),
        })
        .collect())
}

/// Download and parse the feed at `url`
pub async fn get_and_parse_feed(client: &Client, url: &str) -> Result<Vec<FeedItem>, FeedError> {
    let content = fetch_feed(client, url).await?;
    parse_items(&content[..])
}
