use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FeedError;

/// A configured RSS endpoint, with a display name and a classification tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub tag: String,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, tag: &str) -> Self {
        FeedSource {
            name: name.to_owned(),
            url: url.to_owned(),
            tag: tag.to_owned(),
        }
    }
}

/// A row of the `Updates` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecord {
    pub id: String,
    pub feed_name: String,
    pub title: Option<String>,
    /// Holds the deduplication key (guid, or link when the item has no guid)
    pub link: String,
    /// Publication date, as written in the feed
    pub published: Option<String>,
    pub tag: String,
}

/// An update to be inserted in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpdate {
    pub feed_name: String,
    pub title: Option<String>,
    pub link: String,
    pub published: Option<String>,
    pub tag: String,
}

impl NewUpdate {
    /// Build the update of a feed item. Returns `None` if the item has no usable key.
    pub fn from_feed_item(item: FeedItem, source: &FeedSource) -> Option<Self> {
        let link = item.dedup_key()?.to_owned();

        Some(NewUpdate {
            feed_name: source.name.clone(),
            title: item.title,
            link,
            published: item.published,
            tag: source.tag.clone(),
        })
    }

    /// Give the update its identifier, right before insertion
    pub fn into_record(self) -> UpdateRecord {
        UpdateRecord {
            id: Uuid::new_v4().to_string(),
            feed_name: self.feed_name,
            title: self.title,
            link: self.link,
            published: self.published,
            tag: self.tag,
        }
    }
}

/// Raw fields of an `<item>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub guid: Option<String>,
}

impl FeedItem {
    /// The guid of the item, falling back to its link. Blank values don't count.
    pub fn dedup_key(&self) -> Option<&str> {
        non_blank(&self.guid).or_else(|| non_blank(&self.link))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|x| !x.is_empty())
}

/// What happened to a feed during a run
#[derive(Debug)]
pub struct FeedOutcome {
    pub feed_name: String,
    /// Number of inserted updates, or the reason the feed was given up
    pub result: Result<usize, FeedError>,
}

impl FeedOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;

    fn item(guid: Option<&str>, link: Option<&str>) -> FeedItem {
        FeedItem {
            title: Some("A title".to_owned()),
            link: link.map(String::from),
            published: Some("Wed, 03 Aug 2022 12:00:17 +0000".to_owned()),
            guid: guid.map(String::from),
        }
    }

    #[test]
    fn guid_is_preferred_over_link() {
        let item = item(Some("urn:update:42"), Some("https://example.com/42"));

        assert_that!(item.dedup_key()).is_equal_to(Some("urn:update:42"));
    }

    #[test]
    fn link_is_used_without_guid() {
        let item = item(None, Some("https://example.com/42"));

        assert_that!(item.dedup_key()).is_equal_to(Some("https://example.com/42"));
    }

    #[test]
    fn blank_guid_falls_back_to_link() {
        let item = item(Some("   "), Some("https://example.com/42"));

        assert_that!(item.dedup_key()).is_equal_to(Some("https://example.com/42"));
    }

    #[test]
    fn no_key_at_all() {
        let source = FeedSource::new("Dummy", "http://localhost/feed", "Dummy");

        assert_that!(item(None, None).dedup_key()).is_none();
        assert_that!(NewUpdate::from_feed_item(item(None, Some("")), &source)).is_none();
    }

    #[test]
    fn update_copies_source_metadata() {
        let source = FeedSource::new("Azure Updates", "http://localhost/feed", "Azure");
        let update = NewUpdate::from_feed_item(item(None, Some("https://example.com/1")), &source)
            .unwrap();

        assert_eq!(update.feed_name, "Azure Updates");
        assert_eq!(update.tag, "Azure");
        assert_eq!(update.link, "https://example.com/1");
        assert_eq!(
            update.published.as_deref(),
            Some("Wed, 03 Aug 2022 12:00:17 +0000")
        );

        let first = update.clone().into_record();
        let second = update.into_record();
        assert_ne!(first.id, second.id, "Each record should get its own id");
    }
}
