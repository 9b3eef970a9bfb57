use secrecy::ExposeSecret;
use sqlx::any::{install_default_drivers, AnyPoolOptions, AnyRow};
pub use sqlx::AnyPool as Pool;
use sqlx::{FromRow, Result, Row, ValueRef};

use crate::configuration::Configuration;
use crate::model::{NewUpdate, UpdateRecord};

/// Build the store connection. The backend (Postgres, SQLite) is picked from the connection string.
pub async fn init_connection(configuration: &Configuration) -> Result<Pool> {
    install_default_drivers();

    AnyPoolOptions::new()
        .max_connections(1)
        .connect(configuration.store_connection_string.expose_secret())
        .await
}

impl FromRow<'_, AnyRow> for UpdateRecord {
    fn from_row(row: &AnyRow) -> Result<Self> {
        Ok(UpdateRecord {
            id: row.try_get("id")?,
            feed_name: row.try_get("feed_name")?,
            title: optional_text(row, "title")?,
            link: row.try_get("link")?,
            published: optional_text(row, "published")?,
            tag: row.try_get("tag")?,
        })
    }
}

/// The `Any` driver refuses to decode a NULL into an `Option`, so nulls are checked on the raw value
fn optional_text(row: &AnyRow, column: &str) -> Result<Option<String>> {
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }

    row.try_get(column).map(Some)
}

/// Create the `Updates` table if it does not exist yet
#[tracing::instrument(skip(db))]
pub async fn ensure_schema(db: &Pool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Updates (
            Id VARCHAR(36) PRIMARY KEY,
            FeedName VARCHAR(200) NOT NULL,
            Title VARCHAR(500),
            Link VARCHAR(1000) NOT NULL,
            Published VARCHAR(100),
            Tag VARCHAR(100) NOT NULL
        )
        "#,
    )
    .execute(db)
    .await?;

    Ok(())
}

/// Is there already an update with this link? Only committed updates are seen.
#[tracing::instrument(skip(db), level = "debug")]
pub async fn link_exists(db: &Pool, link: &str) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM Updates WHERE Link = $1
        "#,
    )
    .bind(link)
    .fetch_one(db)
    .await?;

    Ok(count > 0)
}

/// Insert all the updates in a single transaction
#[tracing::instrument(skip_all, level = "debug")]
pub async fn insert_updates(db: &Pool, updates: Vec<NewUpdate>) -> Result<Vec<UpdateRecord>> {
    let mut transaction = db.begin().await?;
    let mut inserted = Vec::with_capacity(updates.len());

    for update in updates {
        let record = update.into_record();
        sqlx::query(
            r#"
            INSERT INTO Updates (Id, FeedName, Title, Link, Published, Tag)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&record.id)
        .bind(&record.feed_name)
        .bind(&record.title)
        .bind(&record.link)
        .bind(&record.published)
        .bind(&record.tag)
        .execute(&mut *transaction)
        .await?;

        inserted.push(record);
    }

    transaction.commit().await?;

    Ok(inserted)
}

/// List all the stored updates
#[tracing::instrument(skip(db), level = "debug")]
pub async fn list_updates(db: &Pool) -> Result<Vec<UpdateRecord>> {
    sqlx::query_as::<_, UpdateRecord>(
        r#"
        SELECT Id AS id, FeedName AS feed_name, Title AS title, Link AS link,
               Published AS published, Tag AS tag
        FROM Updates
        ORDER BY FeedName, Link
        "#,
    )
    .fetch_all(db)
    .await
}
