use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;

use super::repo_types::{ContactPage, ContactRow, NewContact};
use super::services::PageRequest;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Stores one contact. Returns the generated id when the store reports one.
    async fn insert(&self, contact: &NewContact) -> anyhow::Result<Option<i64>>;

    /// Most recent first, plus the unfiltered row count.
    async fn list_page(&self, page: PageRequest) -> anyhow::Result<ContactPage>;
}

#[derive(Clone)]
pub struct SqlContactRepository {
    db: SqlitePool,
}

impl SqlContactRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepository for SqlContactRepository {
    async fn insert(&self, contact: &NewContact) -> anyhow::Result<Option<i64>> {
        let done = sqlx::query(
            r#"
            INSERT INTO contacts (name, email, message)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.message)
        .execute(&self.db)
        .await
        .context("insert contact")?;

        let id = done.last_insert_rowid();
        if id <= 0 {
            warn!(rows_affected = done.rows_affected(), "store did not report a generated id");
            return Ok(None);
        }
        Ok(Some(id))
    }

    async fn list_page(&self, page: PageRequest) -> anyhow::Result<ContactPage> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.db)
            .await
            .context("count contacts")?;

        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, message, CAST(created_at AS TEXT) AS created_at
              FROM contacts
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .context("list contacts")?;

        Ok(ContactPage {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
