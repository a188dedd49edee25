use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::services::parse_created_at;

/// Row as it comes back from the `contacts` table; `created_at` is read as text.
#[derive(Debug, FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: Option<String>,
}

/// Persisted contact-form submission.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ContactRow> for Contact {
    fn from(r: ContactRow) -> Self {
        Self {
            created_at: parse_created_at(r.created_at.as_deref().unwrap_or_default()),
            id: r.id,
            name: r.name,
            email: r.email,
            message: r.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One page of contacts plus the size of the whole table.
#[derive(Debug)]
pub struct ContactPage {
    pub items: Vec<Contact>,
    pub total: i64,
}
