use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use tracing::warn;

use super::dto::CreateContactRequest;
use super::repo_types::NewContact;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Lenient parse of the raw query values. Never rejects: page falls back to 1,
    /// limit falls back to 10 and is capped at 100.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = match limit.and_then(|v| v.trim().parse::<i64>().ok()) {
            Some(l) if l > MAX_LIMIT => MAX_LIMIT,
            Some(l) if l >= 1 => l,
            _ => DEFAULT_LIMIT,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Reads a stored `created_at`. SQLite writes `YYYY-MM-DD HH:MM:SS` (UTC); rows
/// written by other tools may carry RFC 3339. Anything else, including years
/// RFC 3339 cannot express, becomes "now" so a single bad row cannot break a
/// listing.
pub fn parse_created_at(raw: &str) -> OffsetDateTime {
    // `[year]` would also take a leading sign
    let primary = raw
        .starts_with(|c: char| c.is_ascii_digit())
        .then(|| {
            PrimitiveDateTime::parse(
                raw,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            )
            .ok()
        })
        .flatten()
        .map(PrimitiveDateTime::assume_utc)
        .filter(formattable);
    if let Some(dt) = primary {
        return dt;
    }
    if let Some(dt) = OffsetDateTime::parse(raw, &Rfc3339).ok().filter(formattable) {
        return dt;
    }
    warn!(raw, "unparseable created_at, substituting current time");
    OffsetDateTime::now_utc()
}

fn formattable(dt: &OffsetDateTime) -> bool {
    (0..=9999).contains(&dt.year())
}

pub fn validate_new_contact(body: CreateContactRequest) -> Option<NewContact> {
    if body.name.is_empty() || body.email.is_empty() || body.message.is_empty() {
        return None;
    }
    Some(NewContact {
        name: body.name,
        email: body.email,
        message: body.message,
    })
}
