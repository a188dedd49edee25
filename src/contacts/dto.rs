use serde::{Deserialize, Serialize};

use super::repo_types::Contact;

/// Body of `POST /contact`. Missing fields bind as empty strings and are
/// rejected by validation, not by the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedContactResponse {
    pub message: &'static str,
    pub id: Option<i64>,
}

/// Raw query values; clamping happens in `PageRequest::from_query`.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// First occurrence of each key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" if q.page.is_none() => q.page = Some(value),
                "limit" if q.limit.is_none() => q.limit = Some(value),
                _ => {}
            }
        }
        q
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<Contact>,
    pub pagination: PaginationInfo,
}
