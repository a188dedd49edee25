use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{
    ContactListResponse, CreateContactRequest, CreatedContactResponse, ListQuery, PaginationInfo,
};
use super::services::{total_pages, validate_new_contact, PageRequest};
use crate::{error::AppError, state::AppState};

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/contact", post(create_contact))
}

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/contacts", get(list_contacts))
}

/// POST /contact { name, email, message }
#[instrument(skip_all)]
pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedContactResponse>), AppError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected contact body");
        AppError::Validation(format!("Invalid JSON: {}", e.body_text()))
    })?;

    let Some(contact) = validate_new_contact(body) else {
        warn!("contact with empty fields");
        return Err(AppError::Validation("All fields are required".into()));
    };

    let id = state
        .contacts
        .insert(&contact)
        .await
        .map_err(|e| AppError::storage("Could not save the contact", e))?;

    info!(id = ?id, "contact saved");
    Ok((
        StatusCode::CREATED,
        Json(CreatedContactResponse {
            message: "Contact saved successfully",
            id,
        }),
    ))
}

/// GET /contacts?page=&limit=
#[instrument(skip_all)]
pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ContactListResponse>, AppError> {
    let page = match query {
        Ok(Query(pairs)) => {
            let q = ListQuery::from_pairs(pairs);
            PageRequest::from_query(q.page.as_deref(), q.limit.as_deref())
        }
        Err(e) => {
            warn!(error = %e, "unreadable query string, using defaults");
            PageRequest::default()
        }
    };

    let result = state
        .contacts
        .list_page(page)
        .await
        .map_err(|e| AppError::storage("Could not fetch contacts", e))?;

    Ok(Json(ContactListResponse {
        pagination: PaginationInfo {
            current_page: page.page,
            total_pages: total_pages(result.total, page.limit),
            total_items: result.total,
            items_per_page: page.limit,
        },
        contacts: result.items,
    }))
}
