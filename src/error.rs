use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Missing or malformed process configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Storage could not be reached or initialized. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid database url: {0}")]
    Options(#[source] sqlx::Error),
    #[error("open database: {0}")]
    Open(#[source] sqlx::Error),
    #[error("database ping failed: {0}")]
    Ping(#[source] sqlx::Error),
    #[error("create contacts table: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Per-request failure, translated to a status code at the handler boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{public}: {source:#}")]
    Storage {
        public: &'static str,
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn storage(public: &'static str, source: anyhow::Error) -> Self {
        Self::Storage { public, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Storage { public, source } => {
                tracing::error!(error = %format!("{source:#}"), "{public}");
                (StatusCode::INTERNAL_SERVER_ERROR, public.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
