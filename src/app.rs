use std::net::SocketAddr;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;
use crate::{contacts, health};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(contacts::router())
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(middleware::from_fn(cors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

/// Open CORS policy. Preflights never reach the handlers.
async fn cors(req: Request, next: Next) -> Response {
    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = res.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    res
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl+c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received Ctrl+C, shutting down"),
        _ = terminate => warn!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::contacts::repo::fakes::FailingContactRepository;
    use crate::contacts::SqlContactRepository;
    use crate::db::memory_pool;

    fn assert_cors(res: &Response) {
        let h = res.headers();
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn options_short_circuits_with_204() {
        let app = build_app(AppState::fake(Arc::new(FailingContactRepository)));

        for uri in ["/contact", "/contacts", "/health"] {
            let res = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("OPTIONS")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NO_CONTENT, "{uri}");
            assert_cors(&res);
            let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn health_ignores_broken_storage() {
        let app = build_app(AppState::fake(Arc::new(FailingContactRepository)));
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_cors(&res);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["status"], "ok");
        assert!(v["timestamp"].is_string());
    }

    #[tokio::test]
    async fn create_then_list_against_sqlite() {
        let repo = SqlContactRepository::new(memory_pool().await);
        let app = build_app(AppState::fake(Arc::new(repo)));

        let mut ids = Vec::new();
        for i in 0..4 {
            let res = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/contact")
                        .header("content-type", "application/json")
                        .body(Body::from(
                            json!({"name": format!("n{i}"), "email": "e@x.io", "message": "m"})
                                .to_string(),
                        ))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            assert_cors(&res);
            let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let v: Value = serde_json::from_slice(&body).unwrap();
            ids.push(v["id"].as_i64().unwrap());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/contacts?limit=4&page=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["contacts"].as_array().unwrap().len(), 4);
        assert_eq!(v["pagination"]["total_items"], 4);
        assert_eq!(v["pagination"]["total_pages"], 1);
    }

    #[tokio::test]
    async fn listing_survives_unformattable_timestamp() {
        let db = memory_pool().await;
        sqlx::query("INSERT INTO contacts (name, email, message) VALUES ('fine', 'e', 'm')")
            .execute(&db)
            .await
            .unwrap();
        sqlx::query("INSERT INTO contacts (name, email, message, created_at) VALUES ('bad', 'e', 'm', '-0001-01-01 00:00:00')")
            .execute(&db)
            .await
            .unwrap();
        let app = build_app(AppState::fake(Arc::new(SqlContactRepository::new(db))));

        let res = app
            .oneshot(Request::builder().uri("/contacts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["contacts"].as_array().unwrap().len(), 2);
        assert_eq!(v["pagination"]["total_items"], 2);
    }
}
