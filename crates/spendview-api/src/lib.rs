//! JSON HTTP API for the spendview feed
//!
//! Routes are thin projections of the feed controller: reads serialize the
//! unified snapshot, commands forward to the controller and return the fresh
//! snapshot. No route holds derived state of its own.

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use spendview_config::Config;
use spendview_core::FeedController;
use spendview_source::CachedFetch;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::error_response;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RwLock<FeedController>>,
    pub fetch: Arc<CachedFetch>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::employees::api_employees;
    use routes::feed::{api_feed, api_load_more, api_select};
    use routes::transactions::api_set_approval;

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/feed", get(api_feed))
        .route("/api/feed/select", post(api_select))
        .route("/api/feed/more", post(api_load_more))
        .route("/api/employees", get(api_employees))
        .route("/api/transactions/:id/approval", post(api_set_approval))
        // The consuming UI is served separately.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Start the HTTP server
///
/// Binds to the configured address and serves the feed API until the process
/// exits.
pub async fn start_server(
    config: Config,
    controller: Arc<RwLock<FeedController>>,
    fetch: Arc<CachedFetch>,
) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        controller,
        fetch,
        config,
    };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await.unwrap();
    log::info!("Starting spendview server on http://{}", addr);

    match axum::serve(listener, router).await {
        Ok(_) => log::info!("Server stopped gracefully"),
        Err(e) => log::error!("Server error: {}", e),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use spendview_source::{Dataset, Employee, FetchRef, StaticDataSource, Transaction};
    use tower::ServiceExt;

    fn employee(id: &str, first: &str, last: &str) -> Employee {
        Employee {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    fn txn(id: &str, employee: &Employee) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: Decimal::new(3175, 2),
            employee: employee.clone(),
            merchant: "Initech".to_string(),
            date: "2024-03-01".to_string(),
            approved: false,
        }
    }

    async fn test_router() -> Router {
        let alice = employee("1", "Alice", "Nguyen");
        let bob = employee("2", "Bob", "Marsh");
        let dataset = Dataset {
            transactions: vec![
                txn("t1", &alice),
                txn("t2", &bob),
                txn("t3", &alice),
                txn("t4", &alice),
                txn("t5", &bob),
                txn("t6", &alice),
            ],
            employees: vec![alice, bob],
        };

        let config = Config::default();
        let source = Arc::new(StaticDataSource::new(dataset, config.feed.page_size));
        let fetch = Arc::new(CachedFetch::new(source));
        let fetch_ref: FetchRef = fetch.clone();

        let mut controller = FeedController::new(config.feed.clone(), fetch_ref);
        controller.initialize().await.unwrap();

        create_router(AppState {
            controller: Arc::new(RwLock::new(controller)),
            fetch,
            config,
        })
    }

    async fn body_json(router: &Router, method: &str, uri: &str) -> serde_json::Value {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = test_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_feed_snapshot_after_startup() {
        let router = test_router().await;
        let snapshot = body_json(&router, "GET", "/api/feed").await;
        assert_eq!(snapshot["transactions"].as_array().unwrap().len(), 5);
        assert_eq!(snapshot["canLoadMore"], true);
        assert_eq!(snapshot["mode"], "all");
    }

    #[tokio::test]
    async fn test_employees_roster() {
        let router = test_router().await;
        let roster = body_json(&router, "GET", "/api/employees").await;
        assert_eq!(roster.as_array().unwrap().len(), 2);
        assert_eq!(roster[0]["firstName"], "Alice");
    }

    #[tokio::test]
    async fn test_select_employee_and_back() {
        let router = test_router().await;

        let snapshot = body_json(&router, "POST", "/api/feed/select?employee=2").await;
        assert_eq!(snapshot["mode"]["employeeId"], "2");
        assert_eq!(snapshot["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["canLoadMore"], false);

        // No employee param = the selector's "All Employees" row.
        let snapshot = body_json(&router, "POST", "/api/feed/select").await;
        assert_eq!(snapshot["mode"], "all");
        assert_eq!(snapshot["canLoadMore"], true);
    }

    #[tokio::test]
    async fn test_load_more_extends_the_window() {
        let router = test_router().await;
        let snapshot = body_json(&router, "POST", "/api/feed/more").await;
        assert_eq!(snapshot["transactions"].as_array().unwrap().len(), 6);
        assert_eq!(snapshot["canLoadMore"], false);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_an_error_body() {
        let router = test_router().await;
        let body = body_json(&router, "POST", "/api/feed/select?employee=missing").await;
        assert_eq!(body["error"]["code"], "SOURCE_ERROR");
    }

    #[tokio::test]
    async fn test_approval_update_is_visible_after_reload() {
        let router = test_router().await;
        body_json(&router, "POST", "/api/feed/select?employee=2").await;

        let body = body_json(&router, "POST", "/api/transactions/t2/approval?approved=true").await;
        assert_eq!(body["success"], true);

        // The cached employee feed was invalidated, so re-selecting reloads.
        let snapshot = body_json(&router, "POST", "/api/feed/select?employee=2").await;
        assert_eq!(snapshot["transactions"][0]["approved"], true);
    }
}
