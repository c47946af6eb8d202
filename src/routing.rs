//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error,
    aggregation::{
        get_bar_chart_data_endpoint, get_pie_chart_data_endpoint, get_statistics_endpoint,
    },
    combined::get_combined_data_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    seed::initialize_database_endpoint,
    transaction::get_transactions_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::INITIALIZE_DATABASE,
            post(initialize_database_endpoint),
        )
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(
            endpoints::TRANSACTION_STATISTICS,
            get(get_statistics_endpoint),
        )
        .route(endpoints::BAR_CHART_DATA, get(get_bar_chart_data_endpoint))
        .route(endpoints::PIE_CHART_DATA, get(get_pie_chart_data_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
        // The API may be called from a client served on another origin.
        .layer(CorsLayer::permissive());

    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        AppState, build_router, endpoints,
        pagination::PaginationConfig,
        transaction::{Transaction, create_transaction},
    };

    fn get_test_state() -> AppState {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "http://127.0.0.1:9/unused.json",
            PaginationConfig::default(),
        )
        .expect("Could not create app state");

        {
            let conn = state.db_connection.lock().unwrap();
            for (title, price, category, sold) in [
                ("Phone", 50.0, "electronics", true),
                ("Jacket", 150.0, "men's clothing", false),
                ("Laptop", 950.0, "electronics", true),
            ] {
                create_transaction(
                    Transaction::build(title, price, datetime!(2022-01-15 12:00 UTC))
                        .category(category)
                        .sold(sold),
                    &conn,
                )
                .unwrap();
            }
        }

        state
    }

    fn get_test_server() -> TestServer {
        TestServer::try_new(build_router(get_test_state())).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn statistics_endpoint_returns_json() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTION_STATISTICS)
            .add_query_param("month", "January")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalSaleAmount": 1150.0,
            "totalSoldItems": 2,
            "totalNotSoldItems": 1,
        }));
    }

    #[tokio::test]
    async fn transactions_endpoint_reads_per_page() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "January")
            .add_query_param("page", 2)
            .add_query_param("perPage", 2)
            .await;

        response.assert_status_ok();
        let transactions: Vec<Value> = response.json();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0]["title"], "Laptop");
    }

    #[tokio::test]
    async fn combined_endpoint_returns_envelope() {
        let server = get_test_server();

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "January")
            .add_query_param("search", "electronics")
            .await;

        response.assert_status_ok();
        let envelope: Value = response.json();
        assert_eq!(envelope["total"], 2);
        assert_eq!(envelope["pieChartData"], json!({ "electronics": 2 }));
        assert_eq!(envelope["barChartData"][0], json!({ "range": "0-100", "count": 1 }));
    }

    #[tokio::test]
    async fn pie_chart_endpoint_returns_category_object() {
        let server = get_test_server();

        let response = server
            .get(endpoints::PIE_CHART_DATA)
            .add_query_param("month", "jan")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "electronics": 2, "men's clothing": 1 }));
    }

    #[tokio::test]
    async fn invalid_month_is_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::BAR_CHART_DATA)
            .add_query_param("month", "Smarch")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("Smarch"));
    }

    #[tokio::test]
    async fn zero_page_size_is_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "January")
            .add_query_param("perPage", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_page_is_json_bad_request() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("month", "January")
            .add_query_param("page", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(
            body["message"].as_str().unwrap().contains("invalid query string"),
            "got body {body}"
        );
    }

    #[tokio::test]
    async fn store_failure_hides_sql_details() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", [])
            .unwrap();
        let server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server
            .get(endpoints::COMBINED_DATA)
            .add_query_param("month", "January")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("no such table"), "got message {message}");
        assert!(!message.contains("transaction\""), "got message {message}");
        assert!(body.get("transactions").is_none(), "got body {body}");
    }

    #[tokio::test]
    async fn unreachable_seed_feed_is_bad_gateway() {
        let server = get_test_server();

        let response = server.post(endpoints::INITIALIZE_DATABASE).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn api_allows_cross_origin_requests() {
        let server = get_test_server();

        let response = server
            .get(endpoints::PIE_CHART_DATA)
            .add_query_param("month", "January")
            .add_header(
                header::ORIGIN,
                HeaderValue::from_static("http://localhost:5173"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }
}
