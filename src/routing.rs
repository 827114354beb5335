//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState, Error,
    dashboard::get_dashboard_endpoint,
    endpoints,
    logging::logging_middleware,
    recurring::{
        create_recurring_cost_endpoint, delete_recurring_cost_endpoint,
        edit_recurring_cost_endpoint, get_recurring_costs_endpoint, rollover_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        export_csv_endpoint, export_xlsx_endpoint, get_categories_endpoint,
        get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(endpoints::ROLLOVER, post(rollover_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::EXPORT_XLSX, get(export_xlsx_endpoint))
        .route(endpoints::EXPORT_CSV, get(export_csv_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(
            endpoints::RECURRING_COSTS,
            get(get_recurring_costs_endpoint).post(create_recurring_cost_endpoint),
        )
        .route(
            endpoints::RECURRING_COST,
            put(edit_recurring_cost_endpoint).delete(delete_recurring_cost_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header::CONTENT_DISPOSITION};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, date_format::format_date, endpoints, local_today, routing::build_router,
        test_utils::TEST_TIMEZONE,
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), TEST_TIMEZONE)
            .expect("could not create app state");

        TestServer::try_new(build_router(state)).expect("could not create test server")
    }

    #[tokio::test]
    async fn transaction_lifecycle() {
        let server = get_test_server();

        let created = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "Groceries",
                "amount": 82.4,
                "type": "Expense",
                "date": "14-02-2025",
                "category": "Food",
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let transaction: Value = created.json();
        let location = created.header("location");
        let location = location.to_str().unwrap();

        server.get(location).await.assert_json(&transaction);

        let edited = server
            .put(location)
            .json(&json!({
                "description": "Groceries",
                "amount": 90.0,
                "type": "Expense",
                "date": "14-02-2025",
                "category": "Food",
            }))
            .await;
        edited.assert_status_ok();
        assert_eq!(edited.json::<Value>()["amount"], 90.0);

        server
            .get(endpoints::CATEGORIES)
            .await
            .assert_json(&json!(["Food"]));

        server
            .delete(location)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(location)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server.get(location).await.assert_status_not_found();
        server.get(endpoints::TRANSACTIONS).await.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn unknown_period_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RECURRING_COSTS)
            .json(&json!({
                "name": "Streaming",
                "amount": 15.0,
                "period": "Fortnightly",
                "next_fire_date": "01-03-2025",
            }))
            .await;

        response.assert_status_bad_request();
        assert!(
            response.json::<Value>()["error"]
                .as_str()
                .unwrap()
                .contains("Fortnightly")
        );
        server
            .get(endpoints::RECURRING_COSTS)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn unknown_transaction_type_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "description": "Savings",
                "amount": 100.0,
                "type": "Transfer",
            }))
            .await;

        response.assert_status_bad_request();
        assert!(
            response.json::<Value>()["error"]
                .as_str()
                .unwrap()
                .contains("Transfer")
        );
        server.get(endpoints::TRANSACTIONS).await.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn year_first_date_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::RECURRING_COSTS)
            .json(&json!({
                "name": "Rent",
                "amount": 450.0,
                "period": "Monthly",
                "next_fire_date": "2024-01-31",
            }))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
        server
            .get(endpoints::RECURRING_COSTS)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .text("{\"description\": ")
            .content_type("application/json")
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn dashboard_rolls_over_due_costs_once() {
        let server = get_test_server();
        let today = format_date(local_today(TEST_TIMEZONE).unwrap()).unwrap();
        server
            .post(endpoints::RECURRING_COSTS)
            .json(&json!({
                "name": "Coffee",
                "amount": 4.5,
                "period": "Daily",
                "next_fire_date": today,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let first: Value = server.get(endpoints::DASHBOARD).await.json();
        let second: Value = server.get(endpoints::DASHBOARD).await.json();

        assert_eq!(first["total_expenses"], 4.5);
        assert_eq!(first["rollover"]["fired"].as_array().unwrap().len(), 1);
        assert_eq!(second["total_expenses"], 4.5);
        assert!(second["rollover"]["fired"].as_array().unwrap().is_empty());

        let transactions: Value = server.get(endpoints::TRANSACTIONS).await.json();
        assert_eq!(transactions[0]["category"], "recurring");
        assert_eq!(transactions[0]["date"], today);
    }

    #[tokio::test]
    async fn export_downloads_workbook() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT_XLSX).await;

        response.assert_status_ok();
        assert_eq!(
            response.header(CONTENT_DISPOSITION),
            "attachment; filename=\"transactions.xlsx\""
        );
        assert!(response.as_bytes().starts_with(b"PK"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/api/does-not-exist").await;

        response.assert_status_not_found();
        assert!(response.json::<Value>()["error"].is_string());
    }
}
