#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum::{http::StatusCode, response::Response};
use rusqlite::Connection;
use serde::de::DeserializeOwned;

use crate::db::initialize;

/// The timezone used by tests that go through the application state.
pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

pub(crate) fn get_shared_test_connection() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(get_test_connection()))
}

#[track_caller]
pub(crate) fn assert_status(response: &Response, want: StatusCode) {
    assert_eq!(
        response.status(),
        want,
        "got status code {}, want {}",
        response.status(),
        want
    );
}

pub(crate) async fn response_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("could not read response body")
        .to_vec()
}

pub(crate) async fn response_json<T: DeserializeOwned>(response: Response) -> T {
    let body = response_bytes(response).await;

    serde_json::from_slice(&body).unwrap_or_else(|error| {
        panic!(
            "could not parse response body {:?} as JSON: {error}",
            String::from_utf8_lossy(&body)
        )
    })
}
