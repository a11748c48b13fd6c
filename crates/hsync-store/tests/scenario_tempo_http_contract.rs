//! scenario_tempo_http_contract
//!
//! Drives `TempoHolidayStore` against a local mock server and checks the
//! request shape (path, query, headers, body) and the response handling.

use chrono::NaiveDate;
use httpmock::prelude::*;
use hsync_store::{HolidayStore, NewHoliday, StoreError, TempoHolidayStore, WriteOutcome};
use serde_json::json;

const PATH: &str = "/4/holiday-schemes/7/holidays";

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn store(server: &MockServer) -> TempoHolidayStore {
    TempoHolidayStore::builder("test-token", "7")
        .base_url(server.url("/4"))
        .build()
        .unwrap()
}

#[test]
fn fetch_year_sends_bearer_and_year_query() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path(PATH)
            .query_param("year", "2024")
            .header("Authorization", "Bearer test-token")
            .header("Content-Type", "application/json");
        then.status(200).json_body(json!({
            "metadata": { "count": 2 },
            "results": [
                { "id": 1, "date": "2024-01-01", "name": "Nytårsdag", "type": "FIXED" },
                { "id": 2, "date": "2024-12-25", "name": "Juledag", "type": "FLOATING" }
            ]
        }));
    });

    let got = store(&server).fetch_year(2024).unwrap();

    m.assert();
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].date, d(2024, 1, 1));
    assert_eq!(got[1].name, "Juledag");
}

#[test]
fn fetch_year_non_success_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(401)
            .json_body(json!({ "errors": [{ "message": "Bearer token is invalid" }] }));
    });

    let err = store(&server).fetch_year(2024).unwrap_err();
    assert_eq!(
        err,
        StoreError::Api {
            code: Some(401),
            message: "Bearer token is invalid".to_string()
        }
    );
}

#[test]
fn fetch_year_without_results_is_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(200).json_body(json!({ "unexpected": true }));
    });

    let err = store(&server).fetch_year(2024).unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)), "got {err:?}");
}

#[test]
fn fetch_year_with_non_iso_date_is_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(PATH);
        then.status(200)
            .json_body(json!({ "results": [{ "date": "25.12.2024", "name": "Juledag" }] }));
    });

    assert!(matches!(
        store(&server).fetch_year(2024),
        Err(StoreError::Decode(_))
    ));
}

#[test]
fn create_posts_floating_full_day_body() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path(PATH)
            .header("Authorization", "Bearer test-token")
            .header("Content-Type", "application/json")
            .json_body(json!({
                "date": "2024-12-25",
                "description": "Autoimported with holiday-sync",
                "durationSeconds": 86400,
                "name": "Juledag",
                "type": "FLOATING"
            }));
        then.status(200).json_body(json!({ "id": 99 }));
    });

    let out = store(&server)
        .create(&NewHoliday::floating(
            d(2024, 12, 25),
            "Juledag",
            "Autoimported with holiday-sync",
        ))
        .unwrap();

    m.assert_hits(1);
    assert_eq!(out, WriteOutcome::Created);
}

#[test]
fn create_non_success_is_rejected_not_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(400)
            .json_body(json!({ "errors": [{ "message": "Holiday already exists" }] }));
    });

    let out = store(&server)
        .create(&NewHoliday::floating(d(2024, 12, 25), "Juledag", "x"))
        .unwrap();

    assert_eq!(
        out,
        WriteOutcome::Rejected {
            status: 400,
            message: "Holiday already exists".to_string()
        }
    );
}

#[test]
fn unreachable_store_is_transport_error() {
    // Port 9 (discard) on localhost: nothing listens in test environments.
    let s = TempoHolidayStore::builder("t", "7")
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    assert!(matches!(s.fetch_year(2024), Err(StoreError::Transport(_))));
}
