// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for integration tests: an app wired to an in-memory
//! SQLite database, plus request and fixture shortcuts.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use find_my_chef::config::Config;
use find_my_chef::db::Db;
use find_my_chef::routes::create_router;
use find_my_chef::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let config = Config::default();
    let db = Db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");

    let state = Arc::new(AppState { config, db });
    (create_router(state.clone()), state)
}

/// Send a request with an optional bearer token and JSON body; returns
/// the status and the parsed JSON response body (Null if empty).
#[allow(dead_code)]
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

/// Register an account; panics unless registration succeeds.
#[allow(dead_code)]
pub async fn register(app: &Router, name: &str, email: &str, role: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "SecurePass123!",
            "role": role,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    body
}

/// Register a chef and set their hourly rate. Returns (token, chef_id).
#[allow(dead_code)]
pub async fn register_chef_with_rate(app: &Router, email: &str, rate: f64) -> (String, i64) {
    let body = register(app, "Test Chef", email, "chef").await;
    let token = body["token"].as_str().unwrap().to_string();
    let chef_id = body["chef_profile"]["id"].as_i64().unwrap();

    let (status, _) = request(
        app,
        "PATCH",
        &format!("/api/chefs/{}", chef_id),
        Some(&token),
        Some(json!({ "hourly_rate": rate })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (token, chef_id)
}

/// Register a client. Returns (token, client_id).
#[allow(dead_code)]
pub async fn register_client(app: &Router, email: &str) -> (String, i64) {
    let body = register(app, "Test Client", email, "client").await;
    let token = body["token"].as_str().unwrap().to_string();
    let client_id = body["client_profile"]["id"].as_i64().unwrap();
    (token, client_id)
}

/// Create a booking for `duration_hours` against a chef. Panics unless
/// creation succeeds; returns the booking view.
#[allow(dead_code)]
pub async fn create_booking(
    app: &Router,
    client_token: &str,
    chef_id: i64,
    duration_hours: f64,
) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/bookings",
        Some(client_token),
        Some(json!({
            "chef_id": chef_id,
            "booking_date": "2026-12-15",
            "booking_time": "18:00:00",
            "duration_hours": duration_hours,
            "location": "123 Main St, Nairobi",
            "special_requests": "Please prepare vegetarian dishes",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "booking failed: {}", body);
    body
}
