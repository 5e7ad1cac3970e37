// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking workflow tests: server-computed pricing, rate snapshots,
//! role-based authorization, listing scope, and the transition table.

use axum::http::StatusCode;
use serde_json::json;

mod common;

// ─── Creation & Pricing ──────────────────────────────────────

#[tokio::test]
async fn test_create_booking_computes_price() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, client_id) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    assert_eq!(booking["chef_id"], chef_id);
    assert_eq!(booking["client_id"], client_id);
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["hourly_rate"], 50.0);
    assert_eq!(booking["total_price"], 150.0); // 3 hours * 50
    assert_eq!(booking["chef_name"], "Test Chef");
    assert_eq!(booking["client_name"], "Test Client");
    assert_eq!(booking["booking_date"], "2026-12-15");
    assert!(booking["created_at"].is_string());
    assert!(booking["updated_at"].is_null());
}

#[tokio::test]
async fn test_price_is_computed_by_backend() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 75.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 4.0).await;

    assert_eq!(booking["total_price"], 300.0); // 4 * 75
}

#[tokio::test]
async fn test_rate_snapshot_survives_later_rate_change() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;
    let booking_id = booking["id"].as_i64().unwrap();

    // Chef raises their rate after the booking exists
    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/chefs/{}", chef_id),
        Some(&chef_token),
        Some(json!({ "hourly_rate": 75.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The booking keeps its frozen rate and price
    let (status, listed) =
        common::request(&app, "GET", "/api/bookings", Some(&client_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let listed = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"].as_i64() == Some(booking_id))
        .expect("booking should still be listed")
        .clone();
    assert_eq!(listed["hourly_rate"], 50.0);
    assert_eq!(listed["total_price"], 150.0);

    // But a new booking picks up the new rate
    let fresh = common::create_booking(&app, &client_token, chef_id, 3.0).await;
    assert_eq!(fresh["hourly_rate"], 75.0);
    assert_eq!(fresh["total_price"], 225.0);
}

#[tokio::test]
async fn test_create_booking_requires_auth() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/bookings",
        None,
        Some(json!({
            "chef_id": chef_id,
            "booking_date": "2026-12-15",
            "booking_time": "18:00:00",
            "duration_hours": 3.0,
            "location": "123 Main St",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No row was created
    let (_, bookings) =
        common::request(&app, "GET", "/api/bookings", Some(&client_token), None).await;
    assert!(bookings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_chef_cannot_create_booking() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/bookings",
        Some(&chef_token),
        Some(json!({
            "chef_id": chef_id,
            "booking_date": "2026-12-15",
            "booking_time": "18:00:00",
            "duration_hours": 3.0,
            "location": "123 Main St",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_booking_unknown_chef() {
    let (app, _) = common::create_test_app().await;

    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/bookings",
        Some(&client_token),
        Some(json!({
            "chef_id": 99999,
            "booking_date": "2026-12-15",
            "booking_time": "18:00:00",
            "duration_hours": 3.0,
            "location": "123 Main St",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_booking_rejects_bad_duration_and_location() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    for (duration, location) in [(0.0, "123 Main St"), (-2.0, "123 Main St"), (3.0, "")] {
        let (status, _) = common::request(
            &app,
            "POST",
            "/api/bookings",
            Some(&client_token),
            Some(json!({
                "chef_id": chef_id,
                "booking_date": "2026-12-15",
                "booking_time": "18:00:00",
                "duration_hours": duration,
                "location": location,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_create_booking_missing_fields() {
    let (app, _) = common::create_test_app().await;

    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/bookings",
        Some(&client_token),
        Some(json!({ "chef_id": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Listing ─────────────────────────────────────────────────

#[tokio::test]
async fn test_listing_is_scoped_to_caller() {
    let (app, _) = common::create_test_app().await;

    let (chef1_token, chef1_id) =
        common::register_chef_with_rate(&app, "chef1@example.com", 50.0).await;
    let (chef2_token, chef2_id) =
        common::register_chef_with_rate(&app, "chef2@example.com", 60.0).await;
    let (client1_token, _) = common::register_client(&app, "client1@example.com").await;
    let (client2_token, _) = common::register_client(&app, "client2@example.com").await;

    // client1 books chef1 twice, client2 books chef2 once
    common::create_booking(&app, &client1_token, chef1_id, 2.0).await;
    common::create_booking(&app, &client1_token, chef1_id, 3.0).await;
    common::create_booking(&app, &client2_token, chef2_id, 1.0).await;

    let (_, chef1_bookings) =
        common::request(&app, "GET", "/api/bookings", Some(&chef1_token), None).await;
    let chef1_bookings = chef1_bookings.as_array().unwrap().clone();
    assert_eq!(chef1_bookings.len(), 2);
    assert!(chef1_bookings.iter().all(|b| b["chef_id"] == chef1_id));

    let (_, chef2_bookings) =
        common::request(&app, "GET", "/api/bookings", Some(&chef2_token), None).await;
    assert_eq!(chef2_bookings.as_array().unwrap().len(), 1);

    let (_, client1_bookings) =
        common::request(&app, "GET", "/api/bookings", Some(&client1_token), None).await;
    assert_eq!(client1_bookings.as_array().unwrap().len(), 2);

    let (_, client2_bookings) =
        common::request(&app, "GET", "/api/bookings", Some(&client2_token), None).await;
    assert_eq!(client2_bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_bookings_filter_by_status() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let first = common::create_booking(&app, &client_token, chef_id, 2.0).await;
    common::create_booking(&app, &client_token, chef_id, 3.0).await;

    // Chef accepts the first booking
    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", first["id"]),
        Some(&chef_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, pending) = common::request(
        &app,
        "GET",
        "/api/bookings?status=pending",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["status"], "pending");

    let (_, accepted) = common::request(
        &app,
        "GET",
        "/api/bookings?status=accepted",
        Some(&client_token),
        None,
    )
    .await;
    assert_eq!(accepted.as_array().unwrap().len(), 1);
    assert_eq!(accepted[0]["id"], first["id"]);
}

#[tokio::test]
async fn test_list_bookings_unknown_status_filter() {
    let (app, _) = common::create_test_app().await;

    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let (status, _) = common::request(
        &app,
        "GET",
        "/api/bookings?status=paid",
        Some(&client_token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ─── Status Transitions ──────────────────────────────────────

#[tokio::test]
async fn test_chef_accepts_booking() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    let (status, updated) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        Some(&chef_token),
        Some(json!({ "status": "accepted", "notes": "Happy to cook" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "accepted");
    assert_eq!(updated["notes"], "Happy to cook");
    assert!(updated["updated_at"].is_string());
}

#[tokio::test]
async fn test_chef_declines_booking() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    let (status, updated) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        Some(&chef_token),
        Some(json!({ "status": "declined" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "declined");
}

#[tokio::test]
async fn test_full_lifecycle_increments_booking_counters() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, client_id) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;
    let uri = format!("/api/bookings/{}", booking["id"]);

    for next in ["accepted", "confirmed", "completed"] {
        let (status, updated) = common::request(
            &app,
            "PATCH",
            &uri,
            Some(&chef_token),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], next);
    }

    // Completion bumps both total-bookings counters exactly once
    let (_, chef) = common::request(&app, "GET", &format!("/api/chefs/{}", chef_id), None, None).await;
    assert_eq!(chef["total_bookings"], 1);

    let (_, client) = common::request(
        &app,
        "GET",
        &format!("/api/clients/{}", client_id),
        None,
        None,
    )
    .await;
    assert_eq!(client["total_bookings"], 1);
}

#[tokio::test]
async fn test_transition_table_is_enforced() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    // pending -> completed is not allowed
    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;
    let uri = format!("/api/bookings/{}", booking["id"]);
    let (status, _) = common::request(
        &app,
        "PATCH",
        &uri,
        Some(&chef_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Terminal states admit nothing: decline, then try to accept
    let (status, _) = common::request(
        &app,
        "PATCH",
        &uri,
        Some(&chef_token),
        Some(json!({ "status": "declined" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &app,
        "PATCH",
        &uri,
        Some(&chef_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_status_value_rejected() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, chef_id) =
        common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        Some(&chef_token),
        Some(json!({ "status": "paid" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_nonexistent_booking() {
    let (app, _) = common::create_test_app().await;

    let (chef_token, _) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;

    let (status, _) = common::request(
        &app,
        "PATCH",
        "/api/bookings/99999",
        Some(&chef_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Transition Authorization ────────────────────────────────

#[tokio::test]
async fn test_only_assigned_chef_can_update() {
    let (app, _) = common::create_test_app().await;

    let (_, chef1_id) = common::register_chef_with_rate(&app, "chef1@example.com", 50.0).await;
    let (chef2_token, _) = common::register_chef_with_rate(&app, "chef2@example.com", 60.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef1_id, 3.0).await;

    // A different chef may not touch it
    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        Some(&chef2_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_client_cannot_update_own_booking() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    // Clients cannot transition bookings, not even their own
    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        Some(&client_token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_booking_requires_auth() {
    let (app, _) = common::create_test_app().await;

    let (_, chef_id) = common::register_chef_with_rate(&app, "chef@example.com", 50.0).await;
    let (client_token, _) = common::register_client(&app, "client@example.com").await;

    let booking = common::create_booking(&app, &client_token, chef_id, 3.0).await;

    let (status, _) = common::request(
        &app,
        "PATCH",
        &format!("/api/bookings/{}", booking["id"]),
        None,
        Some(json!({ "status": "accepted" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
