// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Booking workflow: creation with server-computed pricing, per-caller
//! listing, and chef-driven status transitions.
//!
//! Pricing rule: the chef's hourly rate is snapshotted onto the booking
//! at creation and `total_price = duration_hours * hourly_rate` is
//! computed exactly once. Later profile edits never touch existing rows.
//!
//! Authorization rules:
//! - only accounts with role `client` (and a client profile) may create;
//! - only the assigned chef may transition a booking's status; clients
//!   cannot transition their own bookings at all.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Account, Booking, BookingStatus, NewBooking, Role};
use crate::AppState;

/// Booking routes (require authentication; the middleware is applied in
/// routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/{id}", patch(update_booking_status))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct BookingCreateRequest {
    pub chef_id: i64,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    #[validate(range(exclusive_min = 0.0, message = "duration_hours must be greater than 0"))]
    pub duration_hours: f64,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    pub special_requests: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingUpdateRequest {
    /// One of the recognized status values
    pub status: String,
    /// Chef-authored notes
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    /// Exact status to narrow the listing to
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub chef_id: i64,
    pub chef_name: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub duration_hours: f64,
    pub location: String,
    pub hourly_rate: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            client_id: booking.client_id,
            client_name: booking.client_name,
            chef_id: booking.chef_id,
            chef_name: booking.chef_name,
            booking_date: booking.booking_date,
            booking_time: booking.booking_time,
            duration_hours: booking.duration_hours,
            location: booking.location,
            hourly_rate: booking.hourly_rate,
            total_price: booking.total_price,
            status: booking.status,
            special_requests: booking.special_requests,
            notes: booking.notes,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────

/// Load the caller's account; a token whose account no longer exists
/// cannot be resolved and is treated as unauthenticated.
async fn resolve_account(state: &AppState, user: &AuthUser) -> Result<Account> {
    state
        .db
        .account_by_id(user.account_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

fn parse_status(raw: &str) -> Result<BookingStatus> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Unknown booking status '{}'", raw)))
}

// ─── Handlers ────────────────────────────────────────────────

/// Create a booking against a chef. Client-only.
async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<BookingCreateRequest>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = resolve_account(&state, &user).await?;
    if account.role != Role::Client {
        return Err(AppError::Forbidden(
            "Only clients can create bookings".to_string(),
        ));
    }

    let client = state
        .db
        .client_by_account(account.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("No client profile for this account".to_string()))?;

    let chef = state
        .db
        .chef_by_id(body.chef_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", body.chef_id)))?;

    // Price is derived server-side from the chef's current rate and
    // frozen onto the booking row.
    let total_price = body.duration_hours * chef.hourly_rate;

    let booking = state
        .db
        .create_booking(&NewBooking {
            client_id: client.id,
            chef_id: chef.id,
            booking_date: body.booking_date,
            booking_time: body.booking_time,
            duration_hours: body.duration_hours,
            location: body.location,
            hourly_rate: chef.hourly_rate,
            total_price,
            special_requests: body.special_requests,
        })
        .await?;

    tracing::info!(
        booking_id = booking.id,
        client_id = client.id,
        chef_id = chef.id,
        total_price,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// List the caller's bookings: a chef sees bookings assigned to them, a
/// client the bookings they made.
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>> {
    let status = params.status.as_deref().map(parse_status).transpose()?;

    let account = resolve_account(&state, &user).await?;

    let bookings = match account.role {
        Role::Client => {
            let client = state.db.client_by_account(account.id).await?.ok_or_else(|| {
                AppError::Forbidden("No client profile for this account".to_string())
            })?;
            state.db.bookings_for_client(client.id, status).await?
        }
        Role::Chef => {
            let chef = state.db.chef_by_account(account.id).await?.ok_or_else(|| {
                AppError::Forbidden("No chef profile for this account".to_string())
            })?;
            state.db.bookings_for_chef(chef.id, status).await?
        }
    };

    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

/// Transition a booking's status. Only the assigned chef may do this,
/// and only along the allowed transition table.
async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<BookingUpdateRequest>,
) -> Result<Json<BookingResponse>> {
    let next = parse_status(&body.status)?;

    let booking = state
        .db
        .booking_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

    let account = resolve_account(&state, &user).await?;
    if account.role != Role::Chef {
        return Err(AppError::Forbidden(
            "Only chefs can update booking status".to_string(),
        ));
    }

    let chef = state
        .db
        .chef_by_account(account.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("No chef profile for this account".to_string()))?;

    if chef.id != booking.chef_id {
        return Err(AppError::Forbidden(
            "Only the assigned chef may update this booking".to_string(),
        ));
    }

    if !booking.status.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "Cannot transition booking from '{}' to '{}'",
            booking.status, next
        )));
    }

    let updated = state
        .db
        .update_booking_status(&booking, next, body.notes.as_deref())
        .await?;

    tracing::info!(
        booking_id = updated.id,
        from = %booking.status,
        to = %updated.status,
        "Booking status updated"
    );

    Ok(Json(BookingResponse::from(updated)))
}
