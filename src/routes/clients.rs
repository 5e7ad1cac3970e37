// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client profile view and owner-only editing.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::ClientPatch;
use crate::error::{AppError, Result};
use crate::middleware::auth::authenticate;
use crate::models::chef::split_cuisines;
use crate::models::ClientProfile;
use crate::AppState;

/// Client routes. Viewing is public; editing authenticates inline because
/// it shares its path with the public view.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/clients/{id}", get(get_client).patch(update_client))
}

// ─── Request / Response Types ────────────────────────────────

/// Partial profile patch; only supplied fields are written. The account's
/// display name is not editable here.
#[derive(Deserialize)]
pub struct ClientUpdateRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Comma-separated list, e.g. "Italian,Thai"
    pub preferred_cuisines: Option<String>,
}

#[derive(Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub preferred_cuisines: Vec<String>,
    pub total_bookings: i64,
}

impl From<ClientProfile> for ClientResponse {
    fn from(client: ClientProfile) -> Self {
        Self {
            id: client.id,
            user_id: client.user_id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            address: client.address,
            preferred_cuisines: split_cuisines(&client.preferred_cuisines),
            total_bookings: client.total_bookings,
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────

/// View a client profile.
async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ClientResponse>> {
    let client = state
        .db
        .client_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))?;

    Ok(Json(ClientResponse::from(client)))
}

/// Update a client profile. Owner-only.
async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<ClientUpdateRequest>,
) -> Result<Json<ClientResponse>> {
    let user = authenticate(&state, &headers)?;

    let client = state
        .db
        .client_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))?;

    if client.user_id != user.account_id {
        return Err(AppError::Forbidden(
            "Only the owner may edit this profile".to_string(),
        ));
    }

    let updated = state
        .db
        .update_client(
            id,
            &ClientPatch {
                phone: body.phone,
                address: body.address,
                preferred_cuisines: body.preferred_cuisines,
            },
        )
        .await?;

    Ok(Json(ClientResponse::from(updated)))
}
