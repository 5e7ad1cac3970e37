// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chef search, profile view, and owner-only profile editing.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::{ChefPatch, ChefSearch};
use crate::error::{AppError, Result};
use crate::middleware::auth::authenticate;
use crate::models::chef::{split_cuisines, ChefProfile};
use crate::AppState;

/// Chef routes. Search and profile views are public; editing a profile
/// authenticates inline because it shares its path with the public view.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chefs", get(search_chefs))
        .route("/api/chefs/{id}", get(get_chef).patch(update_chef))
}

// ─── Request / Response Types ────────────────────────────────

/// Search filters, AND-combined. All optional.
#[derive(Deserialize)]
pub struct ChefSearchQuery {
    /// Cuisine list membership
    pub cuisine: Option<String>,
    /// Location substring
    pub location: Option<String>,
    /// Maximum hourly rate
    pub max_price: Option<f64>,
    /// Name substring
    pub search: Option<String>,
}

/// Partial profile patch; only supplied fields are written.
#[derive(Deserialize, Validate)]
pub struct ChefUpdateRequest {
    pub bio: Option<String>,
    /// Comma-separated list, e.g. "Italian,French"
    pub cuisines: Option<String>,
    pub specialties: Option<String>,
    #[validate(range(min = 0.0, message = "hourly_rate must not be negative"))]
    pub hourly_rate: Option<f64>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    #[validate(range(min = 0, message = "years_of_experience must not be negative"))]
    pub years_of_experience: Option<i64>,
    pub is_available: Option<bool>,
}

#[derive(Serialize)]
pub struct ChefResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub cuisines: Vec<String>,
    pub specialties: Option<String>,
    pub hourly_rate: f64,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub years_of_experience: i64,
    pub rating: f64,
    pub total_bookings: i64,
    pub is_available: bool,
}

impl From<ChefProfile> for ChefResponse {
    fn from(chef: ChefProfile) -> Self {
        Self {
            id: chef.id,
            user_id: chef.user_id,
            name: chef.name,
            cuisines: split_cuisines(&chef.cuisines),
            bio: chef.bio,
            specialties: chef.specialties,
            hourly_rate: chef.hourly_rate,
            location: chef.location,
            phone: chef.phone,
            photo_url: chef.photo_url,
            years_of_experience: chef.years_of_experience,
            rating: chef.rating,
            total_bookings: chef.total_bookings,
            is_available: chef.is_available,
        }
    }
}

// ─── Handlers ────────────────────────────────────────────────

/// Search chef profiles with optional AND-combined filters.
async fn search_chefs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChefSearchQuery>,
) -> Result<Json<Vec<ChefResponse>>> {
    let chefs = state
        .db
        .search_chefs(&ChefSearch {
            cuisine: params.cuisine,
            location: params.location,
            max_price: params.max_price,
            name: params.search,
        })
        .await?;

    Ok(Json(chefs.into_iter().map(ChefResponse::from).collect()))
}

/// View a chef profile.
async fn get_chef(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ChefResponse>> {
    let chef = state
        .db
        .chef_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", id)))?;

    Ok(Json(ChefResponse::from(chef)))
}

/// Update a chef profile. Owner-only: the caller's account must own the
/// profile being patched.
async fn update_chef(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<ChefUpdateRequest>,
) -> Result<Json<ChefResponse>> {
    let user = authenticate(&state, &headers)?;

    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let chef = state
        .db
        .chef_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chef {} not found", id)))?;

    if chef.user_id != user.account_id {
        return Err(AppError::Forbidden(
            "Only the owner may edit this profile".to_string(),
        ));
    }

    let updated = state
        .db
        .update_chef(
            id,
            &ChefPatch {
                bio: body.bio,
                cuisines: body.cuisines,
                specialties: body.specialties,
                hourly_rate: body.hourly_rate,
                location: body.location,
                phone: body.phone,
                photo_url: body.photo_url,
                years_of_experience: body.years_of_experience,
                is_available: body.is_available,
            },
        )
        .await?;

    Ok(Json(ChefResponse::from(updated)))
}
