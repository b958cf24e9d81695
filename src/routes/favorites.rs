// ABOUTME: Route handlers for a member's favorite foods
// ABOUTME: Add, remove, and list favorite food ids per member
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Favorite-food routes

use crate::{
    errors::AppError, resources::ServerResources, routes::DataEnvelope,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body for adding a favorite
#[derive(Debug, Deserialize)]
pub struct AddFavoriteBody {
    /// Food id to mark as a favorite
    #[serde(rename = "foodId")]
    pub food_id: i64,
}

/// Outcome of a favorite add/remove
#[derive(Debug, Serialize)]
pub struct FavoriteChangeResponse {
    /// Whether the operation changed anything
    pub changed: bool,
}

/// Favorite routes handler
pub struct FavoriteRoutes;

impl FavoriteRoutes {
    /// Create all favorite routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/members/:member_id/favorites",
                get(Self::handle_list).post(Self::handle_add),
            )
            .route(
                "/members/:member_id/favorites/:food_id",
                delete(Self::handle_remove),
            )
            .with_state(resources)
    }

    /// Handle GET /members/:member_id/favorites - list favorite food ids
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(member_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let food_ids = resources.database.favorites().list(member_id).await?;
        Ok((StatusCode::OK, Json(DataEnvelope::new(food_ids))).into_response())
    }

    /// Handle POST /members/:member_id/favorites - add a favorite
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        Path(member_id): Path<i64>,
        Json(body): Json<AddFavoriteBody>,
    ) -> Result<Response, AppError> {
        let changed = resources
            .database
            .favorites()
            .add(member_id, body.food_id)
            .await?;

        let status = if changed {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Ok((status, Json(DataEnvelope::new(FavoriteChangeResponse { changed }))).into_response())
    }

    /// Handle DELETE /members/:member_id/favorites/:food_id - remove a favorite
    async fn handle_remove(
        State(resources): State<Arc<ServerResources>>,
        Path((member_id, food_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let changed = resources
            .database
            .favorites()
            .remove(member_id, food_id)
            .await?;

        if !changed {
            return Err(AppError::not_found(format!(
                "Favorite {food_id} for member {member_id}"
            )));
        }
        Ok((StatusCode::OK, Json(DataEnvelope::new(FavoriteChangeResponse { changed }))).into_response())
    }
}
