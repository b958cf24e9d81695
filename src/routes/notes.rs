// ABOUTME: Route handlers for per-member food notes
// ABOUTME: Get, upsert, and delete one note per (food, member) pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Food-note routes
//!
//! A member keeps at most one free-text note per food; PUT creates or
//! replaces it in one call.

use crate::{
    errors::AppError, resources::ServerResources, routes::DataEnvelope,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating or replacing a note
#[derive(Debug, Deserialize)]
pub struct PutNoteBody {
    /// Free-text note content
    pub note: String,
}

/// Note routes handler
pub struct NoteRoutes;

impl NoteRoutes {
    /// Create all note routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/foods/:id/notes/:member_id",
                get(Self::handle_get)
                    .put(Self::handle_put)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle GET /foods/:id/notes/:member_id - fetch a member's note
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path((food_id, member_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let note = resources
            .database
            .notes()
            .get(food_id, member_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Note on food {food_id} for member {member_id}"))
            })?;

        Ok((StatusCode::OK, Json(DataEnvelope::new(note))).into_response())
    }

    /// Handle PUT /foods/:id/notes/:member_id - create or replace a note
    async fn handle_put(
        State(resources): State<Arc<ServerResources>>,
        Path((food_id, member_id)): Path<(i64, i64)>,
        Json(body): Json<PutNoteBody>,
    ) -> Result<Response, AppError> {
        if body.note.trim().is_empty() {
            return Err(AppError::missing_field("note"));
        }

        let note = resources
            .database
            .notes()
            .upsert(food_id, member_id, &body.note)
            .await?;

        Ok((StatusCode::OK, Json(DataEnvelope::new(note))).into_response())
    }

    /// Handle DELETE /foods/:id/notes/:member_id - delete a member's note
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path((food_id, member_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let deleted = resources.database.notes().delete(food_id, member_id).await?;
        if !deleted {
            return Err(AppError::not_found(format!(
                "Note on food {food_id} for member {member_id}"
            )));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
