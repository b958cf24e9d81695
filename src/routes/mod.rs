// ABOUTME: Route module organization for the food tracking HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain, assembled into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Route module for the food tracking API
//!
//! Each domain module contains route definitions and thin handler
//! functions that delegate to the database managers and the nutrient
//! aggregator. Handlers shape responses into the `{ "data": ... }`
//! envelope; error mapping lives on [`AppError`](crate::errors::AppError).

/// Per-member favorites routes
pub mod favorites;
/// Food CRUD, nutrients, and search routes
pub mod foods;
/// Health check and system status routes
pub mod health;
/// Food note routes
pub mod notes;
/// Recipe detail routes
pub mod recipes;

pub use favorites::FavoriteRoutes;
pub use foods::FoodRoutes;
pub use health::HealthRoutes;
pub use notes::NoteRoutes;
pub use recipes::RecipeRoutes;

use crate::resources::ServerResources;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Success envelope wrapping every data-bearing response
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    /// The payload
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// Wrap a payload
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(FoodRoutes::routes(resources.clone()))
        .merge(RecipeRoutes::routes(resources.clone()))
        .merge(FavoriteRoutes::routes(resources.clone()))
        .merge(NoteRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
