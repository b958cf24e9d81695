// ABOUTME: Route handler for the expanded recipe view
// ABOUTME: Returns per-serving recipe nutrients plus per-ingredient contributions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Recipe routes
//!
//! `GET /foods/recipe/:id` expands a recipe one level: the recipe's own
//! per-serving nutrients (`servNuts`) plus each direct ingredient with
//! the nutrients of the quantity the recipe consumes (`ingredNuts`).
//! An ingredient's consumed quantity is its full-batch aggregate scaled
//! by `num_servings / servings`, the same factor the aggregator applies
//! internally.

use crate::{
    errors::AppError,
    models::{FoodWithUnits, NutrientProfile},
    nutrition::AggregationMode,
    resources::ServerResources,
    routes::{foods::aggregator, DataEnvelope},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// One direct ingredient of a recipe with its consumed-quantity nutrients
#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    /// Ingredient food id
    #[serde(rename = "foodId")]
    pub food_id: i64,
    /// Ingredient name
    #[serde(rename = "foodName")]
    pub food_name: String,
    /// Servings of the ingredient the recipe consumes
    #[serde(rename = "numServings")]
    pub num_servings: f64,
    /// Nutrients of the consumed quantity
    #[serde(rename = "ingredNuts")]
    pub ingred_nuts: NutrientProfile,
}

/// Expanded recipe view, using the endpoint's camelCase key names
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    /// Recipe food id
    #[serde(rename = "foodId")]
    pub food_id: i64,
    /// Recipe name
    #[serde(rename = "foodName")]
    pub food_name: String,
    /// Recipe description
    #[serde(rename = "foodDesc")]
    pub food_desc: Option<String>,
    /// Owning member id
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    /// Serving size
    #[serde(rename = "servSize")]
    pub serv_size: Option<f64>,
    /// Unit-of-measure id
    #[serde(rename = "servUnits")]
    pub serv_units: i64,
    /// Unit-of-measure description
    #[serde(rename = "foodUnits")]
    pub food_units: String,
    /// Total serving yield of the prepared recipe
    pub servings: f64,
    /// Per-serving nutrients of the recipe
    #[serde(rename = "servNuts")]
    pub serv_nuts: NutrientProfile,
    /// Direct ingredients with their contributions
    pub ingreds: Vec<RecipeIngredientResponse>,
}

impl RecipeResponse {
    fn from_parts(
        food: FoodWithUnits,
        serv_nuts: NutrientProfile,
        ingreds: Vec<RecipeIngredientResponse>,
    ) -> Self {
        Self {
            food_id: food.food.id,
            food_name: food.food.name,
            food_desc: food.food.description,
            owner_id: food.food.owner,
            serv_size: food.food.serving_size,
            serv_units: food.food.serving_units,
            food_units: food.food_units,
            servings: food.food.servings,
            serv_nuts,
            ingreds,
        }
    }
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/foods/recipe/:id", get(Self::handle_get_recipe))
            .with_state(resources)
    }

    /// Handle GET /foods/recipe/:id - expanded recipe with ingredients
    async fn handle_get_recipe(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let foods = resources.database.foods();
        let food = foods
            .get_food_with_units(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food {id}")))?;

        if !food.food.is_recipe {
            return Err(AppError::invalid_input(format!(
                "Food {id} is a basic food, not a recipe"
            )));
        }

        let agg = aggregator(&resources, &foods);
        let serv_nuts = agg.aggregate(id, AggregationMode::PerServing).await?;

        let details = foods.ingredient_details(id).await?;
        let mut ingreds = Vec::with_capacity(details.len());
        for detail in details {
            if detail.servings <= 0.0 {
                return Err(AppError::zero_servings(detail.ingredient_id));
            }
            let batch = agg
                .aggregate(detail.ingredient_id, AggregationMode::FullBatch)
                .await?;
            ingreds.push(RecipeIngredientResponse {
                food_id: detail.ingredient_id,
                food_name: detail.name,
                num_servings: detail.num_servings,
                ingred_nuts: batch.scaled(detail.num_servings / detail.servings),
            });
        }

        let response = DataEnvelope::new(RecipeResponse::from_parts(food, serv_nuts, ingreds));
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
