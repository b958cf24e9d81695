// ABOUTME: Route handlers for food CRUD, nutrient lookups, and search
// ABOUTME: Maps endpoint-specific field naming onto the canonical internal models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Food routes
//!
//! The two nutrient lookup shapes the source system exposed are kept
//! distinct on purpose: `GET /food/:id` embeds the FULL-BATCH aggregate,
//! while `GET /food/nutrients/:id` and `GET /foods/nutrients/:id` embed
//! the PER-SERVING aggregate. Each handler states its mode explicitly
//! instead of burying the division inside the aggregation.

use crate::{
    database::foods::{NewBasicFood, NewRecipeFood, UpdateFoodFields},
    errors::AppError,
    models::{Food, FoodSearchRow, FoodWithUnits, IngredientEntry, NutrientProfile, SearchFoodOption},
    nutrition::{AggregationMode, NutrientAggregator},
    resources::ServerResources,
    routes::DataEnvelope,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Food metadata with its aggregated nutrients embedded
#[derive(Debug, Serialize)]
pub struct FoodResponse {
    /// The food record
    #[serde(flatten)]
    pub food: Food,
    /// Aggregated nutrient profile
    pub nutrients: NutrientProfile,
}

/// Food metadata joined with units, with aggregated nutrients embedded
#[derive(Debug, Serialize)]
pub struct FoodNutrientsResponse {
    /// The food record with its unit description
    #[serde(flatten)]
    pub food: FoodWithUnits,
    /// Aggregated nutrient profile
    pub nutrients: NutrientProfile,
}

/// Response for a successful food creation
#[derive(Debug, Serialize)]
pub struct CreatedFoodResponse {
    /// Id of the newly created food
    #[serde(rename = "foodId")]
    pub food_id: i64,
}

/// Request body for creating a basic food.
///
/// Required fields are optionals here so their absence maps to a 400
/// with a field name instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateBasicFoodBody {
    /// Display name; required
    #[serde(rename = "foodName")]
    pub food_name: Option<String>,
    /// Optional description
    #[serde(rename = "foodDesc", default)]
    pub food_desc: Option<String>,
    /// Owning member id; required
    pub owner: Option<i64>,
    /// Serving size (nullable)
    #[serde(rename = "servSize", default)]
    pub serv_size: Option<f64>,
    /// Unit-of-measure id, defaults to 1
    #[serde(rename = "servUnits", default)]
    pub serv_units: Option<i64>,
    /// Total serving yield, defaults to 1
    #[serde(default)]
    pub servings: Option<f64>,
    /// Calories; required
    pub calories: Option<f64>,
    /// Fat grams; required
    pub fat: Option<f64>,
    /// Carbohydrate grams; required
    pub carbs: Option<f64>,
    /// Protein grams; required
    pub protein: Option<f64>,
    /// Fiber grams, defaults to 0
    #[serde(default)]
    pub fiber: Option<f64>,
    /// Points, defaults to 0
    #[serde(default)]
    pub points: Option<f64>,
}

impl CreateBasicFoodBody {
    fn into_new(self) -> Result<NewBasicFood, AppError> {
        let name = self
            .food_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("foodName"))?;
        let owner = self.owner.ok_or_else(|| AppError::missing_field("owner"))?;
        let calories = self
            .calories
            .ok_or_else(|| AppError::missing_field("calories"))?;
        let fat_grams = self.fat.ok_or_else(|| AppError::missing_field("fat"))?;
        let carb_grams = self.carbs.ok_or_else(|| AppError::missing_field("carbs"))?;
        let protein_grams = self
            .protein
            .ok_or_else(|| AppError::missing_field("protein"))?;

        Ok(NewBasicFood {
            name,
            description: self.food_desc,
            owner,
            serving_size: self.serv_size,
            serving_units: self.serv_units.unwrap_or(1),
            servings: self.servings.unwrap_or(1.0),
            nutrients: NutrientProfile {
                calories,
                points: self.points.unwrap_or(0.0),
                fat_grams,
                carb_grams,
                protein_grams,
                fiber_grams: self.fiber.unwrap_or(0.0),
            },
        })
    }
}

/// One ingredient entry in a recipe creation request
#[derive(Debug, Deserialize)]
pub struct RecipeIngredientBody {
    /// Ingredient food id
    #[serde(rename = "ingredId")]
    pub ingred_id: i64,
    /// Servings of the ingredient consumed
    #[serde(rename = "numServings")]
    pub num_servings: f64,
}

/// Request body for creating a recipe food
#[derive(Debug, Deserialize)]
pub struct CreateRecipeFoodBody {
    /// Display name; required
    #[serde(rename = "foodName")]
    pub food_name: Option<String>,
    /// Optional description
    #[serde(rename = "foodDesc", default)]
    pub food_desc: Option<String>,
    /// Owning member id; required
    pub owner: Option<i64>,
    /// Serving size (nullable)
    #[serde(rename = "servSize", default)]
    pub serv_size: Option<f64>,
    /// Unit-of-measure id, defaults to 1
    #[serde(rename = "servUnits", default)]
    pub serv_units: Option<i64>,
    /// Total serving yield of the prepared recipe, defaults to 1
    #[serde(default)]
    pub servings: Option<f64>,
    /// Ingredient foods and quantities; at least one required
    #[serde(rename = "ingreds", default)]
    pub ingreds: Vec<RecipeIngredientBody>,
}

impl CreateRecipeFoodBody {
    fn into_new(self) -> Result<NewRecipeFood, AppError> {
        let name = self
            .food_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("foodName"))?;
        let owner = self.owner.ok_or_else(|| AppError::missing_field("owner"))?;
        if self.ingreds.is_empty() {
            return Err(AppError::missing_field("ingreds"));
        }

        Ok(NewRecipeFood {
            name,
            description: self.food_desc,
            owner,
            serving_size: self.serv_size,
            serving_units: self.serv_units.unwrap_or(1),
            servings: self.servings.unwrap_or(1.0),
            ingredients: self
                .ingreds
                .into_iter()
                .map(|i| IngredientEntry {
                    ingredient_id: i.ingred_id,
                    num_servings: i.num_servings,
                })
                .collect(),
        })
    }
}

/// Request body for the generic food update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFoodBody {
    /// New name (if provided)
    #[serde(rename = "foodName")]
    pub food_name: Option<String>,
    /// New description (if provided)
    #[serde(rename = "foodDesc")]
    pub food_desc: Option<String>,
    /// New serving size (if provided)
    #[serde(rename = "servSize")]
    pub serv_size: Option<f64>,
    /// New unit-of-measure id (if provided)
    #[serde(rename = "servUnits")]
    pub serv_units: Option<i64>,
    /// New serving yield (if provided)
    pub servings: Option<f64>,
    /// New calories (if provided; basic foods only)
    pub calories: Option<f64>,
    /// New fat grams (if provided; basic foods only)
    pub fat: Option<f64>,
    /// New carbohydrate grams (if provided; basic foods only)
    pub carbs: Option<f64>,
    /// New protein grams (if provided; basic foods only)
    pub protein: Option<f64>,
    /// New fiber grams (if provided; basic foods only)
    pub fiber: Option<f64>,
    /// New points (if provided; basic foods only)
    pub points: Option<f64>,
}

impl From<UpdateFoodBody> for UpdateFoodFields {
    fn from(body: UpdateFoodBody) -> Self {
        Self {
            name: body.food_name,
            description: body.food_desc,
            serving_size: body.serv_size,
            serving_units: body.serv_units,
            servings: body.servings,
            calories: body.calories,
            points: body.points,
            fat_grams: body.fat,
            carb_grams: body.carbs,
            protein_grams: body.protein,
            fiber_grams: body.fiber,
        }
    }
}

/// Query parameters for food search
#[derive(Debug, Deserialize)]
pub struct SearchFoodsQuery {
    /// Member id the owner/favorites modes filter on
    pub owner: i64,
    /// Search mode
    #[serde(rename = "searchFoodOption")]
    pub search_food_option: SearchFoodOption,
    /// Optional keyword matched against name and description
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Food routes handler
pub struct FoodRoutes;

impl FoodRoutes {
    /// Create all food routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/food/:id", get(Self::handle_get_food))
            .route("/food/nutrients/:id", get(Self::handle_get_nutrients))
            .route("/foods/nutrients/:id", get(Self::handle_get_nutrients))
            .route("/foods/basic", post(Self::handle_create_basic))
            .route("/foods/recipe", post(Self::handle_create_recipe))
            .route("/foods/:id", put(Self::handle_update))
            .route("/foods/search", get(Self::handle_search))
            .with_state(resources)
    }

    /// Handle GET /food/:id - food metadata with FULL-BATCH nutrients
    async fn handle_get_food(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let foods = resources.database.foods();
        let food = foods
            .get_food(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food {id}")))?;

        let nutrients = aggregator(&resources, &foods)
            .aggregate(id, AggregationMode::FullBatch)
            .await?;

        let response = DataEnvelope::new(FoodResponse { food, nutrients });
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /food/nutrients/:id and /foods/nutrients/:id -
    /// food metadata (with unit description) and PER-SERVING nutrients
    async fn handle_get_nutrients(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let foods = resources.database.foods();
        let food = foods
            .get_food_with_units(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food {id}")))?;

        let nutrients = aggregator(&resources, &foods)
            .aggregate(id, AggregationMode::PerServing)
            .await?;

        let response = DataEnvelope::new(FoodNutrientsResponse { food, nutrients });
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /foods/basic - create a basic food with its detail row
    async fn handle_create_basic(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateBasicFoodBody>,
    ) -> Result<Response, AppError> {
        let new = body.into_new()?;
        let food_id = resources.database.foods().create_basic(&new).await?;

        let response = DataEnvelope::new(CreatedFoodResponse { food_id });
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /foods/recipe - create a recipe food with its ingredients
    async fn handle_create_recipe(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateRecipeFoodBody>,
    ) -> Result<Response, AppError> {
        let new = body.into_new()?;
        let food_id = resources.database.foods().create_recipe(&new).await?;

        let response = DataEnvelope::new(CreatedFoodResponse { food_id });
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle PUT /foods/:id - generic field update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Json(body): Json<UpdateFoodBody>,
    ) -> Result<Response, AppError> {
        let fields: UpdateFoodFields = body.into();
        let food = resources
            .database
            .foods()
            .update_food(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food {id}")))?;

        let response = DataEnvelope::new(food);
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /foods/search - search by mode and keyword
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<SearchFoodsQuery>,
    ) -> Result<Response, AppError> {
        let rows: Vec<FoodSearchRow> = resources
            .database
            .foods()
            .search(
                query.owner,
                query.search_food_option,
                query.keyword.as_deref().filter(|k| !k.is_empty()),
            )
            .await?;

        let response = DataEnvelope::new(rows);
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

/// Build the aggregator configured by the server settings
pub(crate) fn aggregator<'a>(
    resources: &ServerResources,
    foods: &'a crate::database::FoodsManager,
) -> NutrientAggregator<'a, crate::database::FoodsManager> {
    NutrientAggregator::new(foods)
        .with_max_depth(resources.config.max_recipe_depth)
        .with_strict_integrity(resources.config.strict_integrity)
}
