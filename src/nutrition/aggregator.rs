// ABOUTME: Recursive nutrient aggregation for basic and recipe foods
// ABOUTME: One canonical algorithm replacing four near-duplicate per-endpoint variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! # Nutrient Aggregator
//!
//! Given a food id, resolve its total nutrient profile. A basic food's
//! stored profile is returned verbatim. A recipe food's profile is the
//! field-wise sum of its ingredients' full-batch profiles, each scaled by
//! `num_servings / ingredient.servings` - converting "nutrients for the
//! ingredient's whole batch" into "nutrients for the quantity actually
//! used". The accumulator is never divided by the current food's own
//! yield inside the recursion; that division happens either at a parent's
//! frame when this food is consumed as an ingredient, or at the top level
//! when the caller asks for [`AggregationMode::PerServing`] on a recipe.
//! A basic food's stored profile is returned verbatim in both modes.
//!
//! Evaluation is depth-first, synchronous per call, and unmemoized: a
//! food referenced in multiple branches is recomputed each time. The
//! ingredient graph is expected to be a DAG; a configurable depth limit
//! converts cycles and pathological nesting into a structured error
//! instead of unbounded recursion.

use crate::errors::{AppError, AppResult};
use crate::models::{IngredientEntry, NutrientProfile};
use async_trait::async_trait;
use futures_util::future::BoxFuture;

/// Default maximum ingredient nesting depth before aggregation fails
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// The projection of a food row the aggregator needs: identity, the
/// recipe flag, and the total serving yield used as a scaling denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodRecord {
    /// Food id
    pub id: i64,
    /// True when nutrients are derived from ingredients
    pub is_recipe: bool,
    /// Total servings the record yields
    pub servings: f64,
}

/// Read-only repository the aggregator pulls food data from.
///
/// Implemented by the SQL-backed [`FoodsManager`](crate::database::foods::FoodsManager)
/// and by in-memory fixtures in tests. All three operations are
/// side-effect-free reads; no isolation across successive calls is
/// assumed or required.
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// Fetch a food's aggregation projection, `None` when the id is absent
    async fn food_record(&self, food_id: i64) -> AppResult<Option<FoodRecord>>;

    /// Fetch a basic food's stored nutrient row, `None` when absent
    async fn nutrient_profile(&self, food_id: i64) -> AppResult<Option<NutrientProfile>>;

    /// Fetch a recipe food's ingredient list (empty when none exist)
    async fn ingredients(&self, food_id: i64) -> AppResult<Vec<IngredientEntry>>;
}

/// Whether the aggregate is returned for the food's whole batch or
/// divided by its own serving yield.
///
/// The source system's endpoints disagreed on this: one returned the
/// full-batch total un-divided, another divided by the recipe's servings.
/// The mode parameter makes each call site state which it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Nutrients for the food's entire recorded `servings` yield
    FullBatch,
    /// A recipe's full-batch total divided by its own `servings`. A
    /// basic food's stored profile is returned verbatim, same as
    /// [`FullBatch`](Self::FullBatch).
    PerServing,
}

/// Recursive nutrient aggregator over a [`FoodStore`].
///
/// Holds no storage and no mutable state; each `aggregate` call owns its
/// accumulator and recursion stack, so one aggregator may serve
/// concurrent requests.
pub struct NutrientAggregator<'a, S: FoodStore + ?Sized> {
    store: &'a S,
    max_depth: usize,
    strict: bool,
}

impl<'a, S: FoodStore + ?Sized> NutrientAggregator<'a, S> {
    /// Create an aggregator with the default depth limit and flag
    /// trusting (non-strict) integrity checking
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
        }
    }

    /// Override the maximum ingredient nesting depth
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable strict integrity checking: cross-validate the recipe flag
    /// against actual row presence instead of trusting it.
    ///
    /// Non-strict mode already rejects a recipe with zero ingredients and
    /// a basic food with no nutrient row - those break aggregation
    /// outright. Strict mode additionally rejects a basic food that has
    /// ingredient rows and a recipe that has a direct nutrient row, which
    /// would otherwise be silently ignored.
    #[must_use]
    pub const fn with_strict_integrity(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Aggregate the nutrient profile for `food_id`.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` - the id (or a transitive ingredient id) does
    ///   not resolve to a food
    /// - `DataIntegrity` - a recipe has no ingredients, a basic food has
    ///   no nutrient row, or a strict-mode cross-check fails
    /// - `DivisionByZeroServings` - a serving yield used as a denominator
    ///   is zero or negative
    /// - `RecursionLimitExceeded` - nesting passed the depth limit,
    ///   usually indicating a cycle in the ingredient graph
    ///
    /// The first error encountered aborts remaining sibling ingredient
    /// evaluation and propagates; no partial result is ever returned.
    pub async fn aggregate(
        &self,
        food_id: i64,
        mode: AggregationMode,
    ) -> AppResult<NutrientProfile> {
        let record = self.fetch_record(food_id).await?;
        let total = self.aggregate_batch(record, 0).await?;

        match mode {
            AggregationMode::FullBatch => Ok(total),
            AggregationMode::PerServing => {
                // A basic food's stored profile is returned verbatim in
                // either mode; only a derived recipe total is divided down
                if !record.is_recipe {
                    return Ok(total);
                }
                if record.servings <= 0.0 {
                    return Err(AppError::zero_servings(food_id));
                }
                Ok(total.scaled(1.0 / record.servings))
            }
        }
    }

    async fn fetch_record(&self, food_id: i64) -> AppResult<FoodRecord> {
        self.store
            .food_record(food_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Food {food_id}")))
    }

    /// Full-batch nutrients for one node of the ingredient graph.
    ///
    /// Boxed because async recursion needs an indirection for the
    /// compiler to size the future.
    fn aggregate_batch(
        &self,
        record: FoodRecord,
        depth: usize,
    ) -> BoxFuture<'_, AppResult<NutrientProfile>> {
        Box::pin(async move {
            if depth > self.max_depth {
                return Err(AppError::recursion_limit(record.id, self.max_depth));
            }

            if !record.is_recipe {
                return self.basic_profile(record.id).await;
            }

            if self.strict && self.store.nutrient_profile(record.id).await?.is_some() {
                return Err(AppError::data_integrity(format!(
                    "Recipe food {} has a direct nutrient row",
                    record.id
                )));
            }

            let ingredients = self.store.ingredients(record.id).await?;
            if ingredients.is_empty() {
                return Err(AppError::data_integrity(format!(
                    "Recipe food {} has no ingredients",
                    record.id
                )));
            }

            let mut total = NutrientProfile::zero();
            for entry in ingredients {
                let child = self.fetch_record(entry.ingredient_id).await?;
                if child.servings <= 0.0 {
                    return Err(AppError::zero_servings(child.id));
                }
                let child_batch = self.aggregate_batch(child, depth + 1).await?;
                total.add_scaled(&child_batch, entry.num_servings / child.servings);
            }
            Ok(total)
        })
    }

    /// Stored profile of a basic food, returned verbatim with no scaling
    async fn basic_profile(&self, food_id: i64) -> AppResult<NutrientProfile> {
        if self.strict && !self.store.ingredients(food_id).await?.is_empty() {
            return Err(AppError::data_integrity(format!(
                "Basic food {food_id} has ingredient rows"
            )));
        }

        self.store
            .nutrient_profile(food_id)
            .await?
            .ok_or_else(|| {
                AppError::data_integrity(format!("Basic food {food_id} has no nutrient row"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use std::collections::HashMap;

    /// In-memory fixture store keyed by food id
    #[derive(Default)]
    struct MemoryStore {
        foods: HashMap<i64, FoodRecord>,
        nutrients: HashMap<i64, NutrientProfile>,
        ingredients: HashMap<i64, Vec<IngredientEntry>>,
    }

    impl MemoryStore {
        fn basic(&mut self, id: i64, servings: f64, calories: f64) {
            self.foods.insert(
                id,
                FoodRecord {
                    id,
                    is_recipe: false,
                    servings,
                },
            );
            self.nutrients.insert(
                id,
                NutrientProfile {
                    calories,
                    points: 1.0,
                    fat_grams: 2.0,
                    carb_grams: 3.0,
                    protein_grams: 4.0,
                    fiber_grams: 5.0,
                },
            );
        }

        fn recipe(&mut self, id: i64, servings: f64, ingredients: &[(i64, f64)]) {
            self.foods.insert(
                id,
                FoodRecord {
                    id,
                    is_recipe: true,
                    servings,
                },
            );
            self.ingredients.insert(
                id,
                ingredients
                    .iter()
                    .map(|&(ingredient_id, num_servings)| IngredientEntry {
                        ingredient_id,
                        num_servings,
                    })
                    .collect(),
            );
        }
    }

    #[async_trait]
    impl FoodStore for MemoryStore {
        async fn food_record(&self, food_id: i64) -> AppResult<Option<FoodRecord>> {
            Ok(self.foods.get(&food_id).copied())
        }

        async fn nutrient_profile(&self, food_id: i64) -> AppResult<Option<NutrientProfile>> {
            Ok(self.nutrients.get(&food_id).copied())
        }

        async fn ingredients(&self, food_id: i64) -> AppResult<Vec<IngredientEntry>> {
            Ok(self.ingredients.get(&food_id).cloned().unwrap_or_default())
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[tokio::test]
    async fn basic_food_returned_verbatim_in_both_modes() {
        let mut store = MemoryStore::default();
        store.basic(1, 4.0, 120.0);

        let aggregator = NutrientAggregator::new(&store);
        let full = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap();
        let per = aggregator.aggregate(1, AggregationMode::PerServing).await.unwrap();

        // Stored profiles are never scaled, regardless of the servings value
        assert_close(full.calories, 120.0);
        assert_close(per.calories, 120.0);
    }

    #[tokio::test]
    async fn composite_is_scaled_field_wise_sum() {
        let mut store = MemoryStore::default();
        store.basic(1, 2.0, 200.0);
        store.basic(2, 4.0, 100.0);
        // 3 servings of food 1 (half its batch x3 = 1.5 batches) and
        // 1 serving of food 2 (a quarter batch)
        store.recipe(10, 1.0, &[(1, 3.0), (2, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let total = aggregator.aggregate(10, AggregationMode::FullBatch).await.unwrap();

        assert_close(total.calories, 200.0 * 3.0 / 2.0 + 100.0 / 4.0);
        assert_close(total.fiber_grams, 5.0 * 3.0 / 2.0 + 5.0 / 4.0);
    }

    #[tokio::test]
    async fn three_level_nesting_scales_through_two_steps() {
        let mut store = MemoryStore::default();
        // Worked example: A yields 1 serving at 100 calories; B uses 2
        // servings of A and yields 2; C uses 1 serving of B and yields 1.
        store.basic(1, 1.0, 100.0);
        store.recipe(2, 2.0, &[(1, 2.0)]);
        store.recipe(3, 1.0, &[(2, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let b = aggregator.aggregate(2, AggregationMode::FullBatch).await.unwrap();
        let c = aggregator.aggregate(3, AggregationMode::FullBatch).await.unwrap();

        assert_close(b.calories, 200.0);
        assert_close(c.calories, 100.0);
    }

    #[tokio::test]
    async fn per_serving_divides_only_at_top_level() {
        let mut store = MemoryStore::default();
        store.basic(1, 1.0, 100.0);
        store.recipe(2, 4.0, &[(1, 2.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let full = aggregator.aggregate(2, AggregationMode::FullBatch).await.unwrap();
        let per = aggregator.aggregate(2, AggregationMode::PerServing).await.unwrap();

        assert_close(full.calories, 200.0);
        assert_close(per.calories, 50.0);
    }

    #[tokio::test]
    async fn repeated_calls_are_idempotent() {
        let mut store = MemoryStore::default();
        store.basic(1, 2.0, 80.0);
        store.recipe(2, 3.0, &[(1, 1.0), (1, 2.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let first = aggregator.aggregate(2, AggregationMode::PerServing).await.unwrap();
        let second = aggregator.aggregate(2, AggregationMode::PerServing).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_food_is_not_found() {
        let store = MemoryStore::default();
        let aggregator = NutrientAggregator::new(&store);

        let err = aggregator.aggregate(99, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }

    #[tokio::test]
    async fn unknown_ingredient_is_not_found() {
        let mut store = MemoryStore::default();
        store.recipe(1, 1.0, &[(77, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let err = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    }

    #[tokio::test]
    async fn zero_ingredient_recipe_is_data_integrity_error() {
        let mut store = MemoryStore::default();
        store.recipe(1, 1.0, &[]);

        let aggregator = NutrientAggregator::new(&store);
        let err = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        // Never a silently zeroed profile
        assert_eq!(err.code, ErrorCode::DataIntegrity);
    }

    #[tokio::test]
    async fn basic_food_without_nutrient_row_is_data_integrity_error() {
        let mut store = MemoryStore::default();
        store.foods.insert(
            1,
            FoodRecord {
                id: 1,
                is_recipe: false,
                servings: 1.0,
            },
        );

        let aggregator = NutrientAggregator::new(&store);
        let err = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DataIntegrity);
    }

    #[tokio::test]
    async fn zero_serving_ingredient_never_produces_infinity() {
        let mut store = MemoryStore::default();
        store.basic(1, 0.0, 100.0);
        store.recipe(2, 1.0, &[(1, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let err = aggregator.aggregate(2, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DivisionByZeroServings);
    }

    #[tokio::test]
    async fn per_serving_of_zero_yield_root_fails() {
        let mut store = MemoryStore::default();
        store.basic(1, 1.0, 100.0);
        store.recipe(2, 0.0, &[(1, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        // Full batch never divides by the root's own yield
        assert!(aggregator.aggregate(2, AggregationMode::FullBatch).await.is_ok());

        let err = aggregator.aggregate(2, AggregationMode::PerServing).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DivisionByZeroServings);
    }

    #[tokio::test]
    async fn self_referencing_recipe_trips_the_depth_guard() {
        let mut store = MemoryStore::default();
        store.recipe(1, 1.0, &[(1, 1.0)]);

        let aggregator = NutrientAggregator::new(&store);
        let err = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RecursionLimitExceeded);
    }

    #[tokio::test]
    async fn transitive_cycle_trips_the_depth_guard() {
        let mut store = MemoryStore::default();
        store.recipe(1, 1.0, &[(2, 1.0)]);
        store.recipe(2, 2.0, &[(1, 1.0)]);

        let aggregator = NutrientAggregator::new(&store).with_max_depth(8);
        let err = aggregator.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RecursionLimitExceeded);
    }

    #[tokio::test]
    async fn deep_but_finite_nesting_within_the_limit_succeeds() {
        let mut store = MemoryStore::default();
        store.basic(0, 1.0, 10.0);
        for id in 1..=8 {
            store.recipe(id, 1.0, &[(id - 1, 1.0)]);
        }

        let aggregator = NutrientAggregator::new(&store).with_max_depth(8);
        let total = aggregator.aggregate(8, AggregationMode::FullBatch).await.unwrap();
        assert_close(total.calories, 10.0);
    }

    #[tokio::test]
    async fn strict_mode_rejects_basic_food_with_ingredient_rows() {
        let mut store = MemoryStore::default();
        store.basic(1, 1.0, 100.0);
        store
            .ingredients
            .insert(1, vec![IngredientEntry { ingredient_id: 2, num_servings: 1.0 }]);

        let trusting = NutrientAggregator::new(&store);
        assert!(trusting.aggregate(1, AggregationMode::FullBatch).await.is_ok());

        let strict = NutrientAggregator::new(&store).with_strict_integrity(true);
        let err = strict.aggregate(1, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DataIntegrity);
    }

    #[tokio::test]
    async fn strict_mode_rejects_recipe_with_direct_nutrient_row() {
        let mut store = MemoryStore::default();
        store.basic(1, 1.0, 100.0);
        store.recipe(2, 1.0, &[(1, 1.0)]);
        store.nutrients.insert(2, NutrientProfile::zero());

        let trusting = NutrientAggregator::new(&store);
        assert!(trusting.aggregate(2, AggregationMode::FullBatch).await.is_ok());

        let strict = NutrientAggregator::new(&store).with_strict_integrity(true);
        let err = strict.aggregate(2, AggregationMode::FullBatch).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DataIntegrity);
    }
}
