// ABOUTME: Domain models for foods, nutrient profiles, recipe ingredients, and notes
// ABOUTME: Canonical field naming lives here; endpoint-specific aliases are mapped in routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Domain models shared across the database, aggregation, and route layers.
//!
//! The six nutrient fields use one canonical internal naming
//! (`calories`, `points`, `fat_grams`, `carb_grams`, `protein_grams`,
//! `fiber_grams`); the search endpoint's short aliases (`fat`, `carbs`,
//! `protein`, `fiber`) are a presentation concern handled in the routes.

use serde::{Deserialize, Serialize};

/// A food record.
///
/// A food is either *basic* (its nutrients are stored directly in a
/// [`NutrientProfile`] row) or a *recipe* (its nutrients are derived
/// recursively from weighted servings of ingredient foods). The
/// `is_recipe` flag asserts which rows exist; the aggregator trusts it
/// as a documented precondition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Owning member id
    pub owner: i64,
    /// Size of one serving, in `serving_units` (nullable, positive)
    pub serving_size: Option<f64>,
    /// Unit-of-measure id (`food_units` table)
    pub serving_units: i64,
    /// Total servings this record yields. Strictly positive; used as the
    /// denominator when another food consumes this one as an ingredient.
    pub servings: f64,
    /// True when nutrients are derived from ingredients
    pub is_recipe: bool,
}

/// A food joined with its unit-of-measure description for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodWithUnits {
    /// The food record
    #[serde(flatten)]
    pub food: Food,
    /// Human-readable description of `serving_units`
    pub food_units: String,
}

/// The six canonical nutrient scalars, all non-negative reals.
///
/// Attached 1:1 to a basic food; computed on demand for a recipe.
/// Values carry full `f64` precision; rounding for display happens at
/// the route boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub points: f64,
    pub fat_grams: f64,
    pub carb_grams: f64,
    pub protein_grams: f64,
    pub fiber_grams: f64,
}

impl NutrientProfile {
    /// A profile with every field at zero, the accumulator start state
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            calories: 0.0,
            points: 0.0,
            fat_grams: 0.0,
            carb_grams: 0.0,
            protein_grams: 0.0,
            fiber_grams: 0.0,
        }
    }

    /// Field-wise `self += other * factor`
    pub fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.calories += other.calories * factor;
        self.points += other.points * factor;
        self.fat_grams += other.fat_grams * factor;
        self.carb_grams += other.carb_grams * factor;
        self.protein_grams += other.protein_grams * factor;
        self.fiber_grams += other.fiber_grams * factor;
    }

    /// Field-wise `self * factor`, returning a new profile
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = Self::zero();
        out.add_scaled(self, factor);
        out
    }
}

/// One ingredient row of a recipe food: the parent consumes
/// `num_servings` servings of the ingredient food.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Ingredient food id
    pub ingredient_id: i64,
    /// Servings of the ingredient consumed by the parent recipe
    pub num_servings: f64,
}

/// A unit of measure for serving sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingUnit {
    /// Unique identifier
    pub id: i64,
    /// Display description, e.g. "cup" or "grams"
    pub description: String,
}

/// Free-text note a member keeps against a food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodNote {
    /// Food the note is attached to
    pub food_id: i64,
    /// Member who wrote the note
    pub member_id: i64,
    /// The note text
    pub note: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

/// Search mode for the food search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SearchFoodOption {
    /// Foods owned by the member plus the member's favorites
    #[serde(rename = "ownerFoods")]
    OwnerFoods,
    /// The member's favorites only
    #[serde(rename = "favFoods")]
    FavFoods,
    /// Every food in the system
    #[serde(rename = "allFoods")]
    AllFoods,
}

/// One row of a food search result, using the search endpoint's short
/// nutrient aliases and display rounding
#[derive(Debug, Clone, Serialize)]
pub struct FoodSearchRow {
    #[serde(rename = "foodId")]
    pub food_id: i64,
    #[serde(rename = "foodName")]
    pub food_name: String,
    #[serde(rename = "foodDesc")]
    pub food_desc: Option<String>,
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    #[serde(rename = "servSize")]
    pub serv_size: Option<f64>,
    #[serde(rename = "servUnits")]
    pub serv_units: i64,
    pub calories: f64,
    pub fat: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fiber: f64,
    pub points: f64,
    /// Owning member's user name
    pub owner: String,
    /// "Basic Food" or "Food Recipe"
    #[serde(rename = "foodType")]
    pub food_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_scaled_accumulates_field_wise() {
        let mut acc = NutrientProfile::zero();
        let p = NutrientProfile {
            calories: 100.0,
            points: 2.0,
            fat_grams: 10.0,
            carb_grams: 20.0,
            protein_grams: 5.0,
            fiber_grams: 3.0,
        };
        acc.add_scaled(&p, 0.5);
        acc.add_scaled(&p, 1.0);

        assert!((acc.calories - 150.0).abs() < f64::EPSILON);
        assert!((acc.fat_grams - 15.0).abs() < f64::EPSILON);
        assert!((acc.fiber_grams - 4.5).abs() < f64::EPSILON);
    }
}
