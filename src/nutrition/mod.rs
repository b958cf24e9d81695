// ABOUTME: Nutrition module organization for aggregation over the ingredient graph
// ABOUTME: Exposes the FoodStore repository trait and the recursive NutrientAggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Recursive nutrient aggregation over the food/ingredient graph.

/// The nutrient aggregator and its repository trait
pub mod aggregator;

pub use aggregator::{AggregationMode, FoodRecord, FoodStore, NutrientAggregator};
