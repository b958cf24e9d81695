// ABOUTME: Library crate for the food tracking API server
// ABOUTME: Exposes the database layer, nutrient aggregation, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! Food tracking API server
//!
//! A REST backend for a food and nutrition tracker. Foods are either
//! basic (a stored nutrient row) or recipes (a list of ingredient foods
//! with quantities); nutrients for a recipe are computed on demand by
//! recursively aggregating its ingredient tree. The HTTP layer is built
//! on axum over a SQLite database accessed through sqlx.

#![deny(unsafe_code)]

pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod nutrition;
pub mod resources;
pub mod routes;
