// ABOUTME: Database operations for per-member food favorites
// ABOUTME: Simple membership rows keyed by (member_id, food_id)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

use crate::errors::{AppError, AppResult};
use sqlx::{Row, SqlitePool};

/// Favorites database operations manager
pub struct FavoritesManager {
    pool: SqlitePool,
}

impl FavoritesManager {
    /// Create a new favorites manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Mark a food as a favorite of a member. Idempotent; returns false
    /// when the pair was already present.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when the food id does not resolve,
    /// `DatabaseError` when a statement fails
    pub async fn add(&self, member_id: i64, food_id: i64) -> AppResult<bool> {
        let food = sqlx::query("SELECT id FROM food WHERE id = $1")
            .bind(food_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check food: {e}")))?;
        if food.is_none() {
            return Err(AppError::not_found(format!("Food {food_id}")));
        }

        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO member_food_favs (member_id, food_id)
            VALUES ($1, $2)
            ",
        )
        .bind(member_id)
        .bind(food_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add favorite: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a favorite; returns false when the pair was absent
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn remove(&self, member_id: i64, food_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM member_food_favs WHERE member_id = $1 AND food_id = $2",
        )
        .bind(member_id)
        .bind(food_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove favorite: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// List a member's favorite food ids
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self, member_id: i64) -> AppResult<Vec<i64>> {
        let rows = sqlx::query(
            "SELECT food_id FROM member_food_favs WHERE member_id = $1 ORDER BY food_id",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list favorites: {e}")))?;

        Ok(rows.iter().map(|r| r.get("food_id")).collect())
    }
}
