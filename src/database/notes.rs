// ABOUTME: Database operations for free-text notes members keep against foods
// ABOUTME: One note per (food_id, member_id), upserted in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

use crate::errors::{AppError, AppResult};
use crate::models::FoodNote;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Notes database operations manager
pub struct NotesManager {
    pool: SqlitePool,
}

impl NotesManager {
    /// Create a new notes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create or replace the note a member keeps against a food
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when the food id does not resolve,
    /// `DatabaseError` when a statement fails
    pub async fn upsert(&self, food_id: i64, member_id: i64, note: &str) -> AppResult<FoodNote> {
        let food = sqlx::query("SELECT id FROM food WHERE id = $1")
            .bind(food_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check food: {e}")))?;
        if food.is_none() {
            return Err(AppError::not_found(format!("Food {food_id}")));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r"
            INSERT INTO food_notes (food_id, member_id, note, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (food_id, member_id)
            DO UPDATE SET note = excluded.note, updated_at = excluded.updated_at
            ",
        )
        .bind(food_id)
        .bind(member_id)
        .bind(note)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save note: {e}")))?;

        Ok(FoodNote {
            food_id,
            member_id,
            note: note.to_owned(),
            updated_at: now,
        })
    }

    /// Fetch the note a member keeps against a food
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, food_id: i64, member_id: i64) -> AppResult<Option<FoodNote>> {
        let row = sqlx::query(
            r"
            SELECT food_id, member_id, note, updated_at
            FROM food_notes
            WHERE food_id = $1 AND member_id = $2
            ",
        )
        .bind(food_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get note: {e}")))?;

        Ok(row.map(|r| FoodNote {
            food_id: r.get("food_id"),
            member_id: r.get("member_id"),
            note: r.get("note"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// Delete a note; returns false when it was absent
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, food_id: i64, member_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM food_notes WHERE food_id = $1 AND member_id = $2",
        )
        .bind(food_id)
        .bind(member_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete note: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
