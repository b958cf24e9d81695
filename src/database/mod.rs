// ABOUTME: Database management over a SQLite pool with inline schema migrations
// ABOUTME: Owns the food, food_detail, food_recipe, favorites, and notes tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

//! # Database Management
//!
//! This module provides SQLite-backed storage for the food tracking API:
//! connection setup, schema migration, and the per-domain manager types.

/// Per-member food favorites bookkeeping
pub mod favorites;
/// Food, nutrient detail, and recipe ingredient operations
pub mod foods;
/// Free-text notes members keep against foods
pub mod notes;

pub use favorites::FavoritesManager;
pub use foods::FoodsManager;
pub use notes::NotesManager;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database manager for food tracking storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration statement fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Domain manager over the food tables
    #[must_use]
    pub fn foods(&self) -> FoodsManager {
        FoodsManager::new(self.pool.clone())
    }

    /// Domain manager over member favorites
    #[must_use]
    pub fn favorites(&self) -> FavoritesManager {
        FavoritesManager::new(self.pool.clone())
    }

    /// Domain manager over food notes
    #[must_use]
    pub fn notes(&self) -> NotesManager {
        NotesManager::new(self.pool.clone())
    }

    /// Insert a member, returning the new member id.
    ///
    /// Member management proper is out of scope; this exists so the
    /// search endpoint's owner join has rows to resolve against.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate user name)
    pub async fn create_member(&self, user_name: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO member (user_name) VALUES ($1)")
            .bind(user_name)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_members().await?;
        self.migrate_foods().await?;
        self.migrate_favorites_and_notes().await?;
        self.seed_units().await?;
        Ok(())
    }

    async fn migrate_members(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS member (
                member_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_name TEXT NOT NULL UNIQUE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_foods(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food_units (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT,
                owner INTEGER NOT NULL,
                serving_size REAL,
                serving_units INTEGER NOT NULL DEFAULT 1 REFERENCES food_units(id),
                servings REAL NOT NULL DEFAULT 1,
                ingredient_flag BOOLEAN NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food_detail (
                id INTEGER PRIMARY KEY REFERENCES food(id) ON DELETE CASCADE,
                calories REAL NOT NULL,
                points REAL NOT NULL DEFAULT 0,
                fat_grams REAL NOT NULL,
                carb_grams REAL NOT NULL,
                protein_grams REAL NOT NULL,
                fiber_grams REAL NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food_recipe (
                food_id INTEGER NOT NULL REFERENCES food(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES food(id),
                num_servings REAL NOT NULL,
                PRIMARY KEY (food_id, ingredient_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_food_owner_name ON food(owner, name)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_favorites_and_notes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS member_food_favs (
                member_id INTEGER NOT NULL,
                food_id INTEGER NOT NULL REFERENCES food(id) ON DELETE CASCADE,
                PRIMARY KEY (member_id, food_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS food_notes (
                food_id INTEGER NOT NULL REFERENCES food(id) ON DELETE CASCADE,
                member_id INTEGER NOT NULL,
                note TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (food_id, member_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Seed the default unit-of-measure so `serving_units` defaults resolve
    async fn seed_units(&self) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO food_units (id, description)
            SELECT 1, 'serving'
            WHERE NOT EXISTS (SELECT 1 FROM food_units WHERE id = 1)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
