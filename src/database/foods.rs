// ABOUTME: Database operations for foods, nutrient details, and recipe ingredients
// ABOUTME: Creation of a food plus its dependent rows runs in one SQLite transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

use crate::errors::{AppError, AppResult};
use crate::models::{
    Food, FoodSearchRow, FoodWithUnits, IngredientEntry, NutrientProfile, SearchFoodOption,
};
use crate::nutrition::{FoodRecord, FoodStore};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Request to create a basic (non-recipe) food with its nutrient detail
#[derive(Debug, Clone)]
pub struct NewBasicFood {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Owning member id
    pub owner: i64,
    /// Serving size (nullable)
    pub serving_size: Option<f64>,
    /// Unit-of-measure id
    pub serving_units: i64,
    /// Total serving yield, strictly positive
    pub servings: f64,
    /// Stored nutrient values for the whole record
    pub nutrients: NutrientProfile,
}

/// Request to create a recipe food from ingredient foods
#[derive(Debug, Clone)]
pub struct NewRecipeFood {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Owning member id
    pub owner: i64,
    /// Serving size (nullable)
    pub serving_size: Option<f64>,
    /// Unit-of-measure id
    pub serving_units: i64,
    /// Total serving yield of the prepared recipe, strictly positive
    pub servings: f64,
    /// Ingredient foods and quantities; at least one required
    pub ingredients: Vec<IngredientEntry>,
}

/// Field-wise update of an existing food; absent fields are unchanged.
///
/// The source system built a generic SQL UPDATE from whatever fields the
/// request carried; this is the same operation expressed as typed
/// optionals merged against the stored row.
#[derive(Debug, Clone, Default)]
pub struct UpdateFoodFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_units: Option<i64>,
    pub servings: Option<f64>,
    pub calories: Option<f64>,
    pub points: Option<f64>,
    pub fat_grams: Option<f64>,
    pub carb_grams: Option<f64>,
    pub protein_grams: Option<f64>,
    pub fiber_grams: Option<f64>,
}

impl UpdateFoodFields {
    /// True when any of the six nutrient fields is present
    #[must_use]
    pub const fn touches_nutrients(&self) -> bool {
        self.calories.is_some()
            || self.points.is_some()
            || self.fat_grams.is_some()
            || self.carb_grams.is_some()
            || self.protein_grams.is_some()
            || self.fiber_grams.is_some()
    }
}

/// One direct ingredient of a recipe joined with its food row, as needed
/// by the recipe detail endpoint
#[derive(Debug, Clone)]
pub struct IngredientDetail {
    /// Ingredient food id
    pub ingredient_id: i64,
    /// Ingredient food name
    pub name: String,
    /// Servings of the ingredient consumed by the recipe
    pub num_servings: f64,
    /// The ingredient's own total serving yield
    pub servings: f64,
}

/// Food database operations manager
pub struct FoodsManager {
    pool: SqlitePool,
}

impl FoodsManager {
    /// Create a new foods manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a basic food and its nutrient detail row in one transaction.
    ///
    /// The (owner, name) combination must be unique; fast-food style
    /// shared entries are out of scope here so the check is unconditional.
    ///
    /// # Errors
    ///
    /// `ResourceAlreadyExists` for a duplicate (owner, name) pair,
    /// `InvalidInput` for a non-positive serving yield, `DatabaseError`
    /// when a statement fails. A failure after the food insert rolls the
    /// transaction back; no compensating delete is needed.
    pub async fn create_basic(&self, new: &NewBasicFood) -> AppResult<i64> {
        if new.servings <= 0.0 {
            return Err(AppError::invalid_input("servings must be positive"));
        }
        self.check_duplicate(new.owner, &new.name).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO food (name, description, owner, serving_size, serving_units, servings, ingredient_flag)
            VALUES ($1, $2, $3, $4, $5, $6, 0)
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.owner)
        .bind(new.serving_size)
        .bind(new.serving_units)
        .bind(new.servings)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create food: {e}")))?;

        let food_id = result.last_insert_rowid();

        sqlx::query(
            r"
            INSERT INTO food_detail (id, calories, points, fat_grams, carb_grams, protein_grams, fiber_grams)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(food_id)
        .bind(new.nutrients.calories)
        .bind(new.nutrients.points)
        .bind(new.nutrients.fat_grams)
        .bind(new.nutrients.carb_grams)
        .bind(new.nutrients.protein_grams)
        .bind(new.nutrients.fiber_grams)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create food detail: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit food creation: {e}")))?;

        Ok(food_id)
    }

    /// Create a recipe food and its ingredient rows in one transaction
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty ingredient list or non-positive
    /// servings, `ResourceNotFound` when an ingredient id does not
    /// resolve, `ResourceAlreadyExists` for a duplicate (owner, name)
    /// pair, `DatabaseError` when a statement fails.
    pub async fn create_recipe(&self, new: &NewRecipeFood) -> AppResult<i64> {
        if new.servings <= 0.0 {
            return Err(AppError::invalid_input("servings must be positive"));
        }
        if new.ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "A recipe food requires at least one ingredient",
            ));
        }
        self.check_duplicate(new.owner, &new.name).await?;

        for entry in &new.ingredients {
            if self.food_record(entry.ingredient_id).await?.is_none() {
                return Err(AppError::not_found(format!(
                    "Ingredient food {}",
                    entry.ingredient_id
                )));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO food (name, description, owner, serving_size, serving_units, servings, ingredient_flag)
            VALUES ($1, $2, $3, $4, $5, $6, 1)
            ",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.owner)
        .bind(new.serving_size)
        .bind(new.serving_units)
        .bind(new.servings)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe food: {e}")))?;

        let food_id = result.last_insert_rowid();

        for entry in &new.ingredients {
            sqlx::query(
                r"
                INSERT INTO food_recipe (food_id, ingredient_id, num_servings)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(food_id)
            .bind(entry.ingredient_id)
            .bind(entry.num_servings)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to add recipe ingredient: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe creation: {e}")))?;

        Ok(food_id)
    }

    /// Get a food by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_food(&self, food_id: i64) -> AppResult<Option<Food>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, owner, serving_size, serving_units, servings, ingredient_flag
            FROM food
            WHERE id = $1
            ",
        )
        .bind(food_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get food: {e}")))?;

        Ok(row.map(|r| row_to_food(&r)))
    }

    /// Get a food by id joined with its unit-of-measure description
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_food_with_units(&self, food_id: i64) -> AppResult<Option<FoodWithUnits>> {
        let row = sqlx::query(
            r"
            SELECT f.id, f.name, f.description, f.owner, f.serving_size, f.serving_units,
                   f.servings, f.ingredient_flag, fu.description AS food_units
            FROM food f
            JOIN food_units fu ON fu.id = f.serving_units
            WHERE f.id = $1
            ",
        )
        .bind(food_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get food: {e}")))?;

        Ok(row.map(|r| FoodWithUnits {
            food: row_to_food(&r),
            food_units: r.get("food_units"),
        }))
    }

    /// Update an existing food's metadata and, for basic foods, its
    /// nutrient detail, in one transaction. Returns `None` when the id
    /// does not resolve.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when nutrient fields are supplied for a recipe
    /// food or the new serving yield is non-positive, `DataIntegrity`
    /// when a basic food has no nutrient row, `DatabaseError` when a
    /// statement fails. On any error both rows are left untouched.
    pub async fn update_food(
        &self,
        food_id: i64,
        fields: &UpdateFoodFields,
    ) -> AppResult<Option<Food>> {
        let Some(existing) = self.get_food(food_id).await? else {
            return Ok(None);
        };

        if fields.touches_nutrients() && existing.is_recipe {
            return Err(AppError::invalid_input(
                "Nutrient fields cannot be set on a recipe food; edit its ingredients instead",
            ));
        }

        let name = fields.name.as_ref().unwrap_or(&existing.name);
        let description = fields.description.clone().or(existing.description);
        let serving_size = fields.serving_size.or(existing.serving_size);
        let serving_units = fields.serving_units.unwrap_or(existing.serving_units);
        let servings = fields.servings.unwrap_or(existing.servings);
        if servings <= 0.0 {
            return Err(AppError::invalid_input("servings must be positive"));
        }

        // Resolve the stored profile before writing anything so a missing
        // detail row fails the whole update, not half of it
        let stored = if fields.touches_nutrients() {
            Some(self.nutrient_profile(food_id).await?.ok_or_else(|| {
                AppError::data_integrity(format!("Basic food {food_id} has no nutrient row"))
            })?)
        } else {
            None
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            UPDATE food SET
                name = $1, description = $2, serving_size = $3,
                serving_units = $4, servings = $5
            WHERE id = $6
            ",
        )
        .bind(name)
        .bind(&description)
        .bind(serving_size)
        .bind(serving_units)
        .bind(servings)
        .bind(food_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update food: {e}")))?;

        if let Some(stored) = stored {
            sqlx::query(
                r"
                UPDATE food_detail SET
                    calories = $1, points = $2, fat_grams = $3,
                    carb_grams = $4, protein_grams = $5, fiber_grams = $6
                WHERE id = $7
                ",
            )
            .bind(fields.calories.unwrap_or(stored.calories))
            .bind(fields.points.unwrap_or(stored.points))
            .bind(fields.fat_grams.unwrap_or(stored.fat_grams))
            .bind(fields.carb_grams.unwrap_or(stored.carb_grams))
            .bind(fields.protein_grams.unwrap_or(stored.protein_grams))
            .bind(fields.fiber_grams.unwrap_or(stored.fiber_grams))
            .bind(food_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to update food detail: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit food update: {e}")))?;

        self.get_food(food_id).await
    }

    /// Direct ingredients of a recipe joined with their food rows
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ingredient_details(&self, food_id: i64) -> AppResult<Vec<IngredientDetail>> {
        let rows = sqlx::query(
            r"
            SELECT f.id AS ingredient_id, f.name, f.servings, fr.num_servings
            FROM food f
            JOIN food_recipe fr ON f.id = fr.ingredient_id
            WHERE fr.food_id = $1
            ",
        )
        .bind(food_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe ingredients: {e}")))?;

        Ok(rows
            .iter()
            .map(|r| IngredientDetail {
                ingredient_id: r.get("ingredient_id"),
                name: r.get("name"),
                num_servings: r.get("num_servings"),
                servings: r.get("servings"),
            })
            .collect())
    }

    /// Search foods by mode (owner's, favorites, or all) with an optional
    /// keyword filter against name and description.
    ///
    /// Basic foods carry display-rounded nutrient values; recipe foods
    /// report zeros here and are aggregated on demand when fetched
    /// individually.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn search(
        &self,
        owner: i64,
        option: SearchFoodOption,
        keyword: Option<&str>,
    ) -> AppResult<Vec<FoodSearchRow>> {
        let keyword_sql = if keyword.is_some() {
            " AND (f.name LIKE $2 OR f.description LIKE $2)"
        } else {
            ""
        };

        let basic_cols = "f.id AS foodId, f.name AS foodName, f.description AS foodDesc, \
             f.owner AS ownerId, ROUND(f.serving_size, 2) AS servSize, f.serving_units AS servUnits, \
             ROUND(fd.calories, 1) AS calories, ROUND(fd.fat_grams, 1) AS fat, \
             ROUND(fd.carb_grams, 1) AS carbs, ROUND(fd.protein_grams, 1) AS protein, \
             ROUND(fd.fiber_grams, 1) AS fiber, ROUND(fd.points, 1) AS points, \
             IFNULL(m.user_name, '') AS owner, 'Basic Food' AS foodType";
        let recipe_cols = "f.id AS foodId, f.name AS foodName, f.description AS foodDesc, \
             f.owner AS ownerId, ROUND(f.serving_size, 2) AS servSize, f.serving_units AS servUnits, \
             0.0 AS calories, 0.0 AS fat, 0.0 AS carbs, 0.0 AS protein, 0.0 AS fiber, 0.0 AS points, \
             IFNULL(m.user_name, '') AS owner, 'Food Recipe' AS foodType";

        let owner_basic = format!(
            "SELECT {basic_cols} FROM food f \
             JOIN food_detail fd ON f.id = fd.id \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE f.owner = $1{keyword_sql}"
        );
        let owner_recipe = format!(
            "SELECT {recipe_cols} FROM food f \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE f.ingredient_flag = 1 AND f.owner = $1{keyword_sql}"
        );
        let fav_basic = format!(
            "SELECT {basic_cols} FROM food f \
             JOIN food_detail fd ON f.id = fd.id \
             JOIN member_food_favs mf ON mf.food_id = f.id \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE mf.member_id = $1{keyword_sql}"
        );
        let fav_recipe = format!(
            "SELECT {recipe_cols} FROM food f \
             JOIN member_food_favs mf ON mf.food_id = f.id \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE f.ingredient_flag = 1 AND mf.member_id = $1{keyword_sql}"
        );
        // The all-foods mode has no owner predicate, so its keyword
        // placeholder is the first and only bind
        let all_keyword_sql = if keyword.is_some() {
            " AND (f.name LIKE $1 OR f.description LIKE $1)"
        } else {
            ""
        };
        let all_basic = format!(
            "SELECT {basic_cols} FROM food f \
             JOIN food_detail fd ON f.id = fd.id \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE 1 = 1{all_keyword_sql}"
        );
        let all_recipe = format!(
            "SELECT {recipe_cols} FROM food f \
             LEFT JOIN member m ON f.owner = m.member_id \
             WHERE f.ingredient_flag = 1{all_keyword_sql}"
        );

        let (query, bind_owner) = match option {
            SearchFoodOption::OwnerFoods => (
                format!(
                    "{owner_basic} UNION {owner_recipe} UNION {fav_basic} UNION {fav_recipe} \
                     ORDER BY foodName"
                ),
                true,
            ),
            SearchFoodOption::FavFoods => (
                format!("{fav_basic} UNION {fav_recipe} ORDER BY foodName"),
                true,
            ),
            SearchFoodOption::AllFoods => (
                format!("{all_basic} UNION {all_recipe} ORDER BY foodName"),
                false,
            ),
        };

        let mut q = sqlx::query(&query);
        if bind_owner {
            q = q.bind(owner);
        }
        if let Some(keyword) = keyword {
            q = q.bind(format!("%{keyword}%"));
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to search foods: {e}")))?;

        Ok(rows.iter().map(row_to_search_row).collect())
    }

    /// Duplicate (owner, name) check shared by the create paths
    async fn check_duplicate(&self, owner: i64, name: &str) -> AppResult<()> {
        let existing = sqlx::query("SELECT id FROM food WHERE name = $1 AND owner = $2")
            .bind(name)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check for duplicate food: {e}")))?;

        if existing.is_some() {
            return Err(AppError::already_exists(format!(
                "Duplicate owner - name combination: '{name}'"
            )));
        }
        Ok(())
    }
}

/// The aggregator's read-only view of the food tables
#[async_trait]
impl FoodStore for FoodsManager {
    async fn food_record(&self, food_id: i64) -> AppResult<Option<FoodRecord>> {
        let row = sqlx::query("SELECT id, ingredient_flag, servings FROM food WHERE id = $1")
            .bind(food_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get food: {e}")))?;

        Ok(row.map(|r| {
            let flag: i64 = r.get("ingredient_flag");
            FoodRecord {
                id: r.get("id"),
                is_recipe: flag == 1,
                servings: r.get("servings"),
            }
        }))
    }

    async fn nutrient_profile(&self, food_id: i64) -> AppResult<Option<NutrientProfile>> {
        let row = sqlx::query(
            r"
            SELECT calories, points, fat_grams, carb_grams, protein_grams, fiber_grams
            FROM food_detail
            WHERE id = $1
            ",
        )
        .bind(food_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get food detail: {e}")))?;

        Ok(row.map(|r| NutrientProfile {
            calories: r.get("calories"),
            points: r.get("points"),
            fat_grams: r.get("fat_grams"),
            carb_grams: r.get("carb_grams"),
            protein_grams: r.get("protein_grams"),
            fiber_grams: r.get("fiber_grams"),
        }))
    }

    async fn ingredients(&self, food_id: i64) -> AppResult<Vec<IngredientEntry>> {
        let rows = sqlx::query(
            "SELECT ingredient_id, num_servings FROM food_recipe WHERE food_id = $1",
        )
        .bind(food_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredients: {e}")))?;

        Ok(rows
            .iter()
            .map(|r| IngredientEntry {
                ingredient_id: r.get("ingredient_id"),
                num_servings: r.get("num_servings"),
            })
            .collect())
    }
}

fn row_to_food(row: &SqliteRow) -> Food {
    let flag: i64 = row.get("ingredient_flag");
    Food {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        owner: row.get("owner"),
        serving_size: row.get("serving_size"),
        serving_units: row.get("serving_units"),
        servings: row.get("servings"),
        is_recipe: flag == 1,
    }
}

fn row_to_search_row(row: &SqliteRow) -> FoodSearchRow {
    FoodSearchRow {
        food_id: row.get("foodId"),
        food_name: row.get("foodName"),
        food_desc: row.get("foodDesc"),
        owner_id: row.get("ownerId"),
        serv_size: row.get("servSize"),
        serv_units: row.get("servUnits"),
        calories: row.get("calories"),
        fat: row.get("fat"),
        carbs: row.get("carbs"),
        protein: row.get("protein"),
        fiber: row.get("fiber"),
        points: row.get("points"),
        owner: row.get("owner"),
        food_type: row.get("foodType"),
    }
}
