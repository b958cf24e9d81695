// ABOUTME: Integration tests for the foods database manager
// ABOUTME: Covers transactional creation, duplicate checks, updates, and search modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

use remy_food_server::database::foods::{NewBasicFood, NewRecipeFood, UpdateFoodFields};
use remy_food_server::database::Database;
use remy_food_server::errors::ErrorCode;
use remy_food_server::models::{IngredientEntry, NutrientProfile, SearchFoodOption};

async fn create_test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

fn basic_request(name: &str, owner: i64) -> NewBasicFood {
    NewBasicFood {
        name: name.to_owned(),
        description: Some("test food".to_owned()),
        owner,
        serving_size: Some(0.5),
        serving_units: 1,
        servings: 2.0,
        nutrients: NutrientProfile {
            calories: 250.0,
            points: 4.0,
            fat_grams: 10.0,
            carb_grams: 30.0,
            protein_grams: 8.0,
            fiber_grams: 2.0,
        },
    }
}

#[tokio::test]
async fn test_file_backed_database_is_created_on_connect() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = temp_dir.path().join("foods.db");
    let url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&url).await.unwrap();
    let id = db.foods().create_basic(&basic_request("yogurt", 1)).await.unwrap();
    assert!(db_path.exists());

    drop(db);

    // Reconnecting sees the previously written rows
    let db = Database::new(&url).await.unwrap();
    let food = db.foods().get_food(id).await.unwrap().unwrap();
    assert_eq!(food.name, "yogurt");
}

#[tokio::test]
async fn test_create_basic_persists_food_and_detail() {
    let db = create_test_db().await;
    let foods = db.foods();

    let id = foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();
    assert!(id > 0);

    let food = foods.get_food(id).await.unwrap().unwrap();
    assert_eq!(food.name, "yogurt");
    assert_eq!(food.owner, 1);
    assert!(!food.is_recipe);
    assert!((food.servings - 2.0).abs() < f64::EPSILON);

    let detail: (f64, f64) =
        sqlx::query_as("SELECT calories, fiber_grams FROM food_detail WHERE id = $1")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert!((detail.0 - 250.0).abs() < f64::EPSILON);
    assert!((detail.1 - 2.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_duplicate_owner_name_is_conflict() {
    let db = create_test_db().await;
    let foods = db.foods();

    foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();
    let err = foods
        .create_basic(&basic_request("yogurt", 1))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    // Same name under a different owner is fine
    assert!(foods.create_basic(&basic_request("yogurt", 2)).await.is_ok());
}

#[tokio::test]
async fn test_create_recipe_with_unknown_ingredient_leaves_no_rows() {
    let db = create_test_db().await;
    let foods = db.foods();

    let err = foods
        .create_recipe(&NewRecipeFood {
            name: "ghost stew".to_owned(),
            description: None,
            owner: 1,
            serving_size: None,
            serving_units: 1,
            servings: 1.0,
            ingredients: vec![IngredientEntry {
                ingredient_id: 404,
                num_servings: 1.0,
            }],
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[tokio::test]
async fn test_nonpositive_servings_rejected() {
    let db = create_test_db().await;
    let foods = db.foods();

    let mut request = basic_request("bad", 1);
    request.servings = 0.0;
    let err = foods.create_basic(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_get_food_with_units_joins_description() {
    let db = create_test_db().await;
    let foods = db.foods();

    let id = foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();
    let food = foods.get_food_with_units(id).await.unwrap().unwrap();
    assert_eq!(food.food_units, "serving");
    assert_eq!(food.food.id, id);
}

#[tokio::test]
async fn test_update_merges_against_stored_row() {
    let db = create_test_db().await;
    let foods = db.foods();

    let id = foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();
    let updated = foods
        .update_food(
            id,
            &UpdateFoodFields {
                name: Some("greek yogurt".to_owned()),
                calories: Some(180.0),
                ..UpdateFoodFields::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    // Untouched fields keep their stored values
    assert_eq!(updated.name, "greek yogurt");
    assert!((updated.servings - 2.0).abs() < f64::EPSILON);

    let detail: (f64, f64) =
        sqlx::query_as("SELECT calories, fat_grams FROM food_detail WHERE id = $1")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert!((detail.0 - 180.0).abs() < f64::EPSILON);
    assert!((detail.1 - 10.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_update_rejects_nutrients_on_recipe() {
    let db = create_test_db().await;
    let foods = db.foods();

    let base = foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();
    let recipe = foods
        .create_recipe(&NewRecipeFood {
            name: "parfait".to_owned(),
            description: None,
            owner: 1,
            serving_size: None,
            serving_units: 1,
            servings: 1.0,
            ingredients: vec![IngredientEntry {
                ingredient_id: base,
                num_servings: 1.0,
            }],
        })
        .await
        .unwrap();

    let err = foods
        .update_food(
            recipe,
            &UpdateFoodFields {
                calories: Some(100.0),
                ..UpdateFoodFields::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_failed_nutrient_update_leaves_food_row_untouched() {
    let db = create_test_db().await;
    let foods = db.foods();

    let id = foods.create_basic(&basic_request("yogurt", 1)).await.unwrap();

    // Strip the detail row so the nutrient half of the update cannot apply
    sqlx::query("DELETE FROM food_detail WHERE id = $1")
        .bind(id)
        .execute(db.pool())
        .await
        .unwrap();

    let err = foods
        .update_food(
            id,
            &UpdateFoodFields {
                name: Some("greek yogurt".to_owned()),
                calories: Some(180.0),
                ..UpdateFoodFields::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DataIntegrity);

    // The metadata half must not have been applied either
    let food = foods.get_food(id).await.unwrap().unwrap();
    assert_eq!(food.name, "yogurt");
}

#[tokio::test]
async fn test_update_unknown_food_returns_none() {
    let db = create_test_db().await;
    let result = db
        .foods()
        .update_food(999, &UpdateFoodFields::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_search_owner_foods_includes_favorites() {
    let db = create_test_db().await;
    let foods = db.foods();
    let alice = db.create_member("alice").await.unwrap();
    let bob = db.create_member("bob").await.unwrap();

    let own = foods.create_basic(&basic_request("apple", alice)).await.unwrap();
    let other = foods.create_basic(&basic_request("banana", bob)).await.unwrap();
    let unrelated = foods.create_basic(&basic_request("carrot", bob)).await.unwrap();
    db.favorites().add(alice, other).await.unwrap();

    let rows = foods
        .search(alice, SearchFoodOption::OwnerFoods, None)
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.food_id).collect();
    assert!(ids.contains(&own));
    assert!(ids.contains(&other));
    assert!(!ids.contains(&unrelated));
}

#[tokio::test]
async fn test_search_fav_foods_only_favorites() {
    let db = create_test_db().await;
    let foods = db.foods();
    let alice = db.create_member("alice").await.unwrap();

    let own = foods.create_basic(&basic_request("apple", alice)).await.unwrap();
    let fav = foods.create_basic(&basic_request("banana", alice)).await.unwrap();
    db.favorites().add(alice, fav).await.unwrap();

    let rows = foods
        .search(alice, SearchFoodOption::FavFoods, None)
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.food_id).collect();
    assert_eq!(ids, vec![fav]);
    assert!(!ids.contains(&own));
}

#[tokio::test]
async fn test_search_all_foods_with_keyword() {
    let db = create_test_db().await;
    let foods = db.foods();
    let alice = db.create_member("alice").await.unwrap();
    let bob = db.create_member("bob").await.unwrap();

    foods.create_basic(&basic_request("apple pie", alice)).await.unwrap();
    foods.create_basic(&basic_request("apple sauce", bob)).await.unwrap();
    foods.create_basic(&basic_request("banana", bob)).await.unwrap();

    let rows = foods
        .search(alice, SearchFoodOption::AllFoods, Some("apple"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.food_name.contains("apple")));
    assert!(rows.iter().all(|r| r.food_type == "Basic Food"));
}

#[tokio::test]
async fn test_search_reports_owner_name_and_recipe_type() {
    let db = create_test_db().await;
    let foods = db.foods();
    let alice = db.create_member("alice").await.unwrap();

    let base = foods.create_basic(&basic_request("apple", alice)).await.unwrap();
    foods
        .create_recipe(&NewRecipeFood {
            name: "apple crumble".to_owned(),
            description: None,
            owner: alice,
            serving_size: None,
            serving_units: 1,
            servings: 6.0,
            ingredients: vec![IngredientEntry {
                ingredient_id: base,
                num_servings: 3.0,
            }],
        })
        .await
        .unwrap();

    let rows = foods
        .search(alice, SearchFoodOption::OwnerFoods, None)
        .await
        .unwrap();
    let crumble = rows.iter().find(|r| r.food_name == "apple crumble").unwrap();
    assert_eq!(crumble.food_type, "Food Recipe");
    assert_eq!(crumble.owner, "alice");
    // Recipe rows report zeroed nutrients in search results
    assert!(crumble.calories.abs() < f64::EPSILON);
}
