// ABOUTME: Integration tests for member favorites and food notes
// ABOUTME: Covers add/remove/list favorites and note upsert semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Food Tracker

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

use remy_food_server::database::foods::NewBasicFood;
use remy_food_server::database::Database;
use remy_food_server::errors::ErrorCode;
use remy_food_server::models::NutrientProfile;

async fn create_test_db() -> Database {
    Database::new("sqlite::memory:").await.unwrap()
}

async fn create_food(db: &Database, name: &str) -> i64 {
    db.foods()
        .create_basic(&NewBasicFood {
            name: name.to_owned(),
            description: None,
            owner: 1,
            serving_size: None,
            serving_units: 1,
            servings: 1.0,
            nutrients: NutrientProfile::zero(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_add_and_list_favorites() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;
    let banana = create_food(&db, "banana").await;

    let favorites = db.favorites();
    assert!(favorites.add(7, banana).await.unwrap());
    assert!(favorites.add(7, apple).await.unwrap());

    // Listing is ordered by food id, not insertion order
    assert_eq!(favorites.list(7).await.unwrap(), vec![apple, banana]);
    assert!(favorites.list(8).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_favorite_is_idempotent() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;

    let favorites = db.favorites();
    assert!(favorites.add(7, apple).await.unwrap());
    assert!(!favorites.add(7, apple).await.unwrap());
    assert_eq!(favorites.list(7).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_favorite_for_unknown_food_fails() {
    let db = create_test_db().await;
    let err = db.favorites().add(7, 404).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_remove_favorite() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;

    let favorites = db.favorites();
    favorites.add(7, apple).await.unwrap();
    assert!(favorites.remove(7, apple).await.unwrap());
    assert!(!favorites.remove(7, apple).await.unwrap());
    assert!(favorites.list(7).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_note_upsert_replaces_existing() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;

    let notes = db.notes();
    let first = notes.upsert(apple, 7, "too sour").await.unwrap();
    assert_eq!(first.note, "too sour");
    assert_eq!(first.food_id, apple);
    assert_eq!(first.member_id, 7);

    let second = notes.upsert(apple, 7, "fine when ripe").await.unwrap();
    assert_eq!(second.note, "fine when ripe");

    let stored = notes.get(apple, 7).await.unwrap().unwrap();
    assert_eq!(stored.note, "fine when ripe");
}

#[tokio::test]
async fn test_notes_are_scoped_per_member() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;

    let notes = db.notes();
    notes.upsert(apple, 7, "mine").await.unwrap();
    notes.upsert(apple, 8, "theirs").await.unwrap();

    assert_eq!(notes.get(apple, 7).await.unwrap().unwrap().note, "mine");
    assert_eq!(notes.get(apple, 8).await.unwrap().unwrap().note, "theirs");
    assert!(notes.get(apple, 9).await.unwrap().is_none());
}

#[tokio::test]
async fn test_note_for_unknown_food_fails() {
    let db = create_test_db().await;
    let err = db.notes().upsert(404, 7, "ghost").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_delete_note() {
    let db = create_test_db().await;
    let apple = create_food(&db, "apple").await;

    let notes = db.notes();
    notes.upsert(apple, 7, "temp").await.unwrap();
    assert!(notes.delete(apple, 7).await.unwrap());
    assert!(!notes.delete(apple, 7).await.unwrap());
    assert!(notes.get(apple, 7).await.unwrap().is_none());
}
