//! Integration tests for the suggestion model layer: creation, validation,
//! computed fields, search and soft delete.

mod common;

use chrono::{Duration, Utc};
use ideabox::errors::AppError;
use ideabox::models::suggestion::{
    self, Category, NewSuggestion, Priority, Status, SuggestionFilter, SuggestionPatch,
};
use common::{create_test_user, setup_test_db};

fn new_suggestion(title: &str) -> NewSuggestion {
    NewSuggestion {
        title: title.to_string(),
        description: "Use reusable cups".to_string(),
        category: Category::CostSaving,
        priority: Priority::default(),
        assignee_id: None,
        benefit: None,
        cost: 0.0,
    }
}

#[tokio::test]
async fn test_create_defaults() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "create", "").await;

    let id = suggestion::create(pool, author, &new_suggestion("Reduce waste"))
        .await
        .unwrap();
    assert!(id > 0);

    let record = suggestion::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(record.title, "Reduce waste");
    assert_eq!(record.status, Status::Draft);
    assert_eq!(record.priority, Priority::Medium);
    assert_eq!(record.category, Category::CostSaving);
    assert_eq!(record.author_id, author);
    assert_eq!(record.author_name, "Test User create");
    assert!(record.assignee_id.is_none());
    assert_eq!(record.created_on, Utc::now().date_naive());
    assert!(record.processed_on.is_none());
    assert_eq!(record.processing_days(), 0);
    assert!(record.active);
    assert_eq!(record.display_label(), "[DRAFT] Reduce waste");
}

#[tokio::test]
async fn test_create_rejects_negative_cost() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "cost", "").await;

    let mut new = new_suggestion("Costly idea");
    new.cost = -1.0;
    let err = suggestion::create(pool, author, &new).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    new.cost = 0.0;
    suggestion::create(pool, author, &new).await.unwrap();
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_description() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "blank", "").await;

    let mut new = new_suggestion("  ");
    let err = suggestion::create(pool, author, &new).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    new.title = "Valid title".to_string();
    new.description = "   ".to_string();
    let err = suggestion::create(pool, author, &new).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_rejects_unknown_assignee() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "ghost", "").await;

    let mut new = new_suggestion("Assigned idea");
    new.assignee_id = Some(999_999);
    let err = suggestion::create(pool, author, &new).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_cost_validation() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "upd_cost", "").await;
    let id = suggestion::create(pool, author, &new_suggestion("Idea")).await.unwrap();

    let patch = SuggestionPatch { cost: Some(-0.01), ..Default::default() };
    let err = suggestion::update(pool, author, id, &patch).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let patch = SuggestionPatch { cost: Some(1500.0), ..Default::default() };
    suggestion::update(pool, author, id, &patch).await.unwrap();
    let record = suggestion::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(record.cost, 1500.0);
}

#[tokio::test]
async fn test_processing_date_validation_and_duration() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "dates", "").await;
    let id = suggestion::create(pool, author, &new_suggestion("Dated idea")).await.unwrap();

    let today = Utc::now().date_naive();

    // Before creation: rejected
    let patch = SuggestionPatch {
        processed_on: Some(Some(today - Duration::days(1))),
        ..Default::default()
    };
    let err = suggestion::update(pool, author, id, &patch).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let record = suggestion::find_by_id(pool, id).await.unwrap().unwrap();
    assert!(record.processed_on.is_none());

    // Later date: accepted, duration computed in days
    let patch = SuggestionPatch {
        processed_on: Some(Some(today + Duration::days(10))),
        ..Default::default()
    };
    suggestion::update(pool, author, id, &patch).await.unwrap();
    let record = suggestion::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(record.processing_days(), 10);

    // Same day: zero duration
    let patch = SuggestionPatch {
        processed_on: Some(Some(today)),
        ..Default::default()
    };
    suggestion::update(pool, author, id, &patch).await.unwrap();
    let record = suggestion::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(record.processing_days(), 0);
}

#[tokio::test]
async fn test_update_nonexistent_is_not_found() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let actor = create_test_user(pool, "missing", "").await;

    let patch = SuggestionPatch { cost: Some(1.0), ..Default::default() };
    let err = suggestion::update(pool, actor, 999_999, &patch).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn test_find_by_id_nonexistent() {
    let db = setup_test_db().await;
    let pool = db.pool();

    let result = suggestion::find_by_id(pool, 999_999).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_soft_delete_hides_from_default_list() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "archive", "").await;

    let keep = suggestion::create(pool, author, &new_suggestion("Keep me")).await.unwrap();
    let gone = suggestion::create(pool, author, &new_suggestion("Archive me")).await.unwrap();

    suggestion::soft_delete(pool, author, gone).await.unwrap();

    let page = suggestion::find_paginated(pool, None, &SuggestionFilter::default(), 1, 25)
        .await
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|v| v.record.id).collect();
    assert!(ids.contains(&keep));
    assert!(!ids.contains(&gone));

    // Archived record still exists, flagged inactive
    let record = suggestion::find_by_id(pool, gone).await.unwrap().unwrap();
    assert!(!record.active);

    let all = suggestion::find_paginated(
        pool,
        None,
        &SuggestionFilter { include_inactive: true, ..Default::default() },
        1,
        25,
    )
    .await
    .unwrap();
    assert_eq!(all.total_count, 2);
}

#[tokio::test]
async fn test_name_search_matches_title_or_author() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let alice = create_test_user(pool, "alice", "").await;
    let bob = create_test_user(pool, "bob", "").await;

    let by_alice = suggestion::create(pool, alice, &new_suggestion("Recycle paper")).await.unwrap();
    let by_bob = suggestion::create(pool, bob, &new_suggestion("Shorter meetings")).await.unwrap();

    // Case-insensitive partial match on title
    let page = suggestion::find_paginated(pool, Some("recycle"), &SuggestionFilter::default(), 1, 25)
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].record.id, by_alice);

    // Match on author display name
    let page = suggestion::find_paginated(pool, Some("bob"), &SuggestionFilter::default(), 1, 25)
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].record.id, by_bob);

    // Caller filter is ANDed with the name clause
    let filter = SuggestionFilter { status: Some(Status::Submitted), ..Default::default() };
    let page = suggestion::find_paginated(pool, Some("recycle"), &filter, 1, 25)
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);

    // No match at all
    let page = suggestion::find_paginated(pool, Some("zzz"), &SuggestionFilter::default(), 1, 25)
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_stats_groups_by_status_and_category() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let author = create_test_user(pool, "stats", "").await;

    suggestion::create(pool, author, &new_suggestion("One")).await.unwrap();
    suggestion::create(pool, author, &new_suggestion("Two")).await.unwrap();
    let mut other = new_suggestion("Three");
    other.category = Category::Safety;
    suggestion::create(pool, author, &other).await.unwrap();

    let stats = suggestion::stats(pool).await.unwrap();
    let draft = stats.by_status.iter().find(|c| c.key == "draft").unwrap();
    assert_eq!(draft.count, 3);
    let saving = stats.by_category.iter().find(|c| c.key == "cost_saving").unwrap();
    assert_eq!(saving.count, 2);
    let safety = stats.by_category.iter().find(|c| c.key == "safety").unwrap();
    assert_eq!(safety.count, 1);
}
