//! Question catalog tests: listing, clicks, usage tracking, visibility

use std::sync::Arc;

use askme::config::DatabaseConfig;
use askme::errors::AskmeError;
use askme::services::QuestionService;
use askme::storage::{SeaOrmStorage, StorageFactory};
use tempfile::TempDir;

async fn setup() -> (TempDir, Arc<SeaOrmStorage>, QuestionService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("questions_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    let service = QuestionService::new(storage.clone());
    (temp_dir, storage, service)
}

#[tokio::test]
async fn test_track_usage_upserts_by_text() {
    let (_dir, _storage, service) = setup().await;

    let first = service
        .track_usage("  Why did you pick Rust?  ", None)
        .await
        .unwrap();
    assert_eq!(first.text, "Why did you pick Rust?");
    assert_eq!(first.category, "general");
    assert_eq!(first.click_count, 1);

    let second = service
        .track_usage("Why did you pick Rust?", Some("tech"))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.click_count, 2);
    assert_eq!(second.category, "tech");

    assert_eq!(service.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_track_usage_reactivates_hidden_question() {
    let (_dir, _storage, service) = setup().await;

    let q = service.track_usage("Hidden?", None).await.unwrap();
    service.set_active(q.id, false).await.unwrap();
    assert!(service.list_active().await.unwrap().is_empty());

    let again = service.track_usage("Hidden?", None).await.unwrap();
    assert!(again.is_active);
    assert_eq!(again.click_count, 2);
    assert_eq!(service.list_active().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_track_usage_validation() {
    let (_dir, _storage, service) = setup().await;

    let err = service.track_usage("   ", None).await.unwrap_err();
    assert!(matches!(err, AskmeError::Validation(_)));

    let err = service.track_usage(&"q".repeat(256), None).await.unwrap_err();
    assert!(matches!(err, AskmeError::Validation(_)));
}

#[tokio::test]
async fn test_record_click() {
    let (_dir, _storage, service) = setup().await;

    let q = service.track_usage("Click me?", None).await.unwrap();
    let clicked = service.record_click(q.id).await.unwrap();
    assert_eq!(clicked.click_count, 2);
    assert!(clicked.updated_at >= q.updated_at);

    let err = service.record_click(4242).await.unwrap_err();
    assert!(matches!(err, AskmeError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_clicks_each_count_once() {
    let (_dir, _storage, service) = setup().await;

    let q = service.track_usage("What are you reading?", None).await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.record_click(q.id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].click_count, 11);
}

#[tokio::test]
async fn test_click_on_hidden_question_is_not_found() {
    let (_dir, _storage, service) = setup().await;

    let q = service.track_usage("Now you see me?", None).await.unwrap();
    service.set_active(q.id, false).await.unwrap();

    let err = service.record_click(q.id).await.unwrap_err();
    assert!(matches!(err, AskmeError::NotFound(_)));
}

#[tokio::test]
async fn test_set_active_missing_question() {
    let (_dir, _storage, service) = setup().await;

    let err = service.set_active(77, false).await.unwrap_err();
    assert!(matches!(err, AskmeError::NotFound(_)));
    assert_eq!(err.message(), "Question not found");
}

#[tokio::test]
async fn test_list_all_includes_hidden() {
    let (_dir, _storage, service) = setup().await;

    let a = service.track_usage("Visible?", None).await.unwrap();
    let b = service.track_usage("Invisible?", None).await.unwrap();
    service.set_active(b.id, false).await.unwrap();

    let active = service.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, a.id);

    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_top_orders_by_clicks_and_skips_hidden() {
    let (_dir, _storage, service) = setup().await;

    let low = service.track_usage("Low?", None).await.unwrap();
    let high = service.track_usage("High?", None).await.unwrap();
    let hidden = service.track_usage("Hidden but popular?", None).await.unwrap();

    for _ in 0..3 {
        service.record_click(high.id).await.unwrap();
    }
    for _ in 0..10 {
        service.record_click(hidden.id).await.unwrap();
    }
    service.set_active(hidden.id, false).await.unwrap();

    let top = service.top(5).await.unwrap();
    let ids: Vec<i32> = top.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![high.id, low.id]);

    let top_one = service.top(1).await.unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one[0].id, high.id);

    // zero is clamped up to one
    assert_eq!(service.top(0).await.unwrap().len(), 1);
}
