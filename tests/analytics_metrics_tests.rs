//! Analytics counters and the metrics rollup

use std::sync::Arc;

use askme::config::DatabaseConfig;
use askme::services::{AnalyticsService, MetricsService, QuestionService, SuggestionService};
use askme::storage::{AnalyticsEventType, SeaOrmStorage, StorageFactory};
use tempfile::TempDir;

async fn setup() -> (TempDir, Arc<SeaOrmStorage>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("metrics_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    (temp_dir, storage)
}

#[tokio::test]
async fn test_track_event_counts_up() {
    let (_dir, storage) = setup().await;
    let analytics = AnalyticsService::new(storage);

    let first = analytics.track(AnalyticsEventType::CvDownload).await.unwrap();
    assert_eq!(first.event_type, AnalyticsEventType::CvDownload);
    assert_eq!(first.total, 1);

    let second = analytics.track(AnalyticsEventType::CvDownload).await.unwrap();
    assert_eq!(second.total, 2);

    let github = analytics.track(AnalyticsEventType::GithubVisit).await.unwrap();
    assert_eq!(github.total, 1);
}

#[tokio::test]
async fn test_totals_default_to_zero() {
    let (_dir, storage) = setup().await;
    let analytics = AnalyticsService::new(storage);

    let totals = analytics.totals().await.unwrap();
    assert_eq!(totals.len(), 2);
    assert!(totals.iter().all(|c| c.total == 0));

    analytics.track(AnalyticsEventType::GithubVisit).await.unwrap();
    let totals = analytics.totals().await.unwrap();
    let github = totals
        .iter()
        .find(|c| c.event_type == AnalyticsEventType::GithubVisit)
        .unwrap();
    assert_eq!(github.total, 1);
}

#[tokio::test]
async fn test_concurrent_events_are_not_lost() {
    let (_dir, storage) = setup().await;
    let analytics = AnalyticsService::new(storage);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let analytics = analytics.clone();
        handles.push(tokio::spawn(async move {
            analytics.track(AnalyticsEventType::CvDownload).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let totals = analytics.totals().await.unwrap();
    let cv = totals
        .iter()
        .find(|c| c.event_type == AnalyticsEventType::CvDownload)
        .unwrap();
    assert_eq!(cv.total, 8);
}

#[tokio::test]
async fn test_metrics_summary_on_empty_database() {
    let (_dir, storage) = setup().await;
    let metrics = MetricsService::new(storage, 5);

    let summary = metrics.summary().await.unwrap();
    assert_eq!(summary.total_clicks, 0);
    assert!(summary.clicks_by_category.is_empty());
    assert_eq!(summary.active_questions, 0);
    assert_eq!(summary.pending_suggestions, 0);
    assert_eq!(summary.cv_downloads, 0);
    assert_eq!(summary.github_visits, 0);
    assert_eq!(summary.event_totals.get("cv_download"), Some(&0));
    assert_eq!(summary.event_totals.get("github_visit"), Some(&0));
    assert!(summary.top_questions.is_empty());
}

#[tokio::test]
async fn test_metrics_summary_rollup() {
    let (_dir, storage) = setup().await;
    let questions = QuestionService::new(storage.clone());
    let suggestions = SuggestionService::new(storage.clone());
    let analytics = AnalyticsService::new(storage.clone());
    let metrics = MetricsService::new(storage.clone(), 2);

    // tech: 3 + 1 clicks, career: 2 clicks, hidden: excluded
    let rust = questions.track_usage("Rust?", Some("tech")).await.unwrap();
    questions.record_click(rust.id).await.unwrap();
    questions.record_click(rust.id).await.unwrap();
    questions.track_usage("Go?", Some("tech")).await.unwrap();
    let growth = questions.track_usage("Growth?", Some("career")).await.unwrap();
    questions.record_click(growth.id).await.unwrap();
    let hidden = questions.track_usage("Hidden?", Some("tech")).await.unwrap();
    questions.set_active(hidden.id, false).await.unwrap();

    let a = suggestions.submit("Pending one?", None).await.unwrap();
    let b = suggestions.submit("Pending two?", None).await.unwrap();
    let c = suggestions.submit("Rejected?", None).await.unwrap();
    suggestions.reject(c.id).await.unwrap();
    suggestions.approve(a.id, Some("fun")).await.unwrap();
    let _ = b;

    analytics.track(AnalyticsEventType::CvDownload).await.unwrap();
    analytics.track(AnalyticsEventType::CvDownload).await.unwrap();
    analytics.track(AnalyticsEventType::GithubVisit).await.unwrap();

    let summary = metrics.summary().await.unwrap();

    // approved question adds an active row with zero clicks
    assert_eq!(summary.active_questions, 4);
    assert_eq!(summary.total_clicks, 6);
    assert_eq!(summary.clicks_by_category.get("tech"), Some(&4));
    assert_eq!(summary.clicks_by_category.get("career"), Some(&2));
    assert_eq!(summary.clicks_by_category.get("fun"), Some(&0));

    assert_eq!(summary.pending_suggestions, 1);
    assert_eq!(summary.approved_suggestions, 1);
    assert_eq!(summary.rejected_suggestions, 1);

    assert_eq!(summary.cv_downloads, 2);
    assert_eq!(summary.github_visits, 1);

    assert_eq!(summary.top_questions.len(), 2);
    assert_eq!(summary.top_questions[0].id, rust.id);
    assert_eq!(summary.top_questions[0].click_count, 3);
    assert_eq!(summary.top_questions[1].id, growth.id);
}
