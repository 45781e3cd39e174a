//! Integration tests for PgRunStore.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use chrono::{Duration, Utc};
use vidcheck_common::{ConfidenceTier, Platform, RunRecord};
use vidcheck_store::{PgRunStore, MAX_EXPLANATION_CHARS, MAX_SOURCES};

/// Get a migrated store on a clean table, or skip if no test DB is available.
async fn test_store() -> Option<PgRunStore> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let store = PgRunStore::connect(&url).await.ok()?;
    store.migrate().await.ok()?;
    sqlx::query("TRUNCATE runs").execute(store.pool()).await.ok()?;
    Some(store)
}

fn record(confidence: ConfidenceTier, platform: Platform, minutes_ago: i64) -> RunRecord {
    RunRecord {
        video_url: format!("https://example.test/{minutes_ago}"),
        platform,
        video_title: "Grid collapse is coming".into(),
        video_creator: "Prepper Daily".into(),
        claim_extracted: "The national grid will fail this winter.".into(),
        confidence,
        explanation: "explanation".into(),
        sources: vec!["https://reuters.com/a".into()],
        channel_is_suspect: true,
        fact_checks_found: 0,
        search_results_found: 1,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn list_recent_returns_newest_first() {
    let Some(store) = test_store().await else {
        return;
    };

    store
        .append(&record(ConfidenceTier::Low, Platform::YouTube, 30))
        .await
        .unwrap();
    store
        .append(&record(ConfidenceTier::Medium, Platform::TikTok, 5))
        .await
        .unwrap();

    let runs = store.list_recent(10).await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].confidence, ConfidenceTier::Medium);
    assert_eq!(runs[0].platform, Platform::TikTok);
    assert!(runs[0].channel_is_suspect);
}

#[tokio::test]
async fn append_truncates_oversized_fields() {
    let Some(store) = test_store().await else {
        return;
    };

    let mut big = record(ConfidenceTier::High, Platform::YouTube, 1);
    big.explanation = "x".repeat(MAX_EXPLANATION_CHARS + 100);
    big.sources = (0..25).map(|i| format!("https://apnews.com/{i}")).collect();
    store.append(&big).await.unwrap();

    let stored = store.list_recent(1).await.unwrap().remove(0);
    assert_eq!(stored.explanation.len(), MAX_EXPLANATION_CHARS);
    assert_eq!(stored.sources.len(), MAX_SOURCES);
}

#[tokio::test]
async fn stats_break_down_by_platform_and_confidence() {
    let Some(store) = test_store().await else {
        return;
    };

    for (tier, platform, ago) in [
        (ConfidenceTier::High, Platform::YouTube, 3),
        (ConfidenceTier::Low, Platform::YouTube, 2),
        (ConfidenceTier::Low, Platform::Unknown, 1),
    ] {
        store.append(&record(tier, platform, ago)).await.unwrap();
    }

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_queries, 3);
    assert_eq!(stats.platform_breakdown.get("youtube"), Some(&2));
    assert_eq!(stats.confidence_breakdown.get("low"), Some(&2));
    assert_eq!(stats.confidence_breakdown.get("medium"), None);
}
