//! PgRunStore: append-only run log backed by Postgres.
//!
//! Rows are inserted once and never updated. Oversized text is cut on the way
//! in so a single runaway explanation can't bloat the table.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use vidcheck_common::{RunRecord, RunStats};

pub const MAX_CLAIM_CHARS: usize = 1000;
pub const MAX_EXPLANATION_CHARS: usize = 5000;
pub const MAX_SOURCES: usize = 10;

/// `list_recent` never returns more than this many rows.
const MAX_LIST_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// PgRunStore
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgRunStore {
    pool: PgPool,
}

impl PgRunStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to Postgres")?;
        Ok(Self::new(pool))
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run run-store migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one run. Returns the new row id.
    pub async fn append(&self, record: &RunRecord) -> Result<Uuid> {
        let sources: Vec<String> = record.sources.iter().take(MAX_SOURCES).cloned().collect();

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO runs
                (video_url, platform, video_title, video_creator, claim_extracted,
                 confidence, explanation, sources, channel_is_suspect,
                 fact_checks_found, search_results_found, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(&record.video_url)
        .bind(record.platform.as_str())
        .bind(&record.video_title)
        .bind(&record.video_creator)
        .bind(truncate_chars(&record.claim_extracted, MAX_CLAIM_CHARS))
        .bind(record.confidence.as_str())
        .bind(truncate_chars(&record.explanation, MAX_EXPLANATION_CHARS))
        .bind(&sources)
        .bind(record.channel_is_suspect)
        .bind(record.fact_checks_found)
        .bind(record.search_results_found)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert run")?;

        info!(%id, confidence = record.confidence.as_str(), "Run recorded");
        Ok(id)
    }

    /// Newest first. `limit` is clamped to 1..=100.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<RunRecord>> {
        let limit = (limit as i64).clamp(1, MAX_LIST_LIMIT);
        let rows = sqlx::query_as::<_, StoredRun>(
            r#"
            SELECT id, video_url, platform, video_title, video_creator, claim_extracted,
                   confidence, explanation, sources, channel_is_suspect,
                   fact_checks_found, search_results_found, created_at
            FROM runs
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RunRecord::try_from).collect()
    }

    /// Totals plus per-platform and per-confidence counts.
    pub async fn stats(&self) -> Result<RunStats> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM runs")
            .fetch_one(&self.pool)
            .await?;

        let platforms = sqlx::query_as::<_, (String, i64)>(
            "SELECT platform, COUNT(*) FROM runs GROUP BY platform",
        )
        .fetch_all(&self.pool)
        .await?;

        let confidences = sqlx::query_as::<_, (String, i64)>(
            "SELECT confidence, COUNT(*) FROM runs GROUP BY confidence",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(RunStats {
            total_queries: total,
            platform_breakdown: platforms.into_iter().collect::<BTreeMap<_, _>>(),
            confidence_breakdown: confidences.into_iter().collect::<BTreeMap<_, _>>(),
        })
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// A row from the runs table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredRun {
    pub id: Uuid,
    pub video_url: String,
    pub platform: String,
    pub video_title: String,
    pub video_creator: String,
    pub claim_extracted: String,
    pub confidence: String,
    pub explanation: String,
    pub sources: Vec<String>,
    pub channel_is_suspect: bool,
    pub fact_checks_found: i32,
    pub search_results_found: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StoredRun> for RunRecord {
    type Error = anyhow::Error;

    fn try_from(row: StoredRun) -> Result<Self> {
        Ok(RunRecord {
            platform: row.platform.parse().map_err(|e: String| anyhow!(e))?,
            confidence: row.confidence.parse().map_err(|e: String| anyhow!(e))?,
            video_url: row.video_url,
            video_title: row.video_title,
            video_creator: row.video_creator,
            claim_extracted: row.claim_extracted,
            explanation: row.explanation,
            sources: row.sources,
            channel_is_suspect: row.channel_is_suspect,
            fact_checks_found: row.fact_checks_found,
            search_results_found: row.search_results_found,
            created_at: row.created_at,
        })
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidcheck_common::{ConfidenceTier, Platform};

    fn row(platform: &str, confidence: &str) -> StoredRun {
        StoredRun {
            id: Uuid::new_v4(),
            video_url: "https://youtu.be/dQw4w9WgXcQ".into(),
            platform: platform.into(),
            video_title: "t".into(),
            video_creator: "c".into(),
            claim_extracted: "claim".into(),
            confidence: confidence.into(),
            explanation: "e".into(),
            sources: vec![],
            channel_is_suspect: false,
            fact_checks_found: 0,
            search_results_found: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_to_record() {
        let record = RunRecord::try_from(row("tiktok", "medium")).unwrap();
        assert_eq!(record.platform, Platform::TikTok);
        assert_eq!(record.confidence, ConfidenceTier::Medium);
    }

    #[test]
    fn unknown_confidence_is_an_error() {
        assert!(RunRecord::try_from(row("youtube", "certain")).is_err());
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let s = "é".repeat(MAX_CLAIM_CHARS + 5);
        assert_eq!(truncate_chars(&s, MAX_CLAIM_CHARS).chars().count(), MAX_CLAIM_CHARS);
    }
}
