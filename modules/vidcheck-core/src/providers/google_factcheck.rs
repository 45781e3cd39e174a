// Google Fact Check Tools `claims:search`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use vidcheck_common::FactCheckEntry;

use crate::traits::FactCheckIndex;

const FACTCHECK_API_URL: &str = "https://factchecktools.googleapis.com/v1alpha1/claims:search";

/// The API rejects very long queries.
const MAX_QUERY_CHARS: usize = 200;
const MAX_REVIEWS: usize = 5;

#[derive(Debug, Default, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<ClaimItem>,
}

#[derive(Debug, Deserialize)]
struct ClaimItem {
    #[serde(default, rename = "claimReview")]
    claim_review: Vec<ClaimReview>,
}

#[derive(Debug, Deserialize)]
struct ClaimReview {
    publisher: Option<ReviewPublisher>,
    #[serde(default, rename = "textualRating")]
    textual_rating: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct ReviewPublisher {
    #[serde(default)]
    name: String,
    #[serde(default)]
    site: String,
}

pub struct GoogleFactCheck {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleFactCheck {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: FACTCHECK_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl FactCheckIndex for GoogleFactCheck {
    async fn query(&self, claim: &str) -> Result<Vec<FactCheckEntry>> {
        let query: String = claim.trim().chars().take(MAX_QUERY_CHARS).collect();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("query", query.as_str()),
                ("languageCode", "en"),
            ])
            .send()
            .await
            .context("Fact Check API request failed")?
            .error_for_status()
            .context("Fact Check API returned an error")?;

        let data: ClaimSearchResponse = resp
            .json()
            .await
            .context("Failed to parse Fact Check API response")?;

        let entries = review_entries(data);
        info!(count = entries.len(), "factcheck: complete");
        Ok(entries)
    }
}

fn review_entries(data: ClaimSearchResponse) -> Vec<FactCheckEntry> {
    data.claims
        .into_iter()
        .flat_map(|c| c.claim_review)
        .filter(|r| !r.url.trim().is_empty())
        .map(|r| {
            let publisher = r
                .publisher
                .map(|p| if p.name.trim().is_empty() { p.site } else { p.name })
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "A fact-checker".to_string());
            FactCheckEntry {
                publisher,
                verdict: r.textual_rating,
                url: r.url,
            }
        })
        .take(MAX_REVIEWS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_reviews_across_claims() {
        let data: ClaimSearchResponse = serde_json::from_value(serde_json::json!({
            "claims": [
                {
                    "text": "Vaccine X causes condition Y",
                    "claimReview": [{
                        "publisher": { "name": "FactCheckOrg", "site": "factcheckorg.com" },
                        "url": "https://factcheckorg.com/vaccine-x",
                        "textualRating": "False"
                    }]
                },
                {
                    "claimReview": [
                        { "publisher": { "site": "checker.example" }, "url": "https://checker.example/1", "textualRating": "Misleading" },
                        { "url": "", "textualRating": "False" }
                    ]
                }
            ]
        }))
        .unwrap();

        let entries = review_entries(data);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].publisher, "FactCheckOrg");
        assert_eq!(entries[0].verdict, "False");
        assert_eq!(entries[1].publisher, "checker.example");
    }

    #[test]
    fn empty_response_has_no_entries() {
        let data: ClaimSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(review_entries(data).is_empty());
    }
}
