// Trusted-coverage search via Serper (Google Search).

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use vidcheck_common::SearchHit;

use crate::evidence::{domain_of, site_query};
use crate::traits::TrustedSearch;

const SERPER_API_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, serde::Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperSearch {
    api_key: String,
    client: reqwest::Client,
    max_results: usize,
    base_url: String,
}

impl SerperSearch {
    pub fn new(api_key: &str, max_results: usize) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            max_results,
            base_url: SERPER_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[async_trait]
impl TrustedSearch for SerperSearch {
    async fn query(&self, claim: &str, allowlist: &[String]) -> Result<Vec<SearchHit>> {
        let query = site_query(claim, allowlist);
        info!(max_results = self.max_results, "search: querying serper");

        let body = serde_json::json!({
            "q": query,
            "num": self.max_results,
        });

        let resp = self
            .client
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Serper API request failed")?
            .error_for_status()
            .context("Serper API returned an error")?;

        let data: SerperResponse = resp
            .json()
            .await
            .context("Failed to parse Serper response")?;

        let hits: Vec<SearchHit> = data
            .organic
            .into_iter()
            .map(|r| SearchHit {
                domain: domain_of(&r.link).unwrap_or_default(),
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect();

        info!(count = hits.len(), "search: complete");
        Ok(hits)
    }
}
