//! Evidence gathering: formal fact-checks first, trusted coverage as fallback.

use tracing::{info, warn};
use url::Url;

use vidcheck_common::{Claim, Evidence, Fetch, RunError, SearchHit};

use crate::deps::PipelineDeps;
use crate::guard::guarded;

/// Evidence for `claim`, plus one `EvidenceProviderUnavailable` per stage
/// that failed. A failed stage contributes nothing.
pub async fn gather(deps: &PipelineDeps, claim: &Claim) -> (Evidence, Vec<RunError>) {
    let mut evidence = Evidence::default();
    let mut degraded = Vec::new();

    if claim.is_empty() {
        return (evidence, degraded);
    }

    let policy = deps.call_policy();
    let search = &deps.settings.search;

    match guarded("fact_check_index", policy, || deps.fact_checks.query(&claim.text)).await {
        Fetch::Ok(mut entries) => {
            entries.retain(|e| !e.url.trim().is_empty());
            entries.truncate(search.max_results);
            evidence.fact_checks = entries;
        }
        Fetch::Unavailable(reason) => degraded.push(RunError::EvidenceProviderUnavailable {
            stage: "fact_check",
            reason,
        }),
    }

    if evidence.fact_checks.is_empty() {
        match guarded("trusted_search", policy, || {
            deps.search.query(&claim.text, &search.allowlist)
        })
        .await
        {
            Fetch::Ok(hits) => {
                evidence.search_hits = filter_hits(hits, &search.allowlist, search.max_results);
            }
            Fetch::Unavailable(reason) => degraded.push(RunError::EvidenceProviderUnavailable {
                stage: "trusted_search",
                reason,
            }),
        }
    }

    for err in &degraded {
        warn!(kind = err.kind(), error = %err, "Evidence stage degraded");
    }
    info!(
        fact_checks = evidence.fact_checks.len(),
        search_hits = evidence.search_hits.len(),
        "Evidence gathered"
    );
    (evidence, degraded)
}

/// Drop hits whose host is off the allow-list, dedupe by URL, cap the count.
/// `domain` is rewritten from the URL so it always names the real host.
pub fn filter_hits(hits: Vec<SearchHit>, allowlist: &[String], max: usize) -> Vec<SearchHit> {
    let mut kept: Vec<SearchHit> = Vec::new();
    for mut hit in hits {
        let Some(domain) = domain_of(&hit.url) else {
            continue;
        };
        if !on_allowlist(&domain, allowlist) || kept.iter().any(|k| k.url == hit.url) {
            continue;
        }
        hit.domain = domain;
        kept.push(hit);
        if kept.len() >= max {
            break;
        }
    }
    kept
}

/// Lowercased host without a leading `www.`.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Exact match or subdomain of an allow-listed domain.
pub fn on_allowlist(domain: &str, allowlist: &[String]) -> bool {
    allowlist.iter().any(|allowed| {
        let allowed = allowed.trim().to_ascii_lowercase();
        !allowed.is_empty()
            && (domain == allowed
                || domain
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

/// Search query restricted to the allow-list: `claim (site:a OR site:b)`.
pub fn site_query(claim: &str, allowlist: &[String]) -> String {
    let sites: Vec<String> = allowlist
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| format!("site:{d}"))
        .collect();
    if sites.is_empty() {
        claim.trim().to_string()
    } else {
        format!("{} ({})", claim.trim(), sites.join(" OR "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow() -> Vec<String> {
        vec!["reuters.com".into(), "bbc.co.uk".into()]
    }

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            domain: String::new(),
            title: "t".into(),
            url: url.into(),
            snippet: String::new(),
        }
    }

    #[test]
    fn domain_strips_www_and_case() {
        assert_eq!(domain_of("https://WWW.Reuters.com/x").as_deref(), Some("reuters.com"));
        assert_eq!(domain_of("ftp://reuters.com/x"), None);
        assert_eq!(domain_of("not a url"), None);
    }

    #[test]
    fn allowlist_accepts_subdomains_only_on_label_boundary() {
        assert!(on_allowlist("reuters.com", &allow()));
        assert!(on_allowlist("news.bbc.co.uk", &allow()));
        assert!(!on_allowlist("notreuters.com", &allow()));
        assert!(!on_allowlist("reuters.com.evil.net", &allow()));
    }

    #[test]
    fn filter_discards_off_list_hosts_and_duplicates() {
        let hits = vec![
            hit("https://www.reuters.com/a"),
            hit("https://example.com/b"),
            hit("https://www.reuters.com/a"),
            hit("https://www.bbc.co.uk/news/c"),
        ];
        let kept = filter_hits(hits, &allow(), 5);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].domain, "reuters.com");
        assert_eq!(kept[1].domain, "bbc.co.uk");
    }

    #[test]
    fn filter_caps_results() {
        let hits = (0..8).map(|i| hit(&format!("https://reuters.com/{i}"))).collect();
        assert_eq!(filter_hits(hits, &allow(), 3).len(), 3);
    }

    #[test]
    fn site_query_ors_domains() {
        assert_eq!(
            site_query(" vaccines cause autism ", &allow()),
            "vaccines cause autism (site:reuters.com OR site:bbc.co.uk)"
        );
        assert_eq!(site_query("x", &[]), "x");
    }
}
