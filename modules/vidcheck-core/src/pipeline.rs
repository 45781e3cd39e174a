//! `analyze`: one link in, one run record out. Every stage degrades instead
//! of failing, so the caller always gets a brief back.

use chrono::Utc;
use tracing::{error, info, warn};

use vidcheck_common::{
    Analysis, Claim, CreatorSignal, Evidence, Fetch, RunError, RunRecord, VideoContent,
};

use crate::brief::{self, BriefInput, ShortCircuit};
use crate::claim::extract_claim;
use crate::content::fetch_content;
use crate::creator::assess_creator;
use crate::deps::PipelineDeps;
use crate::evidence;
use crate::guard::guarded;
use crate::link;
use crate::scoring::score;

pub async fn analyze(deps: &PipelineDeps, url: &str) -> Analysis {
    let video = link::resolve(url);
    let mut errors: Vec<RunError> = Vec::new();

    let mut content: Option<VideoContent> = None;
    let mut creator = CreatorSignal::default();
    let mut claim = Claim::empty();
    let mut evidence = Evidence::default();
    let mut short_circuit = None;
    let mut evidence_unreachable = false;

    if !video.is_supported() {
        errors.push(RunError::UnresolvableLink(video.url.clone()));
        short_circuit = Some(ShortCircuit::UnresolvableLink);
    } else {
        match fetch_content(deps, &video).await {
            Fetch::Ok(fetched) => content = Some(fetched),
            Fetch::Unavailable(reason) => {
                errors.push(RunError::ContentUnavailable(reason));
                short_circuit = Some(ShortCircuit::ContentUnavailable);
            }
        }
    }

    if let Some(fetched) = content.as_ref() {
        creator = assess_creator(deps, video.platform, &fetched.creator_handle).await;

        match extract_claim(deps, fetched).await {
            Ok(extracted) => claim = extracted,
            Err(e) => {
                errors.push(e);
                short_circuit = Some(ShortCircuit::InsufficientInformation);
            }
        }

        if !claim.is_empty() {
            let (gathered, degraded) = evidence::gather(deps, &claim).await;
            evidence_unreachable = gathered.is_empty()
                && degraded.iter().any(|e| {
                    matches!(e, RunError::EvidenceProviderUnavailable { stage: "trusted_search", .. })
                });
            evidence = gathered;
            errors.extend(degraded);
        }
    }

    let tier = score(
        evidence.fact_checks.len(),
        evidence.search_hits.len(),
        !claim.is_empty(),
    );

    let explanation = brief::compose(
        deps,
        &BriefInput {
            video: &video,
            content: content.as_ref(),
            claim: &claim,
            tier,
            evidence: &evidence,
            creator: &creator,
            short_circuit,
            evidence_unreachable,
        },
    )
    .await;

    for err in &errors {
        warn!(kind = err.kind(), error = %err, "Run degraded");
    }

    let (video_title, video_creator) = content
        .as_ref()
        .map(|c| {
            let creator = if c.creator_name.trim().is_empty() {
                c.creator_handle.clone()
            } else {
                c.creator_name.clone()
            };
            (c.title.clone(), creator)
        })
        .unwrap_or_default();

    let record = RunRecord {
        video_url: video.url.clone(),
        platform: video.platform,
        video_title,
        video_creator,
        claim_extracted: claim.text.clone(),
        confidence: tier,
        explanation,
        sources: evidence.sources(),
        channel_is_suspect: creator.is_suspect_pattern,
        fact_checks_found: evidence.fact_checks.len() as i32,
        search_results_found: evidence.search_hits.len() as i32,
        created_at: Utc::now(),
    };

    info!(
        platform = record.platform.as_str(),
        confidence = record.confidence.as_str(),
        fact_checks = record.fact_checks_found,
        search_hits = record.search_results_found,
        suspect = record.channel_is_suspect,
        degraded = errors.len(),
        "Analysis complete"
    );

    let warning = match guarded("run_store", deps.call_policy(), || deps.store.append(&record)).await
    {
        Fetch::Ok(()) => None,
        Fetch::Unavailable(reason) => {
            let err = RunError::PersistenceFailed(reason);
            error!(kind = err.kind(), error = %err, "Failed to persist run");
            Some(err.to_string())
        }
    };

    Analysis { record, warning }
}
