//! Creator pattern detection: does this creator habitually use alarmist titles?
//!
//! A title matches when it contains any configured phrase (case-insensitive).
//! The creator is suspect when the matched fraction is strictly above the
//! threshold and the sample is big enough to mean something. Missing history
//! is never evidence of alarmism.

use tracing::info;

use vidcheck_common::file_config::CreatorConfig;
use vidcheck_common::{CreatorSignal, Fetch, Platform};

use crate::deps::PipelineDeps;
use crate::guard::guarded;

pub async fn assess_creator(deps: &PipelineDeps, platform: Platform, handle: &str) -> CreatorSignal {
    let config = &deps.settings.creator;
    if handle.trim().is_empty() {
        return not_suspect("creator unknown");
    }

    let titles = guarded("creator_history", deps.call_policy(), || {
        deps.creators
            .fetch_recent_titles(platform, handle, config.sample_size)
    })
    .await;

    match titles {
        Fetch::Ok(titles) => {
            let signal = detect(&titles, config);
            info!(
                handle,
                sampled = signal.sample_titles.len(),
                suspect = signal.is_suspect_pattern,
                "Creator pattern checked"
            );
            signal
        }
        Fetch::Unavailable(_) => not_suspect("creator history unavailable"),
    }
}

/// Pure detection over an already-fetched title sample.
pub fn detect(titles: &[String], config: &CreatorConfig) -> CreatorSignal {
    let sample: Vec<String> = titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .take(config.sample_size as usize)
        .map(str::to_string)
        .collect();

    if sample.is_empty() {
        return not_suspect("no recent titles available");
    }

    let phrases: Vec<String> = config
        .phrases
        .iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    let matched = sample
        .iter()
        .filter(|title| {
            let lower = title.to_lowercase();
            phrases.iter().any(|p| lower.contains(p.as_str()))
        })
        .count();

    let total = sample.len();
    let fraction = matched as f64 / total as f64;
    let is_suspect_pattern = total >= config.min_sample && fraction > config.threshold;

    CreatorSignal {
        is_suspect_pattern,
        evidence_note: format!("{matched} of {total} recent videos use alarmist language"),
        sample_titles: sample,
    }
}

fn not_suspect(note: &str) -> CreatorSignal {
    CreatorSignal {
        is_suspect_pattern: false,
        sample_titles: Vec::new(),
        evidence_note: note.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn majority_alarmist_is_suspect() {
        let sample = titles(&[
            "SHOCKING truth about the grid",
            "Economic COLLAPSE is here",
            "Wake up before it's too late",
            "My garden tour",
        ]);
        let signal = detect(&sample, &CreatorConfig::default());
        assert!(signal.is_suspect_pattern);
        assert_eq!(signal.evidence_note, "3 of 4 recent videos use alarmist language");
        assert_eq!(signal.sample_titles.len(), 4);
    }

    #[test]
    fn exactly_half_is_not_suspect() {
        let sample = titles(&["Breaking: storm", "Crisis at sea", "Recipe", "Tour"]);
        assert!(!detect(&sample, &CreatorConfig::default()).is_suspect_pattern);
    }

    #[test]
    fn tiny_samples_are_never_suspect() {
        let sample = titles(&["Doom is near", "Apocalypse now"]);
        let signal = detect(&sample, &CreatorConfig::default());
        assert!(!signal.is_suspect_pattern);
        assert_eq!(signal.evidence_note, "2 of 2 recent videos use alarmist language");
    }

    #[test]
    fn empty_history_is_not_suspect() {
        let signal = detect(&[], &CreatorConfig::default());
        assert!(!signal.is_suspect_pattern);
        assert!(signal.sample_titles.is_empty());
    }

    #[test]
    fn sample_is_capped_and_ordered() {
        let sample: Vec<String> = (0..15).map(|i| format!("Video {i}")).collect();
        let signal = detect(&sample, &CreatorConfig::default());
        assert_eq!(signal.sample_titles.len(), 10);
        assert_eq!(signal.sample_titles[0], "Video 0");
    }

    #[test]
    fn custom_phrases_and_threshold() {
        let config = CreatorConfig {
            threshold: 0.2,
            phrases: vec!["Miracle Cure".into()],
            ..Default::default()
        };
        let sample = titles(&["This miracle cure works", "Walk", "Swim", "Run"]);
        assert!(detect(&sample, &config).is_suspect_pattern);
    }
}
