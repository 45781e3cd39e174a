//! End-to-end runs of `analyze` against mock providers.

use std::sync::Arc;

use vidcheck_common::{ConfidenceTier, FileConfig, Platform, RunRecord, VideoContent};
use vidcheck_core::brief::violates;
use vidcheck_core::testing::{
    fact_check, search_hit, youtube_content, MemoryRunStore, MockCreatorHistory,
    MockFactCheckIndex, MockGenerator, MockProviders, MockTrustedSearch, MockVideoSource,
};
use vidcheck_core::{analyze, RunStore};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
const VIDEO_ID: &str = "dQw4w9WgXcQ";
const CHANNEL: &str = "UCwellness";
const CLAIM: &str = "Vaccine X causes condition Y";
const FACT_CHECK_URL: &str = "https://factcheckorg.com/vaccine-x";

fn video() -> MockVideoSource {
    MockVideoSource::new().on_metadata(
        VIDEO_ID,
        youtube_content("Doctors won't tell you this about Vaccine X", CHANNEL),
    )
}

fn calm_channel() -> MockCreatorHistory {
    MockCreatorHistory::new().on_titles(CHANNEL, &["Morning stretches", "Garden tour", "Q&A"])
}

/// A video with a claim and a channel, evidence left to the caller.
fn providers(fact_checks: MockFactCheckIndex, search: MockTrustedSearch) -> MockProviders {
    MockProviders {
        videos: Arc::new(video()),
        creators: Arc::new(calm_channel()),
        generator: Arc::new(MockGenerator::new().on_claim(CLAIM)),
        fact_checks: Arc::new(fact_checks),
        search: Arc::new(search),
        ..MockProviders::new()
    }
}

fn assert_no_evidence(record: &RunRecord) {
    assert!(record.sources.is_empty());
    assert_eq!(record.fact_checks_found, 0);
    assert_eq!(record.search_results_found, 0);
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fact_check_gives_high_with_refutation() {
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(
            CLAIM,
            vec![fact_check("FactCheckOrg", "False", FACT_CHECK_URL)],
        ),
        MockTrustedSearch::new(),
    );

    let analysis = analyze(&mocks.deps(), VIDEO_URL).await;
    let record = &analysis.record;

    assert_eq!(record.confidence, ConfidenceTier::High);
    assert_eq!(record.platform, Platform::YouTube);
    assert_eq!(record.claim_extracted, CLAIM);
    assert_eq!(record.sources, vec![FACT_CHECK_URL]);
    assert_eq!(record.fact_checks_found, 1);
    assert_eq!(record.search_results_found, 0);
    assert!(record.explanation.contains("This claim is false"));
    assert!(record.explanation.contains("FactCheckOrg"));
    assert_eq!(record.video_creator, format!("{CHANNEL} channel"));
    assert!(analysis.warning.is_none());

    // Stage B only runs when stage A finds nothing.
    assert_eq!(mocks.search.calls(), 0);
    assert_eq!(mocks.store.records().len(), 1);
}

#[tokio::test]
async fn two_trusted_hits_give_hedged_medium() {
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new().on_claim(
            CLAIM,
            vec![
                search_hit("No evidence links Vaccine X to condition Y", "https://www.reuters.com/health/vaccine-x"),
                search_hit("Health officials respond to viral video", "https://apnews.com/article/vaccine-x"),
            ],
        ),
    );

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Medium);
    assert_eq!(record.sources.len(), 2);
    assert_eq!(record.search_results_found, 2);
    assert!(record.explanation.contains("reputable sources suggest"));
    assert!(!violates(&record.explanation, ConfidenceTier::Medium));
}

#[tokio::test]
async fn banned_word_in_a_source_url_keeps_medium_within_tier() {
    let url = "https://www.reuters.com/fact-check/vaccine-x-myth-debunked-2024";
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new().on_claim(CLAIM, vec![search_hit("What the Vaccine X studies show", url)]),
    );

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Medium);
    assert_eq!(record.sources, vec![url]);
    assert!(!violates(&record.explanation, ConfidenceTier::Medium));
    assert!(record.explanation.contains(url));
}

#[tokio::test]
async fn no_evidence_gives_low() {
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new().on_claim(CLAIM, vec![]),
    );

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert_no_evidence(&record);
    assert!(record.explanation.contains("couldn't find any coverage"));
    assert!(!violates(&record.explanation, ConfidenceTier::Low));
}

#[tokio::test]
async fn off_allowlist_hits_do_not_count() {
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new().on_claim(
            CLAIM,
            vec![search_hit("Vaccine X exposed", "https://truthblog.example/vaccine-x")],
        ),
    );

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;
    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert_no_evidence(&record);
}

// ---------------------------------------------------------------------------
// Short circuits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_claim_skips_evidence() {
    let mocks = MockProviders {
        videos: Arc::new(MockVideoSource::new().on_metadata(
            VIDEO_ID,
            VideoContent {
                title: "Watch till the end".into(),
                ..Default::default()
            },
        )),
        generator: Arc::new(MockGenerator::new().on_claim("NO_CLAIM")),
        fact_checks: Arc::new(
            MockFactCheckIndex::new()
                .on_claim(CLAIM, vec![fact_check("FactCheckOrg", "False", FACT_CHECK_URL)]),
        ),
        ..MockProviders::new()
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert!(record.claim_extracted.is_empty());
    assert_no_evidence(&record);
    assert!(record.explanation.contains("isn't enough information"));
    assert_eq!(mocks.fact_checks.calls(), 0);
    assert_eq!(mocks.search.calls(), 0);
    assert_eq!(mocks.generator.claim_calls(), 1);
    assert_eq!(mocks.generator.brief_calls(), 0);
}

#[tokio::test]
async fn generator_outage_is_insufficient_information() {
    let mocks = MockProviders {
        videos: Arc::new(video()),
        creators: Arc::new(calm_channel()),
        ..MockProviders::new()
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert!(record.explanation.contains("isn't enough information"));
    assert_eq!(mocks.fact_checks.calls(), 0);
}

#[tokio::test]
async fn unsupported_links_are_low_without_fetching() {
    for url in ["https://vimeo.com/12345", "not a link at all", "", "https://youtube.com/watch?v=short"] {
        let mocks = providers(MockFactCheckIndex::new(), MockTrustedSearch::new());
        let analysis = analyze(&mocks.deps(), url).await;
        let record = &analysis.record;

        assert_eq!(record.confidence, ConfidenceTier::Low, "{url}");
        assert_eq!(record.platform, Platform::Unknown);
        assert_no_evidence(record);
        assert!(record.explanation.contains("couldn't analyze this link"));
        assert_eq!(mocks.videos.calls(), 0);
        // The run is still recorded.
        assert_eq!(mocks.store.records().len(), 1);
    }
}

#[tokio::test]
async fn missing_video_is_content_unavailable() {
    let mocks = MockProviders {
        generator: Arc::new(MockGenerator::new().on_claim(CLAIM)),
        ..MockProviders::new()
    };

    let record = analyze(&mocks.deps(), "https://youtu.be/aaaaaaaaaaa").await.record;

    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert_eq!(record.platform, Platform::YouTube);
    assert!(record.explanation.contains("couldn't load the details"));
    assert!(record.video_title.is_empty());
    assert_eq!(mocks.generator.claim_calls(), 0);
}

#[tokio::test]
async fn evidence_outage_is_low_and_says_so() {
    let mocks = providers(MockFactCheckIndex::new(), MockTrustedSearch::new());

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;

    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert_no_evidence(&record);
    assert!(record.explanation.contains("couldn't reach"));
    assert_eq!(mocks.fact_checks.calls(), 1);
    assert_eq!(mocks.search.calls(), 1);
}

// ---------------------------------------------------------------------------
// Brief phrasing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generated_brief_within_tier_is_used() {
    let reply = "It makes sense to check this one. Reputable sources suggest there is no \
                 established link between Vaccine X and condition Y.";
    let mocks = MockProviders {
        generator: Arc::new(MockGenerator::new().on_claim(CLAIM).on_brief(reply)),
        ..providers(
            MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
            MockTrustedSearch::new()
                .on_claim(CLAIM, vec![search_hit("Fact check", "https://apnews.com/a")]),
        )
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;
    assert_eq!(record.confidence, ConfidenceTier::Medium);
    assert_eq!(record.explanation, reply);
}

#[tokio::test]
async fn overconfident_generated_brief_falls_back_to_template() {
    let mocks = MockProviders {
        generator: Arc::new(
            MockGenerator::new()
                .on_claim(CLAIM)
                .on_brief("This is definitely a hoax, don't share it."),
        ),
        ..providers(
            MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
            MockTrustedSearch::new().on_claim(CLAIM, vec![]),
        )
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;
    assert_eq!(record.confidence, ConfidenceTier::Low);
    assert!(!violates(&record.explanation, ConfidenceTier::Low));
    assert!(record.explanation.contains("couldn't find any coverage"));
    assert_eq!(mocks.generator.brief_calls(), 1);
}

#[tokio::test]
async fn generated_brief_must_refute_a_false_rating() {
    let mocks = MockProviders {
        generator: Arc::new(
            MockGenerator::new()
                .on_claim(CLAIM)
                .on_brief("Here is some information about Vaccine X."),
        ),
        ..providers(
            MockFactCheckIndex::new()
                .on_claim(CLAIM, vec![fact_check("FactCheckOrg", "False", FACT_CHECK_URL)]),
            MockTrustedSearch::new(),
        )
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;
    assert!(record.explanation.contains("This claim is false"));
}

// ---------------------------------------------------------------------------
// Creator signal, persistence, determinism
// ---------------------------------------------------------------------------

#[tokio::test]
async fn alarmist_channel_is_flagged() {
    let mocks = MockProviders {
        creators: Arc::new(MockCreatorHistory::new().on_titles(
            CHANNEL,
            &[
                "SHOCKING truth about the water supply",
                "Economic COLLAPSE is coming",
                "Wake up before it's too late",
                "My garden tour",
            ],
        )),
        ..providers(
            MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
            MockTrustedSearch::new().on_claim(CLAIM, vec![]),
        )
    };

    let record = analyze(&mocks.deps(), VIDEO_URL).await.record;
    assert!(record.channel_is_suspect);
    assert!(record.explanation.contains("3 of 4 recent videos use alarmist language"));
    assert!(!violates(&record.explanation, ConfidenceTier::Low));
}

#[tokio::test]
async fn store_failure_becomes_warning() {
    let mocks = MockProviders {
        store: Arc::new(MemoryRunStore::new().failing()),
        ..providers(
            MockFactCheckIndex::new()
                .on_claim(CLAIM, vec![fact_check("FactCheckOrg", "False", FACT_CHECK_URL)]),
            MockTrustedSearch::new(),
        )
    };

    let analysis = analyze(&mocks.deps(), VIDEO_URL).await;
    assert_eq!(analysis.record.confidence, ConfidenceTier::High);
    let warning = analysis.warning.expect("persistence warning");
    assert!(warning.contains("not saved"));
    assert!(mocks.store.records().is_empty());
}

#[tokio::test]
async fn frozen_providers_give_the_same_answer() {
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new()
            .on_claim(CLAIM, vec![search_hit("Coverage", "https://www.bbc.co.uk/news/1")]),
    );
    let deps = mocks.deps();

    let first = analyze(&deps, VIDEO_URL).await.record;
    let second = analyze(&deps, VIDEO_URL).await.record;

    assert_eq!(first.confidence, second.confidence);
    assert_eq!(first.explanation, second.explanation);
    assert_eq!(first.sources, second.sources);

    let recent = mocks.store.list_recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    let stats = mocks.store.stats().await.unwrap();
    assert_eq!(stats.total_queries, 2);
    assert_eq!(stats.confidence_breakdown.get("medium"), Some(&2));
}

#[tokio::test]
async fn custom_allowlist_is_honored() {
    let mut settings = FileConfig::default();
    settings.search.allowlist = vec!["healthfeedback.org".into()];
    let mocks = providers(
        MockFactCheckIndex::new().on_claim(CLAIM, vec![]),
        MockTrustedSearch::new().on_claim(
            CLAIM,
            vec![
                search_hit("Reuters piece", "https://www.reuters.com/a"),
                search_hit("Review", "https://healthfeedback.org/review/1"),
            ],
        ),
    );

    let record = analyze(&mocks.deps_with(settings), VIDEO_URL).await.record;
    assert_eq!(record.confidence, ConfidenceTier::Medium);
    assert_eq!(record.sources, vec!["https://healthfeedback.org/review/1"]);
}
