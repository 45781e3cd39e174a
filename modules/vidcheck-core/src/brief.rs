//! Brief composition. The confidence tier caps how assertive the wording may
//! be: each tier below high has a deny-list of absolute phrasing, and nothing
//! that trips it is ever returned. Cited URLs are not wording and are left out
//! of the check.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use ai_client::Prompt;
use regex::Regex;
use tracing::{debug, info, warn};

use vidcheck_common::file_config::PipelineConfig;
use vidcheck_common::{
    Claim, ConfidenceTier, CreatorSignal, Evidence, FactCheckEntry, Fetch, VideoContent, VideoRef,
};

use crate::deps::PipelineDeps;
use crate::guard::guarded;

/// Fact-checks and search hits quoted in a template.
const MAX_CITED: usize = 3;

// =============================================================================
// Deny lists
// =============================================================================

const LOW_DENY: &[&str] = &[
    "definitely",
    "certainly",
    "without a doubt",
    "undeniably",
    "proven",
    "proves",
    "confirmed",
    "verified",
    "debunked",
    "is false",
    "is true",
    "is a hoax",
    "is a lie",
    "100%",
    "guaranteed",
    "rated this claim",
    "do not share",
    "don't share",
];

const MEDIUM_DENY: &[&str] = &[
    "definitely",
    "certainly",
    "without a doubt",
    "undeniably",
    "proven",
    "proves",
    "debunked",
    "this claim is false",
    "this claim is true",
    "is a hoax",
    "is a lie",
    "100%",
    "guaranteed",
    "do not share",
    "don't share",
    "you must",
];

fn deny_regex(phrases: &[&str]) -> Regex {
    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    // Word-ish boundaries that also work next to '%' and apostrophes.
    Regex::new(&format!(r"(?i)(?:^|[^a-z0-9])(?:{alternation})(?:$|[^a-z0-9])")).unwrap()
}

static RE_LOW_DENY: LazyLock<Regex> = LazyLock::new(|| deny_regex(LOW_DENY));
static RE_MEDIUM_DENY: LazyLock<Regex> = LazyLock::new(|| deny_regex(MEDIUM_DENY));
static RE_REFUTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(false|not true|incorrect|untrue)\b").unwrap());
static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bhttps?://\S+").unwrap());

pub fn deny_list(tier: ConfidenceTier) -> &'static [&'static str] {
    match tier {
        ConfidenceTier::Low => LOW_DENY,
        ConfidenceTier::Medium => MEDIUM_DENY,
        ConfidenceTier::High => &[],
    }
}

/// `text` with every URL blanked out. A slug like `/myth-debunked` is an
/// address, not something the brief says.
fn prose(text: &str) -> Cow<'_, str> {
    RE_URL.replace_all(text, " ")
}

/// True when the prose of `text` uses phrasing stronger than `tier` allows.
pub fn violates(text: &str, tier: ConfidenceTier) -> bool {
    match tier {
        ConfidenceTier::Low => RE_LOW_DENY.is_match(&prose(text)),
        ConfidenceTier::Medium => RE_MEDIUM_DENY.is_match(&prose(text)),
        ConfidenceTier::High => false,
    }
}

// =============================================================================
// Verdicts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    False,
    Mixed,
    True,
    Unrated,
}

const MIXED_TERMS: &[&str] = &[
    "half",
    "mixed",
    "mostly",
    "partly",
    "partially",
    "missing context",
    "needs context",
    "misleading",
    "exaggerat",
    "distort",
    "unproven",
    "unsupported",
    "out of context",
];
const FALSE_TERMS: &[&str] = &[
    "false",
    "fake",
    "pants on fire",
    "incorrect",
    "wrong",
    "debunked",
    "fabricated",
    "hoax",
    "not true",
    "baseless",
];
const TRUE_TERMS: &[&str] = &["true", "correct", "accurate"];

/// Bucket a publisher's free-text rating. Qualifiers are checked before
/// outright ratings, so "Half true" and "Mostly false" are both mixed.
pub fn classify_verdict(rating: &str) -> Verdict {
    let rating = rating.to_lowercase();
    let has = |terms: &[&str]| terms.iter().any(|t| rating.contains(t));
    if has(MIXED_TERMS) {
        Verdict::Mixed
    } else if has(FALSE_TERMS) {
        Verdict::False
    } else if has(TRUE_TERMS) {
        Verdict::True
    } else {
        Verdict::Unrated
    }
}

/// Combined verdict across every fact-check. Disagreement is mixed.
pub fn overall_verdict(fact_checks: &[FactCheckEntry]) -> Verdict {
    let verdicts: Vec<Verdict> = fact_checks
        .iter()
        .map(|f| classify_verdict(&f.verdict))
        .collect();
    let any = |v: Verdict| verdicts.contains(&v);
    match (any(Verdict::False), any(Verdict::True)) {
        (true, true) => Verdict::Mixed,
        _ if any(Verdict::Mixed) => Verdict::Mixed,
        (true, false) => Verdict::False,
        (false, true) => Verdict::True,
        (false, false) => Verdict::Unrated,
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Why a run stopped before evidence could decide the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortCircuit {
    UnresolvableLink,
    ContentUnavailable,
    InsufficientInformation,
}

pub struct BriefInput<'a> {
    pub video: &'a VideoRef,
    pub content: Option<&'a VideoContent>,
    pub claim: &'a Claim,
    pub tier: ConfidenceTier,
    pub evidence: &'a Evidence,
    pub creator: &'a CreatorSignal,
    pub short_circuit: Option<ShortCircuit>,
    /// Every evidence stage failed, as opposed to finding nothing.
    pub evidence_unreachable: bool,
}

impl BriefInput<'_> {
    fn title(&self) -> &str {
        self.content.map(|c| c.title.trim()).unwrap_or_default()
    }
}

// =============================================================================
// Composition
// =============================================================================

const SYSTEM_PROMPT: &str = "You help people who have been sent a video by a friend or relative \
and are not sure whether to trust it. Many of them are older and not technical. Write a short, \
warm reply in plain language. Acknowledge that it is sensible to check. Say what the video \
claims and what the sources you were given say about it, naming each source. End on a calm, \
practical note. Never invent sources, ratings or facts that are not in the material. Do not use \
markdown headings or bold text. Keep it between 150 and 200 words.";

/// Final brief for one run. Short-circuited runs always use the template;
/// otherwise the generator phrases it and the template is the fallback.
pub async fn compose(deps: &PipelineDeps, input: &BriefInput<'_>) -> String {
    if input.short_circuit.is_some() || input.evidence_unreachable {
        return template(input);
    }

    let prompt = brief_prompt(input, &deps.settings.pipeline);
    let generated = guarded("brief_generation", deps.call_policy(), || async {
        deps.generator.generate(&prompt).await.map_err(anyhow::Error::from)
    })
    .await;

    match generated {
        Fetch::Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                debug!("Generator returned an empty brief");
            } else if violates(text, input.tier) {
                warn!(tier = input.tier.as_str(), "Generated brief exceeded its tier, using template");
            } else if needs_refutation(input) && !RE_REFUTATION.is_match(&prose(text)) {
                warn!("Generated brief did not state the false rating, using template");
            } else {
                info!(tier = input.tier.as_str(), "Brief generated");
                return text.to_string();
            }
        }
        Fetch::Unavailable(reason) => debug!(reason = %reason, "Brief generation unavailable"),
    }
    template(input)
}

fn needs_refutation(input: &BriefInput<'_>) -> bool {
    input.tier == ConfidenceTier::High && overall_verdict(&input.evidence.fact_checks) == Verdict::False
}

/// Deterministic brief. Quoted video text and hit titles are dropped when
/// they would push the wording past the tier; if even that is too strong the
/// tier's fixed wording is used and `sources` carries the citations.
pub fn template(input: &BriefInput<'_>) -> String {
    let text = render(input, false);
    if !violates(&text, input.tier) {
        return text;
    }
    let bare = render(input, true);
    if !violates(&bare, input.tier) {
        return bare;
    }
    warn!(tier = input.tier.as_str(), "Template exceeded its tier, using fixed wording");
    fixed_wording(input.tier).to_string()
}

fn fixed_wording(tier: ConfidenceTier) -> &'static str {
    match tier {
        ConfidenceTier::High => "A professional fact-checker has rated this claim. \
             I'd recommend reading the fact-check before sharing this video.",
        ConfidenceTier::Medium => "I couldn't find a formal fact-check, but reputable sources \
             have covered this. It could be worth reading them before passing the video on.",
        ConfidenceTier::Low => "I couldn't find trusted coverage of this, so I can't say either \
             way whether it is accurate.",
    }
}

fn render(input: &BriefInput<'_>, bare: bool) -> String {
    let mut out = String::new();
    let title = input.title();

    match input.short_circuit {
        Some(ShortCircuit::UnresolvableLink) => {
            out.push_str(
                "I couldn't analyze this link. I can only check YouTube and TikTok videos right now, \
                 so I can't say whether what it shows is accurate.",
            );
            return out;
        }
        Some(ShortCircuit::ContentUnavailable) => {
            out.push_str(
                "I couldn't load the details of this video, so I wasn't able to check it. \
                 It may be private or removed. I can't say whether its content is accurate.",
            );
            return with_creator_note(out, input.creator);
        }
        _ => {}
    }

    if title.is_empty() || bare {
        out.push_str("I looked into this video.");
    } else {
        let _ = write!(out, "I looked into the video: \"{title}\"");
    }
    if !input.claim.is_empty() && !bare {
        let _ = write!(out, "\nThe main claim: \"{}\"", input.claim.text);
    }
    out.push_str("\n\n");

    if input.short_circuit == Some(ShortCircuit::InsufficientInformation) {
        out.push_str(
            "There isn't enough information in this video for me to identify a specific claim \
             to check. I can't say either way whether it is accurate.",
        );
        return with_creator_note(out, input.creator);
    }

    match input.tier {
        ConfidenceTier::High => render_high(&mut out, &input.evidence.fact_checks),
        ConfidenceTier::Medium => render_medium(&mut out, input.evidence, bare),
        ConfidenceTier::Low if input.evidence_unreachable => out.push_str(
            "I couldn't reach my usual fact-checking sources just now, so I can't say whether \
             this claim is accurate. Please try again a little later.",
        ),
        ConfidenceTier::Low => out.push_str(
            "I couldn't find any coverage of this from trusted news sources. \
             That doesn't mean it's wrong, but it means major outlets haven't reported on it. \
             I'd wait for more information before worrying.",
        ),
    }

    with_creator_note(out, input.creator)
}

fn render_high(out: &mut String, fact_checks: &[FactCheckEntry]) {
    for fc in fact_checks.iter().take(MAX_CITED) {
        let _ = writeln!(out, "{} has rated this claim as: {}", fc.publisher, fc.verdict);
        let _ = writeln!(out, "Source: {}", fc.url);
    }
    out.push('\n');
    out.push_str(match overall_verdict(fact_checks) {
        Verdict::False => {
            "This claim is false according to professional fact-checkers. \
             I'd recommend not sharing this video."
        }
        Verdict::Mixed => {
            "Fact-checkers found this claim misleading or only partly accurate. \
             I'd recommend reading the fact-check before sharing this video."
        }
        Verdict::True => "Fact-checkers rated this claim as accurate.",
        Verdict::Unrated => "I'd recommend reading the fact-check above before sharing this video.",
    });
}

fn render_medium(out: &mut String, evidence: &Evidence, bare: bool) {
    out.push_str("I couldn't find a formal fact-check, but here's what reputable sources suggest:\n");
    for hit in evidence.search_hits.iter().take(MAX_CITED) {
        if bare || hit.title.trim().is_empty() {
            let _ = writeln!(out, "- Coverage from {} ({})", hit.domain, hit.url);
        } else {
            let _ = writeln!(out, "- {} ({})", hit.title.trim(), hit.url);
        }
    }
    out.push_str(
        "\nThis coverage may help you judge the claim, but it isn't a formal verdict. \
         It could be worth reading these before passing the video on.",
    );
}

fn with_creator_note(mut out: String, creator: &CreatorSignal) -> String {
    if creator.is_suspect_pattern {
        let _ = write!(
            out,
            "\n\nAlso worth knowing: this creator's recent videos often use alarmist language ({}).",
            creator.evidence_note
        );
    }
    out
}

/// The generation prompt: everything known about the video plus the tier's
/// tone rule.
pub fn brief_prompt(input: &BriefInput<'_>, config: &PipelineConfig) -> Prompt {
    let mut user = String::new();
    let _ = writeln!(user, "Platform: {}", input.video.platform);
    if let Some(content) = input.content {
        let _ = writeln!(user, "Video title: {}", content.title.trim());
        if !content.creator_name.trim().is_empty() {
            let _ = writeln!(user, "Creator: {}", content.creator_name.trim());
        }
        let description: String = content.description.chars().take(config.description_chars).collect();
        if !description.trim().is_empty() {
            let _ = writeln!(user, "Description: {}", description.trim());
        }
        if let Some(transcript) = content.transcript.as_deref() {
            let excerpt: String = transcript.chars().take(config.brief_transcript_chars).collect();
            let _ = writeln!(user, "Transcript excerpt: {}", excerpt.trim());
        }
    }
    let _ = writeln!(user, "Claim being checked: {}", input.claim.text);

    if input.creator.is_suspect_pattern {
        let _ = writeln!(
            user,
            "\nChannel pattern: {}. Mention gently that this creator often uses alarming titles.",
            input.creator.evidence_note
        );
    }

    user.push_str("\nFact-checks found:\n");
    if input.evidence.fact_checks.is_empty() {
        user.push_str("None.\n");
    }
    for fc in &input.evidence.fact_checks {
        let _ = writeln!(user, "- {} rated it: {} ({})", fc.publisher, fc.verdict, fc.url);
    }

    user.push_str("\nCoverage from trusted news sources:\n");
    if input.evidence.search_hits.is_empty() {
        user.push_str("None.\n");
    }
    for hit in &input.evidence.search_hits {
        let _ = writeln!(user, "- {} ({}): {}", hit.title, hit.url, hit.snippet);
    }

    let _ = write!(user, "\nConfidence: {}. {}", input.tier, tone_rule(input.tier));

    Prompt::new(user)
        .system(SYSTEM_PROMPT)
        .max_tokens(800)
        .temperature(0.7)
}

fn tone_rule(tier: ConfidenceTier) -> String {
    let banned = |tier| deny_list(tier).join("\", \"");
    match tier {
        ConfidenceTier::High => "A formal fact-check exists. State its rating plainly, and if it \
            rates the claim false say so directly and recommend not sharing the video."
            .to_string(),
        ConfidenceTier::Medium => format!(
            "There is no formal fact-check. Use hedged wording such as \"reputable sources \
             suggest\" and do not tell the reader what to do. Never use these phrases: \"{}\".",
            banned(ConfidenceTier::Medium)
        ),
        ConfidenceTier::Low => format!(
            "Nothing reliable was found. Say clearly that you could not verify the claim either \
             way. Never use these phrases: \"{}\".",
            banned(ConfidenceTier::Low)
        ),
    }
}
