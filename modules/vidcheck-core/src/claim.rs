//! Claim extraction: one checkable sentence from whatever text the video has.

use ai_client::{strip_code_blocks, truncate_words, Prompt};
use tracing::{info, warn};

use vidcheck_common::file_config::PipelineConfig;
use vidcheck_common::{Claim, Fetch, RunError, VideoContent};

use crate::deps::PipelineDeps;
use crate::guard::guarded;

const NO_CLAIM: &str = "NO_CLAIM";

/// Longest claim kept; anything past this is not "a single sentence".
const MAX_CLAIM_CHARS: usize = 300;

pub(crate) const SYSTEM_PROMPT: &str = "You read the text of a short social-media video and identify the \
single most check-worthy factual claim it makes. Reply with that claim as one short declarative \
sentence, in plain language, with no preamble or quotation marks. Opinions, jokes and \
predictions with no factual basis are not claims. If the video makes no checkable factual \
claim, reply with exactly NO_CLAIM.";

/// Extract the claim. Errors mean "no claim": the caller skips evidence.
pub async fn extract_claim(deps: &PipelineDeps, content: &VideoContent) -> Result<Claim, RunError> {
    // Hashtags alone are not something a video claims.
    if !content.has_text() {
        return Err(RunError::ClaimExtractionFailed);
    }
    let material = claim_material(content, &deps.settings.pipeline);

    let prompt = Prompt::new(material)
        .system(SYSTEM_PROMPT)
        .max_tokens(120)
        .temperature(0.0);

    let response = guarded("claim_extraction", deps.call_policy(), || async {
        deps.generator.generate(&prompt).await.map_err(anyhow::Error::from)
    })
    .await;

    match response {
        Fetch::Ok(text) => match clean_claim(&text) {
            Some(claim) => {
                info!(claim = %claim, model = deps.generator.model(), "Claim extracted");
                Ok(Claim::new(claim))
            }
            None => {
                info!("Generator found no checkable claim");
                Err(RunError::ClaimExtractionFailed)
            }
        },
        Fetch::Unavailable(reason) => {
            warn!(reason = %reason, "Claim extraction unavailable");
            Err(RunError::GenerationUnavailable(reason))
        }
    }
}

/// Labelled source text for the extraction prompt. Empty when the video has
/// nothing to read.
pub fn claim_material(content: &VideoContent, config: &PipelineConfig) -> String {
    let mut parts = Vec::new();

    let title = content.title.trim();
    if !title.is_empty() {
        parts.push(format!("Title: {title}"));
    }

    let description: String = content
        .description
        .trim()
        .chars()
        .take(config.description_chars)
        .collect();
    if !description.is_empty() {
        parts.push(format!("Description: {description}"));
    }

    if let Some(transcript) = content.transcript.as_deref() {
        let opening = truncate_words(transcript, config.claim_transcript_words);
        if !opening.is_empty() {
            parts.push(format!("Transcript (opening): {opening}"));
        }
    }

    let tags: Vec<String> = content
        .tags
        .iter()
        .map(|t| t.trim().trim_start_matches('#'))
        .filter(|t| !t.is_empty())
        .take(config.max_tags)
        .map(|t| format!("#{t}"))
        .collect();
    if !tags.is_empty() {
        parts.push(format!("Hashtags: {}", tags.join(" ")));
    }

    parts.join("\n")
}

/// Reduce a model reply to one sentence, or `None` for "no claim".
pub fn clean_claim(response: &str) -> Option<String> {
    let text = strip_code_blocks(response);
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let line = strip_label(line).trim().trim_matches('"').trim();
    if is_no_claim(line) {
        return None;
    }

    let sentence = first_sentence(line);
    let sentence: String = sentence.chars().take(MAX_CLAIM_CHARS).collect();
    let sentence = sentence.trim().to_string();
    (!sentence.is_empty()).then_some(sentence)
}

fn strip_label(line: &str) -> &str {
    for label in ["claim:", "the claim is:", "main claim:"] {
        if line
            .get(..label.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(label))
        {
            return &line[label.len()..];
        }
    }
    line
}

fn is_no_claim(line: &str) -> bool {
    let normalized = line
        .trim_end_matches(['.', '!'])
        .trim()
        .to_ascii_lowercase()
        .replace(['_', '-'], " ");
    normalized == NO_CLAIM.to_ascii_lowercase().replace('_', " ")
        || matches!(normalized.as_str(), "none" | "n/a" | "no claims" | "no checkable claim")
}

/// Text up to and including the first sentence terminator followed by a space.
/// Terminators inside the first few words ("Dr.", "U.S.") do not count.
fn first_sentence(text: &str) -> &str {
    const MIN_SENTENCE_CHARS: usize = 20;
    let bytes = text.as_bytes();
    for (i, c) in text.char_indices() {
        if i >= MIN_SENTENCE_CHARS
            && matches!(c, '.' | '!' | '?')
            && bytes.get(i + 1).is_some_and(|b| *b == b' ')
        {
            return &text[..=i];
        }
    }
    text
}
