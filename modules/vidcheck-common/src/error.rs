use thiserror::Error;

/// Everything that can go wrong in one analysis run. None of these abort the
/// run: all but `PersistenceFailed` degrade the result to low confidence, and
/// `PersistenceFailed` rides back to the caller as a warning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    #[error("Link could not be analyzed: {0}")]
    UnresolvableLink(String),

    #[error("Video content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("No checkable claim could be extracted")]
    ClaimExtractionFailed,

    #[error("Evidence provider unavailable ({stage}): {reason}")]
    EvidenceProviderUnavailable { stage: &'static str, reason: String },

    #[error("Text generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Run record was not saved: {0}")]
    PersistenceFailed(String),
}

impl RunError {
    /// Short stable identifier for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::UnresolvableLink(_) => "unresolvable_link",
            RunError::ContentUnavailable(_) => "content_unavailable",
            RunError::ClaimExtractionFailed => "claim_extraction_failed",
            RunError::EvidenceProviderUnavailable { .. } => "evidence_provider_unavailable",
            RunError::GenerationUnavailable(_) => "generation_unavailable",
            RunError::PersistenceFailed(_) => "persistence_failed",
        }
    }
}
