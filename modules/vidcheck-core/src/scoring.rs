use vidcheck_common::ConfidenceTier;

/// Map evidence counts to a tier. A formal fact-check beats trusted coverage;
/// no claim means nothing was checked, whatever the counts say.
pub fn score(fact_checks: usize, search_hits: usize, claim_present: bool) -> ConfidenceTier {
    match (claim_present, fact_checks, search_hits) {
        (false, _, _) => ConfidenceTier::Low,
        (true, f, _) if f > 0 => ConfidenceTier::High,
        (true, 0, s) if s > 0 => ConfidenceTier::Medium,
        _ => ConfidenceTier::Low,
    }
}
