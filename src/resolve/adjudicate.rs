//! Cardinality adjudication
//!
//! Turns a filtered candidate set into exactly one selection or a specific
//! error. Never picks silently among distinguishable candidates.

use super::error::ResolveError;

/// Errors to raise for an empty or ambiguous candidate set.
#[derive(Debug, Clone)]
pub struct Adjudication {
    pub none: ResolveError,
    pub many: fn(usize) -> ResolveError,
}

/// Outcome label for logs and metrics.
pub(crate) fn outcome_label<T>(result: &Result<T, ResolveError>) -> &'static str {
    match result {
        Ok(_) => "selected",
        Err(e) => match e.kind() {
            crate::error::ErrorKind::Ambiguity => "ambiguous",
            _ => "not_found",
        },
    }
}

/// Select the only candidate.
///
/// - 0 candidates: `rules.none`
/// - 1 candidate: that candidate
/// - more: `rules.many(count)`
pub fn adjudicate<T>(candidates: Vec<T>, rules: &Adjudication) -> Result<T, ResolveError> {
    let count = candidates.len();
    let mut iter = candidates.into_iter();
    match (iter.next(), count) {
        (None, _) => Err(rules.none.clone()),
        (Some(only), 1) => Ok(only),
        (Some(_), n) => Err((rules.many)(n)),
    }
}

/// Like [`adjudicate`], but several candidates that are indistinguishable
/// under `same_rank` resolve to the first one in input order.
///
/// The input order is the catalog's iteration order, so the catalog owner
/// breaks such ties.
pub fn adjudicate_first_of_equals<T, F>(
    candidates: Vec<T>,
    rules: &Adjudication,
    same_rank: F,
) -> Result<T, ResolveError>
where
    F: Fn(&T, &T) -> bool,
{
    if candidates.len() > 1 {
        let first = &candidates[0];
        if candidates[1..].iter().all(|other| same_rank(first, other)) {
            tracing::debug!(
                tied = candidates.len(),
                "Candidates indistinguishable, selecting first in catalog order"
            );
            return candidates.into_iter().next().ok_or_else(|| rules.none.clone());
        }
    }
    adjudicate(candidates, rules)
}
