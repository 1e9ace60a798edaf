//! Criteria filter pipeline
//!
//! A resolver is an ordered table of [`FilterStage`]s run over a candidate
//! set. Each stage either narrows the set, is skipped (criterion omitted or
//! lenient with no match), or rejects the pass with its own error.

use super::error::ResolveError;
use std::time::Instant;

/// How a stage treats an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Zero matches is an error naming this stage
    Strict,
    /// Zero matches is tolerated; the stage becomes a no-op
    Lenient,
}

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;

/// A stage rejected the candidate set.
///
/// Carries the pre-filter candidates unchanged alongside the stage's error.
/// Callers normally discard the candidates via [`Rejected::into_error`].
#[derive(Debug)]
pub struct Rejected<T> {
    pub stage: &'static str,
    pub candidates: Vec<T>,
    pub error: ResolveError,
}

impl<T> Rejected<T> {
    pub fn into_error(self) -> ResolveError {
        self.error
    }
}

/// A named predicate over a candidate set with a strictness and the error to
/// raise when it is strict and matches nothing.
pub struct FilterStage<'a, T> {
    name: &'static str,
    criterion: Option<Criterion<'a, T>>,
    strictness: Strictness,
}

struct Criterion<'a, T> {
    predicate: Predicate<'a, T>,
    on_empty: ResolveError,
}

impl<'a, T> FilterStage<'a, T> {
    /// Build a stage with an explicit strictness.
    pub fn new<P>(name: &'static str, strictness: Strictness, on_empty: ResolveError, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        Self {
            name,
            criterion: Some(Criterion {
                predicate: Box::new(predicate),
                on_empty,
            }),
            strictness,
        }
    }

    /// Build a stage from an optional criterion.
    ///
    /// A supplied criterion produces a strict stage whose error is built from
    /// the criterion value; an omitted one produces an inapplicable stage that
    /// passes every candidate set through untouched.
    pub fn optional<C, E, P>(name: &'static str, criterion: Option<C>, on_empty: E, predicate: P) -> Self
    where
        C: Send + Sync + 'a,
        E: FnOnce(&C) -> ResolveError,
        P: Fn(&C, &T) -> bool + Send + Sync + 'a,
    {
        match criterion {
            Some(value) => {
                let error = on_empty(&value);
                Self::new(name, Strictness::Strict, error, move |candidate| {
                    predicate(&value, candidate)
                })
            }
            None => Self {
                name,
                criterion: None,
                strictness: Strictness::Lenient,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// True when the criterion was omitted and the stage can never filter.
    pub fn is_inapplicable(&self) -> bool {
        self.criterion.is_none()
    }

    /// Apply this stage to a candidate set.
    ///
    /// - non-empty match: the matching subset, in original order
    /// - empty match, strict: [`Rejected`] with the pre-filter set
    /// - empty match, lenient: the pre-filter set unchanged
    pub fn apply(&self, candidates: Vec<T>) -> Result<Vec<T>, Rejected<T>> {
        let Some(criterion) = &self.criterion else {
            return Ok(candidates);
        };

        let (kept, dropped): (Vec<T>, Vec<T>) = candidates
            .into_iter()
            .partition(|c| (criterion.predicate)(c));
        if !kept.is_empty() {
            return Ok(kept);
        }

        // Nothing matched, so `dropped` is the whole input in its original order.
        match self.strictness {
            Strictness::Strict => Err(Rejected {
                stage: self.name,
                candidates: dropped,
                error: criterion.on_empty.clone(),
            }),
            Strictness::Lenient => {
                tracing::debug!(stage = self.name, "Lenient filter matched nothing, ignoring it");
                Ok(dropped)
            }
        }
    }
}

/// An ordered table of filter stages.
///
/// Stage order is data: the first stage to reject wins and later stages do
/// not run.
pub struct FilterPipeline<'a, T> {
    label: &'static str,
    stages: Vec<FilterStage<'a, T>>,
}

impl<'a, T> FilterPipeline<'a, T> {
    pub fn new(label: &'static str, stages: Vec<FilterStage<'a, T>>) -> Self {
        Self { label, stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(FilterStage::name).collect()
    }

    /// Run every stage in order, failing fast on the first rejection.
    pub fn run(&self, mut candidates: Vec<T>) -> Result<Vec<T>, ResolveError> {
        let started = Instant::now();

        for stage in &self.stages {
            let before = candidates.len();
            candidates = match stage.apply(candidates) {
                Ok(narrowed) => narrowed,
                Err(rejected) => {
                    metrics::counter!(
                        "fabric_filter_stage_rejections_total",
                        "stage" => rejected.stage,
                    )
                    .increment(1);
                    tracing::debug!(
                        pipeline = self.label,
                        stage = rejected.stage,
                        candidates = rejected.candidates.len(),
                        error = %rejected.error,
                        "Filter stage rejected candidate set"
                    );
                    return Err(rejected.into_error());
                }
            };

            tracing::trace!(
                pipeline = self.label,
                stage = stage.name(),
                before,
                after = candidates.len(),
                "Filter stage completed"
            );
        }

        tracing::trace!(
            pipeline = self.label,
            elapsed_us = started.elapsed().as_micros() as u64,
            remaining = candidates.len(),
            "Filter pipeline completed"
        );

        Ok(candidates)
    }
}
