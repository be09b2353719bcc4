//! Rejection sampling of candidate lists.
//!
//! A [`GenerationRequest`] bundles everything needed to turn one prompt into a
//! list of cleaned strings. [`sample_until_accepted`] sends the prompt, splits
//! the reply into raw candidates, keeps the ones that pass the validity
//! pattern and the length threshold, and shows the cleaned batch to the
//! operator. A rejected batch is thrown away whole and the identical prompt is
//! sent again; there is no retry limit.

use crate::completion::{CompletionBackend, CompletionResponse};
use crate::error::Result;
use crate::providers::{Decision, Operator};
use regex::Regex;
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_MIN_LENGTH: usize = 4;
pub const DEFAULT_MAX_TOKENS: u32 = 50;

/// Splits a backend reply into raw candidates.
pub type SplitFn = fn(&CompletionResponse) -> Vec<String>;
/// Cleans one raw candidate that passed the validity pattern.
pub type CleanFn = fn(&str) -> String;

/// One prompt plus the rules for turning its completions into candidates.
#[derive(Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub split: SplitFn,
    pub clean: CleanFn,
    /// Matched against the raw candidate, anchored at its start.
    pub validity_pattern: Regex,
    /// Minimum length in characters of the cleaned candidate.
    pub min_length: usize,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Creates a request with the default length threshold and token budget.
    ///
    /// The pattern only has to match at the beginning of a raw candidate, the
    /// way a list-number prefix does.
    pub fn new(
        prompt: impl Into<String>,
        split: SplitFn,
        clean: CleanFn,
        pattern: &str,
    ) -> Result<Self> {
        Ok(Self {
            prompt: prompt.into(),
            split,
            clean,
            validity_pattern: Regex::new(&format!("^(?:{})", pattern))?,
            min_length: DEFAULT_MIN_LENGTH,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Applies the validity pattern, cleaning and length threshold to raw candidates.
    pub fn filter(&self, raw_candidates: &[String]) -> Vec<String> {
        filter_candidates(raw_candidates, &self.validity_pattern, self.min_length, self.clean)
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt", &self.prompt)
            .field("validity_pattern", &self.validity_pattern.as_str())
            .field("min_length", &self.min_length)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

/// Keeps the raw candidates matching `pattern` whose cleaned form has at
/// least `min_length` characters, returning the cleaned forms in order.
///
/// `clean` is only called on candidates that already matched.
pub fn filter_candidates(
    raw_candidates: &[String],
    pattern: &Regex,
    min_length: usize,
    clean: CleanFn,
) -> Vec<String> {
    raw_candidates
        .iter()
        .filter(|raw| pattern.is_match(raw))
        .map(|raw| clean(raw))
        .filter(|cleaned| cleaned.chars().count() >= min_length)
        .collect()
}

/// Runs the generate/review loop until the operator accepts a batch.
///
/// Backend and operator errors end the loop immediately; only an explicit
/// [`Decision::Resample`] triggers another round.
pub async fn sample_until_accepted(
    backend: &dyn CompletionBackend,
    operator: &mut dyn Operator,
    request: &GenerationRequest,
) -> Result<Vec<String>> {
    operator.show_prompt(&request.prompt)?;

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        debug!("Sampling attempt {} (max_tokens={})", attempt, request.max_tokens);

        let response = backend.complete(&request.prompt, false, request.max_tokens).await?;
        let raw_candidates = (request.split)(&response);
        let candidates = request.filter(&raw_candidates);
        debug!("Kept {} of {} raw candidates", candidates.len(), raw_candidates.len());

        match operator.review(&candidates)? {
            Decision::Accept => {
                info!("Batch of {} accepted after {} attempt(s)", candidates.len(), attempt);
                return Ok(candidates);
            }
            Decision::Resample => {
                info!("Batch rejected, resampling (attempt {})", attempt);
            }
        }
    }
}
