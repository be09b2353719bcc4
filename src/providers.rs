//! Capabilities the pipeline depends on but does not own.
//!
//! The rejection-sampling loop needs a human (or a script standing in for
//! one) to look at each batch and decide whether to keep it. That decision is
//! injected through [`Operator`], so the loop runs headlessly in tests with a
//! [`ScriptedOperator`] and interactively with
//! [`crate::operator_ui::ConsoleOperator`].

use crate::error::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// The operator's verdict on a batch of cleaned candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the whole batch.
    Accept,
    /// Discard the batch and re-issue the same prompt.
    Resample,
}

/// Human-in-the-loop capability used by the sampler and the pipeline.
pub trait Operator: Send {
    /// Shows the prompt about to be sent to the backend.
    fn show_prompt(&mut self, _prompt: &str) -> Result<()> {
        Ok(())
    }

    /// Progress message, e.g. a prerequisite being generated first.
    fn announce(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    /// Presents a cleaned batch and blocks until the operator decides.
    fn review(&mut self, candidates: &[String]) -> Result<Decision>;
}

/// Everything a [`ScriptedOperator`] was shown.
#[derive(Debug, Default, Clone)]
pub struct OperatorTranscript {
    pub prompts: Vec<String>,
    pub announcements: Vec<String>,
    pub reviewed: Vec<Vec<String>>,
}

/// Operator that replays a fixed sequence of decisions.
///
/// Once the script runs out every further batch is accepted. The transcript
/// handle stays readable after the operator has been moved into a pipeline.
pub struct ScriptedOperator {
    decisions: VecDeque<Decision>,
    transcript: Arc<Mutex<OperatorTranscript>>,
}

impl ScriptedOperator {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            transcript: Arc::new(Mutex::new(OperatorTranscript::default())),
        }
    }

    /// Accepts every batch.
    pub fn accepting() -> Self {
        Self::new([])
    }

    pub fn transcript(&self) -> Arc<Mutex<OperatorTranscript>> {
        Arc::clone(&self.transcript)
    }

    fn record(&self, f: impl FnOnce(&mut OperatorTranscript)) {
        if let Ok(mut transcript) = self.transcript.lock() {
            f(&mut transcript);
        }
    }
}

impl Operator for ScriptedOperator {
    fn show_prompt(&mut self, prompt: &str) -> Result<()> {
        self.record(|t| t.prompts.push(prompt.to_string()));
        Ok(())
    }

    fn announce(&mut self, message: &str) -> Result<()> {
        self.record(|t| t.announcements.push(message.to_string()));
        Ok(())
    }

    fn review(&mut self, candidates: &[String]) -> Result<Decision> {
        self.record(|t| t.reviewed.push(candidates.to_vec()));
        Ok(self.decisions.pop_front().unwrap_or(Decision::Accept))
    }
}
