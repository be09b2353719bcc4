//! Console interaction with the human operator.
//!
//! Prints each prompt before it is sent, previews every cleaned batch as a
//! comma-joined line and asks `resample? (y/n)`. Only an answer of exactly
//! `y` resamples; anything else accepts the batch.

use crate::error::Result;
use crate::providers::{Decision, Operator};
use std::io::{self, BufRead, Write};
use tracing::info;

/// Operator backed by stdin/stdout.
///
/// # Example
///
/// ```no_run
/// use cogbias::operator_ui::ConsoleOperator;
/// use cogbias::providers::Operator;
///
/// let mut operator = ConsoleOperator::new(false);
/// let _decision = operator.review(&["Linda".to_string(), "Sarah".to_string()])?;
/// # Ok::<(), cogbias::error::BlockError>(())
/// ```
pub struct ConsoleOperator {
    verbose: bool,
}

impl ConsoleOperator {
    /// Creates a console operator.
    ///
    /// # Arguments
    ///
    /// * `verbose` - If true, also prints the batch size with each preview
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    // =========================================================================
    // Core methods with I/O injection (testable)
    // =========================================================================

    /// Echoes the prompt that is about to be sent.
    pub fn show_prompt_with_io<W: Write>(&self, prompt: &str, output: &mut W) -> Result<()> {
        writeln!(output, "{}", prompt)?;
        output.flush()?;
        Ok(())
    }

    /// Prints a progress message.
    pub fn announce_with_io<W: Write>(&self, message: &str, output: &mut W) -> Result<()> {
        writeln!(output, "{}", message)?;
        Ok(())
    }

    /// Previews a batch and reads the operator's decision.
    ///
    /// # Arguments
    ///
    /// * `candidates` - Cleaned candidates of the current batch
    /// * `input` - Reader to get the answer from (e.g., stdin or mock)
    /// * `output` - Writer for the preview and question
    ///
    /// # Errors
    ///
    /// Returns an error if I/O operations fail. End of input counts as an
    /// answer other than `y`, so the batch is accepted.
    pub fn review_with_io<R: BufRead, W: Write>(
        &self,
        candidates: &[String],
        input: &mut R,
        output: &mut W,
    ) -> Result<Decision> {
        writeln!(output, "{}", candidates.join(", "))?;
        if self.verbose {
            writeln!(output, "({} candidates)", candidates.len())?;
        }
        write!(output, "resample? (y/n) ")?;
        output.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let answer = line.trim_end_matches(['\n', '\r']);

        let decision = if answer == "y" {
            Decision::Resample
        } else {
            Decision::Accept
        };
        info!("Operator answered {:?} for a batch of {}", decision, candidates.len());
        Ok(decision)
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new(false)
    }
}

// =========================================================================
// Convenience implementation using standard I/O
// =========================================================================

impl Operator for ConsoleOperator {
    fn show_prompt(&mut self, prompt: &str) -> Result<()> {
        self.show_prompt_with_io(prompt, &mut io::stdout())
    }

    fn announce(&mut self, message: &str) -> Result<()> {
        self.announce_with_io(message, &mut io::stdout())
    }

    fn review(&mut self, candidates: &[String]) -> Result<Decision> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.review_with_io(candidates, &mut input, &mut output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn batch(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_y_requests_resample() {
        let operator = ConsoleOperator::new(false);
        let mut input = Cursor::new(b"y\n");
        let mut output = Vec::new();

        let decision = operator
            .review_with_io(&batch(&["Linda", "Sarah"]), &mut input, &mut output)
            .unwrap();

        assert_eq!(decision, Decision::Resample);
    }

    #[test]
    fn test_n_accepts() {
        let operator = ConsoleOperator::new(false);
        let mut input = Cursor::new(b"n\n");
        let mut output = Vec::new();

        let decision = operator
            .review_with_io(&batch(&["Linda"]), &mut input, &mut output)
            .unwrap();

        assert_eq!(decision, Decision::Accept);
    }

    #[test]
    fn test_anything_but_exact_y_accepts() {
        let operator = ConsoleOperator::new(false);

        let answers: [&[u8]; 5] = [b"yes\n", b"Y\n", b" y\n", b"\n", b""];
        for answer in answers {
            let mut input = Cursor::new(answer);
            let mut output = Vec::new();
            let decision = operator
                .review_with_io(&batch(&["Linda"]), &mut input, &mut output)
                .unwrap();
            assert_eq!(decision, Decision::Accept, "answer {:?}", answer);
        }
    }

    #[test]
    fn test_windows_line_ending_still_resamples() {
        let operator = ConsoleOperator::new(false);
        let mut input = Cursor::new(b"y\r\n");
        let mut output = Vec::new();

        let decision = operator
            .review_with_io(&batch(&["Linda"]), &mut input, &mut output)
            .unwrap();

        assert_eq!(decision, Decision::Resample);
    }

    #[test]
    fn test_preview_is_comma_joined_and_asks_question() {
        let operator = ConsoleOperator::new(false);
        let mut input = Cursor::new(b"n\n");
        let mut output = Vec::new();

        operator
            .review_with_io(&batch(&["Sarah", "James", "Emily"]), &mut input, &mut output)
            .unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("Sarah, James, Emily\n"));
        assert!(output_str.ends_with("resample? (y/n) "));
    }

    #[test]
    fn test_verbose_preview_shows_count() {
        let operator = ConsoleOperator::new(true);
        let mut input = Cursor::new(b"n\n");
        let mut output = Vec::new();

        operator
            .review_with_io(&batch(&["Sarah", "James"]), &mut input, &mut output)
            .unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("(2 candidates)"));
    }

    #[test]
    fn test_empty_batch_preview() {
        let operator = ConsoleOperator::new(false);
        let mut input = Cursor::new(b"n\n");
        let mut output = Vec::new();

        let decision = operator.review_with_io(&[], &mut input, &mut output).unwrap();

        assert_eq!(decision, Decision::Accept);
        assert_eq!(String::from_utf8(output).unwrap(), "\nresample? (y/n) ");
    }

    #[test]
    fn test_show_prompt_echoes_verbatim() {
        let operator = ConsoleOperator::new(false);
        let mut output = Vec::new();

        operator
            .show_prompt_with_io("Here is a list:\n1. Banker\n2. Teacher\n3. ", &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Here is a list:\n1. Banker\n2. Teacher\n3. \n"
        );
    }
}
