//! Category-specific prompts and candidate cleaning.
//!
//! `names` and `occupations` continue a numbered list seeded with two
//! examples; every kept line must start with a list number. `hobbies` and
//! `descriptions` are generated one prompt per upstream item and accept any
//! line, relying on the length threshold to drop blanks.

use crate::completion::CompletionResponse;
use crate::error::Result;
use crate::sampler::GenerationRequest;

/// A line that starts a numbered list entry, e.g. `4. Sarah`.
pub const NUMBERED_ITEM_PATTERN: &str = r"^[-+]?[0-9]+\.";
pub const ANY_LINE_PATTERN: &str = r".*";

pub const DESCRIPTION_MAX_TOKENS: u32 = 150;

const NAMES_PROMPT: &str = "Here is a list of popular Western names:\n1. Linda\n2. Daniel\n3. ";
const OCCUPATIONS_PROMPT: &str =
    "Here is a list of common occupations:\n1. Banker\n2. Teacher\n3. ";

pub fn hobby_prompt(occupation: &str) -> String {
    format!(
        "Here is a list of unlikely pairing of jobs and hobbies:\n\
         1. a bank teller but active in the feminist movement\n\
         2. a {} but",
        occupation
    )
}

pub fn description_prompt(hobby: &str) -> String {
    format!(
        "Here is a list of descriptions of people with certain hobbies:\n\
         1. Someone who is active in the feminist movement might be 31 years old, single, \
         outspoken, and very bright. They majored in philosophy. As a student, they were deeply \
         concerned with issues of discrimination and social justice, and also participated in \
         anti-nuclear demonstrations.\n\
         2. Someone who {} might be",
        hobby
    )
}

// =============================================================================
// Splitting and cleaning
// =============================================================================

/// Splits the first completion choice into lines.
pub fn split_lines(response: &CompletionResponse) -> Vec<String> {
    response
        .first_text()
        .map(|text| text.split('\n').map(str::to_string).collect())
        .unwrap_or_default()
}

fn drop_first_char(s: &str) -> String {
    s.chars().skip(1).collect()
}

/// Text between the first and second `.`, minus the space after the number.
///
/// `"3. Mary"` becomes `"Mary"`; `"1. Dr. Smith"` becomes `"Dr"`.
pub fn strip_list_number(raw: &str) -> String {
    raw.split('.').nth(1).map(drop_first_char).unwrap_or_default()
}

pub fn clean_occupation(raw: &str) -> String {
    strip_list_number(raw).to_lowercase()
}

/// Drops the leading space left after the prompt's trailing `but`.
pub fn clean_hobby(raw: &str) -> String {
    drop_first_char(raw).to_lowercase()
}

pub fn clean_description(raw: &str) -> String {
    drop_first_char(raw)
}

// =============================================================================
// Requests
// =============================================================================

pub fn names_request(max_tokens: u32) -> Result<GenerationRequest> {
    let request = GenerationRequest::new(
        NAMES_PROMPT,
        split_lines,
        strip_list_number,
        NUMBERED_ITEM_PATTERN,
    )?;
    Ok(request.with_max_tokens(max_tokens))
}

pub fn occupations_request(max_tokens: u32) -> Result<GenerationRequest> {
    let request = GenerationRequest::new(
        OCCUPATIONS_PROMPT,
        split_lines,
        clean_occupation,
        NUMBERED_ITEM_PATTERN,
    )?;
    Ok(request.with_max_tokens(max_tokens))
}

pub fn hobby_request(occupation: &str, max_tokens: u32) -> Result<GenerationRequest> {
    let request = GenerationRequest::new(
        hobby_prompt(occupation),
        split_lines,
        clean_hobby,
        ANY_LINE_PATTERN,
    )?;
    Ok(request.with_max_tokens(max_tokens))
}

/// Descriptions are paragraphs and always get [`DESCRIPTION_MAX_TOKENS`].
pub fn description_request(hobby: &str) -> Result<GenerationRequest> {
    let request = GenerationRequest::new(
        description_prompt(hobby),
        split_lines,
        clean_description,
        ANY_LINE_PATTERN,
    )?;
    Ok(request.with_max_tokens(DESCRIPTION_MAX_TOKENS))
}
