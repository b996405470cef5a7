//! Heuristic for "the assistant had nothing to say" answers.

/// Answers at or above this many characters are never treated as refusals.
pub const REFUSAL_MAX_CHARS: usize = 200;

pub const REFUSAL_PHRASES: &[&str] = &[
    "i don't know",
    "i do not know",
    "i'm not sure",
    "i am not sure",
    "i couldn't find",
    "i could not find",
    "i can't find",
    "i cannot find",
    "i don't have information",
    "i do not have information",
    "unable to find",
    "no relevant information",
    "not able to answer",
];

/// A short answer that contains a refusal phrase.
pub fn is_refusal(answer: &str) -> bool {
    let trimmed = answer.trim();
    if trimmed.chars().count() >= REFUSAL_MAX_CHARS {
        return false;
    }
    // curly apostrophes are common in model output
    let normalized = trimmed.to_lowercase().replace('\u{2019}', "'");
    REFUSAL_PHRASES.iter().any(|p| normalized.contains(p))
}
