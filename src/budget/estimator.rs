//! Approximate token estimation using a fixed chars-per-token ratio
//!
//! The engine deliberately does not tokenize: 4 chars ≈ 1 token is close
//! enough for budgeting, and `estimate_tokens` rounds up so a computed budget
//! is never silently over-spent by under-counting.

/// Approximate characters per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a text. Ceiling division; empty text is 0.
///
/// Counts Unicode scalar values, not bytes, so multi-byte text does not
/// inflate the estimate.
pub fn estimate_tokens(text: &str) -> usize {
    let chars = text.chars().count();
    (chars + CHARS_PER_TOKEN - 1) / CHARS_PER_TOKEN
}

/// Exact inverse of the ratio: the char window a token budget buys.
pub fn char_limit_for(tokens: usize) -> usize {
    tokens * CHARS_PER_TOKEN
}
