//! Content selection and boundary-aware truncation
//!
//! Selection walks items strictly in the caller's (priority) order against a
//! hard aggregate char ceiling; per-category figures are advisory targets
//! only. Truncation prefers to back off to a sentence terminator, line break,
//! or heading marker rather than cut mid-word, but never gives back more than
//! 30% of the allowance to find one.

use crate::budget::estimator::{estimate_tokens, CHARS_PER_TOKEN};
use crate::budget::models::{Category, ContentItem, SelectedContent, SelectionResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Marker appended to truncated content. Not counted against the budget.
pub const TRUNCATION_MARKER: &str = "\n\n[... truncated ...]";

/// Chars treated as safe cut points when searching backward from the limit.
const BOUNDARY_CHARS: [char; 3] = ['.', '\n', '#'];

/// Minimum share of the allowance a boundary cut must keep. Backing off
/// further than this loses more content than a mid-word cut is worth.
const BOUNDARY_FLOOR: f64 = 0.70;

/// Result of one truncation decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncationOutcome {
    /// Retained text, with [`TRUNCATION_MARKER`] appended when cut.
    pub content: String,
    pub was_truncated: bool,
    pub original_chars: usize,
    pub original_tokens: usize,
    /// Chars actually kept (marker excluded).
    pub retained_chars: usize,
    pub retained_tokens: usize,
    /// `retained / original * 100`, rounded. 100 when nothing was cut.
    pub retention_pct: u32,
}

/// Stateless selector over pre-prioritized content items.
#[derive(Debug, Default, Clone)]
pub struct ContentSelector;

impl ContentSelector {
    pub fn new() -> Self {
        Self
    }

    /// Cut `text` to at most `budget_chars` chars at a content-aware boundary.
    ///
    /// The candidate window is the first `budget_chars` chars. The rightmost
    /// sentence terminator, line break, or `#` within it becomes the cut
    /// point, provided it lies past 70% of the window; otherwise the raw hard
    /// cut wins. The marker suffix is added after the cut and does not count
    /// against the budget.
    pub fn truncate(&self, text: &str, budget_chars: usize) -> TruncationOutcome {
        let original_chars = text.chars().count();
        if original_chars <= budget_chars {
            return TruncationOutcome {
                content: text.to_string(),
                was_truncated: false,
                original_chars,
                original_tokens: estimate_tokens(text),
                retained_chars: original_chars,
                retained_tokens: estimate_tokens(text),
                retention_pct: 100,
            };
        }

        // Byte offset just past the budget_chars-th char.
        let window_end = text
            .char_indices()
            .nth(budget_chars)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(text.len());
        let candidate = &text[..window_end];

        // Rightmost boundary char within the candidate window.
        let mut boundary: Option<(usize, usize, char)> = None;
        for (char_idx, (byte_idx, ch)) in candidate.char_indices().enumerate() {
            if BOUNDARY_CHARS.contains(&ch) {
                boundary = Some((char_idx, byte_idx, ch));
            }
        }

        let floor = budget_chars as f64 * BOUNDARY_FLOOR;
        let (cut_bytes, retained_chars) = match boundary {
            Some((char_idx, byte_idx, ch)) if char_idx as f64 > floor => {
                (byte_idx + ch.len_utf8(), char_idx + 1)
            }
            _ => (candidate.len(), budget_chars),
        };

        let mut content = String::with_capacity(cut_bytes + TRUNCATION_MARKER.len());
        content.push_str(&text[..cut_bytes]);
        content.push_str(TRUNCATION_MARKER);

        let retention_pct =
            ((retained_chars as f64 / original_chars as f64) * 100.0).round() as u32;

        trace!(
            original_chars,
            budget_chars,
            retained_chars,
            retention_pct,
            "truncated content"
        );

        TruncationOutcome {
            content,
            was_truncated: true,
            original_chars,
            original_tokens: estimate_tokens(text),
            retained_chars,
            retained_tokens: (retained_chars + CHARS_PER_TOKEN - 1) / CHARS_PER_TOKEN,
            retention_pct,
        }
    }

    /// Select items in the given order under the aggregate char ceiling.
    ///
    /// The ceiling is the sum of the non-reserved per-category budgets.
    /// Processing stops the moment the remaining aggregate reaches zero,
    /// even if a later item's category has unspent per-category budget. An
    /// item that only partially fits is still included, truncated to fit,
    /// and its full allowance is charged even when boundary backoff kept
    /// fewer chars. Empty items are skipped without consuming budget.
    pub fn select(
        &self,
        items: &[ContentItem],
        char_budgets: &IndexMap<Category, usize>,
    ) -> SelectionResult {
        let aggregate: usize = char_budgets
            .iter()
            .filter(|(&category, _)| category != Category::Reserved)
            .map(|(_, &chars)| chars)
            .sum();

        let mut result = SelectionResult::empty(aggregate);
        let mut remaining = aggregate;

        for item in items {
            if remaining == 0 {
                debug!(
                    skipped = items.len() - result.items_selected,
                    "aggregate budget exhausted, stopping selection"
                );
                break;
            }

            let item_chars = item.char_count();
            if item_chars == 0 {
                continue;
            }

            let chars_to_use = item_chars.min(remaining);
            // Token figures count retained content only, never the marker.
            let (content, truncated, estimated_tokens) = if item_chars > chars_to_use {
                let outcome = self.truncate(&item.content, chars_to_use);
                (outcome.content, true, outcome.retained_tokens)
            } else {
                let tokens = estimate_tokens(&item.content);
                (item.content.clone(), false, tokens)
            };
            result.items.push(SelectedContent {
                category: item.category,
                source_id: item.source_id.clone(),
                content,
                truncated,
                original_length: item_chars,
                used_length: chars_to_use,
                estimated_tokens,
            });
            result.items_selected += 1;
            result.total_chars_used += chars_to_use;
            remaining -= chars_to_use;
        }

        result.chars_remaining = remaining;
        debug!(
            items_in = items.len(),
            items_selected = result.items_selected,
            total_chars_used = result.total_chars_used,
            chars_remaining = result.chars_remaining,
            "selection complete"
        );
        result
    }
}
