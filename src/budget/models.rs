//! Data models for budget allocation and content selection

use serde::{Deserialize, Serialize};

/// A named bucket of content competing for budget.
///
/// The category set is fixed: three selectable content categories plus a
/// `Reserved` share that is held back for the eventual response and never
/// receives content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Instructions,
    Docs,
    AgentGuidance,
    Reserved,
}

impl Category {
    /// Selectable content categories in default priority order.
    pub const CONTENT: [Category; 3] =
        [Category::Instructions, Category::Docs, Category::AgentGuidance];

    /// All categories including the reserved share.
    pub const ALL: [Category; 4] = [
        Category::Instructions,
        Category::Docs,
        Category::AgentGuidance,
        Category::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Instructions => "instructions",
            Category::Docs => "docs",
            Category::AgentGuidance => "agent_guidance",
            Category::Reserved => "reserved",
        }
    }
}

/// An opaque text payload tagged with its category and origin.
///
/// Created by content providers and consumed read-only by the engine;
/// truncation derives new text, the original item is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub category: Category,
    pub source_id: String,
    pub content: String,
}

impl ContentItem {
    pub fn new(category: Category, source_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category,
            source_id: source_id.into(),
            content: content.into(),
        }
    }

    /// Payload length in chars (the unit all budgets are enforced in).
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Per-task priority ordering over the content categories.
///
/// `ordered[0]` holds rank 1. Ranks are contiguous and tie-free by
/// construction: every category receives exactly one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityAssignment {
    /// Content categories from rank 1 (most important) downward.
    pub ordered: Vec<Category>,
    /// Names of the keyword rules that matched, in evaluation order.
    /// Diagnostic only; when several rules match, the last one decided the
    /// ordering.
    pub matched_rules: Vec<String>,
}

impl PriorityAssignment {
    /// 1-based rank of a content category. `Reserved` has no rank.
    pub fn rank_of(&self, category: Category) -> Option<usize> {
        self.ordered.iter().position(|&c| c == category).map(|i| i + 1)
    }
}

/// One selected (possibly truncated) item, shaped for router responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedContent {
    pub category: Category,
    pub source_id: String,
    pub content: String,
    pub truncated: bool,
    /// Original payload length in chars.
    pub original_length: usize,
    /// Chars of budget this item consumed (its allowance, which can exceed
    /// the retained length when the cut backed off to a clean boundary).
    pub used_length: usize,
    pub estimated_tokens: usize,
}

/// Outcome of a selection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResult {
    pub items: Vec<SelectedContent>,
    pub total_chars_used: usize,
    pub chars_remaining: usize,
    pub items_selected: usize,
}

impl SelectionResult {
    /// An empty but valid result for a given starting budget.
    pub fn empty(budget_chars: usize) -> Self {
        Self {
            items: Vec::new(),
            total_chars_used: 0,
            chars_remaining: budget_chars,
            items_selected: 0,
        }
    }
}

/// Aggregate summary attached to an assembled bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSummary {
    pub files_loaded: usize,
    pub total_chars_used: usize,
    pub total_tokens_used: usize,
    pub remaining_budget: usize,
}
