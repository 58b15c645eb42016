//! Task-driven priority ranking and budget reallocation
//!
//! Scans the task description for fixed keyword sets and turns the result
//! into a rank ordering over the content categories, then into a
//! front-loaded, request-scoped re-split of the non-reserved budget. Rules
//! are evaluated in declaration order and the last matching rule decides the
//! ordering; the full match trail is reported so callers can see when an
//! earlier match was overridden.

use crate::budget::allocator::Allocation;
use crate::budget::models::{Category, PriorityAssignment};
use tracing::debug;

/// Non-reserved budget share per rank position in percent, rank 1 first.
/// Integer percentages keep the floor arithmetic exact (1000 tokens split
/// 500/350/150, never 349 from float rounding).
const RANK_WEIGHT_PCTS: [usize; 3] = [50, 35, 15];

/// One keyword rule: any keyword hit moves the boosted category to rank 1.
struct KeywordRule {
    name: &'static str,
    keywords: &'static [&'static str],
    boosts: Category,
}

/// Rules in evaluation order. Order is load-bearing: when several rules
/// match the same description, the last one wins.
const RULES: [KeywordRule; 4] = [
    KeywordRule {
        name: "security",
        keywords: &["security", "auth"],
        boosts: Category::Instructions,
    },
    KeywordRule {
        name: "api",
        keywords: &["api", "endpoint"],
        boosts: Category::AgentGuidance,
    },
    KeywordRule {
        name: "performance",
        keywords: &["performance", "optimize"],
        boosts: Category::Docs,
    },
    KeywordRule {
        name: "architecture",
        keywords: &["architecture", "design"],
        boosts: Category::AgentGuidance,
    },
];

/// Assigns per-request priority orderings and reallocates budgets from them.
#[derive(Debug, Default, Clone)]
pub struct PriorityRanker;

impl PriorityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Rank the content categories for a task description.
    ///
    /// Default ordering is instructions > docs > agent guidance. The last
    /// matching rule moves its category to rank 1; the remaining categories
    /// keep their default relative order behind it. With no match the
    /// default ordering stands.
    pub fn rank(&self, task_description: &str) -> PriorityAssignment {
        let lowered = task_description.to_lowercase();

        let mut matched_rules = Vec::new();
        let mut winner: Option<Category> = None;
        for rule in &RULES {
            if rule.keywords.iter().any(|k| lowered.contains(k)) {
                matched_rules.push(rule.name.to_string());
                winner = Some(rule.boosts);
            }
        }

        let mut ordered = Category::CONTENT.to_vec();
        if let Some(boosted) = winner {
            ordered.retain(|&c| c != boosted);
            ordered.insert(0, boosted);
        }

        debug!(
            ?ordered,
            ?matched_rules,
            "ranked categories for task description"
        );

        PriorityAssignment {
            ordered,
            matched_rules,
        }
    }

    /// Redistribute the non-reserved budget according to the task ranking.
    ///
    /// Rank weights are fixed and front-loaded (50/35/15), applied to
    /// `total - reserved` with integer floor per category. The result is
    /// request-scoped; the input allocation is untouched and reusable.
    pub fn reallocate(&self, task_description: &str, allocation: &Allocation) -> Allocation {
        let assignment = self.rank(task_description);
        let remainder = allocation.non_reserved();

        let mut reallocated = Allocation {
            instructions: 0,
            docs: 0,
            agent_guidance: 0,
            reserved: allocation.reserved,
            total: allocation.total,
        };

        for (position, &category) in assignment.ordered.iter().enumerate() {
            let share = remainder * RANK_WEIGHT_PCTS[position] / 100;
            match category {
                Category::Instructions => reallocated.instructions = share,
                Category::Docs => reallocated.docs = share,
                Category::AgentGuidance => reallocated.agent_guidance = share,
                Category::Reserved => {}
            }
        }

        debug!(
            remainder,
            instructions = reallocated.instructions,
            docs = reallocated.docs,
            agent_guidance = reallocated.agent_guidance,
            "reallocated budget from ranking"
        );

        reallocated
    }
}
