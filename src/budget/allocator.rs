//! Budget allocation across content categories
//!
//! Turns a validated [`BudgetConfig`] into an absolute token budget per
//! category. Percentage weights are normalized to sum to 100 before any
//! budget is computed, so configuration drift (a category added without
//! adjusting the others) degrades gracefully instead of over-committing the
//! total.

use crate::budget::models::Category;
use crate::config::BudgetConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Weight-sum drift tolerated without rescaling, in percentage points.
const NORMALIZATION_TOLERANCE: f64 = 1.0;

/// Budget configuration errors, raised once at allocator construction.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("total budget must not be negative, got {total}")]
    NegativeTotal { total: i64 },

    #[error("weight for {category} must be within 0-100, got {weight}")]
    WeightOutOfRange { category: &'static str, weight: f64 },
}

/// Point-in-time snapshot of absolute token budgets per category.
///
/// The reserved share is part of the snapshot but excluded from content
/// selection. Sum of all fields never exceeds the total (floor rounding
/// drops fractional tokens, it never adds them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub instructions: usize,
    pub docs: usize,
    pub agent_guidance: usize,
    pub reserved: usize,
    pub total: usize,
}

impl Allocation {
    /// Token budget for one category.
    pub fn budget_for(&self, category: Category) -> usize {
        match category {
            Category::Instructions => self.instructions,
            Category::Docs => self.docs,
            Category::AgentGuidance => self.agent_guidance,
            Category::Reserved => self.reserved,
        }
    }

    /// The portion available to content selection, `total - reserved`.
    pub fn non_reserved(&self) -> usize {
        self.total.saturating_sub(self.reserved)
    }

    /// Sum of the per-category budgets (at most `total`).
    pub fn allocated(&self) -> usize {
        self.instructions + self.docs + self.agent_guidance + self.reserved
    }
}

/// Computes and memoizes the per-category allocation for one configuration.
#[derive(Debug)]
pub struct BudgetAllocator {
    config: BudgetConfig,
    allocation: Allocation,
}

impl BudgetAllocator {
    /// Validate the configuration and compute the allocation snapshot.
    ///
    /// Weight normalization is a defined behavior, not an error recovery:
    /// when the raw weights drift more than one percentage point from 100,
    /// every weight is rescaled by `100/sum` and a diagnostic is logged.
    pub fn new(config: BudgetConfig) -> Result<Self, BudgetError> {
        config.validate()?;

        let total = config.total_tokens as usize;
        let raw_sum: f64 = Category::ALL.iter().map(|&c| config.weight_for(c)).sum();

        let scale = if (raw_sum - 100.0).abs() > NORMALIZATION_TOLERANCE {
            if raw_sum <= f64::EPSILON {
                warn!("all category weights are zero; every budget collapses to 0");
                0.0
            } else {
                warn!(
                    raw_sum,
                    "category weights do not sum to 100, normalizing by {:.4}",
                    100.0 / raw_sum
                );
                100.0 / raw_sum
            }
        } else {
            1.0
        };

        let budget = |category: Category| -> usize {
            let weight = config.weight_for(category) * scale;
            ((total as f64) * weight / 100.0).floor() as usize
        };

        let allocation = Allocation {
            instructions: budget(Category::Instructions),
            docs: budget(Category::Docs),
            agent_guidance: budget(Category::AgentGuidance),
            reserved: budget(Category::Reserved),
            total,
        };

        debug!(
            total,
            instructions = allocation.instructions,
            docs = allocation.docs,
            agent_guidance = allocation.agent_guidance,
            reserved = allocation.reserved,
            "allocation computed"
        );

        Ok(Self { config, allocation })
    }

    /// The memoized allocation snapshot.
    pub fn allocation(&self) -> Allocation {
        self.allocation.clone()
    }

    /// Token budget for one category.
    pub fn budget_for(&self, category: Category) -> usize {
        self.allocation.budget_for(category)
    }

    /// Unspent budget for a category after `used` tokens. Clamps at zero.
    pub fn remaining(&self, used: usize, category: Category) -> usize {
        self.allocation.budget_for(category).saturating_sub(used)
    }

    /// The configuration this allocator was built from.
    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }
}
