//! Engine configuration
//!
//! One explicit structure with named, validated fields, checked once at
//! allocator construction. Loadable from an optional TOML file plus
//! `CONTEXT_BUDGET_*` environment overrides.

use crate::budget::{BudgetError, Category};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Budget configuration: a total token budget and a percentage weight per
/// category. Weights need not sum to exactly 100; the allocator normalizes
/// them (see [`crate::budget::BudgetAllocator`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Total budget in tokens. Zero is a valid, empty budget.
    #[serde(default = "default_total_tokens")]
    pub total_tokens: i64,

    /// Weight for operational instructions (percent)
    #[serde(default = "default_instructions_pct")]
    pub instructions_pct: f64,

    /// Weight for reference documentation (percent)
    #[serde(default = "default_docs_pct")]
    pub docs_pct: f64,

    /// Weight for specialist agent guidance (percent)
    #[serde(default = "default_agent_pct")]
    pub agent_pct: f64,

    /// Weight held back for the eventual response (percent)
    #[serde(default = "default_reserved_pct")]
    pub reserved_pct: f64,
}

fn default_total_tokens() -> i64 {
    8000
}

fn default_instructions_pct() -> f64 {
    35.0
}

fn default_docs_pct() -> f64 {
    25.0
}

fn default_agent_pct() -> f64 {
    20.0
}

fn default_reserved_pct() -> f64 {
    20.0
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            total_tokens: default_total_tokens(),
            instructions_pct: default_instructions_pct(),
            docs_pct: default_docs_pct(),
            agent_pct: default_agent_pct(),
            reserved_pct: default_reserved_pct(),
        }
    }
}

impl BudgetConfig {
    /// Raw (un-normalized) weight for one category.
    pub fn weight_for(&self, category: Category) -> f64 {
        match category {
            Category::Instructions => self.instructions_pct,
            Category::Docs => self.docs_pct,
            Category::AgentGuidance => self.agent_pct,
            Category::Reserved => self.reserved_pct,
        }
    }

    /// Check field bounds. Weight-sum drift is not an error; the allocator
    /// normalizes it as a defined behavior.
    pub fn validate(&self) -> std::result::Result<(), BudgetError> {
        if self.total_tokens < 0 {
            return Err(BudgetError::NegativeTotal {
                total: self.total_tokens,
            });
        }
        for category in Category::ALL {
            let weight = self.weight_for(category);
            if !(0.0..=100.0).contains(&weight) || !weight.is_finite() {
                return Err(BudgetError::WeightOutOfRange {
                    category: category.as_str(),
                    weight,
                });
            }
        }
        Ok(())
    }

    /// Copy of this configuration with a different total, for per-request
    /// budget overrides.
    pub fn with_total(&self, total_tokens: usize) -> Self {
        Self {
            total_tokens: total_tokens as i64,
            ..self.clone()
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub budget: BudgetConfig,
}

impl Config {
    /// Load from an optional TOML file, then `CONTEXT_BUDGET_*` environment
    /// variables (e.g. `CONTEXT_BUDGET_BUDGET__TOTAL_TOKENS=4000`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("CONTEXT_BUDGET").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
