//! Central error type for the engine

use crate::budget::BudgetError;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
///
/// Only genuinely broken inputs surface here. Empty selections, exhausted
/// budgets, and categories with no content are ordinary results with explicit
/// fields, not errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] BudgetError),

    #[error("failed to load configuration: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("content provider error: {0}")]
    Provider(String),
}
