//! Context budget allocation, prioritization, and truncation engine.
//!
//! Splits a fixed token budget across competing content categories
//! (instructions, reference docs, agent guidance, plus a reserved share held
//! back for the eventual response), re-weights it per task description, and
//! selects/truncates candidate content to fit. The engine never performs I/O:
//! content arrives as already-resolved strings from a [`ContentProvider`]
//! collaborator and decisions come back as serializable records.
//!
//! Data flows one way: total budget -> per-category budgets
//! ([`BudgetAllocator`], optionally re-weighted by [`PriorityRanker`]) ->
//! per-item truncation decisions ([`ContentSelector`]), with token/char
//! conversion from [`estimator`](budget::estimator) used throughout.

pub mod assemble;
pub mod budget;
pub mod config;
pub mod error;
pub mod metrics;

pub use assemble::{
    category_for_extension, ContentCache, ContentProvider, ContextAssembler, ContextBundle,
    StaticProvider,
};
pub use budget::{
    Allocation, BudgetAllocator, BudgetError, BundleSummary, Category, ContentItem,
    ContentSelector, PriorityAssignment, PriorityRanker, SelectedContent, SelectionResult,
    TruncationOutcome, TRUNCATION_MARKER,
};
pub use config::{BudgetConfig, Config};
pub use error::{EngineError, Result};
