//! Core budget engine: estimation, allocation, ranking, selection
//!
//! Every operation here is a deterministic, synchronous computation over its
//! inputs with no I/O and no shared mutable state, safe to call concurrently
//! from any number of callers.

pub mod allocator;
pub mod estimator;
pub mod models;
pub mod ranker;
pub mod selector;

pub use allocator::{Allocation, BudgetAllocator, BudgetError};
pub use models::{
    BundleSummary, Category, ContentItem, PriorityAssignment, SelectedContent, SelectionResult,
};
pub use ranker::PriorityRanker;
pub use selector::{ContentSelector, TruncationOutcome, TRUNCATION_MARKER};
