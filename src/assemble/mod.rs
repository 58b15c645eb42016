//! Collaborator seams around the core engine: providers, cache, assembly

pub mod assembler;
pub mod cache;
pub mod provider;

pub use assembler::{ContextAssembler, ContextBundle};
pub use cache::{CacheStats, ContentCache};
pub use provider::{category_for_extension, ContentProvider, StaticProvider};
