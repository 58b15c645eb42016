//! Content provider seam
//!
//! The engine never touches a file system or network; collaborators resolve
//! category-tagged text blocks and hand them over through this trait.

use crate::budget::{Category, ContentItem};
use crate::error::Result;
use async_trait::async_trait;

/// Supplies category-tagged content on demand.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Resolve all candidate items for one category, in the order the
    /// provider considers most useful. May legitimately return an empty list.
    async fn load(&self, category: Category) -> Result<Vec<ContentItem>>;
}

/// In-memory provider for tests and embedded use.
#[derive(Debug, Default, Clone)]
pub struct StaticProvider {
    items: Vec<ContentItem>,
}

impl StaticProvider {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn with_item(
        mut self,
        category: Category,
        source_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.items.push(ContentItem::new(category, source_id, content));
        self
    }
}

#[async_trait]
impl ContentProvider for StaticProvider {
    async fn load(&self, category: Category) -> Result<Vec<ContentItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }
}

/// Map a file extension to the category its content belongs to.
///
/// Each extension maps to exactly one category; unknown extensions are the
/// caller's problem (typically skipped).
pub fn category_for_extension(extension: &str) -> Option<Category> {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "rules" | "txt" => Some(Category::Instructions),
        "md" | "mdx" | "markdown" => Some(Category::Docs),
        "agent" | "guide" => Some(Category::AgentGuidance),
        _ => None,
    }
}
