//! Request pipeline: rank, reallocate, load, select
//!
//! The assembler is the router-facing composition of the engine: it turns a
//! task description (plus an optional per-request budget override) into a
//! serializable content bundle, pulling candidate text through the provider
//! seam with cache read-through along the way.

use crate::assemble::cache::ContentCache;
use crate::assemble::provider::ContentProvider;
use crate::budget::estimator::char_limit_for;
use crate::budget::{
    Allocation, BudgetAllocator, BundleSummary, Category, ContentItem, ContentSelector,
    PriorityAssignment, PriorityRanker, SelectedContent,
};
use crate::config::BudgetConfig;
use crate::error::Result;
use crate::metrics::METRICS;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything a router forwards downstream: the surviving content plus the
/// facts needed for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextBundle {
    pub items: Vec<SelectedContent>,
    pub summary: BundleSummary,
    pub assignment: PriorityAssignment,
    /// The request-scoped allocation the selection ran under (tokens).
    pub allocation: Allocation,
}

/// Composes allocator, ranker, selector, provider, and cache into the
/// per-request assembly pipeline.
pub struct ContextAssembler {
    config: BudgetConfig,
    ranker: PriorityRanker,
    selector: ContentSelector,
    provider: Arc<dyn ContentProvider>,
    cache: ContentCache,
}

impl ContextAssembler {
    /// Create an assembler. The configuration is validated once, up front;
    /// a malformed budget is fatal here, not at request time.
    pub fn new(config: BudgetConfig, provider: Arc<dyn ContentProvider>) -> Result<Self> {
        BudgetAllocator::new(config.clone())?;
        Ok(Self {
            config,
            ranker: PriorityRanker::new(),
            selector: ContentSelector::new(),
            provider,
            cache: ContentCache::new(),
        })
    }

    /// Assemble the highest-priority, budget-compliant content bundle for a
    /// task description.
    ///
    /// `budget_override` replaces the configured total for this request only.
    /// An empty bundle is a legitimate outcome (zero budget, no content),
    /// not an error.
    pub async fn assemble(
        &self,
        task_description: &str,
        budget_override: Option<usize>,
    ) -> Result<ContextBundle> {
        let config = match budget_override {
            Some(total) => self.config.with_total(total),
            None => self.config.clone(),
        };
        let allocator = BudgetAllocator::new(config)?;
        let allocation = allocator.allocation();

        let assignment = self.ranker.rank(task_description);
        let reallocated = self.ranker.reallocate(task_description, &allocation);

        // Char budgets in rank order; the selector treats their sum as the
        // hard aggregate ceiling.
        let mut char_budgets: IndexMap<Category, usize> = IndexMap::new();
        for &category in &assignment.ordered {
            char_budgets.insert(category, char_limit_for(reallocated.budget_for(category)));
        }

        // Hits and misses are counted locally so concurrent requests on the
        // same assembler cannot leak into each other's bundle metrics.
        let mut cache_hits = 0u64;
        let mut cache_misses = 0u64;
        let mut items: Vec<ContentItem> = Vec::new();
        for &category in &assignment.ordered {
            let loaded = self.provider.load(category).await?;
            debug!(
                category = category.as_str(),
                count = loaded.len(),
                "loaded candidate content"
            );
            for item in loaded {
                let key = format!("{}:{}", category.as_str(), item.source_id);
                let content = match self.cache.get(&key) {
                    Some(cached) => {
                        cache_hits += 1;
                        cached
                    }
                    None => {
                        cache_misses += 1;
                        self.cache.store(key, item.content.clone());
                        item.content.clone()
                    }
                };
                items.push(ContentItem::new(category, item.source_id, content));
            }
        }

        let result = self.selector.select(&items, &char_budgets);

        let total_tokens_used: usize = result.items.iter().map(|i| i.estimated_tokens).sum();
        let summary = BundleSummary {
            files_loaded: result.items_selected,
            total_chars_used: result.total_chars_used,
            total_tokens_used,
            remaining_budget: result.chars_remaining,
        };

        METRICS.record_selection(&result);
        METRICS.record_cache_delta(cache_hits, cache_misses);

        info!(
            files_loaded = summary.files_loaded,
            total_chars_used = summary.total_chars_used,
            remaining_budget = summary.remaining_budget,
            matched_rules = ?assignment.matched_rules,
            "assembled context bundle"
        );

        Ok(ContextBundle {
            items: result.items,
            summary,
            assignment,
            allocation: reallocated,
        })
    }

    /// The shared content cache, for pre-population and clearing.
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// The static configuration (unaffected by per-request overrides).
    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::provider::StaticProvider;

    fn provider() -> Arc<StaticProvider> {
        Arc::new(
            StaticProvider::default()
                .with_item(Category::Instructions, "deploy.rules", "Always run checks first.")
                .with_item(Category::Docs, "readme", "Project overview. Second sentence.")
                .with_item(Category::AgentGuidance, "reviewer.guide", "Prefer small diffs."),
        )
    }

    #[tokio::test]
    async fn test_assemble_orders_items_by_rank() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();
        let bundle = assembler.assemble("add an api endpoint", None).await.unwrap();

        assert_eq!(bundle.assignment.rank_of(Category::AgentGuidance), Some(1));
        assert_eq!(bundle.items[0].category, Category::AgentGuidance);
        assert_eq!(bundle.summary.files_loaded, 3);
        assert_eq!(
            bundle.summary.total_chars_used,
            bundle.items.iter().map(|i| i.used_length).sum::<usize>()
        );
    }

    #[tokio::test]
    async fn test_assemble_zero_budget_yields_empty_bundle() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();
        let bundle = assembler.assemble("anything", Some(0)).await.unwrap();
        assert!(bundle.items.is_empty());
        assert_eq!(bundle.summary.files_loaded, 0);
        assert_eq!(bundle.summary.total_chars_used, 0);
    }

    #[tokio::test]
    async fn test_assemble_override_is_request_scoped() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();
        assembler.assemble("anything", Some(16)).await.unwrap();
        // The static configuration is untouched by the override.
        assert_eq!(assembler.config().total_tokens, 8000);
    }

    #[tokio::test]
    async fn test_assemble_reads_through_cache() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();
        assembler
            .cache()
            .store("docs:readme", "Cached replacement text.");

        let bundle = assembler.assemble("plain task", None).await.unwrap();
        let readme = bundle
            .items
            .iter()
            .find(|i| i.source_id == "readme")
            .unwrap();
        assert_eq!(readme.content, "Cached replacement text.");
    }

    #[tokio::test]
    async fn test_cache_counting_per_request() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();

        // First request misses every source, second hits every source; the
        // per-request counts the bundle metrics record follow the same
        // lookups the cache itself observes.
        assembler.assemble("plain task", None).await.unwrap();
        let first = assembler.cache().stats();
        assert_eq!(first.misses, 3);
        assert_eq!(first.hits, 0);

        assembler.assemble("plain task", None).await.unwrap();
        let second = assembler.cache().stats();
        assert_eq!(second.misses, 3);
        assert_eq!(second.hits, 3);
    }

    #[tokio::test]
    async fn test_invalid_config_fatal_at_construction() {
        let config = BudgetConfig {
            total_tokens: -5,
            ..Default::default()
        };
        assert!(ContextAssembler::new(config, provider()).is_err());
    }

    #[tokio::test]
    async fn test_bundle_serializes_to_json() {
        let assembler = ContextAssembler::new(BudgetConfig::default(), provider()).unwrap();
        let bundle = assembler.assemble("security fix", None).await.unwrap();
        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json["summary"]["total_chars_used"].is_number());
        assert_eq!(json["items"][0]["category"], "instructions");
    }
}
