//! Integration tests for the context budget engine
//!
//! These tests exercise the public API end to end: configuration through
//! allocation, task-driven reallocation, and content selection with
//! truncation, the way a request router would drive it.

use std::sync::Arc;

use context_budget::{
    BudgetAllocator, BudgetConfig, Category, ContentItem, ContentSelector, ContextAssembler,
    PriorityRanker, StaticProvider, TRUNCATION_MARKER,
};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

/// Route engine tracing through the test harness; `RUST_LOG` controls the
/// level. Safe to call from every test, only the first init takes effect.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn provider_with_sized_items(size: usize) -> Arc<StaticProvider> {
    Arc::new(
        StaticProvider::default()
            .with_item(Category::Instructions, "rules", "i".repeat(size))
            .with_item(Category::Docs, "docs", "d".repeat(size))
            .with_item(Category::AgentGuidance, "guide", "g".repeat(size)),
    )
}

#[test]
fn allocation_then_reallocation_keeps_total_and_reserved() {
    init_tracing();
    let allocator = BudgetAllocator::new(BudgetConfig::default()).unwrap();
    let allocation = allocator.allocation();
    let ranker = PriorityRanker::new();

    let reallocated = ranker.reallocate("implement security authentication", &allocation);

    assert_eq!(reallocated.total, allocation.total);
    assert_eq!(reallocated.reserved, allocation.reserved);
    assert!(reallocated.allocated() <= allocation.total);

    // 8000 total, 1600 reserved -> 6400 remainder split 50/35/15 with
    // instructions ranked first by the security rule.
    assert_eq!(reallocated.instructions, 3200);
    assert_eq!(reallocated.docs, 2240);
    assert_eq!(reallocated.agent_guidance, 960);
}

#[test]
fn selection_fills_budget_in_priority_order() {
    init_tracing();
    let ranker = PriorityRanker::new();
    let selector = ContentSelector::new();
    let assignment = ranker.rank("optimize performance of the cache");
    assert_eq!(assignment.rank_of(Category::Docs), Some(1));

    let items: Vec<ContentItem> = assignment
        .ordered
        .iter()
        .map(|&category| ContentItem::new(category, category.as_str(), "w".repeat(400)))
        .collect();

    let mut budgets: IndexMap<Category, usize> = IndexMap::new();
    budgets.insert(Category::Docs, 600);

    let result = selector.select(&items, &budgets);
    assert_eq!(result.items_selected, 2);
    assert_eq!(result.items[0].category, Category::Docs);
    assert!(!result.items[0].truncated);
    assert!(result.items[1].truncated);
    assert_eq!(result.total_chars_used, 600);
}

#[tokio::test]
async fn assembled_bundle_never_exceeds_selectable_budget() {
    init_tracing();
    let config = BudgetConfig {
        total_tokens: 100, // 80 non-reserved tokens = 320 selectable chars
        ..Default::default()
    };
    let assembler = ContextAssembler::new(config, provider_with_sized_items(500)).unwrap();

    let bundle = assembler.assemble("plain task", None).await.unwrap();

    assert!(bundle.summary.total_chars_used <= 320);
    assert!(bundle.items.iter().any(|i| i.truncated));
    for item in &bundle.items {
        assert!(item.used_length <= item.original_length);
    }
}

#[tokio::test]
async fn truncated_items_end_at_clean_boundaries_when_possible() {
    init_tracing();
    let text = "First rule applies. Second rule applies. Third rule applies. \
                Fourth rule applies. Fifth rule applies."
        .to_string();
    let provider = Arc::new(StaticProvider::default().with_item(
        Category::Instructions,
        "rules",
        text,
    ));
    // 25 total tokens, 20% reserved -> 20 tokens = 80 selectable chars.
    let config = BudgetConfig {
        total_tokens: 25,
        ..Default::default()
    };
    let assembler = ContextAssembler::new(config, provider).unwrap();

    let bundle = assembler.assemble("security hardening", None).await.unwrap();
    let item = &bundle.items[0];
    assert!(item.truncated);
    let kept = item.content.strip_suffix(TRUNCATION_MARKER).unwrap();
    assert!(kept.ends_with('.'), "cut mid-sentence: {kept:?}");
}

#[tokio::test]
async fn empty_provider_yields_empty_valid_bundle() {
    init_tracing();
    let assembler = ContextAssembler::new(
        BudgetConfig::default(),
        Arc::new(StaticProvider::default()),
    )
    .unwrap();

    let bundle = assembler.assemble("anything at all", None).await.unwrap();
    assert_eq!(bundle.summary.files_loaded, 0);
    assert_eq!(bundle.summary.total_tokens_used, 0);
    assert!(bundle.summary.remaining_budget > 0);
}

#[tokio::test]
async fn budget_override_shrinks_one_request_only() {
    init_tracing();
    let assembler =
        ContextAssembler::new(BudgetConfig::default(), provider_with_sized_items(200)).unwrap();

    let small = assembler.assemble("task", Some(50)).await.unwrap();
    let normal = assembler.assemble("task", None).await.unwrap();

    assert!(small.summary.total_chars_used < normal.summary.total_chars_used);
    assert_eq!(normal.allocation.total, 8000);
}

#[tokio::test]
async fn cache_prepopulation_overrides_provider_content() {
    init_tracing();
    let assembler =
        ContextAssembler::new(BudgetConfig::default(), provider_with_sized_items(50)).unwrap();
    assembler.cache().store("docs:docs", "pinned summary.");

    let bundle = assembler.assemble("task", None).await.unwrap();
    let docs = bundle.items.iter().find(|i| i.source_id == "docs").unwrap();
    assert_eq!(docs.content, "pinned summary.");

    // Clearing restores provider content on the next request.
    assembler.cache().clear();
    let bundle = assembler.assemble("task", None).await.unwrap();
    let docs = bundle.items.iter().find(|i| i.source_id == "docs").unwrap();
    assert_eq!(docs.content, "d".repeat(50));
}

#[tokio::test]
async fn matched_rule_trail_reports_overridden_rules() {
    init_tracing();
    let assembler =
        ContextAssembler::new(BudgetConfig::default(), provider_with_sized_items(10)).unwrap();

    let bundle = assembler
        .assemble("auth flow for the performance dashboard", None)
        .await
        .unwrap();

    // Both rules fired; the later-declared performance rule decided.
    assert_eq!(bundle.assignment.matched_rules, vec!["security", "performance"]);
    assert_eq!(bundle.assignment.rank_of(Category::Docs), Some(1));
}
