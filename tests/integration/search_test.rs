//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 防抖搜索集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{context, counting_source};
use edusync::ResourceKind;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_triggers_one_batch() {
    let source = counting_source();
    let ctx = context(source.clone());

    for term in ["d", "da", "dat", "data"] {
        ctx.set_search_term(term);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(source.total_calls(), 0);

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(source.total_calls(), ResourceKind::COUNT);
    for query in source.queries() {
        let filter = query.filter.expect("search filter");
        assert_eq!(filter.needle, "data");
        assert_eq!(filter.field, query.kind.search_field());
    }
    assert_eq!(ctx.search_term(), "data");
    assert_eq!(ctx.collection(ResourceKind::Universities).len(), 1);
    assert_eq!(ctx.collection(ResourceKind::Events).len(), 1);
    assert!(!ctx.global_loading());
}

#[tokio::test(start_paused = true)]
async fn test_clearing_term_restores_unfiltered_view() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.set_search_term("data");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(ctx.collection(ResourceKind::Universities).len(), 1);

    ctx.set_search_term("   ");
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(source.total_calls(), 2 * ResourceKind::COUNT);
    let last = source.last_query(ResourceKind::Universities).unwrap();
    assert!(last.filter.is_none());
    assert_eq!(ctx.collection(ResourceKind::Universities).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_term_is_trimmed_before_search() {
    let source = counting_source();
    let ctx = context(source.clone());
    let mut term = ctx.subscribe_search_term();

    ctx.set_search_term("  mba ");
    assert!(term.has_changed().unwrap());
    assert_eq!(*term.borrow_and_update(), "  mba ");

    tokio::time::sleep(Duration::from_millis(400)).await;
    let query = source.last_query(ResourceKind::Programs).unwrap();
    assert_eq!(query.filter.unwrap().needle, "mba");
    assert_eq!(ctx.collection(ResourceKind::Programs).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_search() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.set_search_term("oxford");
    tokio::time::sleep(Duration::from_millis(100)).await;
    ctx.shutdown();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(source.total_calls(), 0);
    assert_eq!(ctx.search_term(), "oxford");
}

#[test]
fn test_set_term_outside_runtime_only_stores_term() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.set_search_term("imperial");
    assert_eq!(ctx.search_term(), "imperial");
    assert_eq!(source.total_calls(), 0);
}
