//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 缓存有效期与查询隔离集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{context, counting_source};
use edusync::metrics::FetchEvent;
use edusync::{FetchOptions, FetchOutcome, ResourceKind};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_universities_cached_within_ttl() {
    let source = counting_source();
    let ctx = context(source.clone());

    assert_eq!(
        ctx.fetch_universities(FetchOptions::new()).await,
        FetchOutcome::Fetched { count: 3 }
    );
    assert_eq!(ctx.collection(ResourceKind::Universities).len(), 3);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(
        ctx.fetch_universities(FetchOptions::new()).await,
        FetchOutcome::Cached
    );
    assert_eq!(source.calls(ResourceKind::Universities), 1);

    tokio::time::advance(Duration::from_secs(300)).await;
    assert_eq!(
        ctx.fetch_universities(FetchOptions::new()).await,
        FetchOutcome::Fetched { count: 3 }
    );
    assert_eq!(source.calls(ResourceKind::Universities), 2);
    assert_eq!(
        ctx.metrics()
            .count(ResourceKind::Universities, FetchEvent::CacheHit),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_cache_is_isolated_by_query() {
    let source = counting_source();
    let ctx = context(source.clone());

    let outcome = ctx
        .fetch_universities(FetchOptions::new().with_search_term("data"))
        .await;
    assert_eq!(outcome, FetchOutcome::Fetched { count: 1 });
    assert_eq!(ctx.cache_entry(ResourceKind::Universities).last_query, "data");

    // 换成无查询串，缓存中是另一个查询的结果
    let outcome = ctx.fetch_universities(FetchOptions::new()).await;
    assert_eq!(outcome, FetchOutcome::Fetched { count: 3 });
    assert_eq!(source.calls(ResourceKind::Universities), 2);

    assert_eq!(
        ctx.fetch_universities(FetchOptions::new()).await,
        FetchOutcome::Cached
    );
    assert_eq!(source.calls(ResourceKind::Universities), 2);
}

#[tokio::test(start_paused = true)]
async fn test_force_bypasses_valid_cache() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.fetch_events(FetchOptions::new()).await;
    let outcome = ctx.fetch_events(FetchOptions::forced()).await;

    assert_eq!(outcome, FetchOutcome::Fetched { count: 2 });
    assert_eq!(source.calls(ResourceKind::Events), 2);
}

#[tokio::test(start_paused = true)]
async fn test_clear_cache_single_kind() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.fetch_programs(FetchOptions::new()).await;
    ctx.fetch_blogs(FetchOptions::new()).await;
    ctx.clear_cache(Some(ResourceKind::Programs));

    assert_eq!(
        ctx.fetch_programs(FetchOptions::new()).await,
        FetchOutcome::Fetched { count: 2 }
    );
    assert_eq!(
        ctx.fetch_blogs(FetchOptions::new()).await,
        FetchOutcome::Cached
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_result_is_never_a_hit() {
    let source = counting_source();
    source.inner().replace(ResourceKind::Leads, Vec::new());
    let ctx = context(source.clone());

    assert_eq!(
        ctx.fetch_leads(FetchOptions::new()).await,
        FetchOutcome::Fetched { count: 0 }
    );
    assert_eq!(
        ctx.fetch_leads(FetchOptions::new()).await,
        FetchOutcome::Fetched { count: 0 }
    );
    assert_eq!(source.calls(ResourceKind::Leads), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_collection_and_cache() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.fetch_testimonials(FetchOptions::new()).await;
    source.fail(ResourceKind::Testimonials);

    assert_eq!(
        ctx.refresh(ResourceKind::Testimonials).await,
        FetchOutcome::Failed
    );
    assert_eq!(ctx.collection(ResourceKind::Testimonials).len(), 1);
    assert!(!ctx.is_loading(ResourceKind::Testimonials));
    assert_eq!(
        ctx.fetch_testimonials(FetchOptions::new()).await,
        FetchOutcome::Cached
    );
}
