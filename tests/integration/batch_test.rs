//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 批量获取集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{context, counting_source, seeded_memory_source, CountingSource};
use edusync::{FetchOptions, FetchOutcome, ResourceKind};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_batch_settles_all_despite_failure() {
    let source = counting_source();
    source.fail(ResourceKind::Leads);
    let ctx = context(source.clone());
    let mut global = ctx.subscribe_global_loading();

    let report = ctx
        .fetch_multiple(&ResourceKind::ALL, FetchOptions::new())
        .await;

    assert_eq!(report.outcomes.len(), ResourceKind::COUNT);
    assert_eq!(report.failed(), vec![ResourceKind::Leads]);
    assert!(!report.all_succeeded());
    assert_eq!(
        report.outcome(ResourceKind::Universities),
        Some(FetchOutcome::Fetched { count: 3 })
    );
    assert!(ctx.collection(ResourceKind::Leads).is_empty());
    assert_eq!(ctx.collection(ResourceKind::Blogs).len(), 1);

    assert!(global.has_changed().unwrap());
    assert!(!*global.borrow_and_update());
    assert!(!ctx.global_loading());
    for kind in ResourceKind::ALL {
        assert!(!ctx.is_loading(kind));
        assert_eq!(source.calls(kind), 1);
    }
}

#[tokio::test]
async fn test_batch_uses_cache_for_fresh_kinds() {
    let source = counting_source();
    let ctx = context(source.clone());

    ctx.fetch_universities(FetchOptions::new()).await;
    let report = ctx
        .fetch_multiple(
            &[ResourceKind::Universities, ResourceKind::Programs],
            FetchOptions::new(),
        )
        .await;

    assert_eq!(
        report.outcome(ResourceKind::Universities),
        Some(FetchOutcome::Cached)
    );
    assert_eq!(
        report.outcome(ResourceKind::Programs),
        Some(FetchOutcome::Fetched { count: 2 })
    );
    assert_eq!(source.calls(ResourceKind::Universities), 1);
}

#[tokio::test(start_paused = true)]
async fn test_global_loading_while_batch_runs() {
    let source = Arc::new(
        CountingSource::new(seeded_memory_source()).with_delay(Duration::from_millis(100)),
    );
    let ctx = context(source.clone());

    let task = {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            ctx.fetch_multiple(&ResourceKind::ALL, FetchOptions::forced())
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(ctx.global_loading());
    assert!(ctx.is_loading(ResourceKind::HeroCarousel));

    let report = task.await.unwrap();
    assert!(report.all_succeeded());
    assert!(!ctx.global_loading());
}

#[tokio::test]
async fn test_empty_batch_resets_global_flag() {
    let source = counting_source();
    let ctx = context(source.clone());

    let report = ctx.fetch_multiple(&[], FetchOptions::new()).await;
    assert!(report.outcomes.is_empty());
    assert!(!ctx.global_loading());
    assert_eq!(source.total_calls(), 0);
}
