//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了获取编排器：决定走缓存、加入进行中请求还是发起新请求，
//! 并在完成时更新缓存和内容状态。

use crate::cache::{CacheStore, InFlightRegistry};
use crate::error::{Result, SyncError};
use crate::metrics::{FetchEvent, SyncMetrics};
use crate::query::FetchOptions;
use crate::resource::{Record, ResourceKind};
use crate::state::ContentState;
use futures::future::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// 单次获取的可观察结果
///
/// 仅供参考：获取路径从不向调用方返回错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 由缓存直接返回，无网络请求，加载标志不变
    Cached,
    /// 加入了进行中的同键请求
    Joined { succeeded: bool },
    /// 发起了一次网络请求并成功
    Fetched { count: usize },
    /// 发起了一次网络请求但失败，内容状态保持不变
    Failed,
}

impl FetchOutcome {
    /// 本次调用结束后内容状态是否反映了最新数据
    pub fn is_success(&self) -> bool {
        match self {
            FetchOutcome::Cached | FetchOutcome::Fetched { .. } => true,
            FetchOutcome::Joined { succeeded } => *succeeded,
            FetchOutcome::Failed => false,
        }
    }

    /// 本次调用是否自己发起了网络请求
    pub fn hit_network(&self) -> bool {
        matches!(self, FetchOutcome::Fetched { .. } | FetchOutcome::Failed)
    }
}

/// 获取编排器
///
/// 缓存存储、去重登记表和内容状态的唯一写入者
pub struct FetchOrchestrator {
    cache: CacheStore,
    in_flight: InFlightRegistry,
    state: Arc<ContentState>,
    metrics: Arc<SyncMetrics>,
}

/// 结算守卫：丢弃时清除加载标志
///
/// 与去重键的释放守卫一起保证 finally 语义
struct LoadingGuard {
    state: Arc<ContentState>,
    kind: ResourceKind,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.set_loading(self.kind, false);
    }
}

impl FetchOrchestrator {
    /// 创建新的获取编排器
    ///
    /// # 参数
    ///
    /// * `ttl` - 缓存有效期
    /// * `state` - 内容状态
    /// * `metrics` - 指标收集器
    pub fn new(ttl: Duration, state: Arc<ContentState>, metrics: Arc<SyncMetrics>) -> Self {
        Self {
            cache: CacheStore::new(ttl),
            in_flight: InFlightRegistry::new(),
            state,
            metrics,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    pub fn state(&self) -> &Arc<ContentState> {
        &self.state
    }

    /// 带缓存的获取
    ///
    /// 1. 未强制且缓存有效时，把缓存数据写入内容状态后直接返回；
    /// 2. 同键请求进行中时等待它完成；
    /// 3. 否则置加载标志，在独立任务中启动新操作，登记并等待。
    ///
    /// 调用方放弃等待不会取消已启动的操作。需要在 tokio 运行时中调用
    ///
    /// # 参数
    ///
    /// * `kind` - 资源类型
    /// * `fetcher` - 执行网络查询的闭包
    /// * `options` - 获取选项
    #[instrument(skip(self, kind, fetcher, options), level = "debug", fields(kind = %kind, force = options.force))]
    pub async fn fetch_with_cache<F, Fut>(
        self: &Arc<Self>,
        kind: ResourceKind,
        fetcher: F,
        options: &FetchOptions,
    ) -> FetchOutcome
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Record>>> + Send + 'static,
    {
        let query = options.query();
        let key = InFlightRegistry::key_for(kind, query);

        if !options.force && self.cache.is_valid(kind, query) {
            debug!("Cache hit: kind={}, query={:?}", kind, query);
            self.state.set_collection(kind, self.cache.data(kind));
            self.metrics.record(kind, FetchEvent::CacheHit);
            return FetchOutcome::Cached;
        }

        let this = Arc::clone(self);
        let op_query = query.map(str::to_owned);
        let op_key = key.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let op_count = Arc::clone(&count);

        let (op, joined) = self.in_flight.join_or_register(&key, || {
            self.state.set_loading(kind, true);
            // 在独立任务中执行，调用方放弃等待时请求仍会完成并释放键
            let task = tokio::spawn(async move {
                let _release = this.in_flight.release_guard(op_key);
                let _loading = LoadingGuard {
                    state: Arc::clone(&this.state),
                    kind,
                };
                match this.run(kind, fetcher, op_query.as_deref()).await {
                    Ok(n) => {
                        op_count.store(n, AtomicOrdering::Relaxed);
                        true
                    }
                    Err(e) => {
                        warn!("Fetch failed for {}, keeping previous data: {}", kind, e);
                        this.metrics.record(kind, FetchEvent::Failed);
                        false
                    }
                }
            });
            task.map(move |joined| match joined {
                Ok(succeeded) => succeeded,
                Err(e) => {
                    error!("Fetch task for {} aborted: {}", kind, e);
                    false
                }
            })
            .boxed()
        });

        if joined {
            debug!("Joined in-flight request: key={}", key);
            self.metrics.record(kind, FetchEvent::Joined);
            let succeeded = op.await;
            return FetchOutcome::Joined { succeeded };
        }

        if op.await {
            FetchOutcome::Fetched {
                count: count.load(AtomicOrdering::Relaxed),
            }
        } else {
            FetchOutcome::Failed
        }
    }

    /// 执行获取函数并在成功时发布结果
    async fn run<F, Fut>(&self, kind: ResourceKind, fetcher: F, query: Option<&str>) -> Result<usize>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<Record>>> + Send + 'static,
    {
        let start = std::time::Instant::now();
        let result = AssertUnwindSafe(async move { fetcher().await })
            .catch_unwind()
            .await;
        self.metrics
            .record_duration(kind, start.elapsed().as_secs_f64());

        let records = match result {
            Ok(records) => records?,
            Err(_) => {
                error!("Fetcher for {} panicked", kind);
                return Err(SyncError::Panicked { kind });
            }
        };

        let count = records.len();
        let data = Arc::new(records);
        self.state.set_collection(kind, Arc::clone(&data));
        self.cache.update(kind, data, query);
        self.metrics.record(kind, FetchEvent::Fetched);
        debug!("Fetched {} records for {}", count, kind);
        Ok(count)
    }

    /// 重置缓存条目
    pub fn invalidate(&self, kind: Option<ResourceKind>) {
        self.cache.invalidate(kind);
    }
}
