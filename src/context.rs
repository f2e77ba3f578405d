//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步上下文，负责装配缓存、去重、批量、搜索和分页各组件，
//! 并向 UI 层暴露统一的接口。

use crate::cache::CacheEntry;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::metrics::SyncMetrics;
use crate::query::FetchOptions;
use crate::resource::{Record, ResourceKind};
use crate::source::{rest::RestDataSource, DataSource};
use crate::state::ContentState;
use crate::sync::{
    BatchCoordinator, BatchReport, FetchOrchestrator, FetchOutcome, ResourceFetchers,
    SearchController,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument};

/// 同步上下文
///
/// 一个应用实例持有一个上下文，克隆开销很小，所有克隆共享同一份缓存、
/// 去重登记表和内容状态
#[derive(Clone)]
pub struct SyncContext {
    config: Arc<SyncConfig>,
    state: Arc<ContentState>,
    metrics: Arc<SyncMetrics>,
    orchestrator: Arc<FetchOrchestrator>,
    fetchers: Arc<ResourceFetchers>,
    batch: Arc<BatchCoordinator>,
    search: Arc<SearchController>,
}

impl SyncContext {
    /// 创建同步上下文
    ///
    /// # 参数
    ///
    /// * `config` - 同步配置
    /// * `source` - 数据源
    ///
    /// # 返回值
    ///
    /// 配置校验失败时返回 `SyncError::Config`
    #[instrument(skip(config, source), level = "info", fields(source = source.name()))]
    pub fn new(config: SyncConfig, source: Arc<dyn DataSource>) -> Result<Self> {
        config.validate()?;

        let state = Arc::new(ContentState::new());
        let metrics = Arc::new(SyncMetrics::new());
        let orchestrator = Arc::new(FetchOrchestrator::new(
            config.ttl(),
            Arc::clone(&state),
            Arc::clone(&metrics),
        ));
        let fetchers = Arc::new(ResourceFetchers::new(
            Arc::clone(&orchestrator),
            source,
            config.fetch.clone(),
        ));
        let batch = Arc::new(BatchCoordinator::new(
            Arc::clone(&fetchers),
            Arc::clone(&state),
        ));
        let search = Arc::new(SearchController::new(
            Arc::clone(&batch),
            config.debounce(),
        ));

        info!(
            "SyncContext initialized: ttl={:?}, debounce={:?}",
            config.ttl(),
            config.debounce()
        );

        Ok(Self {
            config: Arc::new(config),
            state,
            metrics,
            orchestrator,
            fetchers,
            batch,
            search,
        })
    }

    /// 使用配置中的 `[source]` 段创建 REST 数据源并装配上下文
    pub fn with_rest_source(config: SyncConfig) -> Result<Self> {
        let source_config = config
            .source
            .as_ref()
            .ok_or_else(|| SyncError::Config("missing [source] section".to_string()))?;
        let source = RestDataSource::new(source_config)?;
        Self::new(config, Arc::new(source))
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// 获取一种资源
    pub async fn fetch(&self, kind: ResourceKind, options: FetchOptions) -> FetchOutcome {
        self.fetchers.fetch(kind, options).await
    }

    pub async fn fetch_universities(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Universities, options).await
    }

    pub async fn fetch_programs(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Programs, options).await
    }

    pub async fn fetch_testimonials(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Testimonials, options).await
    }

    pub async fn fetch_leads(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Leads, options).await
    }

    pub async fn fetch_events(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Events, options).await
    }

    pub async fn fetch_top_recruiters(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::TopRecruiters, options).await
    }

    pub async fn fetch_hero_carousel(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::HeroCarousel, options).await
    }

    pub async fn fetch_blogs(&self, options: FetchOptions) -> FetchOutcome {
        self.fetch(ResourceKind::Blogs, options).await
    }

    /// 当前集合
    pub fn collection(&self, kind: ResourceKind) -> Arc<Vec<Record>> {
        self.state.collection(kind)
    }

    /// 订阅集合变化，用于驱动重新渲染
    pub fn subscribe(&self, kind: ResourceKind) -> watch::Receiver<Arc<Vec<Record>>> {
        self.state.subscribe(kind)
    }

    /// 把当前集合解码为强类型记录
    ///
    /// # 参数
    ///
    /// * `kind` - 资源类型
    ///
    /// # 返回值
    ///
    /// 任一记录无法解码时返回 `SyncError::Serialization`
    pub fn collection_as<T: DeserializeOwned>(&self, kind: ResourceKind) -> Result<Vec<T>> {
        self.state
            .collection(kind)
            .iter()
            .map(|record| serde_json::from_value(record.clone()).map_err(SyncError::from))
            .collect()
    }

    pub fn is_loading(&self, kind: ResourceKind) -> bool {
        self.state.is_loading(kind)
    }

    pub fn subscribe_loading(&self, kind: ResourceKind) -> watch::Receiver<bool> {
        self.state.subscribe_loading(kind)
    }

    /// 是否有批量获取正在进行
    pub fn global_loading(&self) -> bool {
        self.state.global_loading()
    }

    pub fn subscribe_global_loading(&self) -> watch::Receiver<bool> {
        self.state.subscribe_global_loading()
    }

    pub fn search_term(&self) -> String {
        self.search.search_term()
    }

    pub fn subscribe_search_term(&self) -> watch::Receiver<String> {
        self.search.subscribe()
    }

    /// 设置搜索词，静默期过后对所有资源发起一次批量获取
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.search.set_search_term(term);
    }

    /// 并发获取多种资源
    pub async fn fetch_multiple(&self, kinds: &[ResourceKind], options: FetchOptions) -> BatchReport {
        self.batch.fetch_multiple(kinds, options).await
    }

    /// 强制刷新单种资源
    pub async fn refresh(&self, kind: ResourceKind) -> FetchOutcome {
        self.batch.refresh(kind).await
    }

    /// 重置缓存条目，None 表示全部
    ///
    /// 只影响缓存，当前集合保持不变
    pub fn clear_cache(&self, kind: Option<ResourceKind>) {
        match kind {
            Some(kind) => info!("Clearing cache for {}", kind),
            None => info!("Clearing cache for all resources"),
        }
        self.orchestrator.invalidate(kind);
    }

    /// 从 `current_length` 处继续获取一页
    pub async fn load_more(
        &self,
        kind: ResourceKind,
        current_length: usize,
        limit: Option<usize>,
    ) -> FetchOutcome {
        self.fetchers.load_more(kind, current_length, limit).await
    }

    /// 缓存条目快照
    pub fn cache_entry(&self, kind: ResourceKind) -> CacheEntry {
        self.orchestrator.cache().entry(kind)
    }

    /// 当前进行中的请求数
    pub fn in_flight_count(&self) -> usize {
        self.orchestrator.in_flight().len()
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }

    /// 关闭上下文：作废待触发的搜索定时器
    ///
    /// 已经开始的获取会继续完成
    pub fn shutdown(&self) {
        info!("Shutting down SyncContext");
        self.search.cancel_pending();
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("ttl", &self.config.ttl())
            .field("debounce", &self.config.debounce())
            .field("in_flight", &self.in_flight_count())
            .finish()
    }
}
