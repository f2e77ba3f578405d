//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了资源获取器：为每种资源构建查询，并把执行查询的闭包交给获取编排器。

use super::orchestrator::{FetchOrchestrator, FetchOutcome};
use crate::config::FetchConfig;
use crate::query::{FetchOptions, ResourceQuery};
use crate::resource::ResourceKind;
use crate::source::DataSource;
use std::sync::Arc;
use tracing::instrument;

/// 资源获取器
pub struct ResourceFetchers {
    orchestrator: Arc<FetchOrchestrator>,
    source: Arc<dyn DataSource>,
    defaults: FetchConfig,
}

impl ResourceFetchers {
    pub fn new(
        orchestrator: Arc<FetchOrchestrator>,
        source: Arc<dyn DataSource>,
        defaults: FetchConfig,
    ) -> Self {
        Self {
            orchestrator,
            source,
            defaults,
        }
    }

    pub fn orchestrator(&self) -> &Arc<FetchOrchestrator> {
        &self.orchestrator
    }

    /// 指定资源的默认条数
    pub fn default_limit(&self, kind: ResourceKind) -> usize {
        self.defaults.limit_for(kind)
    }

    /// 获取一种资源
    ///
    /// 偏移量只影响查询本身，不参与缓存和去重键的计算
    #[instrument(skip(self, kind, options), level = "debug", fields(kind = %kind, source = self.source.name()))]
    pub async fn fetch(&self, kind: ResourceKind, options: FetchOptions) -> FetchOutcome {
        let query = ResourceQuery::build(kind, &options, &self.defaults);
        let source = Arc::clone(&self.source);
        self.orchestrator
            .fetch_with_cache(
                kind,
                move || async move { source.query(&query).await.into_result(kind) },
                &options,
            )
            .await
    }
}
