//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了批量协调器：并发获取多种资源，并维护全局加载标志。

use super::fetchers::ResourceFetchers;
use super::orchestrator::FetchOutcome;
use crate::query::FetchOptions;
use crate::resource::ResourceKind;
use crate::state::ContentState;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 批量获取的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<(ResourceKind, FetchOutcome)>,
}

impl BatchReport {
    /// 失败的资源类型
    pub fn failed(&self) -> Vec<ResourceKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_success())
    }

    pub fn outcome(&self, kind: ResourceKind) -> Option<FetchOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| *outcome)
    }
}

/// 丢弃时复位全局加载标志
struct GlobalLoadingGuard<'a> {
    state: &'a ContentState,
}

impl Drop for GlobalLoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.set_global_loading(false);
    }
}

/// 批量协调器
pub struct BatchCoordinator {
    fetchers: Arc<ResourceFetchers>,
    state: Arc<ContentState>,
}

impl BatchCoordinator {
    pub fn new(fetchers: Arc<ResourceFetchers>, state: Arc<ContentState>) -> Self {
        Self { fetchers, state }
    }

    pub fn fetchers(&self) -> &Arc<ResourceFetchers> {
        &self.fetchers
    }

    /// 并发获取多种资源
    ///
    /// 等待全部结束（任何一个失败都不会取消或阻塞其它），
    /// 无论结果如何最终都会复位全局加载标志
    #[instrument(skip(self, options), level = "info", fields(count = kinds.len()))]
    pub async fn fetch_multiple(&self, kinds: &[ResourceKind], options: FetchOptions) -> BatchReport {
        self.state.set_global_loading(true);
        let _guard = GlobalLoadingGuard { state: &self.state };

        let tasks = kinds.iter().map(|&kind| {
            let options = options.clone();
            async move { (kind, self.fetchers.fetch(kind, options).await) }
        });
        let report = BatchReport {
            outcomes: join_all(tasks).await,
        };

        let failed = report.failed();
        if failed.is_empty() {
            info!("Batch fetch finished: {} kinds", kinds.len());
        } else {
            warn!(
                "Batch fetch finished with {} failures: {:?}",
                failed.len(),
                failed
            );
        }
        report
    }

    /// 强制刷新单种资源
    pub async fn refresh(&self, kind: ResourceKind) -> FetchOutcome {
        self.fetchers.fetch(kind, FetchOptions::forced()).await
    }
}
