//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于偏移量的分页扩展。

use super::fetchers::ResourceFetchers;
use super::orchestrator::FetchOutcome;
use crate::query::FetchOptions;
use crate::resource::ResourceKind;
use tracing::{debug, instrument};

impl ResourceFetchers {
    /// 从 `current_length` 处继续获取一页
    ///
    /// 总是强制发起网络请求。本层只负责"从偏移量 N 开始获取"，
    /// 获取到的这一页会成为该资源的当前集合；如需累积列表，由调用方自行拼接
    ///
    /// # 参数
    ///
    /// * `kind` - 资源类型
    /// * `current_length` - 调用方当前持有的条数，作为偏移量
    /// * `limit` - 本页条数，None 时使用资源的默认条数
    #[instrument(skip(self, kind), level = "debug", fields(kind = %kind))]
    pub async fn load_more(
        &self,
        kind: ResourceKind,
        current_length: usize,
        limit: Option<usize>,
    ) -> FetchOutcome {
        let limit = limit.unwrap_or_else(|| self.default_limit(kind));
        debug!(
            "Loading more {}: offset={}, limit={}",
            kind, current_length, limit
        );
        let options = FetchOptions::forced()
            .with_offset(current_length)
            .with_limit(limit);
        self.fetch(kind, options).await
    }
}
