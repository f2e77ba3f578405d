//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了按资源类型划分的缓存存储，基于时间戳和查询串判断缓存是否有效。

use crate::resource::{Record, ResourceKind};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// 缓存条目
///
/// `timestamp` 为最近一次成功获取的时刻，`last_query` 为产生 `data` 的查询串
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    pub data: Arc<Vec<Record>>,
    pub timestamp: Option<Instant>,
    pub last_query: String,
}

impl CacheEntry {
    /// 条目自上次写入以来经过的时间
    pub fn age(&self) -> Option<Duration> {
        self.timestamp.map(|t| t.elapsed())
    }
}

/// 缓存存储
///
/// 每种资源类型恰好一个条目，构造时全部为空
#[derive(Debug)]
pub struct CacheStore {
    entries: DashMap<ResourceKind, CacheEntry>,
    ttl: Duration,
}

impl CacheStore {
    /// 创建新的缓存存储
    ///
    /// # 参数
    ///
    /// * `ttl` - 条目的有效期
    pub fn new(ttl: Duration) -> Self {
        let entries = DashMap::with_capacity(ResourceKind::COUNT);
        for kind in ResourceKind::ALL {
            entries.insert(kind, CacheEntry::default());
        }
        Self { entries, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 判断缓存是否可直接使用
    ///
    /// 未过期、查询串一致且数据非空时才有效。空结果永远不算命中，
    /// 下次访问会重新请求
    #[instrument(skip(self), level = "debug")]
    pub fn is_valid(&self, kind: ResourceKind, query: Option<&str>) -> bool {
        let Some(entry) = self.entries.get(&kind) else {
            return false;
        };
        let fresh = entry
            .timestamp
            .map(|t| t.elapsed() < self.ttl)
            .unwrap_or(false);
        let valid =
            fresh && entry.last_query == query.unwrap_or("") && !entry.data.is_empty();
        debug!(
            "Cache is_valid: kind={}, query={:?}, valid={}",
            kind, query, valid
        );
        valid
    }

    /// 无条件覆盖条目
    #[instrument(skip(self, data), level = "debug", fields(count = data.len()))]
    pub fn update(&self, kind: ResourceKind, data: Arc<Vec<Record>>, query: Option<&str>) {
        self.entries.insert(
            kind,
            CacheEntry {
                data,
                timestamp: Some(Instant::now()),
                last_query: query.unwrap_or("").to_string(),
            },
        );
    }

    /// 重置条目
    ///
    /// `kind` 为 None 时重置全部条目
    #[instrument(skip(self), level = "debug")]
    pub fn invalidate(&self, kind: Option<ResourceKind>) {
        match kind {
            Some(kind) => {
                self.entries.insert(kind, CacheEntry::default());
            }
            None => {
                for kind in ResourceKind::ALL {
                    self.entries.insert(kind, CacheEntry::default());
                }
            }
        }
        debug!("Cache invalidated: kind={:?}", kind);
    }

    /// 条目快照
    pub fn entry(&self, kind: ResourceKind) -> CacheEntry {
        self.entries
            .get(&kind)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// 条目中的数据
    pub fn data(&self, kind: ResourceKind) -> Arc<Vec<Record>> {
        self.entry(kind).data
    }
}
