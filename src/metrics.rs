//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的指标收集功能。

use crate::resource::ResourceKind;
use dashmap::DashMap;
use std::fmt;
use tracing::{span, Level};

/// 单次获取的结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchEvent {
    /// 由缓存直接返回
    CacheHit,
    /// 加入了进行中的请求
    Joined,
    /// 网络请求成功
    Fetched,
    /// 网络请求失败
    Failed,
}

impl FetchEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchEvent::CacheHit => "cache_hit",
            FetchEvent::Joined => "joined",
            FetchEvent::Fetched => "fetched",
            FetchEvent::Failed => "failed",
        }
    }
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 指标收集器
///
/// 每个同步上下文持有一份，不使用进程级单例
#[derive(Debug, Default)]
pub struct SyncMetrics {
    /// 请求计数
    /// key: (kind, event)
    requests_total: DashMap<(ResourceKind, FetchEvent), u64>,
    /// 网络请求耗时（累积秒数, 次数）
    fetch_duration: DashMap<ResourceKind, (f64, u64)>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次获取结果
    pub fn record(&self, kind: ResourceKind, event: FetchEvent) {
        let span = span!(
            Level::TRACE,
            "sync_request",
            kind = kind.as_str(),
            event = event.as_str()
        );
        let _enter = span.enter();
        *self.requests_total.entry((kind, event)).or_insert(0) += 1;
    }

    /// 记录网络请求耗时
    pub fn record_duration(&self, kind: ResourceKind, duration_secs: f64) {
        let mut entry = self.fetch_duration.entry(kind).or_insert((0.0, 0));
        entry.0 += duration_secs;
        entry.1 += 1;
    }

    /// 查询计数
    pub fn count(&self, kind: ResourceKind, event: FetchEvent) -> u64 {
        self.requests_total
            .get(&(kind, event))
            .map(|v| *v)
            .unwrap_or(0)
    }

    /// 某类结果在所有资源上的总数
    pub fn total(&self, event: FetchEvent) -> u64 {
        self.requests_total
            .iter()
            .filter(|e| e.key().1 == event)
            .map(|e| *e.value())
            .sum()
    }

    /// 平均网络耗时（秒）
    pub fn average_duration(&self, kind: ResourceKind) -> Option<f64> {
        self.fetch_duration
            .get(&kind)
            .filter(|v| v.1 > 0)
            .map(|v| v.0 / v.1 as f64)
    }

    /// 将所有指标格式化为文本，用于监控系统采集
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .requests_total
            .iter()
            .map(|e| {
                let (kind, event) = e.key();
                format!(
                    "sync_requests_total{{kind=\"{}\", event=\"{}\"}} {}",
                    kind,
                    event,
                    e.value()
                )
            })
            .collect();
        for e in self.fetch_duration.iter() {
            let (total, count) = *e.value();
            lines.push(format!(
                "sync_fetch_duration_seconds_sum{{kind=\"{}\"}} {}",
                e.key(),
                total
            ));
            lines.push(format!(
                "sync_fetch_duration_seconds_count{{kind=\"{}\"}} {}",
                e.key(),
                count
            ));
        }
        lines.sort();
        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}
