//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用工具函数和设置。

use async_trait::async_trait;
use dashmap::DashMap;
use edusync::query::ResourceQuery;
use edusync::{
    DataSource, ErrorInfo, MemoryDataSource, QueryResponse, ResourceKind, SyncConfig, SyncContext,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
    });
}

/// 每种资源填充几条记录的内存数据源
#[allow(dead_code)]
pub fn seeded_memory_source() -> MemoryDataSource {
    MemoryDataSource::new()
        .with_records(
            ResourceKind::Universities,
            vec![
                json!({"id": 1, "name": "University of Oxford", "location": "Oxford"}),
                json!({"id": 2, "name": "Imperial College London", "location": "London"}),
                json!({"id": 3, "name": "Data Science Institute", "location": "Leeds"}),
            ],
        )
        .with_records(
            ResourceKind::Programs,
            vec![
                json!({"id": 10, "name": "MSc Data Science", "created_at": "2026-01-10T09:00:00Z"}),
                json!({"id": 11, "name": "MBA", "created_at": "2026-02-01T09:00:00Z"}),
            ],
        )
        .with_records(
            ResourceKind::Testimonials,
            vec![json!({"id": 20, "name": "Asha", "created_at": "2026-03-01T09:00:00Z"})],
        )
        .with_records(
            ResourceKind::Leads,
            vec![json!({"id": 30, "name": "Ravi", "created_at": "2026-03-05T09:00:00Z"})],
        )
        .with_records(
            ResourceKind::Events,
            vec![
                json!({"id": 40, "title": "Data Science Open Day", "event_date": "2026-05-14"}),
                json!({"id": 41, "title": "MBA Fair", "event_date": "2026-04-02"}),
            ],
        )
        .with_records(
            ResourceKind::TopRecruiters,
            vec![json!({"id": 50, "name": "Acme Data"})],
        )
        .with_records(
            ResourceKind::HeroCarousel,
            vec![json!({"id": 60, "title": "Study abroad", "display_order": 1})],
        )
        .with_records(
            ResourceKind::Blogs,
            vec![json!({"id": 70, "title": "Why data science", "published_at": "2026-01-02T10:00:00Z"})],
        )
}

/// 统计调用次数的数据源
///
/// 包装内存数据源，记录每种资源的调用次数和最近一次查询，
/// 可配置响应延迟和失败的资源类型
pub struct CountingSource {
    inner: MemoryDataSource,
    calls: DashMap<ResourceKind, AtomicUsize>,
    queries: Mutex<Vec<ResourceQuery>>,
    failing: Mutex<HashSet<ResourceKind>>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn new(inner: MemoryDataSource) -> Self {
        Self {
            inner,
            calls: DashMap::new(),
            queries: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn inner(&self) -> &MemoryDataSource {
        &self.inner
    }

    pub fn fail(&self, kind: ResourceKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self, kind: ResourceKind) {
        self.failing.lock().unwrap().remove(&kind);
    }

    pub fn calls(&self, kind: ResourceKind) -> usize {
        self.calls
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        ResourceKind::ALL.iter().map(|&kind| self.calls(kind)).sum()
    }

    /// 所有已收到的查询，按到达顺序
    pub fn queries(&self) -> Vec<ResourceQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_query(&self, kind: ResourceKind) -> Option<ResourceQuery> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|q| q.kind == kind)
            .cloned()
    }
}

#[async_trait]
impl DataSource for CountingSource {
    async fn query(&self, query: &ResourceQuery) -> QueryResponse {
        self.calls
            .entry(query.kind)
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(&query.kind) {
            return QueryResponse::err(
                ErrorInfo::new(format!("relation \"{}\" is unavailable", query.kind.table()))
                    .with_code("503"),
            );
        }
        QueryResponse::ok(self.inner.execute(query))
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// 用默认配置和给定数据源创建上下文
#[allow(dead_code)]
pub fn context(source: Arc<CountingSource>) -> SyncContext {
    setup_logging();
    SyncContext::new(SyncConfig::default(), source).expect("default config is valid")
}

/// 默认数据源包装为计数数据源
#[allow(dead_code)]
pub fn counting_source() -> Arc<CountingSource> {
    Arc::new(CountingSource::new(seeded_memory_source()))
}
