//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了进程内数据源，按查询对内存中的表做过滤、排序和分页。

use super::{DataSource, QueryResponse};
use crate::query::ResourceQuery;
use crate::resource::{Record, ResourceKind};
use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Ordering as CmpOrdering;
use tracing::{debug, instrument};

/// 内存数据源
///
/// 每种资源类型一张表，用于演示、离线场景和测试
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    tables: DashMap<ResourceKind, Vec<Record>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 构建时填充一张表
    pub fn with_records(self, kind: ResourceKind, records: Vec<Record>) -> Self {
        self.tables.insert(kind, records);
        self
    }

    /// 替换一张表
    pub fn replace(&self, kind: ResourceKind, records: Vec<Record>) {
        self.tables.insert(kind, records);
    }

    /// 向表中追加一条记录
    pub fn push(&self, kind: ResourceKind, record: Record) {
        self.tables.entry(kind).or_default().push(record);
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        self.tables.get(&kind).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, kind: ResourceKind) -> bool {
        self.len(kind) == 0
    }

    /// 对一张表执行查询
    pub fn execute(&self, query: &ResourceQuery) -> Vec<Record> {
        let mut rows: Vec<Record> = match self.tables.get(&query.kind) {
            Some(table) => table
                .iter()
                .filter(|record| match &query.filter {
                    Some(filter) => contains_ignore_case(record, filter.field, &filter.needle),
                    None => true,
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let field = query.ordering.field;
        let ascending = query.ordering.is_ascending();
        rows.sort_by(|a, b| compare_field(a.get(field), b.get(field), ascending));

        rows.into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit)
            .collect()
    }
}

fn contains_ignore_case(record: &Record, field: &str, needle: &str) -> bool {
    record
        .get(field)
        .and_then(|v| v.as_str())
        .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// 比较两个字段值，空值总是排在最后
fn compare_field(
    a: Option<&serde_json::Value>,
    b: Option<&serde_json::Value>,
    ascending: bool,
) -> CmpOrdering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Greater,
        (Some(_), None) => CmpOrdering::Less,
        (Some(a), Some(b)) => {
            let ord = match (a.as_f64(), b.as_f64(), a.as_str(), b.as_str()) {
                (Some(x), Some(y), _, _) => x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal),
                (_, _, Some(x), Some(y)) => x.cmp(y),
                _ => a.to_string().cmp(&b.to_string()),
            };
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    #[instrument(skip(self), level = "debug", fields(kind = %query.kind))]
    async fn query(&self, query: &ResourceQuery) -> QueryResponse {
        let rows = self.execute(query);
        debug!("MemoryDataSource query: kind={}, rows={}", query.kind, rows.len());
        QueryResponse::ok(rows)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
