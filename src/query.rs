//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了获取选项，以及发往数据源的资源查询。

use crate::config::FetchConfig;
use crate::resource::{Ordering, ResourceKind};

/// 获取选项
///
/// 对应 UI 层传入的 `{force, limit, offset, searchTerm}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// 跳过缓存，强制发起网络请求
    pub force: bool,
    /// 返回条数，None 时使用资源类型的默认值
    pub limit: Option<usize>,
    /// 起始偏移量，仅分页使用
    pub offset: Option<usize>,
    /// 搜索词
    pub search_term: Option<String>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 强制刷新的选项
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// 缓存与去重使用的查询串
    ///
    /// 偏移量不参与计算
    pub fn query(&self) -> Option<&str> {
        self.search_term.as_deref()
    }
}

/// "包含"过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainsFilter {
    pub field: &'static str,
    pub needle: String,
}

/// 发往数据源的查询
///
/// 支持单字段包含过滤、单字段排序以及条数限制和偏移量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub kind: ResourceKind,
    pub filter: Option<ContainsFilter>,
    pub ordering: Ordering,
    pub limit: usize,
    pub offset: Option<usize>,
}

impl ResourceQuery {
    /// 根据资源类型和获取选项构建查询
    ///
    /// # 参数
    ///
    /// * `kind` - 资源类型
    /// * `options` - 获取选项
    /// * `defaults` - 默认条数配置
    pub fn build(kind: ResourceKind, options: &FetchOptions, defaults: &FetchConfig) -> Self {
        let filter = options
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| ContainsFilter {
                field: kind.search_field(),
                needle: term.to_string(),
            });

        Self {
            kind,
            filter,
            ordering: kind.ordering(),
            limit: options.limit.unwrap_or_else(|| defaults.limit_for(kind)),
            offset: options.offset,
        }
    }
}
