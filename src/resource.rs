//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了资源类型枚举，以及每种资源在编译期绑定的查询参数。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 单条记录
///
/// 同步层不关心记录结构，只处理"记录数组"
pub type Record = serde_json::Value;

/// 资源类型
///
/// 固定且封闭的集合，每种类型在 `match` 中绑定自己的表名、搜索字段和排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Universities,
    Programs,
    Testimonials,
    Leads,
    Events,
    TopRecruiters,
    HeroCarousel,
    Blogs,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 排序规则：按单个字段排序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl Ordering {
    const fn asc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    const fn desc(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Ascending
    }
}

impl ResourceKind {
    /// 所有资源类型，按声明顺序排列
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Universities,
        ResourceKind::Programs,
        ResourceKind::Testimonials,
        ResourceKind::Leads,
        ResourceKind::Events,
        ResourceKind::TopRecruiters,
        ResourceKind::HeroCarousel,
        ResourceKind::Blogs,
    ];

    /// 资源类型的数量
    pub const COUNT: usize = Self::ALL.len();

    /// 对外展示的名称（同时也是去重键的前缀）
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Universities => "universities",
            ResourceKind::Programs => "programs",
            ResourceKind::Testimonials => "testimonials",
            ResourceKind::Leads => "leads",
            ResourceKind::Events => "events",
            ResourceKind::TopRecruiters => "topRecruiters",
            ResourceKind::HeroCarousel => "heroCarousel",
            ResourceKind::Blogs => "blogs",
        }
    }

    /// 远程数据源中的表名
    pub fn table(&self) -> &'static str {
        match self {
            ResourceKind::TopRecruiters => "top_recruiters",
            ResourceKind::HeroCarousel => "hero_carousel",
            other => other.as_str(),
        }
    }

    /// "包含"过滤所作用的文本字段
    pub fn search_field(&self) -> &'static str {
        match self {
            ResourceKind::Universities
            | ResourceKind::Programs
            | ResourceKind::Testimonials
            | ResourceKind::Leads
            | ResourceKind::TopRecruiters => "name",
            ResourceKind::Events | ResourceKind::HeroCarousel | ResourceKind::Blogs => "title",
        }
    }

    /// 该资源的默认排序
    pub fn ordering(&self) -> Ordering {
        match self {
            ResourceKind::Universities | ResourceKind::TopRecruiters => Ordering::asc("name"),
            ResourceKind::Programs | ResourceKind::Testimonials | ResourceKind::Leads => {
                Ordering::desc("created_at")
            }
            ResourceKind::Events => Ordering::asc("event_date"),
            ResourceKind::HeroCarousel => Ordering::asc("display_order"),
            ResourceKind::Blogs => Ordering::desc("published_at"),
        }
    }

    /// 内置默认条数；轮播图只用于展示，取 10 条
    pub fn default_limit(&self) -> usize {
        match self {
            ResourceKind::HeroCarousel => 10,
            _ => 20,
        }
    }

    /// 在定长数组中的下标
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s || kind.table() == s)
            .ok_or_else(|| format!("unknown resource kind: {}", s))
    }
}
