//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了远程数据源的接口和实现。

pub mod memory;
pub mod rest;

use crate::error::{Result, SyncError};
use crate::query::ResourceQuery;
use crate::resource::{Record, ResourceKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::MemoryDataSource;
pub use rest::RestDataSource;

/// 数据源返回的错误信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// 数据源查询结果：`{data, error}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    pub data: Option<Vec<Record>>,
    pub error: Option<ErrorInfo>,
}

impl QueryResponse {
    pub fn ok(data: Vec<Record>) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ErrorInfo) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// 转换为结果
    ///
    /// `error` 非空与 `data` 为空同样视为失败
    pub fn into_result(self, kind: ResourceKind) -> Result<Vec<Record>> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(SyncError::DataSource {
                kind,
                message: error.to_string(),
            }),
            (None, None) => Err(SyncError::DataSource {
                kind,
                message: "no data returned".to_string(),
            }),
            (Some(data), None) => Ok(data),
        }
    }
}

/// 数据源特征
///
/// 查询本身不会以 `Err` 的形式失败，所有失败都体现在 `QueryResponse::error` 中
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// 执行查询
    async fn query(&self, query: &ResourceQuery) -> QueryResponse;

    /// 数据源名称，用于日志
    fn name(&self) -> &str {
        "data-source"
    }
}
