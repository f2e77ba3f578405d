//! edusync - 教育信息应用的内容同步层
//!
//! 在 UI 与远程数据源之间提供带有效期的缓存、进行中请求去重、
//! 批量获取、防抖搜索和基于偏移量的分页。

#![doc(html_root_url = "https://docs.rs/edusync/0.1.0")]

pub use serde;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod model;
pub mod query;
pub mod resource;
pub mod source;
pub mod state;
pub mod sync;
pub mod telemetry;

// Re-export commonly used items
pub use config::SyncConfig;
pub use context::SyncContext;
pub use error::{Result, SyncError};
pub use query::FetchOptions;
pub use resource::{Record, ResourceKind};
pub use source::{memory::MemoryDataSource, rest::RestDataSource, DataSource, ErrorInfo, QueryResponse};
pub use sync::{BatchReport, FetchOutcome};

/// edusync 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
