//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的错误类型和处理机制。

use crate::resource::ResourceKind;
use thiserror::Error;

/// 同步层错误类型枚举
///
/// 获取路径上的错误不会抛给调用方，只在日志中体现；
/// 构造、配置和解码接口通过此类型返回错误
#[derive(Error, Debug)]
pub enum SyncError {
    /// 数据源返回错误或空数据
    #[error("Data source error for {kind}: {message}")]
    DataSource {
        kind: ResourceKind,
        message: String,
    },

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 网络传输错误
    #[error("Transport error: {0}")]
    Transport(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 获取函数内部发生panic
    #[error("Fetcher for {kind} panicked")]
    Panicked { kind: ResourceKind },
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

/// 同步操作结果类型别名
pub type Result<T> = std::result::Result<T, SyncError>;
