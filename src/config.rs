//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的配置结构和解析逻辑。

use crate::error::{Result, SyncError};
use crate::resource::ResourceKind;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_VERSION: u32 = 1;

/// 同步层配置
///
/// 所有字段都有默认值，空的 TOML 文档也是合法配置
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SyncConfig {
    #[serde(default)]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// 远程数据源配置，仅 REST 数据源需要
    #[serde(default)]
    pub source: Option<SourceConfig>,
}

/// 缓存配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存有效期（秒）
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// 搜索配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SearchConfig {
    /// 防抖静默期（毫秒）
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// 获取配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct FetchConfig {
    /// 默认返回条数
    pub default_limit: usize,
    /// 首页轮播图的默认条数
    pub hero_carousel_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_limit: ResourceKind::Universities.default_limit(),
            hero_carousel_limit: ResourceKind::HeroCarousel.default_limit(),
        }
    }
}

impl FetchConfig {
    /// 指定资源类型的默认条数
    pub fn limit_for(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::HeroCarousel => self.hero_carousel_limit,
            _ => self.default_limit,
        }
    }
}

/// 远程数据源配置
#[derive(Deserialize, Clone, Debug)]
pub struct SourceConfig {
    /// 数据源根地址，例如 `https://project.example.co`
    pub url: String,
    /// 匿名访问密钥（使用 SecretString 保护，不会出现在日志中）
    pub api_key: SecretString,
    /// 请求超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl SyncConfig {
    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(raw)?;
        Ok(config)
    }

    /// 从 TOML 文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// 缓存有效期
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// 搜索防抖时长
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有值都在合理范围内
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = self.config_version {
            if version > CONFIG_VERSION {
                return Err(SyncError::Config(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                )));
            }
        }

        if !(1..=86_400).contains(&self.cache.ttl_secs) {
            return Err(SyncError::Config(
                "cache.ttl_secs must be between 1 and 86400 seconds".to_string(),
            ));
        }

        if !(1..=10_000).contains(&self.search.debounce_ms) {
            return Err(SyncError::Config(
                "search.debounce_ms must be between 1 and 10000 ms".to_string(),
            ));
        }

        for (name, limit) in [
            ("fetch.default_limit", self.fetch.default_limit),
            ("fetch.hero_carousel_limit", self.fetch.hero_carousel_limit),
        ] {
            if !(1..=1000).contains(&limit) {
                return Err(SyncError::Config(format!(
                    "{} must be between 1 and 1000",
                    name
                )));
            }
        }

        if let Some(source) = &self.source {
            if !(100..=60_000).contains(&source.timeout_ms) {
                return Err(SyncError::Config(
                    "source.timeout_ms must be between 100 and 60000 ms".to_string(),
                ));
            }
            url::Url::parse(&source.url).map_err(|e| {
                SyncError::Config(format!("source.url '{}' is invalid: {}", source.url, e))
            })?;
        }

        Ok(())
    }
}
