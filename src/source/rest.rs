//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了基于 PostgREST 风格 HTTP 接口的远程数据源。

use super::{DataSource, ErrorInfo, QueryResponse};
use crate::config::SourceConfig;
use crate::error::{Result, SyncError};
use crate::query::ResourceQuery;
use crate::resource::Record;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// REST 数据源
///
/// 请求形如 `GET {url}/rest/v1/{table}?select=*&{field}=ilike.*{term}*&order={field}.asc&limit=N&offset=M`，
/// 并携带 `apikey` 与 bearer 认证头
pub struct RestDataSource {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl std::fmt::Debug for RestDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDataSource")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl RestDataSource {
    /// 根据配置创建数据源
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Self::with_client(http, config)
    }

    /// 使用已有的 `reqwest::Client` 创建数据源
    pub fn with_client(http: reqwest::Client, config: &SourceConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.url)
            .map_err(|e| SyncError::Config(format!("invalid source url: {}", e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// 构建查询地址
    pub fn build_url(&self, query: &ResourceQuery) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{}", query.kind.table()))
            .map_err(|e| SyncError::Config(format!("invalid table path: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(filter) = &query.filter {
                pairs.append_pair(
                    filter.field,
                    &format!("ilike.*{}*", escape_like(&filter.needle)),
                );
            }
            let direction = if query.ordering.is_ascending() {
                "asc"
            } else {
                "desc"
            };
            pairs.append_pair(
                "order",
                &format!("{}.{}", query.ordering.field, direction),
            );
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(offset) = query.offset {
                pairs.append_pair("offset", &offset.to_string());
            }
        }
        Ok(url)
    }

    async fn execute(&self, query: &ResourceQuery) -> Result<QueryResponse> {
        let url = self.build_url(query)?;
        debug!("RestDataSource GET {}", url);

        let key = self.api_key.expose_secret();
        let response = self
            .http
            .get(url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            let data: Vec<Record> = serde_json::from_str(&body)?;
            return Ok(QueryResponse::ok(data));
        }

        let error = serde_json::from_str::<ErrorInfo>(&body).unwrap_or_else(|_| {
            ErrorInfo::new(format!("HTTP {}: {}", status.as_u16(), body.trim()))
        });
        Ok(QueryResponse::err(error))
    }
}

/// 转义 `ilike` 模式中的通配符，使搜索词按字面量做"包含"匹配
///
/// `\`、`%`、`_` 使用反斜杠转义。PostgREST 会把 `*` 改写成 `%`，
/// 无法表达字面量 `*`，因此以单字符通配符 `_` 代替
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '*' => escaped.push('_'),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl DataSource for RestDataSource {
    #[instrument(skip(self), level = "debug", fields(kind = %query.kind))]
    async fn query(&self, query: &ResourceQuery) -> QueryResponse {
        match self.execute(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!("RestDataSource request failed for {}: {}", query.kind, e);
                QueryResponse::err(ErrorInfo::new(e.to_string()).with_code("transport"))
            }
        }
    }

    fn name(&self) -> &str {
        "rest"
    }
}
