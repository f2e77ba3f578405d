//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步层的日志初始化辅助函数。

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG` 环境变量，未设置或无法解析时使用 `default_filter`。
/// 全局 subscriber 已存在时不做任何事，通常由应用层决定是否调用
///
/// # 参数
///
/// * `default_filter` - 默认过滤指令，例如 `"edusync=info"`
///
/// # 返回值
///
/// 本次调用是否成功安装了全局 subscriber
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .try_init()
        .is_ok()
}
