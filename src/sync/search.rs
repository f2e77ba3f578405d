//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了防抖搜索控制器：搜索词变化后经过静默期，才对所有资源发起一次批量获取。

use super::batch::{BatchCoordinator, BatchReport};
use crate::query::FetchOptions;
use crate::resource::ResourceKind;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// 防抖搜索控制器
///
/// 持有全局唯一的搜索词和当前待触发的定时器。取消定时器不会取消
/// 已经开始的批量获取
pub struct SearchController {
    batch: Arc<BatchCoordinator>,
    term: watch::Sender<String>,
    pending: Mutex<Option<CancellationToken>>,
    delay: Duration,
}

impl SearchController {
    /// 创建新的搜索控制器
    ///
    /// # 参数
    ///
    /// * `batch` - 批量协调器
    /// * `delay` - 防抖静默期
    pub fn new(batch: Arc<BatchCoordinator>, delay: Duration) -> Self {
        let (term, _) = watch::channel(String::new());
        Self {
            batch,
            term,
            pending: Mutex::new(None),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 当前搜索词
    pub fn search_term(&self) -> String {
        self.term.borrow().clone()
    }

    /// 订阅搜索词变化
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.term.subscribe()
    }

    /// 设置搜索词
    ///
    /// 取消待触发的定时器并重新计时；只有最后一个定时器会触发。
    /// 需要在 tokio 运行时中调用
    #[instrument(skip(self, term), level = "debug")]
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.term.send_replace(term.clone());

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("No tokio runtime available, search not scheduled: {}", e);
                return;
            }
        };

        let token = CancellationToken::new();
        if let Some(previous) = self.lock_pending().replace(token.clone()) {
            previous.cancel();
        }

        let batch = Arc::clone(&self.batch);
        let delay = self.delay;
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Search timer superseded: term={:?}", term);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            if token.is_cancelled() {
                return;
            }
            run_search(&batch, &term).await;
        });
    }

    /// 作废待触发的定时器
    pub fn cancel_pending(&self) {
        if let Some(token) = self.lock_pending().take() {
            token.cancel();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 定时器触发后执行的批量获取
///
/// 空白搜索词恢复未过滤视图；否则强制以该词获取全部资源，
/// 避免复用另一个查询的缓存
async fn run_search(batch: &BatchCoordinator, term: &str) -> BatchReport {
    let term = term.trim();
    if term.is_empty() {
        info!("Search cleared, restoring unfiltered view");
        batch
            .fetch_multiple(&ResourceKind::ALL, FetchOptions::new())
            .await
    } else {
        info!("Searching all resources for {:?}", term);
        batch
            .fetch_multiple(
                &ResourceKind::ALL,
                FetchOptions::forced().with_search_term(term),
            )
            .await
    }
}
