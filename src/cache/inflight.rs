//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了进行中请求的登记表，相同 (资源类型, 查询串) 的并发调用共享同一个操作。

use crate::resource::ResourceKind;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tracing::debug;

/// 进行中操作的句柄
///
/// 可克隆的共享 future，输出为该操作是否成功
pub type InFlight = Shared<BoxFuture<'static, bool>>;

/// 请求去重器
///
/// 每个键同一时刻至多一个条目，操作结束时（无论成败）条目被移除
#[derive(Clone, Default)]
pub struct InFlightRegistry {
    in_flight: Arc<DashMap<String, InFlight>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 计算去重键：`{kind}-{query}`，无查询串时为 `{kind}-default`
    pub fn key_for(kind: ResourceKind, query: Option<&str>) -> String {
        format!("{}-{}", kind, query.unwrap_or("default"))
    }

    /// 获取键对应的进行中操作
    pub fn join(&self, key: &str) -> Option<InFlight> {
        self.in_flight.get(key).map(|r| r.value().clone())
    }

    /// 登记进行中操作
    pub fn register(&self, key: String, op: InFlight) {
        debug!("InFlight register: key={}", key);
        self.in_flight.insert(key, op);
    }

    /// 移除键对应的条目
    pub fn release(&self, key: &str) {
        if self.in_flight.remove(key).is_some() {
            debug!("InFlight release: key={}", key);
        }
    }

    /// 原子地加入已有操作，或登记由 `make` 构造的新操作
    ///
    /// # 返回值
    ///
    /// 返回操作句柄，以及是否加入了已有操作
    pub fn join_or_register<F>(&self, key: &str, make: F) -> (InFlight, bool)
    where
        F: FnOnce() -> BoxFuture<'static, bool>,
    {
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(existing) => (existing.get().clone(), true),
            Entry::Vacant(slot) => {
                let op = make().shared();
                slot.insert(op.clone());
                debug!("InFlight register: key={}", key);
                (op, false)
            }
        }
    }

    /// 返回一个守卫，守卫被丢弃时移除键
    ///
    /// 操作失败、panic 或被取消时都会执行
    pub fn release_guard(&self, key: String) -> ReleaseGuard {
        ReleaseGuard {
            registry: self.clone(),
            key,
        }
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }
}

/// 丢弃时释放去重键
pub struct ReleaseGuard {
    registry: InFlightRegistry,
    key: String,
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
