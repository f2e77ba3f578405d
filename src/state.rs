//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了 UI 可见的内容状态：每种资源的当前集合和加载标志，以及全局加载标志。

use crate::resource::{Record, ResourceKind};
use std::sync::Arc;
use tokio::sync::watch;

/// 单个资源类型的状态槽
struct KindSlot {
    collection: watch::Sender<Arc<Vec<Record>>>,
    loading: watch::Sender<bool>,
}

impl KindSlot {
    fn new() -> Self {
        let (collection, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);
        Self {
            collection,
            loading,
        }
    }
}

/// 内容状态
///
/// 只由获取编排器（以及批量协调器的全局标志）写入；UI 通过
/// `watch::Receiver` 订阅变化并重新渲染。同一资源后写者胜出
pub struct ContentState {
    slots: [KindSlot; ResourceKind::COUNT],
    global_loading: watch::Sender<bool>,
}

impl Default for ContentState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentState {
    pub fn new() -> Self {
        let (global_loading, _) = watch::channel(false);
        Self {
            slots: std::array::from_fn(|_| KindSlot::new()),
            global_loading,
        }
    }

    fn slot(&self, kind: ResourceKind) -> &KindSlot {
        &self.slots[kind.index()]
    }

    /// 当前集合（只读投影）
    pub fn collection(&self, kind: ResourceKind) -> Arc<Vec<Record>> {
        self.slot(kind).collection.borrow().clone()
    }

    /// 订阅集合变化
    pub fn subscribe(&self, kind: ResourceKind) -> watch::Receiver<Arc<Vec<Record>>> {
        self.slot(kind).collection.subscribe()
    }

    pub(crate) fn set_collection(&self, kind: ResourceKind, data: Arc<Vec<Record>>) {
        self.slot(kind).collection.send_replace(data);
    }

    pub fn is_loading(&self, kind: ResourceKind) -> bool {
        *self.slot(kind).loading.borrow()
    }

    pub fn subscribe_loading(&self, kind: ResourceKind) -> watch::Receiver<bool> {
        self.slot(kind).loading.subscribe()
    }

    pub(crate) fn set_loading(&self, kind: ResourceKind, loading: bool) {
        self.slot(kind).loading.send_replace(loading);
    }

    pub fn global_loading(&self) -> bool {
        *self.global_loading.borrow()
    }

    pub fn subscribe_global_loading(&self) -> watch::Receiver<bool> {
        self.global_loading.subscribe()
    }

    pub(crate) fn set_global_loading(&self, loading: bool) {
        self.global_loading.send_replace(loading);
    }
}
