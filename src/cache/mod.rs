//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存存储和进行中请求的去重登记表。

pub mod inflight;
pub mod store;

pub use inflight::{InFlight, InFlightRegistry, ReleaseGuard};
pub use store::{CacheEntry, CacheStore};
