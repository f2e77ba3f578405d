//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步机制，包括获取编排、资源获取、批量协调、防抖搜索和分页。

pub mod batch;
pub mod fetchers;
pub mod orchestrator;
pub mod pagination;
pub mod search;

pub use batch::{BatchCoordinator, BatchReport};
pub use fetchers::ResourceFetchers;
pub use orchestrator::{FetchOrchestrator, FetchOutcome};
pub use search::SearchController;
