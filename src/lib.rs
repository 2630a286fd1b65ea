//! RouteGraph - 多维权重路网图引擎
//!
//! 面向路径规划场景的内存图引擎，支持：
//! - 有向图与无向图，边上携带多维权重（距离、时间等）
//! - 最短路径树（Dijkstra）与 K 最短路径（Yen）
//! - 有界代价可达性搜索及其补集
//! - CSV / JSON Lines 边列表导入

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod import;
pub mod logging;
pub mod metrics;
pub mod types;

// 重导出常用类型
pub use algorithm::{PathResult, ShortestPathTree};
pub use config::{EngineConfig, OutputFormat};
pub use error::{Error, ErrorKind, Result};
pub use graph::{Edge, EdgeId, Graph, Vertex};
pub use types::{Criteria, EdgeMode, Weights, WEIGHT_DIMENSIONS};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
