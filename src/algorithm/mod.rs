//! 图算法模块
//!
//! 包含最短路径树、简单路径枚举、K 最短路径和有界代价可达性

mod dijkstra;
mod path_finder;
mod ranged;

pub use dijkstra::{Dijkstra, ShortestPathTree};
pub use path_finder::{PathFinder, PathResult};
pub use ranged::RangedSearch;

use crate::error::Result;
use crate::graph::Graph;
use crate::metrics::{global_metrics, AlgorithmKind};
use crate::types::Criteria;

/// 运行算法并记录耗时和成败
fn timed<T>(kind: AlgorithmKind, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let metrics = global_metrics();
    let timer = metrics.record_algorithm_start(kind);
    let result = run();
    metrics.record_algorithm_complete(timer, result.is_ok());
    result
}

impl Graph {
    /// 最短路径树（只含结构，树边权重为零）
    pub fn dijkstra(&self, source: &str, criteria: Criteria) -> Result<Graph> {
        Dijkstra::new(self)
            .shortest_path_tree(source, criteria)
            .map(|result| result.tree)
    }

    /// 最短路径树及距离表
    pub fn dijkstra_with_distances(
        &self,
        source: &str,
        criteria: Criteria,
    ) -> Result<ShortestPathTree> {
        Dijkstra::new(self).shortest_path_tree(source, criteria)
    }

    /// 枚举所有简单路径
    pub fn all_simple_paths(&self, start: &str, end: &str) -> Result<Vec<Vec<String>>> {
        PathFinder::new(self).all_simple_paths(start, end)
    }

    /// K 最短路径，每条路径是一张子图
    pub fn yen(&self, start: &str, end: &str, k: usize, criteria: Criteria) -> Result<Vec<Graph>> {
        PathFinder::new(self).yen(start, end, k, criteria)
    }

    /// K 最短路径，返回顶点序列和总权重
    pub fn yen_paths(
        &self,
        start: &str,
        end: &str,
        k: usize,
        criteria: Criteria,
    ) -> Result<Vec<PathResult>> {
        PathFinder::new(self).k_shortest_paths(start, end, k, criteria)
    }

    /// 范围内可达的顶点
    pub fn ranged_dfs(&self, start: &str, range: f64, criteria: Criteria) -> Result<Vec<String>> {
        RangedSearch::new(self).reachable(start, range, criteria)
    }

    /// 范围外的顶点
    pub fn inverted_ranged_dfs(
        &self,
        start: &str,
        range: f64,
        criteria: Criteria,
    ) -> Result<Vec<String>> {
        RangedSearch::new(self).unreachable(start, range, criteria)
    }
}
