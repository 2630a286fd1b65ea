//! 简单路径枚举与 K 最短路径
//!
//! K 最短路径是 Yen 算法的简化版：只从上一条找到的路径分支，
//! 每次把该路径上一条边的权重视为无穷大，再在全部简单路径中暴力选出最优者。
//! 简单路径枚举最坏情况是指数级的，只适合中小规模的图。

use super::timed;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph};
use crate::metrics::{global_metrics, AlgorithmKind};
use crate::types::Criteria;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列
    pub vertices: Vec<String>,
    /// 路径长度（边数）
    pub length: usize,
    /// 路径总权重（按选定维度）
    pub total_weight: f64,
}

impl PathResult {
    fn new(vertices: Vec<String>, total_weight: f64) -> Self {
        Self {
            length: vertices.len().saturating_sub(1),
            vertices,
            total_weight,
        }
    }
}

/// 计算路径代价时临时替换的边权
type WeightOverrides = HashMap<EdgeId, f64>;

/// 路径查找器
pub struct PathFinder<'a> {
    graph: &'a Graph,
}

impl<'a> PathFinder<'a> {
    /// 创建路径查找器
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    fn require_endpoints(&self, start: &str, end: &str) -> Result<()> {
        for id in [start, end] {
            if !self.graph.contains_vertex(id) {
                return Err(Error::VertexNotFound(id.to_string()));
            }
        }
        Ok(())
    }

    /// 枚举 start 到 end 的所有简单路径（DFS 顺序）
    pub fn all_simple_paths(&self, start: &str, end: &str) -> Result<Vec<Vec<String>>> {
        self.require_endpoints(start, end)?;

        let mut results = Vec::new();
        let mut path = vec![start.to_string()];
        let mut on_path = HashSet::new();
        on_path.insert(start.to_string());

        self.dfs_all_paths(start, end, &mut path, &mut on_path, &mut results);
        global_metrics().record_simple_paths(results.len());

        Ok(results)
    }

    fn dfs_all_paths(
        &self,
        current: &str,
        end: &str,
        path: &mut Vec<String>,
        on_path: &mut HashSet<String>,
        results: &mut Vec<Vec<String>>,
    ) {
        if current == end {
            results.push(path.clone());
            return;
        }

        for edge in self.graph.adjacent_edges(current) {
            let next = match edge.traverse_from(current) {
                Some(next) => next,
                None => continue,
            };
            if on_path.contains(next) {
                continue;
            }

            on_path.insert(next.to_string());
            path.push(next.to_string());

            self.dfs_all_paths(next, end, path, on_path, results);

            path.pop();
            on_path.remove(next);
        }
    }

    /// 路径总权重，相邻顶点间无边时返回 None
    pub fn path_cost(&self, path: &[String], criteria: Criteria) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, pair| {
            self.graph
                .edge_weight(&pair[0], &pair[1], criteria)
                .map(|w| total + w)
        })
    }

    fn path_cost_with(
        &self,
        path: &[String],
        criteria: Criteria,
        overrides: &WeightOverrides,
    ) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, pair| {
            let edge = self.graph.find_edge(&pair[0], &pair[1])?;
            let weight = match overrides.get(&edge.id()) {
                Some(&w) => w,
                None => edge.weight(criteria)?,
            };
            Some(total + weight)
        })
    }

    /// 在候选路径中选出代价最小者
    ///
    /// 代价达到 `f64::MAX` 的路径（经过被置为无穷大的边）不参与选择；
    /// 代价相同时取枚举顺序中靠前的一条。
    fn select_best(
        &self,
        candidates: &[Vec<String>],
        criteria: Criteria,
        overrides: &WeightOverrides,
    ) -> Option<PathResult> {
        let mut best: Option<(&Vec<String>, f64)> = None;
        for path in candidates {
            let cost = match self.path_cost_with(path, criteria, overrides) {
                Some(cost) => cost,
                None => continue,
            };
            let better = match best {
                Some((_, best_cost)) => cost < best_cost,
                None => cost < f64::MAX,
            };
            if better {
                best = Some((path, cost));
            }
        }

        best.map(|(path, _)| {
            let total = self.path_cost(path, criteria).unwrap_or(f64::INFINITY);
            PathResult::new(path.clone(), total)
        })
    }

    /// K 最短路径（简化的 Yen 算法）
    ///
    /// 第一条路径是所有简单路径中代价最小的；之后依次取上一条找到的路径，
    /// 对其上每对相邻顶点之间的边，把它在 `criteria` 维度上的权重视为
    /// `f64::MAX` 重新选最优路径并追加。最多返回 k 条，不去重，
    /// 只有第一条保证最优。
    pub fn k_shortest_paths(
        &self,
        start: &str,
        end: &str,
        k: usize,
        criteria: Criteria,
    ) -> Result<Vec<PathResult>> {
        timed(AlgorithmKind::Yen, || {
            self.require_endpoints(start, end)?;
            self.graph.validate_criteria(criteria, false)?;

            let mut results: Vec<PathResult> = Vec::new();
            if k == 0 {
                return Ok(results);
            }

            let candidates = self.all_simple_paths(start, end)?;
            debug!(
                start,
                end,
                k,
                criteria = %criteria,
                candidates = candidates.len(),
                "开始计算 K 最短路径"
            );

            match self.select_best(&candidates, criteria, &WeightOverrides::new()) {
                Some(first) => results.push(first),
                None => return Ok(results),
            }

            let mut base = 0;
            while results.len() < k && base < results.len() {
                let previous = results[base].vertices.clone();
                for pair in previous.windows(2) {
                    if results.len() >= k {
                        break;
                    }
                    let spur = match self.graph.find_edge(&pair[0], &pair[1]) {
                        Some(edge) => edge,
                        None => continue,
                    };

                    let mut overrides = WeightOverrides::new();
                    overrides.insert(spur.id(), f64::MAX);
                    match self.select_best(&candidates, criteria, &overrides) {
                        Some(path) => {
                            debug!(spur = %spur, path = ?path.vertices, "找到分支路径");
                            results.push(path);
                        }
                        None => debug!(spur = %spur, "去掉该边后无可行路径"),
                    }
                }
                base += 1;
            }

            Ok(results)
        })
    }

    /// 把路径转换成子图
    ///
    /// 每条边带两个权重维度：第一维是距离，第二维在按距离选路时是时间，
    /// 否则是选路所用维度的权重。
    pub fn path_graph(&self, path: &PathResult, criteria: Criteria) -> Result<Graph> {
        let mut graph = Graph::new(self.graph.mode()).untracked();
        for id in &path.vertices {
            if !graph.contains_vertex(id) {
                graph.add_vertex(id)?;
            }
        }

        for pair in path.vertices.windows(2) {
            let edge = self
                .graph
                .find_edge(&pair[0], &pair[1])
                .ok_or_else(|| Error::EdgeNotFound(format!("{} -> {}", pair[0], pair[1])))?;
            let distance = edge.weight(Criteria::DISTANCE).unwrap_or(0.0);
            let second = if criteria == Criteria::DISTANCE {
                edge.weight(Criteria::TIME).unwrap_or(0.0)
            } else {
                edge.weight(criteria).unwrap_or(0.0)
            };
            graph.add_edge(&pair[0], &pair[1], &[distance, second], false)?;
        }

        Ok(graph)
    }

    /// K 最短路径，以子图形式返回
    pub fn yen(&self, start: &str, end: &str, k: usize, criteria: Criteria) -> Result<Vec<Graph>> {
        self.k_shortest_paths(start, end, k, criteria)?
            .iter()
            .map(|path| self.path_graph(path, criteria))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EdgeMode;

    fn create_test_graph(mode: EdgeMode) -> Graph {
        // A -> B -> D -> E
        //  \    \
        //   \-> C -> E
        let mut graph = Graph::new(mode);
        graph.add_edge("A", "B", &[2.0, 0.0], true).unwrap();
        graph.add_edge("A", "C", &[1.0, 0.0], true).unwrap();
        graph.add_edge("B", "D", &[5.0, 0.0], true).unwrap();
        graph.add_edge("B", "C", &[3.0, 0.0], true).unwrap();
        graph.add_edge("D", "E", &[1.0, 0.0], true).unwrap();
        graph.add_edge("C", "E", &[2.0, 0.0], true).unwrap();
        graph
    }

    #[test]
    fn test_all_simple_paths_directed() {
        let graph = create_test_graph(EdgeMode::Directed);
        let finder = PathFinder::new(&graph);

        let paths = finder.all_simple_paths("A", "E").unwrap();
        assert_eq!(
            paths,
            vec![
                vec!["A", "B", "D", "E"],
                vec!["A", "B", "C", "E"],
                vec!["A", "C", "E"],
            ]
        );
        assert!(finder.all_simple_paths("E", "A").unwrap().is_empty());
    }

    #[test]
    fn test_all_simple_paths_undirected() {
        let graph = create_test_graph(EdgeMode::Undirected);
        let finder = PathFinder::new(&graph);

        let paths = finder.all_simple_paths("E", "A").unwrap();
        // E-D-B-A, E-D-B-C-A, E-C-A, E-C-B-A
        assert_eq!(paths.len(), 4);
        for path in &paths {
            let unique: HashSet<&String> = path.iter().collect();
            assert_eq!(unique.len(), path.len());
        }
    }

    #[test]
    fn test_path_cost() {
        let graph = create_test_graph(EdgeMode::Directed);
        let finder = PathFinder::new(&graph);
        let path: Vec<String> = ["A", "B", "D", "E"].iter().map(|s| s.to_string()).collect();
        assert_eq!(finder.path_cost(&path, Criteria::DISTANCE), Some(8.0));

        let broken: Vec<String> = ["A", "E"].iter().map(|s| s.to_string()).collect();
        assert_eq!(finder.path_cost(&broken, Criteria::DISTANCE), None);
    }

    #[test]
    fn test_first_path_is_shortest() {
        let graph = create_test_graph(EdgeMode::Directed);
        let finder = PathFinder::new(&graph);

        let paths = finder
            .k_shortest_paths("A", "E", 1, Criteria::DISTANCE)
            .unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].vertices, vec!["A", "C", "E"]);
        assert_eq!(paths[0].length, 2);
        assert_eq!(paths[0].total_weight, 3.0);
    }

    #[test]
    fn test_yen_branches_from_previous_path() {
        let graph = create_test_graph(EdgeMode::Directed);
        let finder = PathFinder::new(&graph);

        let paths = finder
            .k_shortest_paths("A", "E", 3, Criteria::DISTANCE)
            .unwrap();
        let routes: Vec<&Vec<String>> = paths.iter().map(|p| &p.vertices).collect();
        // 去掉 A->C 后最优为 A-B-C-E(7)，去掉 C->E 后最优为 A-B-D-E(8)
        assert_eq!(
            routes,
            vec![
                &vec!["A".to_string(), "C".to_string(), "E".to_string()],
                &vec!["A".to_string(), "B".to_string(), "C".to_string(), "E".to_string()],
                &vec!["A".to_string(), "B".to_string(), "D".to_string(), "E".to_string()],
            ]
        );
        assert_eq!(paths[1].total_weight, 7.0);
        assert_eq!(paths[2].total_weight, 8.0);
    }

    #[test]
    fn test_yen_graph_weights() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[4.0, 1.0], true).unwrap();
        graph.add_edge("B", "C", &[4.0, 2.0], true).unwrap();
        graph.add_edge("A", "C", &[1.0, 9.0], true).unwrap();
        let finder = PathFinder::new(&graph);

        let by_time = finder.yen("A", "C", 1, Criteria::TIME).unwrap();
        assert_eq!(by_time.len(), 1);
        let path = &by_time[0];
        assert_eq!(path.edge_count(), 2);
        let ab = path.find_edge("A", "B").unwrap();
        assert_eq!(ab.weights().as_slice(), &[4.0, 1.0]);

        let by_distance = finder.yen("A", "C", 1, Criteria::DISTANCE).unwrap();
        assert_eq!(by_distance[0].edge_listing(), vec!["A-->C"]);
        assert_eq!(
            by_distance[0].find_edge("A", "C").unwrap().weights().as_slice(),
            &[1.0, 9.0]
        );
    }

    #[test]
    fn test_yen_no_path_and_zero_k() {
        let mut graph = create_test_graph(EdgeMode::Directed);
        graph.add_vertex("Z").unwrap();
        let finder = PathFinder::new(&graph);

        assert!(finder
            .k_shortest_paths("A", "Z", 3, Criteria::DISTANCE)
            .unwrap()
            .is_empty());
        assert!(finder
            .k_shortest_paths("A", "E", 0, Criteria::DISTANCE)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_yen_bridge_edge_yields_no_alternative() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[1.0, 1.0], true).unwrap();
        let finder = PathFinder::new(&graph);

        let paths = finder
            .k_shortest_paths("A", "B", 3, Criteria::DISTANCE)
            .unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_yen_accepts_negative_weights() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[-3.0, 0.0], true).unwrap();
        graph.add_edge("B", "C", &[1.0, 0.0], true).unwrap();
        graph.add_edge("A", "C", &[0.0, 0.0], true).unwrap();
        let finder = PathFinder::new(&graph);

        let paths = finder
            .k_shortest_paths("A", "C", 1, Criteria::DISTANCE)
            .unwrap();
        assert_eq!(paths[0].vertices, vec!["A", "B", "C"]);
        assert_eq!(paths[0].total_weight, -2.0);
    }

    #[test]
    fn test_path_graphs_skip_metrics() {
        let graph = create_test_graph(EdgeMode::Directed);
        assert!(graph.tracks_metrics());

        let paths = PathFinder::new(&graph)
            .yen("A", "E", 2, Criteria::DISTANCE)
            .unwrap();
        assert!(paths.iter().all(|p| !p.tracks_metrics()));
    }

    #[test]
    fn test_yen_missing_endpoint() {
        let graph = create_test_graph(EdgeMode::Directed);
        let finder = PathFinder::new(&graph);
        assert!(finder
            .yen("A", "Q", 2, Criteria::DISTANCE)
            .unwrap_err()
            .is_not_found());
    }
}
