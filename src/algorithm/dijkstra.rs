//! Dijkstra 单源最短路径树
//!
//! 使用可寻址优先队列（`priority_queue::PriorityQueue`）实现 decrease-key：
//! 顶点已在队列中时直接更新其优先级，不再移除后重新插入。

use super::timed;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::metrics::AlgorithmKind;
use crate::types::{zero_weights, Criteria, EdgeMode};
use indexmap::IndexMap;
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use tracing::{debug, trace};

/// 队列优先级：累计距离；距离相同时先入队的先出队
#[derive(Debug, Clone, Copy)]
struct QueueCost {
    distance: f64,
    seq: u64,
}

impl PartialEq for QueueCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueCost {}

impl PartialOrd for QueueCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// 最短路径树及其距离表
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    /// 源点
    pub source: String,
    /// 使用的权重维度
    pub criteria: Criteria,
    /// 树结构：每个可达的非源点恰有一条入边 `前驱 --> 顶点`，边权全为零
    pub tree: Graph,
    /// 各顶点的最短距离（不可达为正无穷）
    pub distances: IndexMap<String, f64>,
    /// 各顶点的前驱
    pub predecessors: IndexMap<String, Option<String>>,
}

impl ShortestPathTree {
    /// 获取最短距离，不可达时返回 None
    pub fn distance(&self, id: &str) -> Option<f64> {
        self.distances
            .get(id)
            .copied()
            .filter(|d| d.is_finite())
    }

    pub fn is_reachable(&self, id: &str) -> bool {
        self.distance(id).is_some()
    }

    /// 获取前驱
    pub fn predecessor(&self, id: &str) -> Option<&str> {
        self.predecessors.get(id).and_then(|p| p.as_deref())
    }

    /// 从源点到 id 的顶点序列
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        self.distance(id)?;

        let mut path = vec![id.to_string()];
        let mut current = id;
        while current != self.source {
            current = self.predecessor(current)?;
            path.push(current.to_string());
            if path.len() > self.distances.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }
}

/// Dijkstra 算法
pub struct Dijkstra<'a> {
    graph: &'a Graph,
}

impl<'a> Dijkstra<'a> {
    /// 创建算法实例
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 计算从 source 出发的最短路径树
    pub fn shortest_path_tree(&self, source: &str, criteria: Criteria) -> Result<ShortestPathTree> {
        timed(AlgorithmKind::Dijkstra, || self.run(source, criteria))
    }

    fn run(&self, source: &str, criteria: Criteria) -> Result<ShortestPathTree> {
        if !self.graph.contains_vertex(source) {
            return Err(Error::VertexNotFound(source.to_string()));
        }
        self.graph.validate_criteria(criteria, true)?;
        debug!(
            source,
            criteria = %criteria,
            vertices = self.graph.vertex_count(),
            "开始计算最短路径树"
        );

        let mut distances: IndexMap<String, f64> = self
            .graph
            .vertices()
            .map(|v| (v.identifier().to_string(), f64::INFINITY))
            .collect();
        let mut predecessors: IndexMap<String, Option<String>> = self
            .graph
            .vertices()
            .map(|v| (v.identifier().to_string(), None))
            .collect();
        distances.insert(source.to_string(), 0.0);

        let mut finalized: HashSet<String> = HashSet::new();
        let mut queue: PriorityQueue<String, Reverse<QueueCost>> = PriorityQueue::new();
        let mut seq = 0u64;
        queue.push(
            source.to_string(),
            Reverse(QueueCost { distance: 0.0, seq }),
        );

        let undirected = self.graph.mode() == EdgeMode::Undirected;

        while let Some((current, Reverse(cost))) = queue.pop() {
            finalized.insert(current.clone());
            let back = predecessors.get(&current).cloned().flatten();

            for edge in self.graph.adjacent_edges(&current) {
                let next = match edge.traverse_from(&current) {
                    Some(next) => next,
                    None => continue,
                };
                if finalized.contains(next) {
                    continue;
                }
                // 无向图不沿来时的边折返
                if undirected && back.as_deref() == Some(next) {
                    continue;
                }

                let weight = edge.weight(criteria).unwrap_or(f64::INFINITY);
                let candidate = cost.distance + weight;
                let known = distances.get(next).copied().unwrap_or(f64::INFINITY);

                // 非严格比较：等距时改挂到最近发现的前驱
                if known >= candidate {
                    distances.insert(next.to_string(), candidate);
                    predecessors.insert(next.to_string(), Some(current.clone()));
                    seq += 1;
                    queue.push(
                        next.to_string(),
                        Reverse(QueueCost {
                            distance: candidate,
                            seq,
                        }),
                    );
                    trace!(from = %current, to = next, distance = candidate, "松弛");
                }
            }
        }

        let mut tree = Graph::new(EdgeMode::Directed).untracked();
        for vertex in self.graph.vertices() {
            tree.add_vertex(vertex.identifier())?;
        }
        for (id, predecessor) in &predecessors {
            if let Some(predecessor) = predecessor {
                tree.add_edge(predecessor, id, &zero_weights(), false)?;
            }
        }

        debug!(
            source,
            reachable = finalized.len(),
            tree_edges = tree.edge_count(),
            "最短路径树计算完成"
        );

        Ok(ShortestPathTree {
            source: source.to_string(),
            criteria,
            tree,
            distances,
            predecessors,
        })
    }
}
