//! 图数据结构
//!
//! 内存中的多维权重图，支持有向 / 无向两种模式

use super::edge::{Edge, EdgeId};
use super::index::EdgeIndex;
use super::vertex::Vertex;
use crate::error::{Error, Result};
use crate::metrics::global_metrics;
use crate::types::{Criteria, EdgeMode, Weights};
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// 图
///
/// 边只存一份（`edges`），两个端点的邻接表保存边 ID，
/// 修改权重时两端同时可见。`Clone` 是深拷贝，克隆后的图与原图完全独立。
#[derive(Debug, Clone)]
pub struct Graph {
    /// 方向模式（构造时确定）
    mode: EdgeMode,
    /// 顶点（按插入顺序）
    vertices: IndexMap<String, Vertex>,
    /// 边表
    edges: IndexMap<EdgeId, Edge>,
    /// 端点对索引
    edge_index: EdgeIndex,
    /// 下一个边 ID
    next_edge_id: u64,
    /// 是否把增删计入全局指标（算法内部构造的图不计）
    track_metrics: bool,
}

impl Graph {
    /// 创建空图
    pub fn new(mode: EdgeMode) -> Self {
        Self {
            mode,
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            edge_index: EdgeIndex::new(mode),
            next_edge_id: 1,
            track_metrics: true,
        }
    }

    /// 关闭指标统计，用于算法内部派生的图
    pub(crate) fn untracked(mut self) -> Self {
        self.track_metrics = false;
        self
    }

    /// 增删是否计入全局指标
    pub fn tracks_metrics(&self) -> bool {
        self.track_metrics
    }

    /// 创建空的有向图
    pub fn directed() -> Self {
        Self::new(EdgeMode::Directed)
    }

    /// 创建空的无向图
    pub fn undirected() -> Self {
        Self::new(EdgeMode::Undirected)
    }

    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    pub fn is_directed(&self) -> bool {
        self.mode.is_directed()
    }

    fn validate_identifier(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("顶点标识符不能为空".to_string()));
        }
        Ok(())
    }

    fn require_vertex(&self, id: &str) -> Result<&Vertex> {
        self.vertices
            .get(id)
            .ok_or_else(|| Error::VertexNotFound(id.to_string()))
    }

    fn pair_label(&self, v1: &str, v2: &str) -> String {
        format!("{}{}{}", v1, self.mode.separator(), v2)
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点
    pub fn add_vertex(&mut self, id: &str) -> Result<()> {
        Self::validate_identifier(id)?;
        if self.vertices.contains_key(id) {
            return Err(Error::VertexAlreadyExists(id.to_string()));
        }

        self.vertices.insert(id.to_string(), Vertex::new(id));
        if self.track_metrics {
            global_metrics().record_vertex_insert();
        }
        trace!(vertex = id, "添加顶点");

        Ok(())
    }

    /// 删除顶点及其所有关联边
    pub fn remove_vertex(&mut self, id: &str) -> Result<Vertex> {
        Self::validate_identifier(id)?;
        let incident = self.require_vertex(id)?.edges().to_vec();

        for edge_id in incident {
            self.detach_edge(edge_id)?;
        }

        let vertex = self
            .vertices
            .shift_remove(id)
            .ok_or_else(|| Error::VertexNotFound(id.to_string()))?;
        if self.track_metrics {
            global_metrics().record_vertex_remove();
        }
        trace!(vertex = id, "删除顶点");

        Ok(vertex)
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 判断顶点是否存在
    pub fn contains_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// 获取顶点
    pub fn get_vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// 按插入顺序遍历顶点
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// 所有顶点标识符（按插入顺序）
    pub fn vertex_ids(&self) -> Vec<String> {
        self.vertices.keys().cloned().collect()
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 端点不存在时，`force` 为 true 则自动创建，否则失败。
    /// 不允许重复边：有向图按有序端点对判断，无向图按无序端点对判断。
    pub fn add_edge(&mut self, v1: &str, v2: &str, weights: &[f64], force: bool) -> Result<EdgeId> {
        Self::validate_identifier(v1)?;
        Self::validate_identifier(v2)?;
        if weights.is_empty() {
            return Err(Error::InvalidArgument("边至少需要一个权重维度".to_string()));
        }

        for endpoint in [v1, v2] {
            if !self.vertices.contains_key(endpoint) && !force {
                return Err(Error::VertexNotFound(endpoint.to_string()));
            }
        }
        for endpoint in [v1, v2] {
            if !self.vertices.contains_key(endpoint) {
                self.add_vertex(endpoint)?;
            }
        }

        let id = EdgeId::new(self.next_edge_id);
        if self.edge_index.insert(v1, v2, id).is_some() {
            return Err(Error::EdgeAlreadyExists(self.pair_label(v1, v2)));
        }
        self.next_edge_id += 1;

        let edge = Edge::new(id, v1, v2, Weights::from_slice(weights), self.mode);
        for endpoint in [v1, v2] {
            if let Some(vertex) = self.vertices.get_mut(endpoint) {
                vertex.attach(id);
            }
        }
        trace!(edge = %edge, "添加边");
        self.edges.insert(id, edge);
        if self.track_metrics {
            global_metrics().record_edge_insert();
        }

        Ok(id)
    }

    /// 按端点删除边
    pub fn remove_edge(&mut self, v1: &str, v2: &str) -> Result<Edge> {
        Self::validate_identifier(v1)?;
        Self::validate_identifier(v2)?;
        self.require_vertex(v1)?;
        self.require_vertex(v2)?;

        let id = self
            .edge_index
            .get(v1, v2)
            .ok_or_else(|| Error::EdgeNotFound(self.pair_label(v1, v2)))?;
        self.detach_edge(id)
    }

    /// 删除与给定边相等的边
    pub fn remove_edge_by(&mut self, edge: &Edge) -> Result<Edge> {
        self.remove_edge(edge.from(), edge.to())
    }

    /// 从边表和两个端点的邻接表中移除边
    fn detach_edge(&mut self, id: EdgeId) -> Result<Edge> {
        let edge = self
            .edges
            .shift_remove(&id)
            .ok_or_else(|| Error::EdgeNotFound(format!("#{}", id.as_u64())))?;

        self.edge_index.remove(edge.from(), edge.to());
        for endpoint in [edge.from(), edge.to()] {
            if let Some(vertex) = self.vertices.get_mut(endpoint) {
                vertex.detach(id);
            }
        }
        if self.track_metrics {
            global_metrics().record_edge_remove();
        }
        trace!(edge = %edge, "删除边");

        Ok(edge)
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 按插入顺序遍历边
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// 获取边
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// 查找连接 v1、v2 的边（按边的相等规则）
    pub fn find_edge(&self, v1: &str, v2: &str) -> Option<&Edge> {
        self.edge_index
            .get(v1, v2)
            .and_then(|id| self.edges.get(&id))
    }

    /// 获取顶点的邻接边（按插入顺序）
    pub fn edges_of(&self, id: &str) -> Result<Vec<&Edge>> {
        self.require_vertex(id)?;
        Ok(self.adjacent_edges(id).collect())
    }

    /// 顶点的邻接边迭代器，顶点不存在时为空
    pub(crate) fn adjacent_edges<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.vertices.get(id).into_iter().flat_map(move |vertex| {
            vertex
                .edges()
                .iter()
                .filter_map(move |edge_id| self.edges.get(edge_id))
        })
    }

    /// 获取顶点的邻居（有向图只含出边指向的顶点）
    pub fn neighbors(&self, id: &str) -> Result<Vec<String>> {
        self.require_vertex(id)?;
        Ok(self
            .adjacent_edges(id)
            .filter_map(|edge| edge.traverse_from(id))
            .map(str::to_string)
            .collect())
    }

    /// 获取 v1、v2 之间的边在指定维度上的权重
    pub fn edge_weight(&self, v1: &str, v2: &str, criteria: Criteria) -> Option<f64> {
        self.find_edge(v1, v2)
            .and_then(|edge| edge.weight(criteria))
    }

    /// 修改 v1、v2 之间边的权重，返回旧值
    pub fn set_edge_weight(
        &mut self,
        v1: &str,
        v2: &str,
        criteria: Criteria,
        value: f64,
    ) -> Result<f64> {
        self.require_vertex(v1)?;
        self.require_vertex(v2)?;
        let label = self.pair_label(v1, v2);
        let id = self
            .edge_index
            .get(v1, v2)
            .ok_or_else(|| Error::EdgeNotFound(label.clone()))?;
        let edge = self
            .edges
            .get_mut(&id)
            .ok_or(Error::EdgeNotFound(label))?;
        edge.set_weight(criteria, value)
    }

    /// 每条边一行：`A-->B`（有向）或 `A---B`（无向）
    pub fn edge_listing(&self) -> Vec<String> {
        self.edges.values().map(Edge::label).collect()
    }

    /// 检查所有边都有指定的权重维度
    ///
    /// `non_negative` 为 true 时还要求该维度上的权重非负且不是 NaN。
    pub(crate) fn validate_criteria(&self, criteria: Criteria, non_negative: bool) -> Result<()> {
        for edge in self.edges.values() {
            let weight = edge.weight(criteria).ok_or_else(|| Error::InvalidCriteria {
                criteria: criteria.index(),
                edge: edge.label(),
                dimensions: edge.dimensions(),
            })?;
            if non_negative && !(weight >= 0.0) {
                return Err(Error::NegativeWeight {
                    edge: edge.label(),
                    criteria: criteria.index(),
                    weight,
                });
            }
        }
        Ok(())
    }

    // ==================== 集合操作 ====================

    /// 两个顶点集合的交集，保持第一个集合的顺序
    pub fn common_vertices<S>(set_a: &[S], set_b: &[S]) -> Vec<S>
    where
        S: AsRef<str> + Clone,
    {
        set_a
            .iter()
            .filter(|a| set_b.iter().any(|b| b.as_ref() == a.as_ref()))
            .cloned()
            .collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(EdgeMode::default())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vertex in self.vertices.values() {
            let id = vertex.identifier();
            let neighbors: Vec<&str> = self
                .adjacent_edges(id)
                .filter_map(|edge| edge.traverse_from(id))
                .collect();
            writeln!(f, "{}: {}", id, neighbors.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_twice() {
        let mut graph = Graph::undirected();
        let before = graph.vertex_count();

        assert!(graph.add_vertex("test").is_ok());
        assert_eq!(graph.vertex_count() - before, 1);
        assert!(graph.contains_vertex("test"));

        let err = graph.add_vertex("test").unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(graph.vertex_count() - before, 1);
    }

    #[test]
    fn test_add_vertex_empty_identifier() {
        let mut graph = Graph::undirected();
        assert!(matches!(
            graph.add_vertex(""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_edge_without_force() {
        let mut graph = Graph::undirected();
        assert!(matches!(
            graph.add_edge("A", "B", &[1.0, 0.0], false),
            Err(Error::VertexNotFound(_))
        ));
        assert_eq!(graph.vertex_count(), 0);

        graph.add_vertex("A").unwrap();
        // B 缺失，A 不应被修改
        assert!(graph.add_edge("A", "B", &[1.0, 0.0], false).is_err());
        assert_eq!(graph.get_vertex("A").unwrap().degree(), 0);

        graph.add_vertex("B").unwrap();
        assert!(graph.add_edge("A", "B", &[1.0, 0.0], false).is_ok());
        assert!(graph.add_edge("A", "B", &[1.0, 0.0], false).is_err());
    }

    #[test]
    fn test_add_edge_with_force() {
        let mut graph = Graph::undirected();
        assert!(graph.add_edge("A", "B", &[1.0, 0.0], true).is_ok());
        assert_eq!(graph.vertex_count(), 2);

        let err = graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(graph.get_vertex("A").unwrap().degree(), 1);
        assert_eq!(graph.get_vertex("B").unwrap().degree(), 1);
    }

    #[test]
    fn test_undirected_duplicate_is_unordered() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap();
        assert!(graph.add_edge("B", "A", &[2.0, 0.0], true).is_err());

        let mut directed = Graph::directed();
        directed.add_edge("A", "B", &[1.0, 0.0], true).unwrap();
        assert!(directed.add_edge("B", "A", &[2.0, 0.0], true).is_ok());
        assert_eq!(directed.edge_count(), 2);
    }

    #[test]
    fn test_undirected_adjacency_symmetry() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[3.0, 1.0], true).unwrap();

        let a_edges = graph.edges_of("A").unwrap();
        let b_edges = graph.edges_of("B").unwrap();
        assert_eq!(a_edges.len(), 1);
        assert_eq!(b_edges.len(), 1);
        assert_eq!(a_edges[0].other_endpoint("A"), Some("B"));
        assert_eq!(b_edges[0].other_endpoint("B"), Some("A"));
        assert_eq!(graph.neighbors("B").unwrap(), vec!["A".to_string()]);
    }

    #[test]
    fn test_remove_edge_round_trip() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap();

        let removed = graph.remove_edge("A", "B").unwrap();
        assert_eq!(removed.label(), "A-->B");
        assert!(graph.edges_of("A").unwrap().is_empty());
        assert!(graph.edges_of("B").unwrap().is_empty());
        assert_eq!(graph.edge_count(), 0);

        // 再删一次应失败
        assert!(graph.remove_edge("A", "B").unwrap_err().is_not_found());
        assert!(graph.remove_edge("A", "Z").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_edge_by_value() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap();
        let probe = graph.find_edge("B", "A").unwrap().clone();

        assert!(graph.remove_edge_by(&probe).is_ok());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_vertex_cleans_other_endpoints() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap();
        graph.add_edge("A", "C", &[1.0, 0.0], true).unwrap();
        graph.add_edge("B", "C", &[1.0, 0.0], true).unwrap();

        graph.remove_vertex("A").unwrap();
        assert!(!graph.contains_vertex("A"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_vertex("B").unwrap().degree(), 1);
        assert_eq!(graph.get_vertex("C").unwrap().degree(), 1);

        assert!(graph.remove_vertex("A").unwrap_err().is_not_found());
        assert!(matches!(
            graph.remove_vertex(""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_weight_update_visible_from_both_endpoints() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "B", &[1.0, 2.0], true).unwrap();

        let old = graph
            .set_edge_weight("B", "A", Criteria::DISTANCE, 9.0)
            .unwrap();
        assert_eq!(old, 1.0);
        assert_eq!(graph.edges_of("A").unwrap()[0].weight(Criteria::DISTANCE), Some(9.0));
        assert_eq!(graph.edges_of("B").unwrap()[0].weight(Criteria::DISTANCE), Some(9.0));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[1.0, 2.0], true).unwrap();

        let mut copy = graph.clone();
        copy.set_edge_weight("A", "B", Criteria::DISTANCE, 50.0)
            .unwrap();
        copy.remove_vertex("B").unwrap();

        assert_eq!(graph.edge_weight("A", "B", Criteria::DISTANCE), Some(1.0));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(copy.vertex_count(), 1);
    }

    #[test]
    fn test_self_loop_stored_once() {
        let mut graph = Graph::undirected();
        graph.add_edge("A", "A", &[1.0, 0.0], true).unwrap();
        assert_eq!(graph.get_vertex("A").unwrap().degree(), 1);

        graph.remove_vertex("A").unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_common_vertices_keeps_first_order() {
        let a = vec!["D".to_string(), "A".to_string(), "C".to_string()];
        let b = vec!["C".to_string(), "B".to_string(), "D".to_string()];
        assert_eq!(
            Graph::common_vertices(&a, &b),
            vec!["D".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_edge_listing_and_display() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[1.0, 0.0], true).unwrap();
        graph.add_edge("A", "C", &[1.0, 0.0], true).unwrap();

        assert_eq!(graph.edge_listing(), vec!["A-->B", "A-->C"]);
        assert_eq!(graph.to_string(), "A: B, C\nB: \nC: \n");
    }

    #[test]
    fn test_validate_criteria() {
        let mut graph = Graph::directed();
        graph.add_edge("A", "B", &[1.0], true).unwrap();
        assert!(graph.validate_criteria(Criteria::DISTANCE, true).is_ok());
        assert!(matches!(
            graph.validate_criteria(Criteria::TIME, false),
            Err(Error::InvalidCriteria { .. })
        ));

        graph.add_edge("B", "C", &[-1.0], true).unwrap();
        assert!(matches!(
            graph.validate_criteria(Criteria::DISTANCE, true),
            Err(Error::NegativeWeight { .. })
        ));
    }
}
