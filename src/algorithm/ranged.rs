//! 有界代价可达性（ranged DFS）

use super::timed;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::metrics::AlgorithmKind;
use crate::types::Criteria;
use indexmap::IndexSet;
use std::collections::HashMap;
use tracing::debug;

/// 有界代价搜索
pub struct RangedSearch<'a> {
    graph: &'a Graph,
}

impl<'a> RangedSearch<'a> {
    /// 创建搜索实例
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 从 start 出发、累计权重严格小于 range 即可到达的顶点（含 start，按发现顺序）
    pub fn reachable(&self, start: &str, range: f64, criteria: Criteria) -> Result<Vec<String>> {
        timed(AlgorithmKind::RangedDfs, || {
            if !self.graph.contains_vertex(start) {
                return Err(Error::VertexNotFound(start.to_string()));
            }
            if range.is_nan() {
                return Err(Error::InvalidArgument("range 不能为 NaN".to_string()));
            }
            self.graph.validate_criteria(criteria, true)?;

            let mut found = IndexSet::new();
            found.insert(start.to_string());
            let mut expanded = HashMap::new();

            self.visit(start, None, 0.0, range, criteria, &mut expanded, &mut found);

            debug!(start, range, criteria = %criteria, found = found.len(), "范围搜索完成");
            Ok(found.into_iter().collect())
        })
    }

    /// 深度优先扩展
    ///
    /// 有向图只沿 from == current 的边前进；无向图不沿刚走过的边折返。
    /// 已经以不大于当前累计值展开过的顶点不再展开。
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        current: &str,
        previous: Option<&str>,
        accumulated: f64,
        range: f64,
        criteria: Criteria,
        expanded: &mut HashMap<String, f64>,
        found: &mut IndexSet<String>,
    ) {
        if accumulated >= range {
            return;
        }
        if let Some(&seen) = expanded.get(current) {
            if seen <= accumulated {
                return;
            }
        }
        expanded.insert(current.to_string(), accumulated);

        let undirected = !self.graph.is_directed();
        for edge in self.graph.adjacent_edges(current) {
            let next = match edge.traverse_from(current) {
                Some(next) => next,
                None => continue,
            };
            if undirected && previous == Some(next) {
                continue;
            }

            let total = accumulated + edge.weight(criteria).unwrap_or(f64::INFINITY);
            if total < range {
                found.insert(next.to_string());
                self.visit(next, Some(current), total, range, criteria, expanded, found);
            }
        }
    }

    /// 范围之外的顶点：克隆整张图后删掉所有可达顶点，剩下的即为结果
    pub fn unreachable(&self, start: &str, range: f64, criteria: Criteria) -> Result<Vec<String>> {
        let reachable = self.reachable(start, range, criteria)?;

        let mut remaining = self.graph.clone().untracked();
        for id in &reachable {
            remaining.remove_vertex(id)?;
        }

        Ok(remaining.vertex_ids())
    }
}
