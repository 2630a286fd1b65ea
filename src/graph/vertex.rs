//! 顶点定义

use crate::graph::edge::EdgeId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// 顶点
///
/// 邻接表只保存边 ID，边本身由图统一持有，
/// 因此两个端点看到的永远是同一条边。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点标识符
    identifier: String,
    /// 邻接边（按插入顺序）
    edges: Vec<EdgeId>,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            edges: Vec::new(),
        }
    }

    /// 获取顶点标识符
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 获取邻接边 ID
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// 邻接边数量
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }

    pub(crate) fn attach(&mut self, id: EdgeId) {
        if !self.edges.contains(&id) {
            self.edges.push(id);
        }
    }

    pub(crate) fn detach(&mut self, id: EdgeId) -> bool {
        match self.edges.iter().position(|&e| e == id) {
            Some(pos) => {
                self.edges.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}
