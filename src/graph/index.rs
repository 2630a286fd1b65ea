//! 边索引
//!
//! 端点对到边 ID 的内存索引，用于重复边检测和按端点查找

use crate::graph::edge::EdgeId;
use crate::types::EdgeMode;
use std::collections::HashMap;

/// 端点对索引
///
/// 有向图按 (from, to) 建键；无向图把端点排序后建键，
/// 这样 (A, B) 和 (B, A) 命中同一条边。
#[derive(Debug, Clone)]
pub struct EdgeIndex {
    mode: EdgeMode,
    pair_to_edge: HashMap<(String, String), EdgeId>,
}

impl EdgeIndex {
    /// 创建新索引
    pub fn new(mode: EdgeMode) -> Self {
        Self {
            mode,
            pair_to_edge: HashMap::new(),
        }
    }

    fn key(&self, a: &str, b: &str) -> (String, String) {
        match self.mode {
            EdgeMode::Undirected if b < a => (b.to_string(), a.to_string()),
            _ => (a.to_string(), b.to_string()),
        }
    }

    /// 添加端点对，已存在时返回原有边 ID 且不覆盖
    pub fn insert(&mut self, a: &str, b: &str, id: EdgeId) -> Option<EdgeId> {
        let key = self.key(a, b);
        if let Some(&existing) = self.pair_to_edge.get(&key) {
            return Some(existing);
        }
        self.pair_to_edge.insert(key, id);
        None
    }

    /// 查找连接 a、b 的边
    pub fn get(&self, a: &str, b: &str) -> Option<EdgeId> {
        self.pair_to_edge.get(&self.key(a, b)).copied()
    }

    /// 移除端点对
    pub fn remove(&mut self, a: &str, b: &str) -> Option<EdgeId> {
        let key = self.key(a, b);
        self.pair_to_edge.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.pair_to_edge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pair_to_edge.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_keys_are_ordered() {
        let mut index = EdgeIndex::new(EdgeMode::Directed);
        assert_eq!(index.insert("A", "B", EdgeId::new(1)), None);
        assert_eq!(index.insert("B", "A", EdgeId::new(2)), None);
        assert_eq!(index.get("A", "B"), Some(EdgeId::new(1)));
        assert_eq!(index.get("B", "A"), Some(EdgeId::new(2)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_undirected_keys_are_unordered() {
        let mut index = EdgeIndex::new(EdgeMode::Undirected);
        assert_eq!(index.insert("B", "A", EdgeId::new(1)), None);
        assert_eq!(index.insert("A", "B", EdgeId::new(2)), Some(EdgeId::new(1)));
        assert_eq!(index.get("A", "B"), Some(EdgeId::new(1)));

        assert_eq!(index.remove("A", "B"), Some(EdgeId::new(1)));
        assert!(index.is_empty());
    }
}
