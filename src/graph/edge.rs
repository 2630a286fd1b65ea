//! 边定义
//!
//! 有向 / 无向两种模式共用同一结构，端点按插入顺序保存，
//! 方向语义只在比较和遍历时按模式分支一次

use crate::error::{Error, Result};
use crate::types::{Criteria, EdgeMode, Weights};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（图内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// 边
///
/// 相等性只看端点和模式：有向边要求 from/to 完全一致，
/// 无向边只要求端点集合一致。ID 和权重不参与比较。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 端点（有向时为 from, to）
    endpoints: (String, String),
    /// 方向模式
    mode: EdgeMode,
    /// 各维度权重
    weights: Weights,
}

impl Edge {
    /// 创建新边
    pub fn new(
        id: EdgeId,
        v1: impl Into<String>,
        v2: impl Into<String>,
        weights: Weights,
        mode: EdgeMode,
    ) -> Self {
        Self {
            id,
            endpoints: (v1.into(), v2.into()),
            mode,
            weights,
        }
    }

    /// 获取边 ID
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// 获取方向模式
    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    pub fn is_directed(&self) -> bool {
        self.mode.is_directed()
    }

    /// 起点（无向边为插入时的第一个端点）
    pub fn from(&self) -> &str {
        &self.endpoints.0
    }

    /// 终点（无向边为插入时的第二个端点）
    pub fn to(&self) -> &str {
        &self.endpoints.1
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.endpoints.0, &self.endpoints.1)
    }

    pub fn is_self_loop(&self) -> bool {
        self.endpoints.0 == self.endpoints.1
    }

    /// 获取所有维度的权重
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// 权重维度数
    pub fn dimensions(&self) -> usize {
        self.weights.len()
    }

    /// 获取指定维度的权重
    pub fn weight(&self, criteria: Criteria) -> Option<f64> {
        self.weights.get(criteria.index()).copied()
    }

    /// 设置指定维度的权重，返回旧值
    pub fn set_weight(&mut self, criteria: Criteria, value: f64) -> Result<f64> {
        let dimensions = self.weights.len();
        let label = self.label();
        let slot = self
            .weights
            .get_mut(criteria.index())
            .ok_or(Error::InvalidCriteria {
                criteria: criteria.index(),
                edge: label,
                dimensions,
            })?;
        Ok(std::mem::replace(slot, value))
    }

    /// 判断这条边是否连接 a 和 b（按模式的相等规则）
    pub fn connects(&self, a: &str, b: &str) -> bool {
        let (v1, v2) = self.endpoints();
        match self.mode {
            EdgeMode::Directed => v1 == a && v2 == b,
            EdgeMode::Undirected => (v1 == a && v2 == b) || (v1 == b && v2 == a),
        }
    }

    /// 顶点是否为该边的端点
    pub fn is_incident(&self, vertex: &str) -> bool {
        self.endpoints.0 == vertex || self.endpoints.1 == vertex
    }

    /// 获取另一端点（不考虑方向）
    pub fn other_endpoint(&self, vertex: &str) -> Option<&str> {
        if self.endpoints.0 == vertex {
            Some(&self.endpoints.1)
        } else if self.endpoints.1 == vertex {
            Some(&self.endpoints.0)
        } else {
            None
        }
    }

    /// 从 vertex 出发沿这条边能到达的顶点
    ///
    /// 有向边只能从 from 走向 to；无向边两个方向都可以。
    pub fn traverse_from(&self, vertex: &str) -> Option<&str> {
        match self.mode {
            EdgeMode::Directed if self.endpoints.0 == vertex => Some(&self.endpoints.1),
            EdgeMode::Directed => None,
            EdgeMode::Undirected => self.other_endpoint(vertex),
        }
    }

    /// 文本形式，如 `A-->B` 或 `A---B`
    pub fn label(&self) -> String {
        format!(
            "{}{}{}",
            self.endpoints.0,
            self.mode.separator(),
            self.endpoints.1
        )
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.connects(other.from(), other.to())
    }
}

impl Eq for Edge {}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
