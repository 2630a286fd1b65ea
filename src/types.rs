//! 通用类型定义
//!
//! 权重维度选择器、权重向量和边的方向模式

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// 默认权重维度数（距离、时间）
pub const WEIGHT_DIMENSIONS: usize = 2;

/// 权重向量，按维度索引
pub type Weights = SmallVec<[f64; WEIGHT_DIMENSIONS]>;

/// 全零权重向量（用于最短路径树的树边）
pub fn zero_weights() -> Weights {
    SmallVec::from_elem(0.0, WEIGHT_DIMENSIONS)
}

/// 权重维度选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Criteria(pub usize);

impl Criteria {
    /// 距离维度
    pub const DISTANCE: Criteria = Criteria(0);
    /// 时间维度
    pub const TIME: Criteria = Criteria(1);

    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn name(&self) -> String {
        match *self {
            Criteria::DISTANCE => "distance".to_string(),
            Criteria::TIME => "time".to_string(),
            Criteria(n) => format!("criteria#{}", n),
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::DISTANCE
    }
}

impl From<usize> for Criteria {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Criteria {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "distance" | "dist" | "d" => Ok(Criteria::DISTANCE),
            "time" | "t" => Ok(Criteria::TIME),
            other => other
                .parse::<usize>()
                .map(Criteria)
                .map_err(|_| Error::InvalidArgument(format!("无法识别的权重维度: {}", s))),
        }
    }
}

/// 边的方向模式（图构造时确定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// 有向边（from → to）
    Directed,
    /// 无向边（端点无序）
    #[default]
    Undirected,
}

impl EdgeMode {
    pub fn is_directed(&self) -> bool {
        matches!(self, EdgeMode::Directed)
    }

    /// 边列表输出时使用的分隔符
    pub fn separator(&self) -> &'static str {
        match self {
            EdgeMode::Directed => "-->",
            EdgeMode::Undirected => "---",
        }
    }
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeMode::Directed => write!(f, "directed"),
            EdgeMode::Undirected => write!(f, "undirected"),
        }
    }
}

impl FromStr for EdgeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "directed" | "d" => Ok(EdgeMode::Directed),
            "undirected" | "u" => Ok(EdgeMode::Undirected),
            _ => Err(Error::InvalidArgument(format!("无法识别的图模式: {}", s))),
        }
    }
}
