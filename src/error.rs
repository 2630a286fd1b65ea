//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("顶点不存在: {0}")]
    VertexNotFound(String),

    #[error("边不存在: {0}")]
    EdgeNotFound(String),

    #[error("顶点已存在: {0}")]
    VertexAlreadyExists(String),

    #[error("边已存在: {0}")]
    EdgeAlreadyExists(String),

    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("无效的权重维度: {criteria} (边 {edge} 只有 {dimensions} 个维度)")]
    InvalidCriteria {
        criteria: usize,
        edge: String,
        dimensions: usize,
    },

    #[error("负权重或非数值权重: 边 {edge} 在维度 {criteria} 上为 {weight}")]
    NegativeWeight {
        edge: String,
        criteria: usize,
        weight: f64,
    },

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 引用了不存在的顶点或边
    NotFound,
    /// 重复创建已存在的顶点或边
    Duplicate,
    /// 参数无效（空标识符、错误的权重维度等）
    InvalidArgument,
    /// 导入、配置、IO 等外围错误
    Other,
}

impl Error {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::VertexNotFound(_) | Error::EdgeNotFound(_) => ErrorKind::NotFound,
            Error::VertexAlreadyExists(_) | Error::EdgeAlreadyExists(_) => ErrorKind::Duplicate,
            Error::InvalidArgument(_)
            | Error::InvalidCriteria { .. }
            | Error::NegativeWeight { .. } => ErrorKind::InvalidArgument,
            Error::ImportError(_)
            | Error::ConfigError(_)
            | Error::IoError(_)
            | Error::SerializationError(_) => ErrorKind::Other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_duplicate(&self) -> bool {
        self.kind() == ErrorKind::Duplicate
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::ImportError(e.to_string())
    }
}
