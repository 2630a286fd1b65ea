//! 引擎配置
//!
//! 从 JSON 文件加载，命令行参数可以覆盖其中的字段

use crate::error::{Error, Result};
use crate::types::{Criteria, EdgeMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 表格
    #[default]
    Table,
    /// 垂直（每行一个字段）
    Vertical,
    /// JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "vertical" | "\\g" => Ok(OutputFormat::Vertical),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidArgument(format!("不支持的输出格式: {}", s))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Vertical => write!(f, "vertical"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 图模式
    pub mode: EdgeMode,
    /// 默认权重维度
    pub default_criteria: Criteria,
    /// 日志级别（`RUST_LOG` 优先）
    pub log_level: String,
    /// 输出格式
    pub output_format: OutputFormat,
    /// 添加边时自动创建缺失的端点
    pub force_edges: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EdgeMode::Undirected,
            default_criteria: Criteria::DISTANCE,
            log_level: "info".to_string(),
            output_format: OutputFormat::Table,
            force_edges: true,
        }
    }
}

impl EngineConfig {
    /// 从 JSON 文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("无法读取 {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| Error::ConfigError(format!("配置解析失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(Error::ConfigError("log_level 不能为空".to_string()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"mode":"directed","default_criteria":1}"#).unwrap();
        assert_eq!(config.mode, EdgeMode::Directed);
        assert_eq!(config.default_criteria, Criteria::TIME);
        assert_eq!(config.log_level, "info");
        assert!(config.force_edges);
    }

    #[test]
    fn test_invalid_config() {
        assert!(EngineConfig::from_json(r#"{"mode":"sideways"}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"log_level":" "}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"output_format":"json","force_edges":false}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(!config.force_edges);

        let round = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(round, config);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("Vertical".parse::<OutputFormat>().unwrap(), OutputFormat::Vertical);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
