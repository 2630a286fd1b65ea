//! 数据导入模块
//!
//! 支持从 CSV、JSON Lines 批量导入带权边列表

use crate::error::{Error, Result};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// 导入统计
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportStats {
    pub vertices_imported: usize,
    pub edges_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

/// 边记录（CSV 格式，表头 `from,to,distance,time`）
#[derive(Debug, Deserialize)]
struct CsvEdgeRecord {
    from: String,
    to: String,
    distance: f64,
    #[serde(default)]
    time: f64,
}

/// 边记录（JSON 格式）
#[derive(Debug, Serialize, Deserialize)]
struct JsonEdgeRecord {
    from: String,
    to: String,
    weights: Vec<f64>,
}

/// 边列表导入器
///
/// 单行解析或插入失败只计入 `errors`，不会中断整个导入。
pub struct BatchImporter<'a> {
    graph: &'a mut Graph,
    force: bool,
}

impl<'a> BatchImporter<'a> {
    /// 创建导入器，默认自动创建缺失的端点
    pub fn new(graph: &'a mut Graph) -> Self {
        Self { graph, force: true }
    }

    /// 是否自动创建缺失的端点
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// 从 CSV 文件导入
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportStats> {
        let file = File::open(path)?;
        self.import_csv_reader(file)
    }

    /// 从任意 CSV 输入导入
    pub fn import_csv_reader<R: Read>(&mut self, reader: R) -> Result<ImportStats> {
        let start = std::time::Instant::now();
        let vertices_before = self.graph.vertex_count();
        let mut stats = ImportStats::default();

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        for (row, record) in rdr.deserialize::<CsvEdgeRecord>().enumerate() {
            let result = record
                .map_err(Error::from)
                .and_then(|r| self.insert(&r.from, &r.to, &[r.distance, r.time]));
            match result {
                Ok(()) => stats.edges_imported += 1,
                Err(e) => {
                    // 表头占第 1 行
                    warn!(line = row + 2, error = %e, "跳过无效的 CSV 行");
                    stats.errors += 1;
                }
            }
        }

        self.finish(stats, vertices_before, start)
    }

    /// 从 JSON Lines 文件导入
    pub fn import_jsonl<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportStats> {
        let file = File::open(path)?;
        self.import_jsonl_reader(BufReader::new(file))
    }

    /// 从任意 JSON Lines 输入导入
    pub fn import_jsonl_reader<R: BufRead>(&mut self, reader: R) -> Result<ImportStats> {
        let start = std::time::Instant::now();
        let vertices_before = self.graph.vertex_count();
        let mut stats = ImportStats::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_and_import_json(&line) {
                Ok(()) => stats.edges_imported += 1,
                Err(e) => {
                    warn!(line = index + 1, error = %e, "跳过无效的 JSON 行");
                    stats.errors += 1;
                }
            }
        }

        self.finish(stats, vertices_before, start)
    }

    fn parse_and_import_json(&mut self, line: &str) -> Result<()> {
        let record: JsonEdgeRecord = serde_json::from_str(line)
            .map_err(|e| Error::ImportError(format!("JSON 解析错误: {}", e)))?;
        self.insert(&record.from, &record.to, &record.weights)
    }

    fn insert(&mut self, from: &str, to: &str, weights: &[f64]) -> Result<()> {
        self.graph.add_edge(from, to, weights, self.force).map(|_| ())
    }

    fn finish(
        &self,
        mut stats: ImportStats,
        vertices_before: usize,
        start: std::time::Instant,
    ) -> Result<ImportStats> {
        stats.vertices_imported = self.graph.vertex_count().saturating_sub(vertices_before);
        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            vertices = stats.vertices_imported,
            edges = stats.edges_imported,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            "导入完成"
        );
        Ok(stats)
    }
}

/// 按扩展名选择格式导入（`.csv` 或 `.jsonl`/`.json`）
pub fn import_file<P: AsRef<Path>>(graph: &mut Graph, path: P, force: bool) -> Result<ImportStats> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let mut importer = BatchImporter::new(graph).with_force(force);
    match extension.as_str() {
        "csv" => importer.import_csv(path),
        "jsonl" | "json" | "ndjson" => importer.import_jsonl(path),
        other => Err(Error::ImportError(format!(
            "无法识别的文件格式: {} ({})",
            other,
            path.display()
        ))),
    }
}

/// 从 CSV 导入
pub fn import_csv<P: AsRef<Path>>(graph: &mut Graph, path: P) -> Result<ImportStats> {
    BatchImporter::new(graph).import_csv(path)
}

/// 从 JSON Lines 导入
pub fn import_jsonl<P: AsRef<Path>>(graph: &mut Graph, path: P) -> Result<ImportStats> {
    BatchImporter::new(graph).import_jsonl(path)
}
