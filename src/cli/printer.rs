//! 结果打印器
//!
//! 提供表格、垂直和 JSON 格式的结果输出

use crate::config::OutputFormat;
use crate::graph::Graph;
use prettytable::{format, row, Cell, Row, Table};
use serde_json::{Map, Value};

/// 结果打印器
pub struct Printer {
    format: OutputFormat,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// 设置输出格式
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// 打印结果集
    pub fn print_result(
        &self,
        columns: &[&str],
        rows: &[Vec<String>],
        execution_time_ms: u64,
    ) -> String {
        if self.format == OutputFormat::Json {
            return Self::format_json(columns, rows);
        }
        if columns.is_empty() || rows.is_empty() {
            return format!("Empty set ({} ms)\n", execution_time_ms);
        }

        let output = match self.format {
            OutputFormat::Vertical => Self::format_vertical(columns, rows),
            _ => Self::format_table(columns, rows),
        };

        format!(
            "{}\n{} row(s) in set ({} ms)\n",
            output,
            rows.len(),
            execution_time_ms
        )
    }

    /// 表格格式
    fn format_table(columns: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
        table.set_titles(Row::new(header));

        for row_data in rows {
            let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
            table.add_row(Row::new(cells));
        }

        table.to_string()
    }

    /// 垂直格式
    fn format_vertical(columns: &[&str], rows: &[Vec<String>]) -> String {
        let max_col_width = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut output = String::new();

        for (i, row_data) in rows.iter().enumerate() {
            output.push_str(&format!(
                "*************************** {}. row ***************************\n",
                i + 1
            ));

            for (j, col) in columns.iter().enumerate() {
                let value = row_data.get(j).map(|s| s.as_str()).unwrap_or("");
                output.push_str(&format!("{:>width$}: {}\n", col, value, width = max_col_width));
            }
        }

        output
    }

    /// JSON 格式：每行一个对象
    fn format_json(columns: &[&str], rows: &[Vec<String>]) -> String {
        let objects: Vec<Value> = rows
            .iter()
            .map(|row_data| {
                let mut object = Map::new();
                for (j, col) in columns.iter().enumerate() {
                    let value = row_data.get(j).cloned().unwrap_or_default();
                    object.insert(col.to_string(), Value::String(value));
                }
                Value::Object(object)
            })
            .collect();

        let mut output = serde_json::to_string_pretty(&objects).unwrap_or_default();
        output.push('\n');
        output
    }

    /// 打印图统计信息
    pub fn print_stats(&self, graph: &Graph) -> String {
        let mode = graph.mode().to_string();
        let vertices = graph.vertex_count().to_string();
        let edges = graph.edge_count().to_string();

        if self.format == OutputFormat::Json {
            return Self::format_json(
                &["mode", "vertex_count", "edge_count"],
                &[vec![mode, vertices, edges]],
            );
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Property", "Value"]);
        table.add_row(row!["Mode", mode]);
        table.add_row(row!["Vertex Count", vertices]);
        table.add_row(row!["Edge Count", edges]);
        table.to_string()
    }

    /// 打印帮助信息
    pub fn print_help() -> String {
        r#"
═══════════════════════════════════════════════════════════════
                   RouteGraph CLI 命令帮助
═══════════════════════════════════════════════════════════════

基础命令:
  help, h, ?           显示帮助
  quit, exit, q        退出程序
  stats, info          显示图统计信息
  show                 按顶点列出邻接关系
  edges                列出所有边
  metrics [json]       显示运行指标（Prometheus 或 JSON）

图编辑:
  vertex <ID>          查看顶点详情
  vertex add <ID>      添加顶点
  vertex remove <ID>   删除顶点及其关联边
  edge add <A> <B> <w1> [w2 ...]
                       添加边（缺失端点按配置自动创建）
  edge remove <A> <B>  删除边
  edge weight <A> <B> <维度> <值>
                       修改边权重
                       示例: edge weight A B time 12

算法:
  dijkstra <起点> [维度]
                       最短路径树
  yen <起点> <终点> <K> [维度]
                       K 条最短路径
  range <起点> <范围> [维度]
                       累计权重小于范围的可达顶点
  outside <起点> <范围> [维度]
                       范围之外的顶点
  common <起点1> <范围1> <起点2> <范围2> [维度]
                       两次范围搜索的公共顶点

设置:
  criteria <维度>      设置默认维度（distance, time 或序号）
  format <格式>        设置输出格式（table, vertical, json）

═══════════════════════════════════════════════════════════════
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            vec!["A".to_string(), "0".to_string()],
            vec!["B".to_string(), "10".to_string()],
        ]
    }

    #[test]
    fn test_empty_set() {
        let printer = Printer::default();
        assert_eq!(printer.print_result(&["vertex"], &[], 3), "Empty set (3 ms)\n");
    }

    #[test]
    fn test_table_and_vertical() {
        let mut printer = Printer::default();
        let table = printer.print_result(&["vertex", "distance"], &sample_rows(), 0);
        assert!(table.contains("vertex"));
        assert!(table.contains("2 row(s) in set"));

        printer.set_format(OutputFormat::Vertical);
        let vertical = printer.print_result(&["vertex", "distance"], &sample_rows(), 0);
        assert!(vertical.contains("1. row"));
        assert!(vertical.contains("distance: 10"));
    }

    #[test]
    fn test_json_output() {
        let printer = Printer::new(OutputFormat::Json);
        let output = printer.print_result(&["vertex", "distance"], &sample_rows(), 0);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["vertex"], "B");
        assert_eq!(value[1]["distance"], "10");
    }
}
