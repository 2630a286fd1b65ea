//! 交互命令处理
//!
//! 解析一行命令并在会话持有的图上执行

use std::time::Instant;

use crate::config::{EngineConfig, OutputFormat};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::metrics::global_metrics;
use crate::types::Criteria;

use super::printer::Printer;

/// 命令执行结果
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// 继续运行
    Continue,
    /// 退出程序
    Exit,
    /// 显示消息
    Message(String),
    /// 错误
    Error(String),
}

/// 交互会话
pub struct Session {
    graph: Graph,
    criteria: Criteria,
    force_edges: bool,
    printer: Printer,
}

impl Session {
    pub fn new(graph: Graph, config: &EngineConfig) -> Self {
        Self {
            graph,
            criteria: config.default_criteria,
            force_edges: config.force_edges,
            printer: Printer::new(config.output_format),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    /// 解析并执行一行命令
    pub fn execute(&mut self, input: &str) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            return CommandResult::Continue;
        }

        match self.dispatch(&parts) {
            Ok(result) => result,
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn dispatch(&mut self, parts: &[&str]) -> Result<CommandResult> {
        let cmd = parts[0].to_lowercase();
        let args = &parts[1..];
        let start = Instant::now();

        let output = match cmd.as_str() {
            "quit" | "exit" | "q" => return Ok(CommandResult::Exit),
            "help" | "h" | "?" => Printer::print_help(),
            "stats" | "info" => self.printer.print_stats(&self.graph),
            "show" => self.graph.to_string(),
            "edges" => {
                let rows: Vec<Vec<String>> = self
                    .graph
                    .edges()
                    .map(|e| {
                        let weights: Vec<String> = e.weights().iter().map(|w| w.to_string()).collect();
                        vec![e.label(), weights.join(", ")]
                    })
                    .collect();
                self.printer
                    .print_result(&["edge", "weights"], &rows, elapsed_ms(start))
            }
            "metrics" => {
                let metrics = global_metrics();
                if args.first().map(|a| a.eq_ignore_ascii_case("json")).unwrap_or(false) {
                    serde_json::to_string_pretty(&metrics.snapshot())?
                } else {
                    metrics.to_prometheus().content
                }
            }
            "vertex" | "v" => self.vertex_command(args)?,
            "edge" | "e" => self.edge_command(args)?,
            "dijkstra" | "spt" => self.dijkstra_command(args, start)?,
            "yen" | "ksp" => self.yen_command(args, start)?,
            "range" => {
                let (start_id, range, criteria) = self.range_args(args, "range")?;
                let found = self.graph.ranged_dfs(start_id, range, criteria)?;
                self.vertex_list(found, start)
            }
            "outside" => {
                let (start_id, range, criteria) = self.range_args(args, "outside")?;
                let found = self.graph.inverted_ranged_dfs(start_id, range, criteria)?;
                self.vertex_list(found, start)
            }
            "common" => self.common_command(args, start)?,
            "criteria" => {
                let value = args.first().ok_or_else(|| usage("criteria <distance|time|序号>"))?;
                self.criteria = value.parse()?;
                format!("默认维度: {}\n", self.criteria)
            }
            "format" => {
                let value = args.first().ok_or_else(|| usage("format <table|vertical|json>"))?;
                self.printer.set_format(value.parse()?);
                format!("输出格式: {}\n", self.printer.format())
            }
            _ => {
                return Ok(CommandResult::Error(format!(
                    "未知命令: {}。输入 'help' 查看帮助。",
                    cmd
                )))
            }
        };

        Ok(CommandResult::Message(output))
    }

    fn vertex_command(&mut self, args: &[&str]) -> Result<String> {
        match args {
            ["add", id] => {
                self.graph.add_vertex(id)?;
                Ok(format!("已添加顶点 {}\n", id))
            }
            ["remove", id] | ["rm", id] => {
                let vertex = self.graph.remove_vertex(id)?;
                Ok(format!("已删除顶点 {}（{} 条边）\n", id, vertex.degree()))
            }
            [id] => {
                let vertex = self
                    .graph
                    .get_vertex(id)
                    .ok_or_else(|| Error::VertexNotFound(id.to_string()))?;
                let neighbors = self.graph.neighbors(id)?;
                let rows = vec![vec![
                    vertex.identifier().to_string(),
                    vertex.degree().to_string(),
                    neighbors.join(", "),
                ]];
                Ok(self
                    .printer
                    .print_result(&["vertex", "degree", "neighbors"], &rows, 0))
            }
            _ => Err(usage("vertex <ID> | vertex add <ID> | vertex remove <ID>")),
        }
    }

    fn edge_command(&mut self, args: &[&str]) -> Result<String> {
        match args {
            ["add", v1, v2, weights @ ..] if !weights.is_empty() => {
                let weights = weights
                    .iter()
                    .map(|w| parse_f64(w))
                    .collect::<Result<Vec<f64>>>()?;
                self.graph.add_edge(v1, v2, &weights, self.force_edges)?;
                Ok(format!(
                    "已添加边 {}{}{}\n",
                    v1,
                    self.graph.mode().separator(),
                    v2
                ))
            }
            ["remove", v1, v2] | ["rm", v1, v2] => {
                let edge = self.graph.remove_edge(v1, v2)?;
                Ok(format!("已删除边 {}\n", edge.label()))
            }
            ["weight", v1, v2, criteria, value] => {
                let criteria: Criteria = criteria.parse()?;
                let value = parse_f64(value)?;
                let old = self.graph.set_edge_weight(v1, v2, criteria, value)?;
                Ok(format!(
                    "{}{}{} 的 {}: {} -> {}\n",
                    v1,
                    self.graph.mode().separator(),
                    v2,
                    criteria,
                    old,
                    value
                ))
            }
            _ => Err(usage(
                "edge add <A> <B> <w1> [w2 ...] | edge remove <A> <B> | edge weight <A> <B> <维度> <值>",
            )),
        }
    }

    fn dijkstra_command(&self, args: &[&str], start: Instant) -> Result<String> {
        let source = args.first().ok_or_else(|| usage("dijkstra <起点> [维度]"))?;
        let criteria = self.criteria_arg(args.get(1))?;
        let result = self.graph.dijkstra_with_distances(source, criteria)?;

        let rows: Vec<Vec<String>> = result
            .distances
            .iter()
            .filter(|(_, distance)| distance.is_finite())
            .map(|(vertex, distance)| {
                let path = result.path_to(vertex).unwrap_or_default();
                vec![
                    vertex.clone(),
                    result.predecessor(vertex).unwrap_or("-").to_string(),
                    distance.to_string(),
                    path.join(" -> "),
                ]
            })
            .collect();

        Ok(self.printer.print_result(
            &["vertex", "predecessor", "distance", "path"],
            &rows,
            elapsed_ms(start),
        ))
    }

    fn yen_command(&self, args: &[&str], start: Instant) -> Result<String> {
        let (from, to, k) = match args {
            [from, to, k, ..] => (*from, *to, parse_usize(k)?),
            _ => return Err(usage("yen <起点> <终点> <K> [维度]")),
        };
        let criteria = self.criteria_arg(args.get(3))?;
        let paths = self.graph.yen_paths(from, to, k, criteria)?;

        if self.printer.format() == OutputFormat::Json {
            let mut output = serde_json::to_string_pretty(&paths)?;
            output.push('\n');
            return Ok(output);
        }

        let rows: Vec<Vec<String>> = paths
            .iter()
            .enumerate()
            .map(|(rank, path)| {
                vec![
                    (rank + 1).to_string(),
                    path.vertices.join(" -> "),
                    path.length.to_string(),
                    path.total_weight.to_string(),
                ]
            })
            .collect();

        Ok(self.printer.print_result(
            &["rank", "path", "length", "total_weight"],
            &rows,
            elapsed_ms(start),
        ))
    }

    fn common_command(&self, args: &[&str], start: Instant) -> Result<String> {
        let (a, range_a, b, range_b) = match args {
            [a, range_a, b, range_b, ..] => (*a, parse_f64(range_a)?, *b, parse_f64(range_b)?),
            _ => return Err(usage("common <起点1> <范围1> <起点2> <范围2> [维度]")),
        };
        let criteria = self.criteria_arg(args.get(4))?;

        let first = self.graph.ranged_dfs(a, range_a, criteria)?;
        let second = self.graph.ranged_dfs(b, range_b, criteria)?;
        Ok(self.vertex_list(Graph::common_vertices(&first, &second), start))
    }

    fn range_args<'b>(&self, args: &[&'b str], cmd: &str) -> Result<(&'b str, f64, Criteria)> {
        match args {
            [id, range, rest @ ..] => {
                let criteria = self.criteria_arg(rest.first())?;
                Ok((*id, parse_f64(range)?, criteria))
            }
            _ => Err(usage(&format!("{} <起点> <范围> [维度]", cmd))),
        }
    }

    fn vertex_list(&self, vertices: Vec<String>, start: Instant) -> String {
        let rows: Vec<Vec<String>> = vertices.into_iter().map(|v| vec![v]).collect();
        self.printer.print_result(&["vertex"], &rows, elapsed_ms(start))
    }

    fn criteria_arg(&self, arg: Option<&&str>) -> Result<Criteria> {
        match arg {
            Some(value) => value.parse(),
            None => Ok(self.criteria),
        }
    }
}

fn usage(text: &str) -> Error {
    Error::InvalidArgument(format!("用法: {}", text))
}

fn parse_f64(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| Error::InvalidArgument(format!("无效的数值: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| Error::InvalidArgument(format!("无效的整数: {}", value)))
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
