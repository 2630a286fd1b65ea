//! RouteGraph CLI 工具
//!
//! 交互式命令行界面

use anyhow::Context;
use clap::Parser;
use routegraph::cli::{CommandResult, Session};
use routegraph::config::EngineConfig;
use routegraph::graph::Graph;
use routegraph::import::import_file;
use routegraph::logging::init_logging;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "routegraph-cli")]
#[command(about = "RouteGraph 命令行工具")]
#[command(version)]
struct Args {
    /// 启动时导入的边列表（.csv 或 .jsonl），按配置 force_edges 决定是否自动创建端点
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 配置文件（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 图模式: directed, undirected
    #[arg(short, long)]
    mode: Option<String>,

    /// 默认权重维度: distance, time 或序号
    #[arg(long)]
    criteria: Option<String>,

    /// 输出格式: table, vertical, json
    #[arg(short, long)]
    format: Option<String>,

    /// 日志级别
    #[arg(long)]
    log_level: Option<String>,

    /// 执行命令后退出，多条命令用 ';' 分隔
    #[arg(short = 'e', long)]
    execute: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.log_level);

    let mut graph = Graph::new(config.mode);
    if let Some(input) = &args.input {
        let stats = import_file(&mut graph, input, config.force_edges)
            .with_context(|| format!("导入失败: {}", input.display()))?;
        info!(
            path = %input.display(),
            vertices = stats.vertices_imported,
            edges = stats.edges_imported,
            errors = stats.errors,
            "已导入边列表"
        );
    }

    let mut session = Session::new(graph, &config);

    // 单次执行模式
    if let Some(script) = args.execute {
        for command in script.split(';') {
            if let CommandResult::Exit = run(&mut session, command) {
                break;
            }
        }
        return Ok(());
    }

    println!("RouteGraph CLI - 多维权重路网图引擎 v{}", routegraph::VERSION);
    println!("=============================================");
    println!("  模式: {}", session.graph().mode());
    println!("  顶点数: {}", session.graph().vertex_count());
    println!("  边数: {}", session.graph().edge_count());
    println!("\n输入 'help' 查看命令列表，'quit' 退出\n");

    let stdin = io::stdin();
    loop {
        print!("routegraph> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        if let CommandResult::Exit = run(&mut session, &line) {
            break;
        }
    }

    println!("再见！");
    Ok(())
}

/// 加载配置文件并应用命令行覆盖
fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(mode) = &args.mode {
        config.mode = mode.parse()?;
    }
    if let Some(criteria) = &args.criteria {
        config.default_criteria = criteria.parse()?;
    }
    if let Some(format) = &args.format {
        config.output_format = format.parse()?;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run(session: &mut Session, command: &str) -> CommandResult {
    let result = session.execute(command);
    match &result {
        CommandResult::Message(text) => print!("{}", text),
        CommandResult::Error(e) => eprintln!("错误: {}", e),
        CommandResult::Continue | CommandResult::Exit => {}
    }
    result
}
