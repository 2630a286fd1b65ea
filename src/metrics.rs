//! 性能指标收集模块
//!
//! 记录图变更次数和各算法的运行统计

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 算法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmKind {
    Dijkstra,
    Yen,
    RangedDfs,
}

/// 系统全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 图变更统计
    graph_stats: GraphStats,
    /// 算法统计
    algorithm_stats: AlgorithmStats,
    /// 启动时间
    start_time: Instant,
}

/// 图变更统计
#[derive(Debug, Default)]
struct GraphStats {
    vertices_inserted: AtomicU64,
    edges_inserted: AtomicU64,
    vertices_removed: AtomicU64,
    edges_removed: AtomicU64,
}

/// 算法统计
#[derive(Debug, Default)]
struct AlgorithmStats {
    dijkstra_runs: AtomicU64,
    yen_runs: AtomicU64,
    ranged_runs: AtomicU64,
    failed_runs: AtomicU64,
    /// 算法总耗时（微秒）
    total_duration_us: AtomicU64,
    /// 枚举出的简单路径总数
    simple_paths_enumerated: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // 图变更指标
    pub vertices_inserted: u64,
    pub edges_inserted: u64,
    pub vertices_removed: u64,
    pub edges_removed: u64,

    // 算法指标
    pub dijkstra_runs: u64,
    pub yen_runs: u64,
    pub ranged_runs: u64,
    pub failed_runs: u64,
    pub avg_algorithm_duration_ms: f64,
    pub simple_paths_enumerated: u64,

    // 系统指标
    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            graph_stats: GraphStats::default(),
            algorithm_stats: AlgorithmStats::default(),
            start_time: Instant::now(),
        }
    }

    /// 记录算法开始
    pub fn record_algorithm_start(&self, kind: AlgorithmKind) -> AlgorithmTimer {
        let counter = match kind {
            AlgorithmKind::Dijkstra => &self.algorithm_stats.dijkstra_runs,
            AlgorithmKind::Yen => &self.algorithm_stats.yen_runs,
            AlgorithmKind::RangedDfs => &self.algorithm_stats.ranged_runs,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        AlgorithmTimer::new()
    }

    /// 记录算法完成
    pub fn record_algorithm_complete(&self, timer: AlgorithmTimer, success: bool) {
        if !success {
            self.algorithm_stats
                .failed_runs
                .fetch_add(1, Ordering::Relaxed);
        }
        self.algorithm_stats
            .total_duration_us
            .fetch_add(timer.elapsed().as_micros() as u64, Ordering::Relaxed);
    }

    /// 记录枚举出的简单路径数
    pub fn record_simple_paths(&self, count: usize) {
        self.algorithm_stats
            .simple_paths_enumerated
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// 记录顶点插入
    pub fn record_vertex_insert(&self) {
        self.graph_stats
            .vertices_inserted
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录边插入
    pub fn record_edge_insert(&self) {
        self.graph_stats.edges_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录顶点删除
    pub fn record_vertex_remove(&self) {
        self.graph_stats
            .vertices_removed
            .fetch_add(1, Ordering::Relaxed);
    }

    /// 记录边删除
    pub fn record_edge_remove(&self) {
        self.graph_stats.edges_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let dijkstra_runs = self.algorithm_stats.dijkstra_runs.load(Ordering::Relaxed);
        let yen_runs = self.algorithm_stats.yen_runs.load(Ordering::Relaxed);
        let ranged_runs = self.algorithm_stats.ranged_runs.load(Ordering::Relaxed);
        let total_runs = dijkstra_runs + yen_runs + ranged_runs;
        let total_duration_us = self
            .algorithm_stats
            .total_duration_us
            .load(Ordering::Relaxed);

        let avg_algorithm_duration_ms = if total_runs > 0 {
            (total_duration_us as f64) / (total_runs as f64) / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            vertices_inserted: self.graph_stats.vertices_inserted.load(Ordering::Relaxed),
            edges_inserted: self.graph_stats.edges_inserted.load(Ordering::Relaxed),
            vertices_removed: self.graph_stats.vertices_removed.load(Ordering::Relaxed),
            edges_removed: self.graph_stats.edges_removed.load(Ordering::Relaxed),
            dijkstra_runs,
            yen_runs,
            ranged_runs,
            failed_runs: self.algorithm_stats.failed_runs.load(Ordering::Relaxed),
            avg_algorithm_duration_ms,
            simple_paths_enumerated: self
                .algorithm_stats
                .simple_paths_enumerated
                .load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let snapshot = self.snapshot();
        let mut content = String::new();

        let mut push = |name: &str, kind: &str, help: &str, value: String| {
            content.push_str(&format!("# HELP routegraph_{} {}\n", name, help));
            content.push_str(&format!("# TYPE routegraph_{} {}\n", name, kind));
            content.push_str(&format!("routegraph_{} {}\n", name, value));
        };

        // 图变更指标
        push(
            "vertices_inserted_total",
            "counter",
            "Total vertices inserted",
            snapshot.vertices_inserted.to_string(),
        );
        push(
            "edges_inserted_total",
            "counter",
            "Total edges inserted",
            snapshot.edges_inserted.to_string(),
        );
        push(
            "vertices_removed_total",
            "counter",
            "Total vertices removed",
            snapshot.vertices_removed.to_string(),
        );
        push(
            "edges_removed_total",
            "counter",
            "Total edges removed",
            snapshot.edges_removed.to_string(),
        );

        // 算法指标
        push(
            "dijkstra_runs_total",
            "counter",
            "Number of shortest-path tree computations",
            snapshot.dijkstra_runs.to_string(),
        );
        push(
            "yen_runs_total",
            "counter",
            "Number of k-shortest-path computations",
            snapshot.yen_runs.to_string(),
        );
        push(
            "ranged_runs_total",
            "counter",
            "Number of ranged reachability searches",
            snapshot.ranged_runs.to_string(),
        );
        push(
            "failed_runs_total",
            "counter",
            "Number of algorithm runs that returned an error",
            snapshot.failed_runs.to_string(),
        );
        push(
            "algorithm_duration_avg_ms",
            "gauge",
            "Average algorithm duration in milliseconds",
            format!("{:.3}", snapshot.avg_algorithm_duration_ms),
        );
        push(
            "simple_paths_enumerated_total",
            "counter",
            "Simple paths enumerated by the k-shortest-path search",
            snapshot.simple_paths_enumerated.to_string(),
        );

        // 系统指标
        push(
            "uptime_seconds",
            "counter",
            "System uptime in seconds",
            snapshot.uptime_seconds.to_string(),
        );

        PrometheusMetrics { content }
    }

    /// 重置所有指标
    pub fn reset(&self) {
        self.graph_stats.vertices_inserted.store(0, Ordering::Relaxed);
        self.graph_stats.edges_inserted.store(0, Ordering::Relaxed);
        self.graph_stats.vertices_removed.store(0, Ordering::Relaxed);
        self.graph_stats.edges_removed.store(0, Ordering::Relaxed);

        self.algorithm_stats.dijkstra_runs.store(0, Ordering::Relaxed);
        self.algorithm_stats.yen_runs.store(0, Ordering::Relaxed);
        self.algorithm_stats.ranged_runs.store(0, Ordering::Relaxed);
        self.algorithm_stats.failed_runs.store(0, Ordering::Relaxed);
        self.algorithm_stats
            .total_duration_us
            .store(0, Ordering::Relaxed);
        self.algorithm_stats
            .simple_paths_enumerated
            .store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// 算法计时器
pub struct AlgorithmTimer {
    start: Instant,
}

impl AlgorithmTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}
