//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅者，输出到 stderr
///
/// `RUST_LOG` 存在时优先使用，否则使用传入的级别。重复调用不会报错。
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
