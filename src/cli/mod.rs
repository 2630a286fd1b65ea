//! 命令行交互模块

pub mod commands;
pub mod printer;

pub use commands::{CommandResult, Session};
pub use printer::Printer;
