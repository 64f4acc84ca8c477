//! # 终端输出工具
//!
//! 提供统一的终端输出样式。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "✔".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✘".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "!".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "·".cyan().bold(), msg);
}

/// 打印小节标题
pub fn print_header(title: &str) {
    println!("\n{}", title.bold());
    println!("{}", "─".repeat(title.chars().count().max(24)).dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(48).dimmed());
}
