//! # tem 子命令实现
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 子模块: scalebar, spacing

pub mod scalebar;
pub mod spacing;

use crate::cli::tem::{TemArgs, TemCommands};
use crate::error::Result;

/// 执行 tem 子命令
pub fn execute(args: TemArgs) -> Result<()> {
    match args.command {
        TemCommands::Scalebar(args) => scalebar::execute(&args),
        TemCommands::Spacing(args) => spacing::execute(&args),
    }
}
