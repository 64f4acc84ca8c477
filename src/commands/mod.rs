//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `raman/`, `tem/`, `utils/`
//! - 子模块: raman, tem

pub mod raman;
pub mod tem;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Raman(args) => raman::execute(args),
        Commands::Tem(args) => tem::execute(args),
    }
}
