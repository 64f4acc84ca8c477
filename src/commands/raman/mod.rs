//! # raman 子命令实现
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 子模块: spectrum, polarized

pub mod polarized;
pub mod spectrum;

use crate::cli::raman::{RamanArgs, RamanCommands};
use crate::error::Result;

/// 执行 raman 子命令
pub fn execute(args: RamanArgs) -> Result<()> {
    match args.command {
        RamanCommands::Spectrum(args) => spectrum::execute(&args),
        RamanCommands::Polarized(args) => polarized::execute(&args),
    }
}

/// 从输出扩展名判断是否使用 SVG 后端
pub(crate) fn is_svg_output(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// 图标题缺省取输入文件主干名
pub(crate) fn default_title(input: &std::path::Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum")
        .to_string()
}
