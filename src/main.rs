//! # labkit 可执行入口
//!
//! 解析命令行并分发到 `commands/`。
//!
//! ## 子命令
//! - `raman spectrum`  - 单条光谱绘图
//! - `raman polarized` - 偏振分辨热图 + 极坐标图
//! - `tem scalebar`    - .ser 比例尺元数据转移到 TIFF
//! - `tem spacing`     - FFT 晶面间距估计

use clap::Parser;

use labkit::cli::Cli;
use labkit::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
