//! # spectrum 子命令实现
//!
//! 加载两列光谱，按需做窗口裁剪与基线扣除，绘制折线图并
//! 报告全局峰位。
//!
//! ## 依赖关系
//! - 使用 `cli/raman.rs` 定义的 SpectrumArgs
//! - 使用 `raman/` 模块加载、处理与绘图

use crate::cli::raman::SpectrumArgs;
use crate::commands::raman::{default_title, is_svg_output};
use crate::error::{LabError, Result};
use crate::models::Spectrum;
use crate::raman::plot::{self, RenderOptions};
use crate::raman::{self, numeric};
use crate::utils::output;

/// 执行 spectrum 分析
pub fn execute(args: &SpectrumArgs) -> Result<()> {
    output::print_header("Raman Spectrum");

    if !args.input.is_file() {
        return Err(LabError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let spectrum = raman::load_spectrum(&args.input, args.window, args.baseline)?;
    output::print_info(&format!(
        "Loaded {} samples from '{}'",
        spectrum.len(),
        args.input.display()
    ));
    if let Some((low, high)) = args.window {
        output::print_info(&format!("Restricted to window {}:{}", low, high));
    }
    if args.baseline {
        output::print_info("Subtracted AsLS baseline estimate");
    }

    let opts = RenderOptions {
        width: args.width,
        height: args.height,
        title: Some(
            args.title
                .clone()
                .unwrap_or_else(|| default_title(&args.input)),
        ),
        svg: is_svg_output(&args.output),
    };
    plot::plot_spectrum(&spectrum, &args.output, &opts)?;

    print_peak_summary(&spectrum);
    output::print_success(&format!("Figure saved to '{}'", args.output.display()));
    Ok(())
}

/// 打印全局峰位摘要表格
fn print_peak_summary(spectrum: &Spectrum) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "Peak position (cm⁻¹)")]
        position: String,
        #[tabled(rename = "Intensity (a.u.)")]
        intensity: String,
    }

    let first = spectrum.x[0];
    let last = spectrum.x[spectrum.len() - 1];
    let (low, high) = if first <= last { (first, last) } else { (last, first) };
    let max_i = numeric::max_in_range(&spectrum.x, &spectrum.y, low, high);

    let rows = vec![PeakRow {
        position: format!("{:.2}", spectrum.x[max_i]),
        intensity: format!("{:.4}", spectrum.y[max_i]),
    }];

    output::print_header("Strongest Peak");
    println!("{}", Table::new(&rows));
}
