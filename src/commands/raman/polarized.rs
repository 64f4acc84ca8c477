//! # polarized 子命令实现
//!
//! 偏振分辨 Raman 分析：加载三列扫描文件，构建角度-波数网格，
//! 绘制热图与极坐标图，按需导出积分强度 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/raman.rs` 定义的 PolarizedArgs
//! - 使用 `parsers/spectrum.rs` 加载
//! - 使用 `raman/polarized.rs` 做核心计算
//! - 使用 `raman/plot.rs`, `raman/export.rs` 输出

use std::path::{Path, PathBuf};

use crate::cli::raman::PolarizedArgs;
use crate::commands::raman::{default_title, is_svg_output};
use crate::error::{LabError, Result};
use crate::parsers;
use crate::raman::export;
use crate::raman::plot::{self, RenderOptions};
use crate::raman::polarized::{PolarTrace, PolarizedOptions, PolarizedPattern};
use crate::utils::output;

/// 执行 polarized 分析
pub fn execute(args: &PolarizedArgs) -> Result<()> {
    output::print_header("Polarized Raman Analysis");

    if !args.input.is_file() {
        return Err(LabError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let rows = parsers::spectrum::parse_polarized_file(&args.input)?;
    let opts = PolarizedOptions {
        flip: !args.no_flip,
        wrap_angle: args.wrap_angle,
    };
    let pattern = PolarizedPattern::from_rows(&rows, &opts)?;
    output::print_info(&format!(
        "{} angles x {} wavenumber samples",
        pattern.angles.len(),
        pattern.shift.len()
    ));

    let traces = pattern.integrate_windows(&args.peaks, args.connect_final)?;

    let render = RenderOptions {
        width: args.width,
        height: args.height,
        title: Some(
            args.title
                .clone()
                .unwrap_or_else(|| default_title(&args.input)),
        ),
        svg: is_svg_output(&args.output),
    };

    let heatmap_path = prefixed_file_name(&args.output, "heatmap_");
    plot::plot_heatmap(&pattern, &args.peaks, !args.no_vertical, &heatmap_path, &render)?;
    output::print_success(&format!("Heatmap saved to '{}'", heatmap_path.display()));

    let polar_path = prefixed_file_name(&args.output, "polar_");
    plot::plot_polar(&traces, &polar_path, &render)?;
    output::print_success(&format!("Polar plots saved to '{}'", polar_path.display()));

    if let Some(csv_path) = &args.export_csv {
        export::traces_to_csv(&pattern, &traces, csv_path)?;
        output::print_success(&format!(
            "Integrated intensities saved to '{}'",
            csv_path.display()
        ));
    }

    print_window_summary(&pattern, &traces);
    Ok(())
}

/// 在文件名前加前缀：`dir/sample.png` -> `dir/heatmap_sample.png`
fn prefixed_file_name(path: &Path, prefix: &str) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output.png");
    path.with_file_name(format!("{}{}", prefix, name))
}

/// 打印每个峰窗口的积分摘要表格
fn print_window_summary(pattern: &PolarizedPattern, traces: &[PolarTrace]) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct WindowRow {
        #[tabled(rename = "Window")]
        name: String,
        #[tabled(rename = "Range (cm⁻¹)")]
        range: String,
        #[tabled(rename = "Strongest angle (°)")]
        angle: String,
    }

    let rows: Vec<WindowRow> = traces
        .iter()
        .map(|trace| {
            // 归一化后最强角度的积分值为 1.0
            let n = pattern.angles.len();
            let mut best = 0;
            for (i, &v) in trace.intensities[..n].iter().enumerate() {
                if v > trace.intensities[best] {
                    best = i;
                }
            }
            WindowRow {
                name: trace.window.name.clone(),
                range: format!("{:.0}-{:.0}", trace.window.low, trace.window.high),
                angle: format!("{:.1}", pattern.angles[best]),
            }
        })
        .collect();

    if !rows.is_empty() {
        output::print_header("Peak Windows");
        println!("{}", Table::new(&rows));
    }
}
