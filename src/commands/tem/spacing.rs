//! # spacing 子命令实现
//!
//! 读取剖面 CSV，估计主导空间波长，按需绘制两面板图。
//!
//! ## 依赖关系
//! - 使用 `cli/tem.rs` 定义的 SpacingArgs
//! - 使用 `parsers/profile.rs` 加载
//! - 使用 `tem/spacing.rs`, `tem/plot.rs`

use crate::cli::tem::SpacingArgs;
use crate::error::{LabError, Result};
use crate::parsers::profile;
use crate::tem::{plot, spacing};
use crate::utils::output;

/// 执行 spacing 估计
pub fn execute(args: &SpacingArgs) -> Result<()> {
    output::print_header("TEM Periodicity Estimate");

    if !args.input.is_file() {
        return Err(LabError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let (distance_col, intensity_col) = &args.columns;
    let (x, y) = profile::parse_profile_file(&args.input, distance_col, intensity_col)?;
    output::print_info(&format!(
        "Loaded {} profile samples from '{}'",
        x.len(),
        args.input.display()
    ));

    let estimate = spacing::estimate_spacing(&x, &y, args.estimate)?;
    print_estimate_table(&estimate, args.estimate);

    if let Some(plot_path) = &args.plot {
        let title = args
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("profile");
        let use_svg = plot_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        plot::plot_spacing(
            &x,
            &y,
            &estimate,
            plot_path,
            title,
            args.width,
            args.height,
            use_svg,
        )?;
        output::print_success(&format!("Figure saved to '{}'", plot_path.display()));
    }

    output::print_success(&format!(
        "Dominant wavelength: {:.4}",
        estimate.wavelength
    ));
    Ok(())
}

/// 打印估计结果表格
fn print_estimate_table(estimate: &crate::models::SpacingEstimate, bound: f64) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct EstimateRow {
        #[tabled(rename = "Dominant wavelength")]
        wavelength: String,
        #[tabled(rename = "Upper bound")]
        bound: String,
        #[tabled(rename = "Bins kept")]
        bins: String,
    }

    let rows = vec![EstimateRow {
        wavelength: format!("{:.4}", estimate.wavelength),
        bound: format!("{:.4}", bound),
        bins: estimate.wavelengths.len().to_string(),
    }];

    println!("{}", Table::new(&rows));
}
