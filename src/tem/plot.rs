//! # TEM 图表生成
//!
//! 绘制周期估计的两面板图：左侧原始强度剖面，右侧筛选后的
//! Fourier 幅度谱。
//!
//! ## 依赖关系
//! - 被 `commands/tem/spacing.rs` 调用
//! - 使用 `models/calibration.rs` 的 SpacingEstimate
//! - 使用 `plotters` 渲染图表

use std::path::Path;

use plotters::prelude::*;

use crate::error::{LabError, Result};
use crate::models::SpacingEstimate;

/// 绘制剖面 + 频谱两面板图
#[allow(clippy::too_many_arguments)]
pub fn plot_spacing(
    x: &[f64],
    y: &[f64],
    estimate: &SpacingEstimate,
    output: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output, (width, height)).into_drawing_area();
        draw_spacing_panels(&root, x, y, estimate, title)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
        draw_spacing_panels(&root, x, y, estimate, title)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制两面板的核心逻辑
fn draw_spacing_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    x: &[f64],
    y: &[f64],
    estimate: &SpacingEstimate,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let root = root
        .titled(
            &format!("{} ({:.4} nm)", title, estimate.wavelength),
            ("sans-serif", 24),
        )
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let panels = root.split_evenly((1, 2));

    draw_line_panel(
        &panels[0],
        x.iter().copied().zip(y.iter().copied()).collect(),
        "Intensity Profile",
        "Distance (nm)",
        "Intensity",
    )?;

    // 频谱按波长排序后再连线
    let mut pairs: Vec<(f64, f64)> = estimate
        .wavelengths
        .iter()
        .copied()
        .zip(estimate.magnitudes.iter().copied())
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    draw_line_panel(
        &panels[1],
        pairs,
        "Fourier Transform",
        "Wavelength (nm)",
        "Magnitude",
    )?;

    Ok(())
}

/// 单面板折线图
fn draw_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    data: Vec<(f64, f64)>,
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x_min = data.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = data
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_min = data.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_max = data
        .iter()
        .map(|(_, y)| *y)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_pad = if y_max > y_min {
        (y_max - y_min) * 0.05
    } else {
        1.0
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    chart
        .draw_series(LineSeries::new(
            data.into_iter(),
            RGBColor(0, 102, 204).stroke_width(2),
        ))
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    Ok(())
}
