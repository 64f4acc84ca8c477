//! # Raman 图表生成
//!
//! 使用 `plotters` 库绘制单谱线图、偏振热图与极坐标图。
//!
//! ## 功能
//! - 单条光谱的强度-波数折线图
//! - 角度-波数强度热图（像元按 post 边界绘制）+ 色标条
//! - 每个峰窗口一幅极坐标子图，与热图竖直参考线共享颜色
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/raman/` 调用
//! - 使用 `raman/polarized.rs` 的 PolarizedPattern, PolarTrace
//! - 使用 `plotters` 渲染图表

use crate::error::{LabError, Result};
use crate::models::{PeakWindow, Spectrum};
use crate::raman::polarized::{PolarTrace, PolarizedPattern};

use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use std::path::Path;

/// 图像渲染选项
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// 宽度（PNG 为像素，SVG 为点）
    pub width: u32,
    /// 高度
    pub height: u32,
    /// 图标题（None 时不加标题）
    pub title: Option<String>,
    /// 输出 SVG 矢量图而非 PNG
    pub svg: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 1200,
            height: 800,
            title: None,
            svg: false,
        }
    }
}

/// 峰窗口在所有图中的共享颜色（按调用方给定顺序取色）
pub fn window_color(index: usize) -> RGBAColor {
    Palette99::pick(index).to_rgba()
}

// ─────────────────────────────────────────────────────────────
// 单谱线图
// ─────────────────────────────────────────────────────────────

/// 绘制单条光谱的折线图
pub fn plot_spectrum(spectrum: &Spectrum, output: &Path, opts: &RenderOptions) -> Result<()> {
    if opts.svg {
        let root = SVGBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, opts)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_spectrum_chart(&root, spectrum, opts)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制谱线图的核心逻辑
fn draw_spectrum_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spectrum: &Spectrum,
    opts: &RenderOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let x_min = spectrum.x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = spectrum.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_min = spectrum.y.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = spectrum.y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_pad = if y_max > y_min {
        (y_max - y_min) * 0.05
    } else {
        1.0
    };

    let caption = opts.title.clone().unwrap_or_default();
    let mut chart = ChartBuilder::on(root)
        .caption(caption, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Raman Shift (cm⁻¹)")
        .y_desc("Intensity (a.u.)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            spectrum.x.iter().zip(spectrum.y.iter()).map(|(&x, &y)| (x, y)),
            line_color.stroke_width(2),
        ))
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 偏振热图
// ─────────────────────────────────────────────────────────────

/// 绘制角度-波数强度热图
///
/// `vertical` 为 true 时在每个峰窗口边界画竖直点线参考线。
pub fn plot_heatmap(
    pattern: &PolarizedPattern,
    peaks: &[PeakWindow],
    vertical: bool,
    output: &Path,
    opts: &RenderOptions,
) -> Result<()> {
    if opts.svg {
        let root = SVGBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_heatmap_chart(&root, pattern, peaks, vertical, opts)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_heatmap_chart(&root, pattern, peaks, vertical, opts)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制热图的核心逻辑
fn draw_heatmap_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    pattern: &PolarizedPattern,
    peaks: &[PeakWindow],
    vertical: bool,
    opts: &RenderOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    // 右侧留出色标条
    let bar_width = 90i32;
    let (plot_area, bar_area) = root.split_horizontally(opts.width as i32 - bar_width);

    let x_min = pattern.shift_posts[0];
    let x_max = *pattern.shift_posts.last().unwrap();
    let y_min = pattern.angle_posts[0];
    let y_max = *pattern.angle_posts.last().unwrap();

    let v_min = pattern
        .intensity
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let v_max = pattern
        .intensity
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let caption = opts.title.clone().unwrap_or_default();
    let mut chart = ChartBuilder::on(&plot_area)
        .caption(caption, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Raman Shift (cm⁻¹)")
        .y_desc("Polarization angle (°)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    // 像元：每个采样点落在相邻 post 边界之间
    for (i, row) in pattern.intensity.iter().enumerate() {
        chart
            .draw_series(row.iter().enumerate().map(|(j, &v)| {
                let color = heat_color(v, v_min, v_max);
                Rectangle::new(
                    [
                        (pattern.shift_posts[j], pattern.angle_posts[i]),
                        (pattern.shift_posts[j + 1], pattern.angle_posts[i + 1]),
                    ],
                    color.filled(),
                )
            }))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    // 峰窗口竖直参考线
    if vertical {
        for (i, window) in peaks.iter().enumerate() {
            let color = window_color(i);
            for (k, &bound) in [window.low, window.high].iter().enumerate() {
                let series = chart
                    .draw_series(dotted_segments(y_min, y_max, 60).into_iter().map(
                        move |(y0, y1)| {
                            PathElement::new(vec![(bound, y0), (bound, y1)], color.stroke_width(2))
                        },
                    ))
                    .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
                // 每个窗口只注册一次图例
                if k == 0 {
                    series.label(&window.name).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 14))
            .draw()
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    draw_colorbar(&bar_area, v_min, v_max)?;

    Ok(())
}

/// 热图色标：viridis 色带
fn heat_color(v: f64, v_min: f64, v_max: f64) -> RGBColor {
    let t = if v_max > v_min {
        ((v - v_min) / (v_max - v_min)) as f32
    } else {
        0.0
    };
    ViridisRGB.get_color(t.clamp(0.0, 1.0))
}

/// 竖直点线的分段 y 区间（每隔一段留空）
fn dotted_segments(y_min: f64, y_max: f64, segments: usize) -> Vec<(f64, f64)> {
    let step = (y_max - y_min) / segments as f64;
    (0..segments)
        .step_by(2)
        .map(|k| {
            let y0 = y_min + k as f64 * step;
            (y0, y0 + step)
        })
        .collect()
}

/// 绘制右侧色标条
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    v_min: f64,
    v_max: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, v_min..v_max)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_label_style(("sans-serif", 12))
        .draw()
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let steps = 64;
    let dv = (v_max - v_min) / steps as f64;
    bar.draw_series((0..steps).map(|k| {
        let v0 = v_min + k as f64 * dv;
        Rectangle::new(
            [(0.0, v0), (1.0, v0 + dv)],
            heat_color(v0 + dv / 2.0, v_min, v_max).filled(),
        )
    }))
    .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 极坐标图
// ─────────────────────────────────────────────────────────────

/// 绘制多面板极坐标图，每个峰窗口一幅子图
pub fn plot_polar(traces: &[PolarTrace], output: &Path, opts: &RenderOptions) -> Result<()> {
    if traces.is_empty() {
        return Err(LabError::InvalidArgument(
            "no peak windows to draw".to_string(),
        ));
    }

    if opts.svg {
        let root = SVGBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_polar_panels(&root, traces)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output, (opts.width, opts.height)).into_drawing_area();
        draw_polar_panels(&root, traces)?;
        root.present()
            .map_err(|e| LabError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制极坐标面板的核心逻辑
fn draw_polar_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    traces: &[PolarTrace],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

    let panels = root.split_evenly((1, traces.len()));

    for (i, (panel, trace)) in panels.iter().zip(traces.iter()).enumerate() {
        let panel = panel
            .titled(&trace.window.name, ("sans-serif", 20))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

        let mut chart = ChartBuilder::on(&panel)
            .margin(15)
            .build_cartesian_2d(-1.35f64..1.35, -1.35f64..1.35)
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;

        draw_polar_grid(&mut chart)?;

        let color = window_color(i);
        let points: Vec<(f64, f64)> = trace
            .angles
            .iter()
            .zip(trace.intensities.iter())
            .map(|(&deg, &r)| {
                let theta = deg.to_radians();
                (r * theta.cos(), r * theta.sin())
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}

/// 手工绘制极坐标网格：三个同心圆、每 30° 一条辐条、主方向角标注
fn draw_polar_grid<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let grid_style = RGBColor(180, 180, 180).stroke_width(1);

    for ring in [1.0 / 3.0, 2.0 / 3.0, 1.0] {
        let circle: Vec<(f64, f64)> = (0..=120)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / 120.0;
                (ring * theta.cos(), ring * theta.sin())
            })
            .collect();
        chart
            .draw_series(std::iter::once(PathElement::new(circle, grid_style)))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    for spoke in (0..360).step_by(30) {
        let theta = (spoke as f64).to_radians();
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, 0.0), (theta.cos(), theta.sin())],
                grid_style,
            )))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    for (label, deg) in [("0°", 0.0f64), ("90°", 90.0), ("180°", 180.0), ("270°", 270.0)] {
        let theta = deg.to_radians();
        chart
            .draw_series(std::iter::once(Text::new(
                label,
                (1.12 * theta.cos(), 1.12 * theta.sin()),
                ("sans-serif", 13).into_font().color(&BLACK),
            )))
            .map_err(|e| LabError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}
