//! # raman 子命令 CLI 定义
//!
//! Raman 分析统一入口，包含两个子命令：
//! - `spectrum`: 单条光谱绘图（窗口裁剪、基线扣除）
//! - `polarized`: 偏振分辨热图 + 极坐标图
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/raman/` 相应模块

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::models::PeakWindow;

// ─────────────────────────────────────────────────────────────
// Raman 主命令
// ─────────────────────────────────────────────────────────────

/// raman 主命令参数
#[derive(Args, Debug)]
pub struct RamanArgs {
    #[command(subcommand)]
    pub command: RamanCommands,
}

/// raman 子命令
#[derive(Subcommand, Debug)]
pub enum RamanCommands {
    /// Plot a single two-column spectrum
    Spectrum(SpectrumArgs),

    /// Heatmap and polar plots for a polarization-resolved scan set
    Polarized(PolarizedArgs),
}

// ─────────────────────────────────────────────────────────────
// spectrum 子命令
// ─────────────────────────────────────────────────────────────

/// spectrum 子命令参数
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Input: whitespace-delimited (wavenumber, intensity) text file
    pub input: PathBuf,

    /// Output figure path (PNG, or SVG by extension)
    #[arg(short, long, default_value = "spectrum.png")]
    pub output: PathBuf,

    /// Restrict to a wavenumber window, exclusive bounds (e.g. "150:1800")
    #[arg(short, long, value_parser = parse_window)]
    pub window: Option<(f64, f64)>,

    /// Subtract an asymmetric-least-squares baseline estimate
    #[arg(long, default_value_t = false)]
    pub baseline: bool,

    /// Title for the plot (default: input file stem)
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// polarized 子命令
// ─────────────────────────────────────────────────────────────

/// polarized 子命令参数
#[derive(Args, Debug)]
pub struct PolarizedArgs {
    /// Input: whitespace-delimited (angle, wavenumber, intensity) text file
    pub input: PathBuf,

    /// Named peak window, repeatable (e.g. -p a1g=170:190 -p e2g=230:250)
    #[arg(short = 'p', long = "peak", value_parser = parse_peak_spec, required = true)]
    pub peaks: Vec<PeakWindow>,

    /// Base name for the saved figures (heatmap_<name>, polar_<name>)
    #[arg(short, long, default_value = "polarized.png")]
    pub output: PathBuf,

    /// Skip the vertical window guides on the heatmap
    #[arg(long, default_value_t = false)]
    pub no_vertical: bool,

    /// Close each polar trace by repeating the first angle's intensity
    #[arg(long, default_value_t = false)]
    pub connect_final: bool,

    /// Keep the file's wavenumber order (scans recorded ascending)
    #[arg(long, default_value_t = false)]
    pub no_flip: bool,

    /// Closing edge of the angle axis on the heatmap (degrees)
    #[arg(long, default_value_t = 360.0)]
    pub wrap_angle: f64,

    /// Also export per-angle integrated intensities as CSV
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Title for the heatmap (default: input file stem)
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// 参数值解析
// ─────────────────────────────────────────────────────────────

/// 解析 "LOW:HIGH" 形式的波数窗口
pub fn parse_window(input: &str) -> Result<(f64, f64), String> {
    let (low, high) = input
        .split_once(':')
        .ok_or_else(|| format!("'{}' is not of the form LOW:HIGH", input))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", low))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", high))?;
    if !(low < high) {
        return Err(format!("window {}:{} must satisfy LOW < HIGH", low, high));
    }
    Ok((low, high))
}

/// 解析 "NAME=LOW:HIGH" 形式的峰窗口
pub fn parse_peak_spec(input: &str) -> Result<PeakWindow, String> {
    let (name, range) = input
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not of the form NAME=LOW:HIGH", input))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("'{}' has an empty window name", input));
    }
    let (low, high) = parse_window(range.trim())?;
    PeakWindow::new(name, low, high).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("150:1800").unwrap(), (150.0, 1800.0));
        assert!(parse_window("1800:150").is_err());
        assert!(parse_window("150").is_err());
        assert!(parse_window("a:b").is_err());
    }

    #[test]
    fn test_parse_peak_spec() {
        let window = parse_peak_spec("a1g=170:190").unwrap();
        assert_eq!(window.name, "a1g");
        assert_eq!(window.low, 170.0);
        assert_eq!(window.high, 190.0);

        assert!(parse_peak_spec("=170:190").is_err());
        assert!(parse_peak_spec("a1g 170:190").is_err());
    }
}
