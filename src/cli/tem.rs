//! # tem 子命令 CLI 定义
//!
//! 电镜数据处理统一入口，包含两个子命令：
//! - `scalebar`: .ser 比例尺元数据转移到 TIFF（支持目录批量）
//! - `spacing`: FFT 晶面间距估计
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/tem/` 相应模块

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::tem::SiPrefix;

// ─────────────────────────────────────────────────────────────
// TEM 主命令
// ─────────────────────────────────────────────────────────────

/// tem 主命令参数
#[derive(Args, Debug)]
pub struct TemArgs {
    #[command(subcommand)]
    pub command: TemCommands,
}

/// tem 子命令
#[derive(Subcommand, Debug)]
pub enum TemCommands {
    /// Copy calibrated pixel size from a .ser container into a TIFF header
    Scalebar(ScalebarArgs),

    /// Estimate the dominant spatial wavelength of a line profile
    Spacing(SpacingArgs),
}

// ─────────────────────────────────────────────────────────────
// scalebar 子命令
// ─────────────────────────────────────────────────────────────

/// scalebar 子命令参数
#[derive(Args, Debug)]
pub struct ScalebarArgs {
    /// Input: .ser file, or a directory of .ser files (batch mode)
    pub input: PathBuf,

    /// Existing TIFF to re-encode instead of creating one from the .ser
    /// raw array (single-file mode only)
    #[arg(long)]
    pub tiff: Option<PathBuf>,

    /// Target SI prefix for the scale bar unit (M, K, '', c, m, u, n, p)
    #[arg(short, long, default_value = "n", value_parser = parse_prefix)]
    pub units: SiPrefix,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode)
    #[arg(long, default_value = "*.ser")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

// ─────────────────────────────────────────────────────────────
// spacing 子命令
// ─────────────────────────────────────────────────────────────

/// spacing 子命令参数
#[derive(Args, Debug)]
pub struct SpacingArgs {
    /// Input: headered CSV with distance and intensity columns
    pub input: PathBuf,

    /// Expected-wavelength upper bound, slightly above the expected value
    /// (same unit as the distance column)
    #[arg(short, long)]
    pub estimate: f64,

    /// Column names as "DISTANCE,INTENSITY"
    #[arg(long, default_value = "Distance_(nm),Gray_Value", value_parser = parse_columns)]
    pub columns: (String, String),

    /// Optional two-panel figure output (profile + filtered spectrum)
    #[arg(short, long)]
    pub plot: Option<PathBuf>,

    /// Figure width in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 1100)]
    pub width: u32,

    /// Figure height in pixels (PNG) or points (SVG)
    #[arg(long, default_value_t = 550)]
    pub height: u32,
}

// ─────────────────────────────────────────────────────────────
// 参数值解析
// ─────────────────────────────────────────────────────────────

/// 解析 SI 词头参数
pub fn parse_prefix(input: &str) -> Result<SiPrefix, String> {
    SiPrefix::parse(input.trim()).map_err(|e| e.to_string())
}

/// 解析 "DISTANCE,INTENSITY" 列名对
pub fn parse_columns(input: &str) -> Result<(String, String), String> {
    let (distance, intensity) = input
        .split_once(',')
        .ok_or_else(|| format!("'{}' is not of the form DISTANCE,INTENSITY", input))?;
    let distance = distance.trim();
    let intensity = intensity.trim();
    if distance.is_empty() || intensity.is_empty() {
        return Err(format!("'{}' has an empty column name", input));
    }
    Ok((distance.to_string(), intensity.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::profile::{DEFAULT_DISTANCE_COLUMN, DEFAULT_INTENSITY_COLUMN};

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_prefix("n").unwrap(), SiPrefix::Nano);
        assert_eq!(parse_prefix("").unwrap(), SiPrefix::Base);
        assert!(parse_prefix("q").is_err());
    }

    #[test]
    fn test_parse_columns() {
        let (d, i) = parse_columns(&format!(
            "{},{}",
            DEFAULT_DISTANCE_COLUMN, DEFAULT_INTENSITY_COLUMN
        ))
        .unwrap();
        assert_eq!(d, DEFAULT_DISTANCE_COLUMN);
        assert_eq!(i, DEFAULT_INTENSITY_COLUMN);

        assert!(parse_columns("only-one").is_err());
        assert!(parse_columns("a,").is_err());
    }
}
