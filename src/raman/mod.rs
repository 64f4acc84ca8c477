//! # Raman 分析模块
//!
//! 提供光谱预处理与偏振分辨分析功能。
//!
//! ## 子模块
//! - `numeric`: 索引查找、窗口积分、像元边界几何
//! - `baseline`: AsLS 基线估计
//! - `polarized`: 偏振分辨管线（分组、归一化、积分）
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/raman/` 使用
//! - 使用 `models/spectrum.rs`, `parsers/spectrum.rs`

pub mod baseline;
pub mod export;
pub mod numeric;
pub mod plot;
pub mod polarized;

use std::path::Path;

use crate::error::{LabError, Result};
use crate::models::Spectrum;
use crate::parsers;

pub use baseline::AslsBaseline;
pub use polarized::{PolarTrace, PolarizedOptions, PolarizedPattern};

/// 加载两列光谱并按需预处理
///
/// `window` 给定时按开区间裁剪（两端严格不等），选不到任何采样点
/// 时报错；`subtract_baseline` 为 true 时就地扣除 AsLS 基线估计。
pub fn load_spectrum(
    path: &Path,
    window: Option<(f64, f64)>,
    subtract_baseline: bool,
) -> Result<Spectrum> {
    let spectrum = parsers::spectrum::parse_spectrum_file(path)?;
    preprocess_spectrum(spectrum, window, subtract_baseline)
}

/// 光谱预处理：窗口裁剪 + 基线扣除
pub fn preprocess_spectrum(
    spectrum: Spectrum,
    window: Option<(f64, f64)>,
    subtract_baseline: bool,
) -> Result<Spectrum> {
    let mut spectrum = match window {
        Some((low, high)) => {
            let (x, y) = numeric::cut(&spectrum.x, &spectrum.y, low, high);
            if x.is_empty() {
                return Err(LabError::EmptyRange { low, high });
            }
            Spectrum::new(x, y)?
        }
        None => spectrum,
    };

    if subtract_baseline {
        AslsBaseline::default().remove(&mut spectrum.y);
    }

    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_window_cut() {
        let spectrum = Spectrum::new(vec![100.0, 200.0, 300.0], vec![0.1, 1.0, 0.2]).unwrap();
        let cut = preprocess_spectrum(spectrum, Some((150.0, 250.0)), false).unwrap();
        assert_eq!(cut.x, vec![200.0]);
        assert_eq!(cut.y, vec![1.0]);
    }

    #[test]
    fn test_preprocess_empty_window_is_error() {
        let spectrum = Spectrum::new(vec![100.0, 200.0], vec![1.0, 2.0]).unwrap();
        assert!(preprocess_spectrum(spectrum, Some((400.0, 500.0)), false).is_err());
    }
}
