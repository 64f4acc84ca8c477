//! # 晶面间距估计
//!
//! 对沿直线取出的一维强度剖面做离散 Fourier 变换，把频率仓换算成
//! 等效波长，丢弃不小于期望波长上界的分量，报告幅度最大的主导
//! 空间波长。
//!
//! ## 依赖关系
//! - 被 `commands/tem/spacing.rs` 调用
//! - 使用 `models/calibration.rs` 的 SpacingEstimate
//! - 使用 `rustfft` / `num-complex` 计算频谱

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{LabError, Result};
use crate::models::SpacingEstimate;

/// 估计剖面的主导空间波长
///
/// `wavelen_estimate` 为期望波长的上界，应略高于预期值，用于去掉
/// 低频漂移分量；谐波的波长更短，不受影响。零频仓的波长为 +∞
/// （IEEE 浮点除零），任何有限上界都会把它滤掉。
///
/// 假设 `x` 为等间距采样，间距取前两个样本之差。
pub fn estimate_spacing(x: &[f64], y: &[f64], wavelen_estimate: f64) -> Result<SpacingEstimate> {
    if x.len() != y.len() {
        return Err(LabError::InsufficientData(format!(
            "distance column has {} samples but intensity has {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(LabError::InsufficientData(
            "need at least 2 profile samples to determine the sample spacing".to_string(),
        ));
    }
    if !(wavelen_estimate > 0.0) {
        return Err(LabError::InvalidArgument(format!(
            "wavelength estimate must be positive, got {}",
            wavelen_estimate
        )));
    }
    let delta = x[1] - x[0];
    if delta == 0.0 {
        return Err(LabError::InsufficientData(
            "sample spacing of the distance column is zero".to_string(),
        ));
    }

    // 复数正变换后取幅度谱
    let n = y.len();
    let mut buffer: Vec<Complex<f64>> = y.iter().map(|&v| Complex::new(v, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);
    let spectrum: Vec<f64> = buffer.iter().map(|c| c.norm()).collect();

    // 频率仓 -> 等效波长，按上界筛选
    let positive_bins = (n - 1) / 2 + 1;
    let mut wavelengths = Vec::new();
    let mut magnitudes = Vec::new();
    for (i, &magnitude) in spectrum.iter().enumerate() {
        let freq = if i < positive_bins {
            i as f64 / n as f64
        } else {
            (i as f64 - n as f64) / n as f64
        };
        let wavelen = delta / freq;
        if wavelen.abs() < wavelen_estimate {
            wavelengths.push(wavelen);
            magnitudes.push(magnitude);
        }
    }

    if wavelengths.is_empty() {
        return Err(LabError::EmptyRange {
            low: 0.0,
            high: wavelen_estimate,
        });
    }

    let mut idx_max = 0;
    let mut max = f64::NEG_INFINITY;
    for (i, &m) in magnitudes.iter().enumerate() {
        if m > max {
            max = m;
            idx_max = i;
        }
    }

    Ok(SpacingEstimate {
        wavelength: wavelengths[idx_max].abs(),
        wavelengths,
        magnitudes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    /// 周期 2 nm 的正弦，0.05 nm 采样，共 400 点（整 10 个周期）
    fn sine_profile() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..400).map(|i| i as f64 * 0.05).collect();
        let y: Vec<f64> = x.iter().map(|&v| (TAU * v / 2.0).sin()).collect();
        (x, y)
    }

    #[test]
    fn test_recovers_sine_period() {
        let (x, y) = sine_profile();
        let estimate = estimate_spacing(&x, &y, 3.0).unwrap();
        // 整周期采样时峰落在精确的频率仓上
        assert!(
            (estimate.wavelength - 2.0).abs() < 0.01,
            "estimated {}",
            estimate.wavelength
        );
    }

    #[test]
    fn test_dc_component_filtered_by_bound() {
        let (x, y) = sine_profile();
        // 直流偏置的波长为无穷大，被上界筛掉而不是被幅度比较选中
        let offset: Vec<f64> = y.iter().map(|v| v + 100.0).collect();
        let estimate = estimate_spacing(&x, &offset, 3.0).unwrap();
        assert!((estimate.wavelength - 2.0).abs() < 0.01);
        assert!(estimate.wavelengths.iter().all(|w| w.is_finite()));
    }

    #[test]
    fn test_bound_excludes_everything_is_error() {
        let (x, y) = sine_profile();
        // 上界低于最短可表示波长（2Δ = 0.1 nm）
        assert!(estimate_spacing(&x, &y, 0.05).is_err());
    }

    #[test]
    fn test_too_short_profile_is_error() {
        assert!(estimate_spacing(&[0.0], &[1.0], 3.0).is_err());
    }
}
