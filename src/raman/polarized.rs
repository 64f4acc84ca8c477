//! # 偏振分辨 Raman 管线
//!
//! 核心算法：把 (角度, 波数, 强度) 行数据重组为角度-波数强度网格，
//! 计算热图像元边界几何，并按峰窗口对每个角度做梯形积分。
//!
//! ## 算法概述
//! 1. 全局强度归一化（除以整个文件的最大强度）
//! 2. 按角度连续段分组为单次扫描，按角度升序排列
//! 3. 可选翻转每条扫描的波数方向（光谱仪按波数降序写文件）
//! 4. 校验不变量：≥2 个角度、各扫描等长、共享严格递增的波数轴
//! 5. 生成像元边界；角度轴收尾边界钉在环绕值（常规 360）
//! 6. 逐窗口积分、按窗口自身最大值归一化、可选极坐标闭合
//!
//! ## 依赖关系
//! - 被 `commands/raman/polarized.rs` 调用
//! - 使用 `raman/numeric.rs` 的积分与几何工具
//! - 使用 `models/spectrum.rs` 的 PeakWindow

use crate::error::{LabError, Result};
use crate::models::PeakWindow;
use crate::parsers::spectrum::PolarizedRow;
use crate::raman::numeric;

/// 偏振管线选项
#[derive(Debug, Clone)]
pub struct PolarizedOptions {
    /// 扫描方向翻转：按波数降序记录的文件需要翻转为升序
    pub flip: bool,
    /// 角度轴收尾边界的钉定值（度）
    pub wrap_angle: f64,
}

impl Default for PolarizedOptions {
    fn default() -> Self {
        PolarizedOptions {
            flip: true,
            wrap_angle: 360.0,
        }
    }
}

/// 角度-波数强度网格
///
/// 行按角度升序，列按波数升序，强度已按全局最大值归一化到 (0, 1]。
#[derive(Debug, Clone)]
pub struct PolarizedPattern {
    /// 偏振角（度，升序，去重后）
    pub angles: Vec<f64>,
    /// 共享波数轴（严格递增）
    pub shift: Vec<f64>,
    /// 强度网格，`intensity[i][j]` 为第 i 个角度、第 j 个波数采样
    pub intensity: Vec<Vec<f64>>,
    /// 波数轴像元边界（N+1 个）
    pub shift_posts: Vec<f64>,
    /// 角度轴像元边界（N+1 个，末端钉在环绕值）
    pub angle_posts: Vec<f64>,
}

/// 单个峰窗口的角度分辨积分强度
#[derive(Debug, Clone)]
pub struct PolarTrace {
    /// 对应的峰窗口
    pub window: PeakWindow,
    /// 角度序列（度；闭合时末尾多一个外推角）
    pub angles: Vec<f64>,
    /// 积分强度序列，按窗口自身最大值归一化（闭合时末尾复制首值）
    pub intensities: Vec<f64>,
}

impl PolarizedPattern {
    /// 从解析后的行数据构建网格
    pub fn from_rows(rows: &[PolarizedRow], opts: &PolarizedOptions) -> Result<Self> {
        // 全局归一化因子
        let max_intensity = rows.iter().map(|r| r.2).fold(f64::NEG_INFINITY, f64::max);
        if !(max_intensity > 0.0) {
            return Err(LabError::InsufficientData(
                "maximum intensity of the scan set is not positive".to_string(),
            ));
        }

        // 按角度连续段分组
        let mut groups: Vec<(f64, Vec<(f64, f64)>)> = Vec::new();
        for &(angle, shift, intensity) in rows {
            let start_new = match groups.last() {
                Some((current, _)) => *current != angle,
                None => true,
            };
            if start_new {
                groups.push((angle, Vec::new()));
            }
            if let Some((_, samples)) = groups.last_mut() {
                samples.push((shift, intensity));
            }
        }

        // 非连续重复的角度说明文件无法分组
        for (i, (a, _)) in groups.iter().enumerate() {
            if groups.iter().skip(i + 1).any(|(b, _)| b == a) {
                return Err(LabError::UnsupportedFormat(format!(
                    "polarization angle {} appears in non-contiguous blocks",
                    a
                )));
            }
        }

        if groups.len() < 2 {
            return Err(LabError::InsufficientData(format!(
                "need at least 2 polarization angles, got {}",
                groups.len()
            )));
        }

        groups.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap());

        let scan_len = groups[0].1.len();
        for (angle, samples) in &groups {
            if samples.len() != scan_len {
                return Err(LabError::UnsupportedFormat(format!(
                    "scan at angle {} has {} samples, expected {}",
                    angle,
                    samples.len(),
                    scan_len
                )));
            }
        }

        // 方向翻转后提取共享波数轴与强度行
        let mut angles = Vec::with_capacity(groups.len());
        let mut intensity = Vec::with_capacity(groups.len());
        let mut shift: Vec<f64> = Vec::new();

        for (angle, mut samples) in groups {
            if opts.flip {
                samples.reverse();
            }
            let axis: Vec<f64> = samples.iter().map(|(s, _)| *s).collect();
            if shift.is_empty() {
                shift = axis;
            } else if axis != shift {
                return Err(LabError::UnsupportedFormat(format!(
                    "scan at angle {} does not share the common wavenumber axis",
                    angle
                )));
            }
            angles.push(angle);
            intensity.push(
                samples
                    .iter()
                    .map(|(_, v)| v / max_intensity)
                    .collect::<Vec<f64>>(),
            );
        }

        if !shift.windows(2).all(|w| w[0] < w[1]) {
            return Err(LabError::UnsupportedFormat(
                "wavenumber axis is not strictly increasing after orientation handling"
                    .to_string(),
            ));
        }

        let shift_posts = numeric::generate_posts(&shift)?;
        let mut angle_posts = numeric::generate_posts(&angles)?;
        // 角度轴环绕：收尾边界钉在调用方给定的环绕值上
        *angle_posts.last_mut().unwrap() = opts.wrap_angle;

        Ok(PolarizedPattern {
            angles,
            shift,
            intensity,
            shift_posts,
            angle_posts,
        })
    }

    /// 逐峰窗口积分，返回每个窗口的角度分辨归一化强度
    ///
    /// `connect_final` 闭合极坐标轨迹：追加的角度按最后一段角间距
    /// 外推，追加的强度复制第一个角度的值。
    pub fn integrate_windows(
        &self,
        peaks: &[PeakWindow],
        connect_final: bool,
    ) -> Result<Vec<PolarTrace>> {
        let mut traces = Vec::with_capacity(peaks.len());

        for window in peaks {
            let integrated = numeric::integrate_rows_in_range(
                &self.shift,
                &self.intensity,
                window.low,
                window.high,
            )?;

            let max = integrated.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if !(max > 0.0) {
                return Err(LabError::InsufficientData(format!(
                    "peak window '{}' integrates to zero at every angle",
                    window.name
                )));
            }
            let normalized: Vec<f64> = integrated.iter().map(|v| v / max).collect();

            let (angles, intensities) = if connect_final {
                let n = self.angles.len();
                let spacing = self.angles[n - 1] - self.angles[n - 2];
                (
                    numeric::connect_final_init_pt(
                        &self.angles,
                        Some(self.angles[n - 1] + spacing),
                    ),
                    numeric::connect_final_init_pt(&normalized, None),
                )
            } else {
                (self.angles.clone(), normalized)
            };

            traces.push(PolarTrace {
                window: window.clone(),
                angles,
                intensities,
            });
        }

        Ok(traces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descending_rows() -> Vec<PolarizedRow> {
        vec![
            (0.0, 300.0, 1.0),
            (0.0, 200.0, 2.0),
            (0.0, 100.0, 3.0),
            (90.0, 300.0, 2.0),
            (90.0, 200.0, 6.0),
            (90.0, 100.0, 4.0),
        ]
    }

    #[test]
    fn test_grid_orientation_and_normalization() {
        let pattern =
            PolarizedPattern::from_rows(&descending_rows(), &PolarizedOptions::default()).unwrap();

        assert_eq!(pattern.angles, vec![0.0, 90.0]);
        // 翻转后波数升序
        assert_eq!(pattern.shift, vec![100.0, 200.0, 300.0]);
        // 全局最大值 6 归一化
        assert!((pattern.intensity[0][0] - 0.5).abs() < 1e-12);
        assert!((pattern.intensity[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_groups_are_ordered_by_angle() {
        let mut rows = descending_rows();
        rows.rotate_left(3); // 90° 扫描在前
        let pattern =
            PolarizedPattern::from_rows(&rows, &PolarizedOptions::default()).unwrap();
        assert_eq!(pattern.angles, vec![0.0, 90.0]);
        // 行归属跟随角度排序
        assert!((pattern.intensity[1][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_contiguous_angle_rejected() {
        let mut rows = descending_rows();
        rows.push((0.0, 50.0, 1.0));
        assert!(PolarizedPattern::from_rows(&rows, &PolarizedOptions::default()).is_err());
    }

    #[test]
    fn test_ragged_scans_rejected() {
        let mut rows = descending_rows();
        rows.pop();
        assert!(PolarizedPattern::from_rows(&rows, &PolarizedOptions::default()).is_err());
    }

    #[test]
    fn test_single_angle_rejected() {
        let rows = &descending_rows()[..3];
        assert!(PolarizedPattern::from_rows(rows, &PolarizedOptions::default()).is_err());
    }

    #[test]
    fn test_angle_posts_pinned_to_wrap_value() {
        let pattern =
            PolarizedPattern::from_rows(&descending_rows(), &PolarizedOptions::default()).unwrap();
        assert_eq!(pattern.angle_posts.len(), 3);
        assert!((pattern.angle_posts[0] - -45.0).abs() < 1e-12);
        assert!((pattern.angle_posts[1] - 45.0).abs() < 1e-12);
        assert!((pattern.angle_posts[2] - 360.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_integration_normalizes_per_window() {
        let pattern =
            PolarizedPattern::from_rows(&descending_rows(), &PolarizedOptions::default()).unwrap();
        let peaks = vec![PeakWindow::new("full", 50.0, 350.0).unwrap()];
        let traces = pattern.integrate_windows(&peaks, false).unwrap();

        assert_eq!(traces.len(), 1);
        let trace = &traces[0];
        // 强度更高的 90° 扫描归一化到 1.0
        assert!((trace.intensities[1] - 1.0).abs() < 1e-12);
        assert!((trace.intensities[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_connect_final_closure_asymmetry() {
        let pattern =
            PolarizedPattern::from_rows(&descending_rows(), &PolarizedOptions::default()).unwrap();
        let peaks = vec![PeakWindow::new("full", 50.0, 350.0).unwrap()];
        let traces = pattern.integrate_windows(&peaks, true).unwrap();

        let trace = &traces[0];
        assert_eq!(trace.angles.len(), 3);
        // 收尾角按最后一段间距外推
        assert!((trace.angles[2] - 180.0).abs() < 1e-12);
        // 收尾强度复制首值
        assert!((trace.intensities[2] - trace.intensities[0]).abs() < 1e-12);
    }

    #[test]
    fn test_window_outside_axis_is_error() {
        let pattern =
            PolarizedPattern::from_rows(&descending_rows(), &PolarizedOptions::default()).unwrap();
        let peaks = vec![PeakWindow::new("substrate", 500.0, 550.0).unwrap()];
        assert!(pattern.integrate_windows(&peaks, false).is_err());
    }
}
