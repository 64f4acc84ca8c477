//! # 光谱数据模型
//!
//! 定义单条光谱和峰窗口的统一表示。
//!
//! ## 依赖关系
//! - 被 `parsers/spectrum.rs` 和 `raman/` 使用
//! - 无外部模块依赖

use serde::Serialize;

use crate::error::{LabError, Result};

/// 单条光谱
///
/// 自变量 `x`（波数或距离）与强度 `y` 等长。加载后除基线扣除和
/// 窗口裁剪外不再修改。
#[derive(Debug, Clone, Serialize)]
pub struct Spectrum {
    /// 自变量（如 Raman 位移, cm⁻¹）
    pub x: Vec<f64>,
    /// 强度（任意单位）
    pub y: Vec<f64>,
}

impl Spectrum {
    /// 创建新光谱，校验两列等长
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(LabError::InsufficientData(format!(
                "axis has {} samples but intensity has {}",
                x.len(),
                y.len()
            )));
        }
        Ok(Spectrum { x, y })
    }

    /// 采样点数
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// 命名峰窗口
///
/// 波数轴上的一段区间，期望包含一个感兴趣的 Raman 峰。
/// 窗口列表保持调用者给定的顺序，顺序只决定颜色与子图槽位。
#[derive(Debug, Clone, Serialize)]
pub struct PeakWindow {
    /// 窗口名（如 "a1g"）
    pub name: String,
    /// 下界（cm⁻¹）
    pub low: f64,
    /// 上界（cm⁻¹）
    pub high: f64,
}

impl PeakWindow {
    /// 创建新峰窗口，校验 low < high
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Result<Self> {
        if !(low < high) {
            return Err(LabError::InvalidRange(format!(
                "peak window bounds {}:{} (must be low < high)",
                low, high
            )));
        }
        Ok(PeakWindow {
            name: name.into(),
            low,
            high,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_length_mismatch() {
        let result = Spectrum::new(vec![1.0, 2.0], vec![1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_peak_window_rejects_inverted_bounds() {
        assert!(PeakWindow::new("a1g", 190.0, 170.0).is_err());
        assert!(PeakWindow::new("a1g", 170.0, 170.0).is_err());
        assert!(PeakWindow::new("a1g", 170.0, 190.0).is_ok());
    }
}
