//! # 标定与估计结果数据模型
//!
//! TEM 管线使用的像素标定记录和 FFT 周期估计结果。
//!
//! ## 依赖关系
//! - 被 `parsers/ser.rs`, `tem/` 使用
//! - 无外部模块依赖

use serde::Serialize;

/// 像素标定记录
///
/// 从显微镜容器文件中读出的 (像素尺寸, 物理单位) 对，
/// 读一次、写一次，无其他生命周期。
#[derive(Debug, Clone, Serialize)]
pub struct PixelCalibration {
    /// 单像素的物理尺寸（以 `unit` 为单位）
    pub pixel_size: f64,
    /// 物理单位字符串，SI 词头 + "m"（如 "nm"）
    pub unit: String,
}

impl PixelCalibration {
    /// 单位字符串中的 SI 词头部分（"nm" -> "n", "m" -> ""）
    pub fn prefix(&self) -> &str {
        match self.unit.rsplit_once('m') {
            Some((head, _)) => head,
            None => &self.unit,
        }
    }
}

/// FFT 周期估计结果
///
/// 主导空间波长，以及用于检查/绘图的滤波后波长轴与幅度谱。
#[derive(Debug, Clone, Serialize)]
pub struct SpacingEstimate {
    /// 主导空间波长（与输入距离列同单位）
    pub wavelength: f64,
    /// 滤波后的波长轴
    pub wavelengths: Vec<f64>,
    /// 滤波后的幅度谱
    pub magnitudes: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_prefix() {
        let cal = PixelCalibration {
            pixel_size: 1.0,
            unit: "nm".to_string(),
        };
        assert_eq!(cal.prefix(), "n");

        let plain = PixelCalibration {
            pixel_size: 1.0,
            unit: "m".to_string(),
        };
        assert_eq!(plain.prefix(), "");
    }
}
