//! # 数据模型模块
//!
//! 定义两条分析管线共用的领域数据类型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `raman/`, `tem/` 使用
//! - 子模块: spectrum, calibration

pub mod calibration;
pub mod spectrum;

pub use calibration::{PixelCalibration, SpacingEstimate};
pub use spectrum::{PeakWindow, Spectrum};
