//! # TEM 分析模块
//!
//! 提供电镜数据的比例尺元数据转移与晶面间距估计功能。
//!
//! ## 子模块
//! - `units`: SI 词头换算表
//! - `scalebar`: .ser 标定 -> TIFF 分辨率字段
//! - `spacing`: FFT 周期估计
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/tem/` 使用
//! - 使用 `parsers/ser.rs`, `models/calibration.rs`

pub mod plot;
pub mod scalebar;
pub mod spacing;
pub mod units;

pub use units::{unit_multiplier, SiPrefix};
