//! # 解析器模块
//!
//! 提供各种仪器数据文件的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: spectrum, profile, ser

pub mod profile;
pub mod ser;
pub mod spectrum;
