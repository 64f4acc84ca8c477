//! # labkit - 实验室数据分析统一工具箱
//!
//! 把分散的实验数据处理脚本用 Rust 重构，统一成一个库加单一
//! 可执行文件。每个入口都是从输入文件到输出值/图像的同步单趟
//! 变换，无持久状态；库调用通过显式参数配置。
//!
//! ## 功能
//! - `raman`: 单谱绘图（窗口裁剪、AsLS 基线扣除）、偏振分辨
//!   热图与峰窗口极坐标分析
//! - `tem`: .ser 比例尺元数据转移到 TIFF、剖面 FFT 晶面间距估计
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (文件格式解析器)
//!   │     ├── raman/     (光谱分析)
//!   │     ├── tem/       (电镜数据处理)
//!   │     └── models/    (数据模型)
//!   ├── batch/      (并行批量处理)
//!   ├── utils/      (终端输出工具)
//!   └── error.rs    (错误处理)
//! ```
//!
//! 绘图调用各自持有独立的 plotters 后端，库内没有共享的可变
//! 图形状态；并发调用只要求输出路径互不相同。

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod parsers;
pub mod raman;
pub mod tem;
pub mod utils;

pub use error::{LabError, Result};
