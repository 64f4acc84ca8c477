//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `raman`: Raman 光谱分析（嵌套子命令）
//!   - `spectrum`: 单条光谱绘图
//!   - `polarized`: 偏振分辨热图与极坐标图
//! - `tem`: 电镜数据处理（嵌套子命令）
//!   - `scalebar`: .ser 比例尺元数据转移到 TIFF
//!   - `spacing`: FFT 晶面间距估计
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: raman, tem

pub mod raman;
pub mod tem;

use clap::{Parser, Subcommand};

/// labkit - 实验室数据分析统一工具箱
#[derive(Parser)]
#[command(name = "labkit")]
#[command(version)]
#[command(about = "A unified lab data-analysis toolkit for polarized Raman and TEM", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Raman spectroscopy analysis
    Raman(raman::RamanArgs),

    /// Transmission electron microscopy helpers
    Tem(tem::TemArgs),
}
