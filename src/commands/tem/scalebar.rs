//! # scalebar 子命令实现
//!
//! 把 .ser 容器的像素标定写入 TIFF 头。
//!
//! ## 功能
//! - 单文件模式：转移到给定 TIFF 或新建同名 .tif
//! - 批量模式：并行转换整个目录（rayon）
//!
//! ## 依赖关系
//! - 使用 `cli/tem.rs` 定义的 ScalebarArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/ser.rs`, `tem/scalebar.rs`

use std::path::PathBuf;

use crate::batch::{collector, runner, ProcessResult};
use crate::cli::tem::ScalebarArgs;
use crate::error::{LabError, Result};
use crate::parsers::ser;
use crate::tem::scalebar;
use crate::utils::output;

/// 执行 scalebar 转移
pub fn execute(args: &ScalebarArgs) -> Result<()> {
    output::print_header("TEM Scale-bar Metadata Transfer");

    if args.input.is_file() {
        execute_single(args)
    } else if args.input.is_dir() {
        execute_batch(args)
    } else {
        Err(LabError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single(args: &ScalebarArgs) -> Result<()> {
    let image = ser::parse_ser_file(&args.input)?;
    output::print_info(&format!(
        "Pixel size: {:.4e} {} ({}x{} pixels)",
        image.calibration.pixel_size, image.calibration.unit, image.width, image.height
    ));

    let resolution = scalebar::resolution_for(&image.calibration, args.units)?;
    output::print_info(&format!(
        "Resolution: {:.4} px/{}m",
        resolution,
        args.units.symbol()
    ));

    let written =
        scalebar::transfer_scalebar_metadata(&image, &args.input, args.tiff.as_deref(), args.units)?;
    output::print_success(&format!("Metadata written to '{}'", written.display()));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &ScalebarArgs) -> Result<()> {
    if args.tiff.is_some() {
        return Err(LabError::InvalidArgument(
            "--tiff cannot be combined with a directory input".to_string(),
        ));
    }

    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let patterns = collector::parse_patterns(&args.pattern)?;
    let files = collector::collect_files(&args.input, &patterns, args.recursive);

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }
    output::print_info(&format!("Found {} container files", files.len()));

    let units = args.units;
    let overwrite = args.overwrite;
    let summary = runner::run_parallel(files, args.jobs, "Converting", move |file| {
        process_batch_file(file, units, overwrite)
    });

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        summary.success, summary.skipped, summary.failed
    ));

    if !summary.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, reason) in summary.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, reason));
        }
        if summary.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", summary.failures.len() - 10));
        }
    }

    Ok(())
}

/// 处理批量模式中的单个容器文件
fn process_batch_file(
    input: &PathBuf,
    units: crate::tem::SiPrefix,
    overwrite: bool,
) -> ProcessResult {
    let target = input.with_extension("tif");
    if target.exists() && !overwrite {
        return ProcessResult::Skipped(format!("Output exists, skipping: {}", target.display()));
    }

    let result = ser::parse_ser_file(input)
        .and_then(|image| scalebar::transfer_scalebar_metadata(&image, input, None, units));

    match result {
        Ok(written) => {
            ProcessResult::Success(format!("{} -> {}", input.display(), written.display()))
        }
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}
