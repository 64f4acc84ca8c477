//! # 批量执行器
//!
//! 在 rayon 线程池上并行处理文件列表，带进度条与结果汇总。
//!
//! ## 依赖关系
//! - 被 `commands/tem/scalebar.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use std::path::PathBuf;

use rayon::prelude::*;

use crate::utils::progress;

/// 单个文件的处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如输出已存在）
    Skipped(String),
    /// 处理失败 (文件路径, 错误信息)
    Failed(String, String),
}

/// 批量处理结果汇总
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 失败详情 (文件路径, 错误信息)
    pub failures: Vec<(String, String)>,
}

impl BatchSummary {
    fn absorb(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, reason) => {
                self.failed += 1;
                self.failures.push((path, reason));
            }
        }
    }
}

/// 并行处理文件列表
///
/// `jobs` 为 0 时取 CPU 核数。
pub fn run_parallel<F>(files: Vec<PathBuf>, jobs: usize, label: &str, processor: F) -> BatchSummary
where
    F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
{
    let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
    let pb = progress::batch_progress_bar(files.len() as u64, label);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("failed to build worker pool");

    let results: Vec<ProcessResult> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let result = processor(file);
                pb.inc(1);
                result
            })
            .collect()
    });

    pb.finish_and_clear();

    let mut summary = BatchSummary::default();
    for result in results {
        summary.absorb(result);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let files: Vec<PathBuf> = (0..6).map(|i| PathBuf::from(format!("f{}", i))).collect();
        let summary = run_parallel(files, 2, "test", |file| {
            let name = file.display().to_string();
            match name.as_str() {
                "f0" | "f1" | "f2" => ProcessResult::Success(name),
                "f3" => ProcessResult::Skipped(name),
                _ => ProcessResult::Failed(name, "boom".to_string()),
            }
        });

        assert_eq!(summary.success, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failures.len(), 2);
    }
}
