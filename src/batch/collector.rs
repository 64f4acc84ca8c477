//! # 文件收集器
//!
//! 根据输入目录和 glob 模式收集待处理文件列表。
//!
//! ## 依赖关系
//! - 被 `commands/tem/scalebar.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` 做文件名模式匹配

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{LabError, Result};

/// 解析逗号分隔的多模式串（如 `"*.ser,*.emi"`）
pub fn parse_patterns(patterns: &str) -> Result<Vec<Pattern>> {
    let parsed: Vec<Pattern> = patterns
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Pattern::new(s)
                .map_err(|e| LabError::InvalidArgument(format!("bad pattern '{}': {}", s, e)))
        })
        .collect::<Result<Vec<Pattern>>>()?;

    if parsed.is_empty() {
        return Err(LabError::InvalidArgument(format!(
            "no usable pattern in '{}'",
            patterns
        )));
    }
    Ok(parsed)
}

/// 文件名是否匹配任一模式
pub fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| patterns.iter().any(|p| p.matches(name)))
        .unwrap_or(false)
}

/// 收集目录下匹配模式的文件，按路径排序保证处理顺序稳定
pub fn collect_files(input: &Path, patterns: &[Pattern], recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| matches_any(patterns, e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patterns() {
        let patterns = parse_patterns("*.ser, *.emi").unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(parse_patterns(" , ").is_err());
        assert!(parse_patterns("[").is_err());
    }

    #[test]
    fn test_matches_any() {
        let patterns = parse_patterns("*.ser,image_??.tif").unwrap();
        assert!(matches_any(&patterns, Path::new("/data/scan.ser")));
        assert!(matches_any(&patterns, Path::new("image_01.tif")));
        assert!(!matches_any(&patterns, Path::new("scan.tif")));
        assert!(!matches_any(&patterns, Path::new("image_001.tif")));
    }
}
