//! # 光谱文本格式解析器
//!
//! 解析光谱仪导出的空白符分隔文本：
//!
//! ```text
//! # 两列（单条光谱）          # 三列（偏振分辨扫描）
//! 波数  强度                  角度  波数  强度
//! ```
//!
//! `#` 开头的行视为注释跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`

use std::fs;
use std::path::Path;

use crate::error::{LabError, Result};
use crate::models::Spectrum;

/// 偏振分辨扫描的单行数据 (角度, 波数, 强度)
pub type PolarizedRow = (f64, f64, f64);

/// 解析两列光谱文件
pub fn parse_spectrum_file(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_spectrum_content(&content, &path.display().to_string())
}

/// 从字符串内容解析两列光谱
pub fn parse_spectrum_content(content: &str, path_label: &str) -> Result<Spectrum> {
    let mut x = Vec::new();
    let mut y = Vec::new();

    for (lineno, line) in numeric_lines(content) {
        let cols = parse_columns(line, 2, lineno, "spectrum", path_label)?;
        x.push(cols[0]);
        y.push(cols[1]);
    }

    if x.is_empty() {
        return Err(LabError::ParseError {
            format: "spectrum".to_string(),
            path: path_label.to_string(),
            reason: "no data rows".to_string(),
        });
    }

    Spectrum::new(x, y)
}

/// 解析三列偏振分辨扫描文件
pub fn parse_polarized_file(path: &Path) -> Result<Vec<PolarizedRow>> {
    let content = fs::read_to_string(path).map_err(|e| LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_polarized_content(&content, &path.display().to_string())
}

/// 从字符串内容解析三列偏振分辨扫描
pub fn parse_polarized_content(content: &str, path_label: &str) -> Result<Vec<PolarizedRow>> {
    let mut rows = Vec::new();

    for (lineno, line) in numeric_lines(content) {
        let cols = parse_columns(line, 3, lineno, "polarized scan", path_label)?;
        rows.push((cols[0], cols[1], cols[2]));
    }

    if rows.is_empty() {
        return Err(LabError::ParseError {
            format: "polarized scan".to_string(),
            path: path_label.to_string(),
            reason: "no data rows".to_string(),
        });
    }

    Ok(rows)
}

/// 迭代非空、非注释行，附带 1 起始行号
fn numeric_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// 将一行拆成恰好 `expected` 个数值列
fn parse_columns(
    line: &str,
    expected: usize,
    lineno: usize,
    format: &str,
    path_label: &str,
) -> Result<Vec<f64>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != expected {
        return Err(LabError::ParseError {
            format: format.to_string(),
            path: path_label.to_string(),
            reason: format!(
                "line {}: expected {} numeric columns, found {}",
                lineno,
                expected,
                parts.len()
            ),
        });
    }

    parts
        .iter()
        .map(|p| {
            p.parse::<f64>().map_err(|_| LabError::ParseError {
                format: format.to_string(),
                path: path_label.to_string(),
                reason: format!("line {}: '{}' is not a number", lineno, p),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spectrum_basic() {
        let content = "\
# wavenumber intensity
100.0 0.1
200.0 1.0
300.0 0.2
";
        let spectrum = parse_spectrum_content(content, "test").unwrap();
        assert_eq!(spectrum.len(), 3);
        assert_eq!(spectrum.x, vec![100.0, 200.0, 300.0]);
        assert_eq!(spectrum.y, vec![0.1, 1.0, 0.2]);
    }

    #[test]
    fn test_parse_spectrum_wrong_column_count() {
        let content = "100.0 0.1 5.0\n";
        assert!(parse_spectrum_content(content, "test").is_err());
    }

    #[test]
    fn test_parse_spectrum_non_numeric() {
        let content = "100.0 abc\n";
        assert!(parse_spectrum_content(content, "test").is_err());
    }

    #[test]
    fn test_parse_spectrum_empty() {
        assert!(parse_spectrum_content("# only comments\n", "test").is_err());
    }

    #[test]
    fn test_parse_polarized_basic() {
        let content = "\
0.0 300.0 1.0
0.0 200.0 2.0
90.0 300.0 3.0
90.0 200.0 6.0
";
        let rows = parse_polarized_content(content, "test").unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], (90.0, 200.0, 6.0));
    }

    #[test]
    fn test_parse_polarized_rejects_two_columns() {
        let content = "0.0 300.0\n";
        assert!(parse_polarized_content(content, "test").is_err());
    }
}
