//! # 强度剖面 CSV 解析器
//!
//! 读取 ImageJ 等软件导出的带表头剖面 CSV，按列名取出距离列与
//! 强度列。列名可配置，缺省 `Distance_(nm)` / `Gray_Value`。
//!
//! ## 依赖关系
//! - 被 `commands/tem/spacing.rs` 使用
//! - 使用 `csv` 库读取

use std::io::Read;
use std::path::Path;

use crate::error::{LabError, Result};

/// 缺省距离列名
pub const DEFAULT_DISTANCE_COLUMN: &str = "Distance_(nm)";
/// 缺省强度列名
pub const DEFAULT_INTENSITY_COLUMN: &str = "Gray_Value";

/// 解析剖面 CSV 文件，返回 (距离, 强度) 两列
pub fn parse_profile_file(
    path: &Path,
    distance_col: &str,
    intensity_col: &str,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let reader = csv::Reader::from_path(path)?;
    parse_profile_reader(reader, distance_col, intensity_col, &path.display().to_string())
}

/// 从任意读取器解析剖面 CSV
pub fn parse_profile_reader<R: Read>(
    mut reader: csv::Reader<R>,
    distance_col: &str,
    intensity_col: &str,
    path_label: &str,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let err = |reason: String| LabError::ParseError {
        format: "profile csv".to_string(),
        path: path_label.to_string(),
        reason,
    };

    let headers = reader.headers()?.clone();
    let col_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| err(format!("missing column '{}'", name)))
    };
    let distance_idx = col_index(distance_col)?;
    let intensity_idx = col_index(intensity_col)?;

    let mut distance = Vec::new();
    let mut intensity = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let parse_field = |idx: usize, name: &str| -> Result<f64> {
            let field = record
                .get(idx)
                .ok_or_else(|| err(format!("row {}: missing field '{}'", row + 1, name)))?;
            field.trim().parse::<f64>().map_err(|_| {
                err(format!(
                    "row {}: '{}' is not a number in column '{}'",
                    row + 1,
                    field,
                    name
                ))
            })
        };
        distance.push(parse_field(distance_idx, distance_col)?);
        intensity.push(parse_field(intensity_idx, intensity_col)?);
    }

    if distance.is_empty() {
        return Err(err("no data rows".to_string()));
    }

    Ok((distance, intensity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_from(content: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(content.as_bytes())
    }

    #[test]
    fn test_parse_default_columns() {
        let content = "\
Distance_(nm),Gray_Value
0.0,10.5
0.5,12.0
1.0,9.8
";
        let (x, y) = parse_profile_reader(
            reader_from(content),
            DEFAULT_DISTANCE_COLUMN,
            DEFAULT_INTENSITY_COLUMN,
            "test",
        )
        .unwrap();
        assert_eq!(x, vec![0.0, 0.5, 1.0]);
        assert_eq!(y, vec![10.5, 12.0, 9.8]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let content = "\
index,Distance_(nm),Gray_Value
0,0.0,1.0
1,0.5,2.0
";
        let (x, _) = parse_profile_reader(
            reader_from(content),
            DEFAULT_DISTANCE_COLUMN,
            DEFAULT_INTENSITY_COLUMN,
            "test",
        )
        .unwrap();
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn test_missing_column_is_error() {
        let content = "Distance_(nm),Value\n0.0,1.0\n";
        let result = parse_profile_reader(
            reader_from(content),
            DEFAULT_DISTANCE_COLUMN,
            DEFAULT_INTENSITY_COLUMN,
            "test",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_field_is_error() {
        let content = "Distance_(nm),Gray_Value\n0.0,abc\n";
        let result = parse_profile_reader(
            reader_from(content),
            DEFAULT_DISTANCE_COLUMN,
            DEFAULT_INTENSITY_COLUMN,
            "test",
        );
        assert!(result.is_err());
    }
}
