//! # Raman 数据导出
//!
//! 导出角度分辨积分强度到 CSV。
//!
//! ## 格式
//! 每个角度一行：第一列为偏振角，其后每个峰窗口一列归一化积分强度。
//!
//! ## 依赖关系
//! - 被 `commands/raman/polarized.rs` 调用
//! - 使用 `raman/polarized.rs` 的 PolarizedPattern, PolarTrace
//! - 使用 `csv` 库写入 CSV 文件

use std::path::Path;

use crate::error::{LabError, Result};
use crate::raman::polarized::{PolarTrace, PolarizedPattern};

/// 导出峰窗口积分强度为 CSV 格式
pub fn traces_to_csv(
    pattern: &PolarizedPattern,
    traces: &[PolarTrace],
    output_path: &Path,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    write_traces(pattern, traces, &mut wtr)?;
    wtr.flush().map_err(|e| LabError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 写出表头与数据行（与写入目标解耦，便于测试）
fn write_traces<W: std::io::Write>(
    pattern: &PolarizedPattern,
    traces: &[PolarTrace],
    wtr: &mut csv::Writer<W>,
) -> Result<()> {
    let mut header = vec!["angle".to_string()];
    header.extend(traces.iter().map(|t| t.window.name.clone()));
    wtr.write_record(&header)?;

    // 闭合轨迹末尾的环绕点不导出
    for (i, angle) in pattern.angles.iter().enumerate() {
        let mut record = vec![format!("{:.2}", angle)];
        for trace in traces {
            record.push(format!("{:.6}", trace.intensities[i]));
        }
        wtr.write_record(&record)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeakWindow;
    use crate::raman::polarized::PolarizedOptions;

    #[test]
    fn test_csv_layout() {
        let rows = vec![
            (0.0, 300.0, 1.0),
            (0.0, 200.0, 2.0),
            (0.0, 100.0, 3.0),
            (90.0, 300.0, 2.0),
            (90.0, 200.0, 6.0),
            (90.0, 100.0, 4.0),
        ];
        let pattern = PolarizedPattern::from_rows(&rows, &PolarizedOptions::default()).unwrap();
        let peaks = vec![PeakWindow::new("full", 50.0, 350.0).unwrap()];
        let traces = pattern.integrate_windows(&peaks, false).unwrap();

        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_traces(&pattern, &traces, &mut wtr).unwrap();
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "angle,full");
        assert!(lines[1].starts_with("0.00,"));
        assert!(lines[2].starts_with("90.00,1.000000"));
    }
}
