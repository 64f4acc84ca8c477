//! # 通用数值辅助函数
//!
//! 光谱处理用到的索引查找、窗口积分与网格几何工具。
//!
//! ## 依赖关系
//! - 被 `raman/polarized.rs` 和 `commands/raman/` 使用
//! - 无外部模块依赖

use crate::error::{LabError, Result};

/// 返回 `arr` 中与 `n` 绝对差最小的元素下标
///
/// 并列时取第一个出现的最小值。前置条件：`arr` 非空（调用方在
/// 解析阶段保证）。
pub fn nearest_index(arr: &[f64], n: f64) -> usize {
    let mut best = 0;
    let mut best_diff = f64::INFINITY;
    for (i, &v) in arr.iter().enumerate() {
        let diff = (v - n).abs();
        if diff < best_diff {
            best = i;
            best_diff = diff;
        }
    }
    best
}

/// 返回窗口内最大强度点的全局下标
///
/// 上界最近邻采样点包含在搜索片段内（闭区间）。与
/// [`integrate_in_range`] 的开上界约定不同：窗口最大值是显示辅助，
/// 用户指定的边界采样点不应被切掉。
pub fn max_in_range(x_arr: &[f64], y_arr: &[f64], low: f64, hi: f64) -> usize {
    let low_i = nearest_index(x_arr, low);
    let hi_i = nearest_index(x_arr, hi);
    let mut max_i = low_i;
    let mut max_v = f64::NEG_INFINITY;
    for i in low_i..=hi_i.min(y_arr.len() - 1) {
        if y_arr[i] > max_v {
            max_v = y_arr[i];
            max_i = i;
        }
    }
    max_i
}

/// 窗口边界映射为最近邻采样下标，校验积分片段至少含两个采样点
fn integration_bounds(x_arr: &[f64], low: f64, hi: f64) -> Result<(usize, usize)> {
    let low_i = nearest_index(x_arr, low);
    let hi_i = nearest_index(x_arr, hi);
    if hi_i < low_i + 2 {
        return Err(LabError::EmptyRange { low, high: hi });
    }
    Ok((low_i, hi_i))
}

/// 片段梯形积分
fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    let mut area = 0.0;
    for i in 1..x.len() {
        area += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    area
}

/// 单条曲线在 (low, hi) 窗口内的梯形积分
///
/// 积分片段不含上界下标（半开），保证相邻窗口 [a,b] + [b,c]
/// 不重复计入公共采样点。
pub fn integrate_in_range(x_arr: &[f64], y_arr: &[f64], low: f64, hi: f64) -> Result<f64> {
    let (low_i, hi_i) = integration_bounds(x_arr, low, hi)?;
    Ok(trapezoid(&x_arr[low_i..hi_i], &y_arr[low_i..hi_i]))
}

/// 共享同一 x 轴的一批曲线的窗口梯形积分
///
/// 边界只解析一次，逐行积分，返回每行一个面积值。
pub fn integrate_rows_in_range(
    x_arr: &[f64],
    rows: &[Vec<f64>],
    low: f64,
    hi: f64,
) -> Result<Vec<f64>> {
    let (low_i, hi_i) = integration_bounds(x_arr, low, hi)?;
    Ok(rows
        .iter()
        .map(|row| trapezoid(&x_arr[low_i..hi_i], &row[low_i..hi_i]))
        .collect())
}

/// 由 N 个单调采样位置生成 N+1 个像元边界（"post"）
///
/// 每个采样点落在相邻两个边界的中点上，最外侧边界按最近的
/// 采样间距向外镜像。
pub fn generate_posts(points: &[f64]) -> Result<Vec<f64>> {
    if points.len() < 2 {
        return Err(LabError::InsufficientData(format!(
            "need at least 2 samples to place cell edges, got {}",
            points.len()
        )));
    }
    let n = points.len();
    let mut posts = Vec::with_capacity(n + 1);
    posts.push(points[0] - (points[1] - points[0]) / 2.0);
    for i in 1..n {
        posts.push((points[i - 1] + points[i]) / 2.0);
    }
    posts.push(points[n - 1] + (points[n - 1] - points[n - 2]) / 2.0);
    Ok(posts)
}

/// 序列尾部追加收尾点
///
/// `set_final_pt` 为 None 时追加首元素的副本（闭合环），
/// 否则追加给定值。
pub fn connect_final_init_pt(arr: &[f64], set_final_pt: Option<f64>) -> Vec<f64> {
    let mut out = arr.to_vec();
    match set_final_pt {
        Some(v) => out.push(v),
        None => {
            if let Some(&first) = arr.first() {
                out.push(first);
            }
        }
    }
    out
}

/// 将成对数组限制到 low < x < hi 的行（两端严格不等）
pub fn cut(x_arr: &[f64], y_arr: &[f64], low: f64, hi: f64) -> (Vec<f64>, Vec<f64>) {
    let mut x_out = Vec::new();
    let mut y_out = Vec::new();
    for (&x, &y) in x_arr.iter().zip(y_arr.iter()) {
        if low < x && x < hi {
            x_out.push(x);
            y_out.push(y);
        }
    }
    (x_out, y_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_index_minimizes_distance() {
        let arr = [100.0, 200.0, 300.0];
        assert_eq!(nearest_index(&arr, 180.0), 1);
        assert_eq!(nearest_index(&arr, 90.0), 0);
        assert_eq!(nearest_index(&arr, 1000.0), 2);
    }

    #[test]
    fn test_nearest_index_tie_takes_first() {
        // 150 与 100 和 200 等距
        let arr = [100.0, 200.0];
        assert_eq!(nearest_index(&arr, 150.0), 0);
    }

    #[test]
    fn test_max_in_range_includes_upper_bound_sample() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 1.0, 2.0, 3.0, 9.0];
        // 上界最近邻采样点 (x=4) 在闭区间内
        assert_eq!(max_in_range(&x, &y, 1.0, 4.0), 4);
        assert_eq!(max_in_range(&x, &y, 0.0, 2.0), 2);
    }

    #[test]
    fn test_integrate_translation_additive() {
        let n = 400;
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.01).collect();
        let y: Vec<f64> = x.iter().map(|v| (v * 1.3).sin() + 2.0).collect();

        let whole = integrate_in_range(&x, &y, 0.5, 3.5).unwrap();
        let left = integrate_in_range(&x, &y, 0.5, 2.0).unwrap();
        let right = integrate_in_range(&x, &y, 2.0, 3.5).unwrap();

        // 分段积分与整段积分在一个采样段面积的离散误差内一致
        assert!((whole - (left + right)).abs() < 0.05);
    }

    #[test]
    fn test_integrate_empty_slice_is_error() {
        let x = [100.0, 200.0, 300.0];
        let y = [1.0, 2.0, 3.0];
        // 窗口完全落在数据范围之外，两端映射到同一采样点
        assert!(integrate_in_range(&x, &y, 500.0, 550.0).is_err());
    }

    #[test]
    fn test_integrate_rows_matches_single() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let rows = vec![vec![1.0, 1.0, 1.0, 1.0], vec![0.0, 2.0, 4.0, 6.0]];
        let batched = integrate_rows_in_range(&x, &rows, 0.0, 3.0).unwrap();
        let single = integrate_in_range(&x, &rows[1], 0.0, 3.0).unwrap();
        assert_eq!(batched.len(), 2);
        assert!((batched[1] - single).abs() < 1e-12);
    }

    #[test]
    fn test_generate_posts_even_spacing() {
        let posts = generate_posts(&[0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        let expected = [-0.5, 0.5, 1.5, 2.5, 3.5, 4.5];
        assert_eq!(posts.len(), expected.len());
        for (p, e) in posts.iter().zip(expected.iter()) {
            assert!((p - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_generate_posts_needs_two_samples() {
        assert!(generate_posts(&[1.0]).is_err());
    }

    #[test]
    fn test_connect_final_init_pt() {
        assert_eq!(
            connect_final_init_pt(&[1.0, 2.0, 3.0], None),
            vec![1.0, 2.0, 3.0, 1.0]
        );
        assert_eq!(
            connect_final_init_pt(&[1.0, 2.0, 3.0], Some(99.0)),
            vec![1.0, 2.0, 3.0, 99.0]
        );
    }

    #[test]
    fn test_cut_strict_bounds() {
        let x = [100.0, 200.0, 300.0];
        let y = [0.1, 1.0, 0.2];
        let (cx, cy) = cut(&x, &y, 150.0, 250.0);
        assert_eq!(cx, vec![200.0]);
        assert_eq!(cy, vec![1.0]);

        // 边界值本身被排除
        let (bx, _) = cut(&x, &y, 100.0, 300.0);
        assert_eq!(bx, vec![200.0]);
    }
}
