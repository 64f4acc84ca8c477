//! # 基线估计
//!
//! 非对称最小二乘（AsLS）基线估计：最小化
//! `Σ wᵢ(yᵢ−zᵢ)² + λ Σ (Δ²z)²`，迭代更新非对称权重
//! `wᵢ = p (yᵢ > zᵢ) / 1−p (其他)`。
//! 法方程矩阵为五对角对称正定阵，用带状 Cholesky 分解直接求解。
//!
//! ## 依赖关系
//! - 被 `commands/raman/spectrum.rs` 调用
//! - 无外部模块依赖

/// AsLS 基线估计器
///
/// 无状态：同一参数可重复用于任意条光谱。
#[derive(Debug, Clone)]
pub struct AslsBaseline {
    /// 平滑惩罚系数 λ
    pub lambda: f64,
    /// 非对称权重 p（峰上方残差的权重）
    pub p: f64,
    /// 最大迭代次数
    pub max_iter: usize,
}

impl Default for AslsBaseline {
    fn default() -> Self {
        AslsBaseline {
            lambda: 1e6,
            p: 0.01,
            max_iter: 50,
        }
    }
}

impl AslsBaseline {
    /// 估计基线，返回与 `y` 等长的基线数组
    ///
    /// 少于 4 个采样点时无法构造二阶差分惩罚，原样返回输入。
    pub fn estimate(&self, y: &[f64]) -> Vec<f64> {
        let n = y.len();
        if n < 4 {
            return y.to_vec();
        }

        // λ·DᵀD 的三条带（D 为二阶差分算子）
        let mut dd0 = vec![6.0 * self.lambda; n];
        dd0[0] = self.lambda;
        dd0[1] = 5.0 * self.lambda;
        dd0[n - 2] = 5.0 * self.lambda;
        dd0[n - 1] = self.lambda;

        let mut dd1 = vec![-4.0 * self.lambda; n - 1];
        dd1[0] = -2.0 * self.lambda;
        dd1[n - 2] = -2.0 * self.lambda;

        let dd2 = vec![self.lambda; n - 2];

        let mut w = vec![1.0; n];
        let mut z = vec![0.0; n];

        for _ in 0..self.max_iter {
            // A = W + λDᵀD, b = W·y
            let a0: Vec<f64> = dd0.iter().zip(w.iter()).map(|(d, wi)| d + wi).collect();
            let b: Vec<f64> = w.iter().zip(y.iter()).map(|(wi, yi)| wi * yi).collect();
            z = solve_banded(&a0, &dd1, &dd2, &b);

            let mut changed = false;
            for i in 0..n {
                let wi = if y[i] > z[i] { self.p } else { 1.0 - self.p };
                if wi != w[i] {
                    w[i] = wi;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        z
    }

    /// 就地从强度列中扣除估计基线
    pub fn remove(&self, y: &mut [f64]) {
        let baseline = self.estimate(y);
        for (v, b) in y.iter_mut().zip(baseline.iter()) {
            *v -= b;
        }
    }
}

/// 求解带宽 2 的对称正定带状方程 A·z = b（Cholesky A = L·Lᵀ）
///
/// `a0`/`a1`/`a2` 为主对角线及第一、二条次对角线。
fn solve_banded(a0: &[f64], a1: &[f64], a2: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a0.len();
    let mut l0 = vec![0.0; n];
    let mut l1 = vec![0.0; n]; // L[i][i-1]
    let mut l2 = vec![0.0; n]; // L[i][i-2]

    for i in 0..n {
        if i >= 2 {
            l2[i] = a2[i - 2] / l0[i - 2];
        }
        if i >= 1 {
            let mut v = a1[i - 1];
            if i >= 2 {
                v -= l2[i] * l1[i - 1];
            }
            l1[i] = v / l0[i - 1];
        }
        let mut d = a0[i] - l1[i] * l1[i] - l2[i] * l2[i];
        // 数值下限，矩阵按构造正定
        if d < 1e-12 {
            d = 1e-12;
        }
        l0[i] = d.sqrt();
    }

    // 前代 L·u = b
    let mut u = vec![0.0; n];
    for i in 0..n {
        let mut v = b[i];
        if i >= 1 {
            v -= l1[i] * u[i - 1];
        }
        if i >= 2 {
            v -= l2[i] * u[i - 2];
        }
        u[i] = v / l0[i];
    }

    // 回代 Lᵀ·z = u
    let mut z = vec![0.0; n];
    for i in (0..n).rev() {
        let mut v = u[i];
        if i + 1 < n {
            v -= l1[i + 1] * z[i + 1];
        }
        if i + 2 < n {
            v -= l2[i + 2] * z[i + 2];
        }
        z[i] = v / l0[i];
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_banded_identity() {
        // A = I 时解就是右端项
        let a0 = vec![1.0; 5];
        let a1 = vec![0.0; 4];
        let a2 = vec![0.0; 3];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let z = solve_banded(&a0, &a1, &a2, &b);
        for (zi, bi) in z.iter().zip(b.iter()) {
            assert!((zi - bi).abs() < 1e-10);
        }
    }

    #[test]
    fn test_baseline_recovers_linear_background() {
        let n = 300;
        let background: Vec<f64> = (0..n).map(|i| 2.0 + 0.01 * i as f64).collect();
        let y: Vec<f64> = background
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let d = (i as f64 - 150.0) / 15.0;
                b + 10.0 * (-0.5 * d * d).exp()
            })
            .collect();

        let estimator = AslsBaseline::default();
        let z = estimator.estimate(&y);

        // 峰两侧的平坦区域基线应贴近真实背景
        for i in (30..60).chain(240..270) {
            assert!(
                (z[i] - background[i]).abs() < 1.0,
                "baseline off at {}: {} vs {}",
                i,
                z[i],
                background[i]
            );
        }

        // 扣除基线后峰高基本保留
        let mut corrected = y.clone();
        estimator.remove(&mut corrected);
        assert!(corrected[150] > 7.0);
    }

    #[test]
    fn test_short_input_passthrough() {
        let y = vec![1.0, 2.0, 3.0];
        assert_eq!(AslsBaseline::default().estimate(&y), y);
    }
}
