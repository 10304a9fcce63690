//! Numeric helpers for the metric pipelines
//!
//! Arithmetic mean, simple ordinary least squares and the Student-t tail
//! probability needed for coefficient p-values.

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Simple linear fit `y = intercept + slope * x`
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    pub intercept: f64,
    pub slope: f64,
    /// `None` when y never varies
    pub r_squared: Option<f64>,
    /// Residual degrees of freedom (n - 2)
    pub df_resid: usize,
    /// Residual sum of squares
    pub ssr: f64,
    /// Centered sum of squares of x
    pub sxx: f64,
    pub sum_x2: f64,
    pub n: usize,
}

impl OlsFit {
    /// Standard errors of (intercept, slope); `None` without residual degrees of freedom
    pub fn std_errors(&self) -> Option<[f64; 2]> {
        if self.df_resid == 0 {
            return None;
        }
        let sigma2 = self.ssr / self.df_resid as f64;
        let se_slope = (sigma2 / self.sxx).sqrt();
        let se_intercept = (sigma2 * self.sum_x2 / (self.n as f64 * self.sxx)).sqrt();
        Some([se_intercept, se_slope])
    }

    /// Adjusted R²; `None` without residual degrees of freedom or when R² is undefined
    pub fn adj_r_squared(&self) -> Option<f64> {
        if self.df_resid == 0 {
            return None;
        }
        let n = self.n as f64;
        self.r_squared
            .map(|r2| 1.0 - (1.0 - r2) * (n - 1.0) / self.df_resid as f64)
    }
}

/// Fit y on x by ordinary least squares.
///
/// Returns `None` when fewer than two points are given or x has no variance.
pub fn ols(x: &[f64], y: &[f64]) -> Option<OlsFit> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return None;
    }
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let syy: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ssr: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let r_squared = (syy > 0.0).then(|| 1.0 - ssr / syy);

    Some(OlsFit {
        intercept,
        slope,
        r_squared,
        df_resid: n - 2,
        ssr,
        sxx,
        sum_x2: x.iter().map(|xi| xi * xi).sum(),
        n,
    })
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom
pub fn t_two_sided_p(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    let x = df / (df + t * t);
    regularized_incomplete_beta(x, df / 2.0, 0.5).clamp(0.0, 1.0)
}

/// Natural log of the gamma function (Lanczos approximation, g = 7)
fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Regularized incomplete beta function I_x(a, b)
fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fast only on this side of the mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

/// Continued fraction for the incomplete beta function (modified Lentz)
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0, 9.0]), Some(5.0));
    }

    #[test]
    fn test_ols_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 0.5 * v).collect();
        let fit = ols(&x, &y).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 2.0).abs() < 1e-12);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(fit.df_resid, 3);
    }

    #[test]
    fn test_ols_known_values() {
        // y = 1 + 2x with residuals (+1, -1, -1, +1)
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [2.0, 2.0, 4.0, 8.0];
        let fit = ols(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        // syy = 24, ssr = 4
        assert!((fit.r_squared.unwrap() - (1.0 - 4.0 / 24.0)).abs() < 1e-12);
        let se = fit.std_errors().unwrap();
        // sigma² = 2, sxx = 5
        assert!((se[1] - (2.0f64 / 5.0).sqrt()).abs() < 1e-12);
        assert!((se[0] - (2.0f64 * 14.0 / 20.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_constant_y_has_no_r_squared() {
        let fit = ols(&[2.0, 5.0, 8.0, 9.0], &[6.0; 4]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 6.0);
        assert_eq!(fit.r_squared, None);
        assert_eq!(fit.adj_r_squared(), None);
    }

    #[test]
    fn test_ols_degenerate() {
        assert!(ols(&[1.0], &[1.0]).is_none());
        assert!(ols(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_t_two_sided_p_reference_values() {
        // t = 0 is never significant
        assert!((t_two_sided_p(0.0, 10.0) - 1.0).abs() < 1e-9);
        // df = 1 is Cauchy: P(|T| > 1) = 0.5
        assert!((t_two_sided_p(1.0, 1.0) - 0.5).abs() < 1e-9);
        // df = 2 closed form: p = 1 - t / sqrt(t² + 2)
        let t: f64 = 2.5;
        let expected = 1.0 - t / (t * t + 2.0).sqrt();
        assert!((t_two_sided_p(t, 2.0) - expected).abs() < 1e-9);
        // Two-sided 5% critical value for df = 10
        assert!((t_two_sided_p(2.228_138_85, 10.0) - 0.05).abs() < 1e-6);
        // Symmetric in t
        assert_eq!(t_two_sided_p(-1.3, 7.0), t_two_sided_p(1.3, 7.0));
    }

    #[test]
    fn test_ln_gamma() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }
}
