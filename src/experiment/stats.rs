//! Summary statistics for simulated reaction times

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanSem {
    pub mean: f64,
    /// Standard error of the mean (sample SD / sqrt(n))
    pub sem: f64,
    pub n: usize,
}

/// Mean and standard error; `None` for an empty sample
pub fn mean_and_sem(values: &[f64]) -> Option<MeanSem> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return Some(MeanSem { mean, sem: 0.0, n });
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(MeanSem { mean, sem: variance.sqrt() / (n as f64).sqrt(), n })
}

/// Least-squares line through (x, y) points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least squares; `None` with fewer than two distinct x values
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let syy: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // a flat line explains flat data perfectly
    let r_squared = if syy == 0.0 { 1.0 } else { (sxy * sxy) / (sxx * syy) };

    Some(LinearFit { slope, intercept, r_squared })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sem() {
        let stats = mean_and_sem(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        // sample sd = sqrt(20/3)
        let expected = (20.0f64 / 3.0).sqrt() / 2.0;
        assert!((stats.sem - expected).abs() < 1e-12);
        assert_eq!(stats.n, 4);
    }

    #[test]
    fn test_single_and_empty_samples() {
        assert_eq!(mean_and_sem(&[7.0]).unwrap().sem, 0.0);
        assert!(mean_and_sem(&[]).is_none());
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let points: Vec<(f64, f64)> = (0..5).map(|x| (x as f64, 3.0 * x as f64 + 10.0)).collect();
        let fit = linear_fit(&points).unwrap();
        assert!((fit.slope - 3.0).abs() < 1e-12);
        assert!((fit.intercept - 10.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[(1.0, 2.0)]).is_none());
        assert!(linear_fit(&[(1.0, 2.0), (1.0, 5.0)]).is_none());
    }
}
