//! Portfolio risk/return statistics
//!
//! A single return series uses the population standard deviation. A
//! multi-asset matrix (rows = periods, columns = assets) uses the sample
//! covariance matrix and `sqrt(w' S w)` for volatility.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    /// Return per unit of volatility, 0 when volatility is 0
    pub sharpe_ratio: f64,
}

impl PortfolioMetrics {
    fn new(expected_return: f64, volatility: f64) -> Self {
        let sharpe_ratio = if volatility > 0.0 {
            expected_return / volatility
        } else {
            0.0
        };
        Self {
            expected_return,
            volatility,
            sharpe_ratio,
        }
    }
}

/// Metrics for one series of returns
pub fn series_metrics(returns: &[f64]) -> Result<PortfolioMetrics> {
    if returns.is_empty() {
        return Err(CalcError::validation("returns", "at least one return is required"));
    }
    check_finite(returns)?;

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    Ok(PortfolioMetrics::new(mean, variance.sqrt()))
}

/// Metrics for a weighted portfolio; equal weights when `weights` is `None`
pub fn portfolio_metrics(returns: &[Vec<f64>], weights: Option<&[f64]>) -> Result<PortfolioMetrics> {
    log::info!("Calculating portfolio metrics over {} periods", returns.len());

    let n_assets = returns.first().map(Vec::len).unwrap_or(0);
    if n_assets == 0 {
        return Err(CalcError::validation("returns", "at least one asset is required"));
    }
    if returns.len() < 2 {
        return Err(CalcError::validation("returns", "at least two periods are required"));
    }
    if returns.iter().any(|row| row.len() != n_assets) {
        return Err(CalcError::validation("returns", "every period must list every asset"));
    }
    for row in returns {
        check_finite(row)?;
    }

    let weights: Vec<f64> = match weights {
        Some(w) if w.len() != n_assets => {
            return Err(CalcError::validation(
                "weights",
                format!("number of weights ({}) does not match number of assets ({})", w.len(), n_assets),
            ))
        }
        Some(w) => w.to_vec(),
        None => vec![1.0 / n_assets as f64; n_assets],
    };

    let means = column_means(returns, n_assets);
    let cov = sample_covariance(returns, &means);

    let expected_return: f64 = means.iter().zip(&weights).map(|(m, w)| m * w).sum();
    let variance: f64 = (0..n_assets)
        .map(|i| (0..n_assets).map(|j| weights[i] * cov[i][j] * weights[j]).sum::<f64>())
        .sum();

    // Rounding can push a degenerate variance slightly below zero
    Ok(PortfolioMetrics::new(expected_return, variance.max(0.0).sqrt()))
}

fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CalcError::validation("returns", "returns must be finite"));
    }
    Ok(())
}

fn column_means(returns: &[Vec<f64>], n_assets: usize) -> Vec<f64> {
    let n = returns.len() as f64;
    (0..n_assets)
        .map(|j| returns.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect()
}

fn sample_covariance(returns: &[Vec<f64>], means: &[f64]) -> Vec<Vec<f64>> {
    let n_assets = means.len();
    let denom = (returns.len() - 1) as f64;
    let mut cov = vec![vec![0.0; n_assets]; n_assets];
    for i in 0..n_assets {
        for j in i..n_assets {
            let c = returns
                .iter()
                .map(|row| (row[i] - means[i]) * (row[j] - means[j]))
                .sum::<f64>()
                / denom;
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }
    cov
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_metrics() {
        let metrics = series_metrics(&[0.01, 0.03, -0.01, 0.05]).unwrap();
        assert_relative_eq!(metrics.expected_return, 0.02, max_relative = 1e-12);
        // Population variance: (1 + 1 + 9 + 9) * 1e-4 / 4 = 5e-4
        assert_relative_eq!(metrics.volatility, 5e-4_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(metrics.sharpe_ratio, 0.02 / 5e-4_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_flat_series_has_zero_sharpe() {
        let metrics = series_metrics(&[0.25, 0.25, 0.25]).unwrap();
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_identical_assets_equal_weight() {
        let series = [0.01, 0.04, -0.02, 0.03, 0.00];
        let returns: Vec<Vec<f64>> = series.iter().map(|&r| vec![r, r, r]).collect();
        let metrics = portfolio_metrics(&returns, None).unwrap();

        let mean = series.iter().sum::<f64>() / 5.0;
        let sample_var = series.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 4.0;
        assert_relative_eq!(metrics.expected_return, mean, max_relative = 1e-12);
        assert_relative_eq!(metrics.volatility, sample_var.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_perfect_hedge_has_no_volatility() {
        let returns = vec![vec![0.02, -0.02], vec![-0.01, 0.01], vec![0.03, -0.03]];
        let metrics = portfolio_metrics(&returns, Some(&[0.5, 0.5][..])).unwrap();
        assert!(metrics.volatility < 1e-12);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_diversification_reduces_volatility() {
        let returns = vec![
            vec![0.05, -0.01],
            vec![-0.02, 0.03],
            vec![0.04, 0.00],
            vec![-0.03, 0.02],
        ];
        let mixed = portfolio_metrics(&returns, Some(&[0.5, 0.5][..])).unwrap();
        let first_only = portfolio_metrics(&returns, Some(&[1.0, 0.0][..])).unwrap();
        assert!(mixed.volatility < first_only.volatility);
    }

    #[test]
    fn test_validation() {
        let returns = vec![vec![0.01, 0.02], vec![0.03, 0.01]];
        let err = portfolio_metrics(&returns, Some(&[1.0][..])).unwrap_err();
        assert_eq!(err.field(), Some("weights"));

        let ragged = vec![vec![0.01, 0.02], vec![0.03]];
        assert_eq!(portfolio_metrics(&ragged, None).unwrap_err().field(), Some("returns"));

        let single_period = vec![vec![0.01, 0.02]];
        assert!(portfolio_metrics(&single_period, None).is_err());

        assert!(series_metrics(&[]).is_err());
        assert!(series_metrics(&[0.01, f64::NAN]).is_err());
    }
}
