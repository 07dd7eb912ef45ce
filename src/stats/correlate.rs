//! Pearson correlation and ordinary least-squares trend lines.

use crate::dataset::{ColumnKind, Table};
use crate::error::{Error, Result};
use serde::Serialize;

/// Pearson correlation over rows where both values are present.
///
/// Returns `None` for fewer than two complete pairs or zero variance.
#[must_use]
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> =
        x.iter().zip(y).filter_map(|(a, b)| Some(((*a)?, (*b)?))).collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Correlation between two numeric columns of `table`.
pub fn corr(table: &Table, a: &str, b: &str) -> Result<Option<f64>> {
    Ok(pearson(table.numeric(a)?, table.numeric(b)?))
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Slope.
    pub slope: f64,
    /// Intercept.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

impl LinearFit {
    /// Evaluate the line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y` on `x` over complete pairs.
///
/// Returns `None` for fewer than two pairs or constant `x`.
#[must_use]
pub fn ols(x: &[Option<f64>], y: &[Option<f64>]) -> Option<LinearFit> {
    let pairs: Vec<(f64, f64)> =
        x.iter().zip(y).filter_map(|(a, b)| Some(((*a)?, (*b)?))).collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pairs.iter().map(|p| (p.0 - mx).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = pairs.iter().map(|p| (p.0 - mx) * (p.1 - my)).sum();
    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let ss_tot: f64 = pairs.iter().map(|p| (p.1 - my).powi(2)).sum();
    let ss_res: f64 = pairs.iter().map(|p| (p.1 - (slope * p.0 + intercept)).powi(2)).sum();
    let r_squared = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Some(LinearFit { slope, intercept, r_squared })
}

/// Square matrix of pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Column names, row and column order.
    pub names: Vec<String>,
    /// `values[i][j]` = correlation of `names[i]` and `names[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        self.values[i][j]
    }

    /// Off-diagonal pairs with `|r| >= threshold`, strongest first.
    #[must_use]
    pub fn strong_pairs(&self, threshold: f64) -> Vec<(String, String, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.names.len() {
            for j in (i + 1)..self.names.len() {
                if let Some(r) = self.values[i][j] {
                    if r.abs() >= threshold {
                        pairs.push((self.names[i].clone(), self.names[j].clone(), r));
                    }
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs
    }
}

/// Correlation matrix over every numeric column of `table`.
///
/// # Errors
///
/// Fails with [`Error::EmptyData`] if the table has no numeric column.
pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix> {
    let numeric: Vec<(&str, &[Option<f64>])> = table
        .columns()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .filter_map(|c| c.as_numeric().map(|v| (c.name(), v)))
        .collect();
    if numeric.is_empty() {
        return Err(Error::EmptyData);
    }

    let values = numeric
        .iter()
        .map(|(_, a)| {
            numeric
                .iter()
                .map(|(_, b)| if std::ptr::eq(*a, *b) { Some(1.0) } else { pearson(a, b) })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix { names: numeric.iter().map(|(n, _)| (*n).to_string()).collect(), values })
}
