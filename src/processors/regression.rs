use chrono::NaiveDateTime;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;
use tracing::debug;

use crate::models::{NumericColumn, ObservationRecord, WeatherVariable};

/// Reasons a regression cannot be fitted. Never fatal to a render pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    #[error("need at least 2 complete rows, found {found}")]
    InsufficientData { found: usize },

    #[error("{predictor} has zero variance")]
    ZeroVariance { predictor: NumericColumn },
}

/// Least-squares estimate of `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsEstimate {
    pub slope: f64,
    pub intercept: f64,
    /// Undefined with only two observations
    pub slope_std_error: Option<f64>,
    pub t_statistic: Option<f64>,
    /// Two-sided p-value for the slope
    pub p_value: Option<f64>,
    /// NaN when the response is constant
    pub r_squared: f64,
    pub observations: usize,
}

impl OlsEstimate {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Closed-form simple OLS over centred sums. `predictor` names the x column in errors.
pub fn ordinary_least_squares(
    predictor: NumericColumn,
    xs: &[f64],
    ys: &[f64],
) -> Result<OlsEstimate, RegressionError> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Err(RegressionError::InsufficientData { found: n });
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let sst: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();

    // Relative check so that repeated non-representable values still count as constant
    let scale: f64 = xs.iter().map(|x| x * x).sum();
    if sxx <= f64::EPSILON * scale {
        return Err(RegressionError::ZeroVariance { predictor });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let sse: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();

    let r_squared = if sst == 0.0 { f64::NAN } else { 1.0 - sse / sst };

    let df = n - 2;
    let (slope_std_error, t_statistic, p_value) = if df == 0 {
        (None, None, None)
    } else {
        let std_error = (sse / df as f64 / sxx).sqrt();
        if std_error == 0.0 {
            // Exact fit
            let p = (slope != 0.0).then_some(0.0);
            (Some(0.0), None, p)
        } else {
            let t = slope / std_error;
            (Some(std_error), Some(t), two_sided_p_value(t, df as f64))
        }
    };

    Ok(OlsEstimate {
        slope,
        intercept,
        slope_std_error,
        t_statistic,
        p_value,
        r_squared,
        observations: n,
    })
}

fn two_sided_p_value(t: f64, df: f64) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// One retained row with its fitted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedPoint {
    pub timestamp: NaiveDateTime,
    pub predictor: f64,
    pub actual: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionFit {
    pub response: NumericColumn,
    pub predictor: NumericColumn,
    #[serde(flatten)]
    pub estimate: OlsEstimate,
    /// Aligned 1:1 with the rows kept after dropping nulls
    pub points: Vec<FittedPoint>,
}

impl RegressionFit {
    pub fn coefficient_line(&self) -> String {
        let p_value = match self.estimate.p_value {
            Some(p) => format!("{:.5}", p),
            None => "n/a".to_string(),
        };
        format!(
            "Regression coefficient: {:.2} (p-value: {})",
            self.estimate.slope, p_value
        )
    }

    pub fn r_squared_line(&self) -> String {
        let r2 = self.estimate.r_squared;
        if r2.is_nan() {
            return format!("R-squared: n/a ({} is constant)", self.response);
        }
        format!(
            "R-squared: {:.3} (explains {:.1}% of {} variability)",
            r2,
            r2 * 100.0,
            self.response
        )
    }

    /// Fit line evaluated at the smallest and largest predictor value
    pub fn line_endpoints(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?.predictor;
        let (lo, hi) = self
            .points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.predictor), hi.max(p.predictor)));
        Some((
            (lo, self.estimate.predict(lo)),
            (hi, self.estimate.predict(hi)),
        ))
    }
}

/// Simple linear regression of one column against another.
pub struct OlsRegression {
    response: NumericColumn,
    predictor: NumericColumn,
}

impl OlsRegression {
    pub fn new(response: NumericColumn, predictor: NumericColumn) -> Self {
        Self {
            response,
            predictor,
        }
    }

    /// PM2.5 against a weather covariate
    pub fn for_weather(variable: WeatherVariable) -> Self {
        Self::new(NumericColumn::Pm25, variable.column())
    }

    pub fn fit(&self, records: &[ObservationRecord]) -> Result<RegressionFit, RegressionError> {
        let complete: Vec<(&ObservationRecord, f64, f64)> = records
            .iter()
            .filter_map(|r| Some((r, self.predictor.value(r)?, self.response.value(r)?)))
            .collect();

        debug!(
            response = %self.response,
            predictor = %self.predictor,
            rows = records.len(),
            complete = complete.len(),
            "Fitting OLS regression"
        );

        let xs: Vec<f64> = complete.iter().map(|(_, x, _)| *x).collect();
        let ys: Vec<f64> = complete.iter().map(|(_, _, y)| *y).collect();
        let estimate = ordinary_least_squares(self.predictor, &xs, &ys)?;

        let points = complete
            .iter()
            .map(|(record, x, y)| FittedPoint {
                timestamp: record.timestamp,
                predictor: *x,
                actual: *y,
                predicted: estimate.predict(*x),
            })
            .collect();

        Ok(RegressionFit {
            response: self.response,
            predictor: self.predictor,
            estimate,
            points,
        })
    }
}
