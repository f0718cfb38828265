use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{NumericColumn, ObservationTable, WeatherVariable};
use crate::processors::{
    correlation_matrix, monthly_trend, pivot_by_time, yearly_means, CorrelationMatrix,
    OlsRegression, PivotTable, RegressionError, RegressionFit, StationFilter, TrendPoint,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMean {
    pub year: i32,
    pub mean: Option<f64>,
}

/// Regression result as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegressionOutcome {
    Fitted(RegressionFit),
    CannotFit { reason: String },
}

impl RegressionOutcome {
    pub fn fit(&self) -> Option<&RegressionFit> {
        match self {
            RegressionOutcome::Fitted(fit) => Some(fit),
            RegressionOutcome::CannotFit { .. } => None,
        }
    }
}

impl From<Result<RegressionFit, RegressionError>> for RegressionOutcome {
    fn from(result: Result<RegressionFit, RegressionError>) -> Self {
        match result {
            Ok(fit) => RegressionOutcome::Fitted(fit),
            Err(e) => RegressionOutcome::CannotFit {
                reason: e.to_string(),
            },
        }
    }
}

/// Everything derived for one station / predictor selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub station: String,
    pub variable: WeatherVariable,
    pub observations: usize,
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub pivot: PivotTable,
    pub trend: Vec<TrendPoint>,
    pub yearly: Vec<YearlyMean>,
    pub correlation: CorrelationMatrix,
    pub regression: RegressionOutcome,
}

/// Runs a full render pass over the cached base table.
pub struct DashboardAnalyzer {
    pollutant: NumericColumn,
}

impl DashboardAnalyzer {
    pub fn new() -> Self {
        Self {
            pollutant: NumericColumn::Pm25,
        }
    }

    pub fn render(
        &self,
        table: &ObservationTable,
        filter: &StationFilter,
        variable: WeatherVariable,
    ) -> DashboardView {
        let filtered = filter.apply(table);
        let records = filtered.records();

        let pivot = pivot_by_time(records, self.pollutant);
        let trend = monthly_trend(records, self.pollutant);
        let yearly = yearly_means(records, self.pollutant)
            .into_iter()
            .map(|(year, mean)| YearlyMean { year, mean })
            .collect();
        let correlation = correlation_matrix(records, &NumericColumn::CORRELATION_SET);

        let regression: RegressionOutcome = OlsRegression::new(self.pollutant, variable.column())
            .fit(records)
            .into();

        match &regression {
            RegressionOutcome::Fitted(fit) => info!(
                station = filter.station(),
                predictor = %variable,
                slope = fit.estimate.slope,
                r_squared = fit.estimate.r_squared,
                "Dashboard rendered"
            ),
            RegressionOutcome::CannotFit { reason } => warn!(
                station = filter.station(),
                predictor = %variable,
                reason = %reason,
                "Dashboard rendered without regression"
            ),
        }

        DashboardView {
            station: filter.station().to_string(),
            variable,
            observations: filtered.len(),
            time_range: filtered.time_range(),
            pivot,
            trend,
            yearly,
            correlation,
            regression,
        }
    }
}

impl Default for DashboardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
