pub mod aggregation;
pub mod regression;
pub mod station_filter;

pub use aggregation::{
    correlation_matrix, monthly_means, monthly_trend, pearson, pivot_by_time, yearly_means,
    CorrelationMatrix, PivotTable, TrendPoint,
};
pub use regression::{
    ordinary_least_squares, FittedPoint, OlsEstimate, OlsRegression, RegressionError, RegressionFit,
};
pub use station_filter::StationFilter;
