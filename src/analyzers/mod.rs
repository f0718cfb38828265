pub mod dashboard;
pub mod dataset_summary;

pub use dashboard::{DashboardAnalyzer, DashboardView, RegressionOutcome, YearlyMean};
pub use dataset_summary::{DatasetSummary, StationCount};
