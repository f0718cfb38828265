use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::models::WeatherVariable;
use crate::utils::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_CONFIG_FILE, DEFAULT_DATA_PATH, ENV_PREFIX,
};

/// Runtime settings: defaults, then an optional TOML file, then `AQ_DASHBOARD_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    pub data_path: PathBuf,

    pub default_station: Option<String>,

    pub default_variable: String,

    /// Braille charts need at least 32 columns
    #[validate(range(min = 32, max = 400))]
    pub chart_width: u32,

    #[validate(range(min = 10, max = 200))]
    pub chart_height: u32,
}

impl DashboardConfig {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("data_path", DEFAULT_DATA_PATH)?
            .set_default("default_variable", "TEMP")?
            .set_default("chart_width", DEFAULT_CHART_WIDTH as i64)?
            .set_default("chart_height", DEFAULT_CHART_HEIGHT as i64)?;

        let builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings: DashboardConfig = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        settings.variable()?;

        Ok(settings)
    }

    pub fn variable(&self) -> Result<WeatherVariable> {
        self.default_variable.parse()
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_station: None,
            default_variable: "TEMP".to_string(),
            chart_width: DEFAULT_CHART_WIDTH,
            chart_height: DEFAULT_CHART_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // Loading reads process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let _guard = env_lock();
        let file = toml_file(
            "data_path = \"data/beijing.csv\"\n\
             default_station = \"Wanliu\"\n\
             default_variable = \"dewp\"\n\
             chart_width = 120\n",
        );

        let config = DashboardConfig::load(Some(file.path()))?;

        assert_eq!(config.data_path, PathBuf::from("data/beijing.csv"));
        assert_eq!(config.default_station.as_deref(), Some("Wanliu"));
        assert_eq!(config.variable()?, WeatherVariable::Dewp);
        assert_eq!(config.chart_width, 120);
        assert_eq!(config.chart_height, DEFAULT_CHART_HEIGHT);
        Ok(())
    }

    #[test]
    fn test_invalid_chart_width_is_rejected() {
        let _guard = env_lock();
        let file = toml_file("chart_width = 5\n");
        assert!(matches!(
            DashboardConfig::load(Some(file.path())),
            Err(DashboardError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        let _guard = env_lock();
        let file = toml_file("default_variable = \"RAIN\"\n");
        assert!(matches!(
            DashboardConfig::load(Some(file.path())),
            Err(DashboardError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let _guard = env_lock();
        let result = DashboardConfig::load(Some(Path::new("no/such/aq-dashboard.toml")));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_default_matches_constants() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.variable().unwrap(), WeatherVariable::Temp);
    }

    #[test]
    fn test_chart_width_bounds() {
        let _guard = env_lock();
        let narrow = toml_file("chart_width = 31\n");
        assert!(matches!(
            DashboardConfig::load(Some(narrow.path())),
            Err(DashboardError::Validation(_))
        ));

        let minimal = toml_file("chart_width = 32\n");
        assert_eq!(DashboardConfig::load(Some(minimal.path())).unwrap().chart_width, 32);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = env_lock();
        let file = toml_file("chart_width = 60\nchart_height = 12\n");

        std::env::set_var("AQ_DASHBOARD_CHART_WIDTH", "120");
        std::env::set_var("AQ_DASHBOARD_DEFAULT_STATION", "Dongsi");
        let result = DashboardConfig::load(Some(file.path()));
        std::env::remove_var("AQ_DASHBOARD_CHART_WIDTH");
        std::env::remove_var("AQ_DASHBOARD_DEFAULT_STATION");

        let config = result.unwrap();
        assert_eq!(config.chart_width, 120);
        assert_eq!(config.chart_height, 12);
        assert_eq!(config.default_station.as_deref(), Some("Dongsi"));
    }

    #[test]
    fn test_environment_value_is_validated() {
        let _guard = env_lock();
        let file = toml_file("chart_width = 60\n");

        std::env::set_var("AQ_DASHBOARD_CHART_WIDTH", "8");
        let result = DashboardConfig::load(Some(file.path()));
        std::env::remove_var("AQ_DASHBOARD_CHART_WIDTH");

        assert!(matches!(result, Err(DashboardError::Validation(_))));
    }
}
