/// CSV column headers
pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_DAY: &str = "day";
pub const COL_HOUR: &str = "hour";
pub const COL_STATION: &str = "station";
pub const COL_PM25: &str = "PM2.5";
pub const COL_TEMP: &str = "TEMP";
pub const COL_PRES: &str = "PRES";
pub const COL_DEWP: &str = "DEWP";
pub const COL_WSPM: &str = "WSPM";

/// Headers every input file must carry
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_YEAR, COL_MONTH, COL_DAY, COL_HOUR, COL_STATION, COL_PM25, COL_TEMP, COL_PRES, COL_DEWP,
    COL_WSPM,
];

/// Cell contents treated as missing numeric values (compared case-insensitively)
pub const NULL_TOKENS: [&str; 4] = ["", "na", "nan", "null"];

/// File names and locations
pub const DEFAULT_DATA_PATH: &str = "dashboard/submission_ari.csv";
pub const DEFAULT_CONFIG_FILE: &str = "aq-dashboard.toml";
pub const ENV_PREFIX: &str = "AQ_DASHBOARD";

/// Chart defaults
pub const DEFAULT_CHART_WIDTH: u32 = 100;
pub const DEFAULT_CHART_HEIGHT: u32 = 30;

/// Calendar bounds
pub const MONTHS_PER_YEAR: u32 = 12;
