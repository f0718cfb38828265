use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::models::ObservationRecord;
use crate::utils::constants::{COL_DEWP, COL_PM25, COL_PRES, COL_TEMP, COL_WSPM};

/// Numeric measurement columns carried by every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericColumn {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "DEWP")]
    Dewp,
    #[serde(rename = "WSPM")]
    Wspm,
}

impl NumericColumn {
    /// Columns shown in the correlation heatmap, in display order.
    pub const CORRELATION_SET: [NumericColumn; 5] = [
        NumericColumn::Pm25,
        NumericColumn::Temp,
        NumericColumn::Pres,
        NumericColumn::Dewp,
        NumericColumn::Wspm,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            NumericColumn::Pm25 => COL_PM25,
            NumericColumn::Temp => COL_TEMP,
            NumericColumn::Pres => COL_PRES,
            NumericColumn::Dewp => COL_DEWP,
            NumericColumn::Wspm => COL_WSPM,
        }
    }

    pub fn value(&self, record: &ObservationRecord) -> Option<f64> {
        match self {
            NumericColumn::Pm25 => record.pm25,
            NumericColumn::Temp => record.temp,
            NumericColumn::Pres => record.pres,
            NumericColumn::Dewp => record.dewp,
            NumericColumn::Wspm => record.wspm,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Weather covariates that can be used as the regression predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherVariable {
    #[serde(rename = "TEMP")]
    Temp,
    #[serde(rename = "PRES")]
    Pres,
    #[serde(rename = "DEWP")]
    Dewp,
    #[serde(rename = "WSPM")]
    Wspm,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 4] = [
        WeatherVariable::Temp,
        WeatherVariable::Pres,
        WeatherVariable::Dewp,
        WeatherVariable::Wspm,
    ];

    pub fn column(&self) -> NumericColumn {
        match self {
            WeatherVariable::Temp => NumericColumn::Temp,
            WeatherVariable::Pres => NumericColumn::Pres,
            WeatherVariable::Dewp => NumericColumn::Dewp,
            WeatherVariable::Wspm => NumericColumn::Wspm,
        }
    }

    pub fn header(&self) -> &'static str {
        self.column().header()
    }

    pub fn description(&self) -> &'static str {
        match self {
            WeatherVariable::Temp => "Temperature (°C)",
            WeatherVariable::Pres => "Pressure (hPa)",
            WeatherVariable::Dewp => "Dew point (°C)",
            WeatherVariable::Wspm => "Wind speed (m/s)",
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for WeatherVariable {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DashboardError::UnknownVariable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_variable_parsing() {
        assert_eq!("TEMP".parse::<WeatherVariable>().unwrap(), WeatherVariable::Temp);
        assert_eq!(" wspm ".parse::<WeatherVariable>().unwrap(), WeatherVariable::Wspm);
        assert!("PM2.5".parse::<WeatherVariable>().is_err());
    }

    #[test]
    fn test_predictors_map_to_numeric_columns() {
        assert_eq!(WeatherVariable::Dewp.column(), NumericColumn::Dewp);
        assert_eq!(WeatherVariable::Pres.header(), "PRES");
        assert_eq!(NumericColumn::Pm25.to_string(), "PM2.5");
        assert!(!NumericColumn::CORRELATION_SET
            .iter()
            .skip(1)
            .any(|c| *c == NumericColumn::Pm25));
    }
}
