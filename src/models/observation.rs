use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{DashboardError, Result};
use crate::models::NumericColumn;
use crate::utils::constants::NULL_TOKENS;

/// One CSV row as it appears on disk, before the timestamp is derived.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawObservation {
    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 1, max = 31))]
    pub day: u32,

    #[validate(range(max = 23))]
    pub hour: u32,

    #[validate(length(min = 1))]
    pub station: String,

    #[serde(rename = "PM2.5", deserialize_with = "deserialize_nullable")]
    pub pm25: Option<f64>,

    #[serde(rename = "TEMP", deserialize_with = "deserialize_nullable")]
    pub temp: Option<f64>,

    #[serde(rename = "PRES", deserialize_with = "deserialize_nullable")]
    pub pres: Option<f64>,

    #[serde(rename = "DEWP", deserialize_with = "deserialize_nullable")]
    pub dewp: Option<f64>,

    #[serde(rename = "WSPM", deserialize_with = "deserialize_nullable")]
    pub wspm: Option<f64>,
}

/// Hourly measurement for a single station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub station: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
    pub temp: Option<f64>,
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub wspm: Option<f64>,
}

impl ObservationRecord {
    /// Create a record with every measurement missing.
    pub fn new(station: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            station: station.into(),
            year: timestamp.year(),
            month: timestamp.month(),
            day: timestamp.day(),
            hour: timestamp.hour(),
            timestamp,
            pm25: None,
            temp: None,
            pres: None,
            dewp: None,
            wspm: None,
        }
    }

    pub fn with_value(mut self, column: NumericColumn, value: Option<f64>) -> Self {
        let slot = match column {
            NumericColumn::Pm25 => &mut self.pm25,
            NumericColumn::Temp => &mut self.temp,
            NumericColumn::Pres => &mut self.pres,
            NumericColumn::Dewp => &mut self.dewp,
            NumericColumn::Wspm => &mut self.wspm,
        };
        *slot = value;
        self
    }

    /// Validate a raw row and derive its hourly timestamp.
    pub fn from_raw(raw: RawObservation) -> Result<Self> {
        raw.validate()?;

        let timestamp = build_timestamp(raw.year, raw.month, raw.day, raw.hour)?;

        Ok(Self {
            station: raw.station,
            year: raw.year,
            month: raw.month,
            day: raw.day,
            hour: raw.hour,
            timestamp,
            pm25: raw.pm25,
            temp: raw.temp,
            pres: raw.pres,
            dewp: raw.dewp,
            wspm: raw.wspm,
        })
    }
}

/// Combine calendar fields into a timestamp at hourly resolution.
pub fn build_timestamp(year: i32, month: u32, day: u32, hour: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| {
            DashboardError::InvalidFormat(format!(
                "Invalid timestamp: {:04}-{:02}-{:02} {:02}:00",
                year, month, day, hour
            ))
        })
}

pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

fn deserialize_nullable<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if is_null_token(&s) => Ok(None),
        Some(s) => {
            let value = s.trim().parse::<f64>().map_err(|_| {
                serde::de::Error::custom(format!("Invalid numeric value: '{}'", s))
            })?;
            Ok(value.is_finite().then_some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(month: u32, day: u32, hour: u32) -> RawObservation {
        RawObservation {
            year: 2014,
            month,
            day,
            hour,
            station: "Aotizhongxin".to_string(),
            pm25: Some(35.0),
            temp: Some(-2.5),
            pres: None,
            dewp: Some(-18.0),
            wspm: Some(4.4),
        }
    }

    #[test]
    fn test_timestamp_is_derived_from_calendar_fields() {
        let record = ObservationRecord::from_raw(raw(3, 1, 17)).unwrap();

        assert_eq!(
            record.timestamp,
            NaiveDate::from_ymd_opt(2014, 3, 1)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap()
        );
        assert_eq!(record.pres, None);
        assert_eq!(record.pm25, Some(35.0));
    }

    #[test]
    fn test_out_of_range_fields_are_rejected() {
        assert!(matches!(
            ObservationRecord::from_raw(raw(13, 1, 0)),
            Err(DashboardError::Validation(_))
        ));
        assert!(matches!(
            ObservationRecord::from_raw(raw(1, 1, 24)),
            Err(DashboardError::Validation(_))
        ));
        // Passes field validation but is not a real date
        assert!(matches!(
            ObservationRecord::from_raw(raw(2, 30, 0)),
            Err(DashboardError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_null_tokens() {
        assert!(is_null_token(""));
        assert!(is_null_token(" NA "));
        assert!(is_null_token("NaN"));
        assert!(!is_null_token("0"));
    }

    #[test]
    fn test_builder_derives_calendar_fields() {
        let ts = build_timestamp(2016, 12, 31, 23).unwrap();
        let record = ObservationRecord::new("Dongsi", ts).with_value(NumericColumn::Wspm, Some(1.2));

        assert_eq!((record.year, record.month, record.day, record.hour), (2016, 12, 31, 23));
        assert_eq!(NumericColumn::Wspm.value(&record), Some(1.2));
        assert_eq!(NumericColumn::Pm25.value(&record), None);
    }
}
