use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{NumericColumn, ObservationRecord};
use crate::utils::constants::MONTHS_PER_YEAR;

/// Running mean over the non-null values of a group.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn grouped_means<K, F>(records: &[ObservationRecord], column: NumericColumn, key: F) -> BTreeMap<K, Option<f64>>
where
    K: Ord,
    F: Fn(&ObservationRecord) -> K,
{
    let mut groups: BTreeMap<K, MeanAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(column.value(record));
    }
    groups.into_iter().map(|(k, acc)| (k, acc.mean())).collect()
}

/// Mean of `column` per (year, month). Groups with only nulls map to `None`.
pub fn monthly_means(
    records: &[ObservationRecord],
    column: NumericColumn,
) -> BTreeMap<(i32, u32), Option<f64>> {
    grouped_means(records, column, |r| (r.year, r.month))
}

/// Mean of `column` per year.
pub fn yearly_means(records: &[ObservationRecord], column: NumericColumn) -> BTreeMap<i32, Option<f64>> {
    grouped_means(records, column, |r| r.year)
}

/// Year × month grid of means, used for the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub column: NumericColumn,
    pub years: Vec<i32>,
    /// One row per entry of `years`; index 0 is January.
    pub cells: Vec<[Option<f64>; 12]>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return None;
        }
        let row = self.years.iter().position(|y| *y == year)?;
        self.cells[row][(month - 1) as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Option<f64>; 12])> + '_ {
        self.years.iter().copied().zip(self.cells.iter())
    }

    /// Smallest and largest defined cell
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flat_map(|row| row.iter().flatten().copied())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

pub fn pivot_by_time(records: &[ObservationRecord], column: NumericColumn) -> PivotTable {
    let mut rows: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();
    for ((year, month), mean) in monthly_means(records, column) {
        rows.entry(year).or_insert([None; 12])[(month - 1) as usize] = mean;
    }

    let (years, cells): (Vec<i32>, Vec<[Option<f64>; 12]>) = rows.into_iter().unzip();
    PivotTable {
        column,
        years,
        cells,
    }
}

/// Monthly mean anchored at the first day of the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub time: NaiveDateTime,
    pub mean: Option<f64>,
}

/// Monthly means in chronological order
pub fn monthly_trend(records: &[ObservationRecord], column: NumericColumn) -> Vec<TrendPoint> {
    monthly_means(records, column)
        .into_iter()
        .filter_map(|((year, month), mean)| {
            let time = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
            Some(TrendPoint {
                year,
                month,
                time,
                mean,
            })
        })
        .collect()
}

/// Square, symmetric Pearson correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

/// Pearson coefficient over complete pairs; `None` for fewer than two pairs or a constant side.
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, syy, sxy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }

    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pairwise-complete correlation: each pair drops rows where either value is null.
pub fn correlation_matrix(records: &[ObservationRecord], columns: &[NumericColumn]) -> CorrelationMatrix {
    let size = columns.len();
    let mut values = vec![vec![None; size]; size];

    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let (a, b) = (columns[i], columns[j]);
            let r = pearson(
                records
                    .iter()
                    .filter_map(|rec| Some((a.value(rec)?, b.value(rec)?))),
            );
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}
