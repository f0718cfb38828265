use textplots::{Chart, Plot, Shape};

use crate::analyzers::{DashboardView, RegressionOutcome, YearlyMean};
use crate::models::WeatherVariable;
use crate::processors::{CorrelationMatrix, PivotTable, RegressionFit, TrendPoint};

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const CELL_WIDTH: usize = 8;
const MIN_CHART_WIDTH: u32 = 32;
const MIN_CHART_HEIGHT: u32 = 3;

fn shade(value: f64, lo: f64, hi: f64) -> char {
    if hi <= lo {
        return SHADES[SHADES.len() / 2];
    }
    let ratio = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    let index = (ratio * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[index]
}

fn x_bounds(lo: f32, hi: f32) -> (f32, f32) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// Splits the trend into contiguous runs of defined months, x counted in months
/// since the first trend point. A null or missing month starts a new run.
fn trend_runs(trend: &[TrendPoint]) -> Vec<Vec<(f32, f32)>> {
    let Some(first) = trend.first() else {
        return Vec::new();
    };
    let origin = first.year * 12 + first.month as i32 - 1;

    let mut runs: Vec<Vec<(f32, f32)>> = Vec::new();
    let mut current: Vec<(f32, f32)> = Vec::new();
    for point in trend {
        let x = (point.year * 12 + point.month as i32 - 1 - origin) as f32;
        let contiguous = current.last().map_or(true, |(prev, _)| x - prev <= 1.0);
        match point.mean {
            Some(mean) if contiguous => current.push((x, mean as f32)),
            Some(mean) => {
                runs.push(std::mem::take(&mut current));
                current.push((x, mean as f32));
            }
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Renders a dashboard view as plain text for a terminal.
pub struct TerminalRenderer {
    width: u32,
    height: u32,
}

impl TerminalRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(MIN_CHART_WIDTH),
            height: height.max(MIN_CHART_HEIGHT),
        }
    }

    pub fn render(&self, view: &DashboardView) -> String {
        [
            self.render_header(view),
            self.render_pivot(&view.pivot),
            self.render_trend(&view.trend),
            self.render_yearly(&view.yearly),
            self.render_correlation(&view.correlation),
            self.render_regression(&view.regression, view.variable),
        ]
        .join("\n\n")
    }

    fn render_header(&self, view: &DashboardView) -> String {
        let range = match view.time_range {
            Some((start, end)) => format!(
                "{} to {}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%Y-%m-%d %H:%M")
            ),
            None => "no observations".to_string(),
        };

        format!(
            "🌍 Air Quality Dashboard\n\
            Station: {} | Weather variable: {} | Records: {}\n\
            Period: {}\n{}",
            view.station,
            view.variable,
            view.observations,
            range,
            "─".repeat(self.width as usize)
        )
    }

    pub fn render_pivot(&self, pivot: &PivotTable) -> String {
        let mut output = format!("📊 {} heatmap (mean by year and month)\n", pivot.column);

        let Some((lo, hi)) = pivot.value_range() else {
            output.push_str("No data available");
            return output;
        };

        output.push_str(&format!("{:>6} │", "Year"));
        for label in MONTH_LABELS {
            output.push_str(&format!("{:>width$}", label, width = CELL_WIDTH));
        }
        output.push('\n');
        output.push_str(&format!("{}┼{}\n", "─".repeat(7), "─".repeat(CELL_WIDTH * 12)));

        for (year, cells) in pivot.rows() {
            output.push_str(&format!("{:>6} │", year));
            for cell in cells {
                match cell {
                    Some(v) => output.push_str(&format!("{}{:>7.1}", shade(*v, lo, hi), v)),
                    None => output.push_str(&" ".repeat(CELL_WIDTH)),
                }
            }
            output.push('\n');
        }
        output.push_str(&format!("Scale: {:.1} {} {:.1}", lo, SHADES.iter().collect::<String>(), hi));

        output
    }

    pub fn render_trend(&self, trend: &[TrendPoint]) -> String {
        let mut output = String::from("📈 Monthly PM2.5 trend\n");

        let Some(first) = trend.first() else {
            output.push_str("No data available");
            return output;
        };
        let runs = trend_runs(trend);
        let Some(last_x) = runs.last().and_then(|run| run.last()).map(|(x, _)| *x) else {
            output.push_str("No data available");
            return output;
        };
        let (xmin, xmax) = x_bounds(0.0, last_x);

        let shapes: Vec<Shape> = runs
            .iter()
            .map(|run| match run.len() {
                1 => Shape::Points(run),
                _ => Shape::Lines(run),
            })
            .collect();
        output.push_str(&self.plot(xmin, xmax, &shapes));

        if let Some(last) = trend.last() {
            output.push_str(&format!(
                "\nx axis: months since {} (last: {})",
                first.time.format("%Y-%m"),
                last.time.format("%Y-%m")
            ));
        }

        output
    }

    pub fn render_yearly(&self, yearly: &[YearlyMean]) -> String {
        let mut output = String::from("📅 Yearly PM2.5 mean\n");
        if yearly.is_empty() {
            output.push_str("No data available");
            return output;
        }

        let lines: Vec<String> = yearly
            .iter()
            .map(|y| match y.mean {
                Some(mean) => format!("{:>6} │ {:>8.1}", y.year, mean),
                None => format!("{:>6} │ {:>8}", y.year, "-"),
            })
            .collect();
        output.push_str(&lines.join("\n"));
        output
    }

    pub fn render_correlation(&self, matrix: &CorrelationMatrix) -> String {
        let mut output = String::from("🔗 Correlation of PM2.5 with weather factors\n");

        output.push_str(&format!("{:>6} │", ""));
        for column in &matrix.columns {
            output.push_str(&format!("{:>width$}", column.header(), width = CELL_WIDTH));
        }
        output.push('\n');
        output.push_str(&format!(
            "{}┼{}\n",
            "─".repeat(7),
            "─".repeat(CELL_WIDTH * matrix.size())
        ));

        for (column, row) in matrix.columns.iter().zip(&matrix.values) {
            output.push_str(&format!("{:>6} │", column.header()));
            for value in row {
                match value {
                    Some(r) => output.push_str(&format!("{}{:>7.2}", shade(*r, -1.0, 1.0), r)),
                    None => output.push_str(&format!("{:>width$}", "-", width = CELL_WIDTH)),
                }
            }
            output.push('\n');
        }
        output.push_str(&format!("Scale: -1.00 {} 1.00", SHADES.iter().collect::<String>()));

        output
    }

    pub fn render_regression(&self, outcome: &RegressionOutcome, variable: WeatherVariable) -> String {
        let mut output = format!("📉 Linear regression: PM2.5 vs {}\n", variable);

        match outcome {
            RegressionOutcome::Fitted(fit) => {
                output.push_str(&self.regression_chart(fit));
                output.push_str(&format!(
                    "\nx: {} | y: {} | points: actual, line: fit\n",
                    variable.description(),
                    fit.response
                ));
                output.push_str(&fit.coefficient_line());
                output.push('\n');
                output.push_str(&fit.r_squared_line());
            }
            RegressionOutcome::CannotFit { reason } => {
                output.push_str(&format!("Cannot compute regression: {}", reason));
            }
        }

        output
    }

    fn regression_chart(&self, fit: &RegressionFit) -> String {
        let Some(((x_lo, y_lo), (x_hi, y_hi))) = fit.line_endpoints() else {
            return "No data available".to_string();
        };

        let actual: Vec<(f32, f32)> = fit
            .points
            .iter()
            .map(|p| (p.predictor as f32, p.actual as f32))
            .collect();
        let line = [(x_lo as f32, y_lo as f32), (x_hi as f32, y_hi as f32)];
        let (xmin, xmax) = x_bounds(x_lo as f32, x_hi as f32);

        let shapes = [Shape::Points(&actual), Shape::Lines(&line)];
        self.plot(xmin, xmax, &shapes)
    }

    /// Draws every shape onto one braille canvas.
    fn plot(&self, xmin: f32, xmax: f32, shapes: &[Shape<'_>]) -> String {
        let mut chart = Chart::new(self.width, self.height, xmin, xmax);
        let mut canvas = &mut chart;
        for shape in shapes {
            canvas = canvas.lineplot(shape);
        }
        canvas.figures();
        let rendered = canvas.to_string();
        rendered
    }
}
