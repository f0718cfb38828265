use aq_dashboard::analyzers::{DashboardAnalyzer, DatasetSummary, RegressionOutcome};
use aq_dashboard::cli::{Cli, Commands};
use aq_dashboard::models::{NumericColumn, WeatherVariable};
use aq_dashboard::processors::StationFilter;
use aq_dashboard::readers::DatasetCache;
use aq_dashboard::writers::{JsonWriter, TerminalRenderer};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station";

/// Two stations over two years, written out of chronological order.
fn fixture() -> NamedTempFile {
    let rows = [
        "1,2014,2,1,0,10,12,3,20,300,50,1.0,1020.0,-10.0,0.0,N,2.0,Dongsi",
        "2,2013,12,1,0,20,25,4,30,400,40,2.0,1019.0,-9.0,0.0,N,1.5,Dongsi",
        "3,2013,12,1,1,30,35,5,35,500,30,3.0,1018.0,-8.0,0.0,NE,1.0,Dongsi",
        "4,2013,12,1,2,40,45,6,40,600,20,4.0,1017.0,-7.0,0.0,NE,0.5,Dongsi",
        "5,2014,2,1,1,NA,30,4,25,350,45,NA,1021.0,-11.0,0.0,N,2.5,Dongsi",
        "6,2013,3,1,0,5,8,2,10,200,70,10.0,1010.0,-2.0,0.0,S,3.0,Wanliu",
        "7,2013,3,1,1,7,9,2,12,210,65,9.0,1011.0,-3.0,0.0,S,3.2,Wanliu",
    ];

    let mut file = NamedTempFile::new().expect("Failed to create fixture");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

#[test]
fn test_render_pass_from_csv() {
    let file = fixture();
    let mut cache = DatasetCache::new(file.path());
    let table = cache.get_or_load(None).unwrap();

    assert_eq!(table.stations(), vec!["Dongsi", "Wanliu"]);

    let view = DashboardAnalyzer::new().render(
        &table,
        &StationFilter::new("Dongsi"),
        WeatherVariable::Temp,
    );

    assert_eq!(view.observations, 5);
    assert_eq!(view.pivot.years, vec![2013, 2014]);
    assert_eq!(view.pivot.get(2013, 12), Some(30.0));
    assert_eq!(view.pivot.get(2014, 2), Some(10.0));
    assert_eq!(view.pivot.get(2014, 3), None);

    let months: Vec<(i32, u32)> = view.trend.iter().map(|p| (p.year, p.month)).collect();
    assert_eq!(months, vec![(2013, 12), (2014, 2)]);

    for column in NumericColumn::CORRELATION_SET {
        assert_eq!(view.correlation.get(column, column), Some(1.0));
    }

    // PM2.5 = 10 * TEMP on the four complete rows
    let fit = view.regression.fit().expect("regression should fit");
    assert_eq!(fit.points.len(), 4);
    assert!((fit.estimate.slope - 10.0).abs() < 1e-6);
    assert!(fit.estimate.intercept.abs() < 1e-6);
    assert!((fit.estimate.r_squared - 1.0).abs() < 1e-6);

    // Selection changes reuse the cached table
    let again = cache.get_or_load(None).unwrap();
    assert_eq!(cache.load_count(), 1);
    let wanliu = DashboardAnalyzer::new().render(&again, &StationFilter::new("Wanliu"), WeatherVariable::Wspm);
    assert_eq!(wanliu.observations, 2);
    assert!(matches!(wanliu.regression, RegressionOutcome::Fitted(_)));
}

#[test]
fn test_presentation_sinks() {
    let file = fixture();
    let mut cache = DatasetCache::new(file.path());
    let table = cache.get_or_load(None).unwrap();
    let view = DashboardAnalyzer::new().render(&table, &StationFilter::new("Dongsi"), WeatherVariable::Dewp);

    let text = TerminalRenderer::new(80, 20).render(&view);
    assert!(text.contains("Station: Dongsi"));
    assert!(text.contains("Regression coefficient:"));
    assert!(text.contains("R-squared:"));

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("view.json");
    JsonWriter::new().write_view(&view, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["observations"], 5);
    assert_eq!(json["regression"]["status"], "fitted");
}

#[test]
fn test_dataset_summary() {
    let file = fixture();
    let mut cache = DatasetCache::new(file.path());
    let table = cache.get_or_load(None).unwrap();

    let summary = DatasetSummary::from_table(&table).unwrap();
    assert_eq!(summary.total_records, 7);
    assert_eq!(summary.stations.len(), 2);
    assert_eq!(summary.missing[0], (NumericColumn::Pm25, 1));
}

#[test]
fn test_corrupt_file_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "1,2014,2,30,0,10,12,3,20,300,50,1.0,1020.0,-10.0,0.0,N,2.0,Dongsi").unwrap();

    let mut cache = DatasetCache::new(file.path());
    assert!(cache.get_or_load(None).is_err());
    assert!(!cache.is_loaded());
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from([
        "aq-dashboard",
        "--data",
        "data/air.csv",
        "show",
        "--station",
        "Dongsi",
        "-w",
        "DEWP",
        "--json",
    ])
    .unwrap();

    assert_eq!(cli.data.as_deref(), Some(std::path::Path::new("data/air.csv")));
    match cli.command {
        Commands::Show {
            station,
            variable,
            json,
        } => {
            assert_eq!(station.as_deref(), Some("Dongsi"));
            assert_eq!(variable.as_deref(), Some("DEWP"));
            assert!(json);
        }
        _ => panic!("expected show command"),
    }

    assert!(Cli::try_parse_from(["aq-dashboard", "export"]).is_err());
}
