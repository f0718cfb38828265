use crate::analyzers::{DashboardAnalyzer, DashboardView, DatasetSummary};
use crate::cli::args::{Cli, Commands};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::models::{ObservationTable, WeatherVariable};
use crate::processors::StationFilter;
use crate::readers::DatasetCache;
use crate::utils::progress::ProgressReporter;
use crate::writers::{JsonWriter, TerminalRenderer};
use inquire::{Confirm, InquireError, Select};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aq_dashboard={}", level)));

    // Logs go to stderr so that JSON on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_table(cache: &mut DatasetCache, silent: bool) -> Result<Arc<ObservationTable>> {
    if cache.is_loaded() {
        return cache.get_or_load(None);
    }

    let progress = ProgressReporter::new_spinner(
        &format!("Loading observations from {}...", cache.path().display()),
        silent,
    );
    let table = cache.get_or_load(Some(&progress))?;
    progress.finish_and_clear();

    if table.is_empty() {
        return Err(DashboardError::EmptyDataset(format!(
            "{} contains no observations",
            cache.path().display()
        )));
    }

    Ok(table)
}

fn resolve_variable(requested: Option<&str>, config: &DashboardConfig) -> Result<WeatherVariable> {
    match requested {
        Some(v) => v.parse(),
        None => config.variable(),
    }
}

fn render_selection(
    table: &ObservationTable,
    config: &DashboardConfig,
    station: Option<&str>,
    variable: Option<&str>,
) -> Result<DashboardView> {
    let filter = StationFilter::resolve(table, station.or(config.default_station.as_deref()))?;
    let variable = resolve_variable(variable, config)?;
    debug!(station = filter.station(), variable = %variable, "Rendering selection");

    Ok(DashboardAnalyzer::new().render(table, &filter, variable))
}

fn is_cancellation(error: &InquireError) -> bool {
    matches!(
        error,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn run_interactive(
    cache: &mut DatasetCache,
    config: &DashboardConfig,
    renderer: &TerminalRenderer,
    silent: bool,
) -> Result<()> {
    let mut station_cursor = 0;
    let mut variable_cursor = WeatherVariable::ALL
        .iter()
        .position(|v| Some(*v) == config.variable().ok())
        .unwrap_or(0);

    loop {
        // Served from the cache after the first pass
        let table = load_table(cache, silent)?;
        let stations: Vec<String> = table.stations().into_iter().map(str::to_string).collect();

        let station = match Select::new("Station:", stations.clone())
            .with_starting_cursor(station_cursor)
            .prompt()
        {
            Ok(station) => station,
            Err(e) if is_cancellation(&e) => break,
            Err(e) => return Err(e.into()),
        };
        let variable = match Select::new("Weather variable:", WeatherVariable::ALL.to_vec())
            .with_starting_cursor(variable_cursor)
            .prompt()
        {
            Ok(variable) => variable,
            Err(e) if is_cancellation(&e) => break,
            Err(e) => return Err(e.into()),
        };

        station_cursor = stations.iter().position(|s| *s == station).unwrap_or(0);
        variable_cursor = WeatherVariable::ALL
            .iter()
            .position(|v| *v == variable)
            .unwrap_or(0);

        let view = DashboardAnalyzer::new().render(&table, &StationFilter::new(station), variable);
        println!("{}\n", renderer.render(&view));

        match Confirm::new("Change selection?").with_default(true).prompt() {
            Ok(true) => continue,
            Ok(false) => break,
            Err(e) if is_cancellation(&e) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet);

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    info!(
        data = %config.data_path.display(),
        "Starting aq-dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut cache = DatasetCache::new(&config.data_path);
    let renderer = TerminalRenderer::new(config.chart_width, config.chart_height);

    match cli.command {
        Commands::Show {
            station,
            variable,
            json,
        } => {
            let table = load_table(&mut cache, cli.quiet || json)?;
            let view = render_selection(&table, &config, station.as_deref(), variable.as_deref())?;

            if json {
                println!("{}", JsonWriter::new().to_json(&view)?);
            } else {
                println!("{}", renderer.render(&view));
            }
        }

        Commands::Export {
            station,
            variable,
            output,
        } => {
            let table = load_table(&mut cache, cli.quiet)?;
            let view = render_selection(&table, &config, station.as_deref(), variable.as_deref())?;

            JsonWriter::new().write_view(&view, &output)?;
            println!(
                "Exported {} / {} ({} records) to {}",
                view.station,
                view.variable,
                view.observations,
                output.display()
            );
        }

        Commands::Stations => {
            let table = load_table(&mut cache, cli.quiet)?;
            for (i, station) in table.stations().iter().enumerate() {
                println!("{:>3}. {}", i + 1, station);
            }
        }

        Commands::Info => {
            let table = load_table(&mut cache, cli.quiet)?;
            let summary = DatasetSummary::from_table(&table)?;
            println!("Dataset: {}", config.data_path.display());
            println!("{}", summary.summary());
        }

        Commands::Interactive => {
            run_interactive(&mut cache, &config, &renderer, cli.quiet)?;
        }
    }

    Ok(())
}
