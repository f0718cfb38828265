use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aq-dashboard")]
#[command(about = "Air-quality dashboard: PM2.5 heatmaps, trends, correlations and regression")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors; hide progress")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Configuration file [default: aq-dashboard.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Input CSV file (overrides configuration)")]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard for one station and weather variable
    Show {
        #[arg(short, long, help = "Station identifier [default: first station in file]")]
        station: Option<String>,

        #[arg(short = 'w', long, help = "Weather variable: TEMP, PRES, DEWP or WSPM")]
        variable: Option<String>,

        #[arg(long, default_value = "false", help = "Print the view as JSON instead of charts")]
        json: bool,
    },

    /// Write the dashboard view for one selection to a JSON file
    Export {
        #[arg(short, long)]
        station: Option<String>,

        #[arg(short = 'w', long)]
        variable: Option<String>,

        #[arg(short, long, help = "Output JSON file path")]
        output: PathBuf,
    },

    /// List the stations present in the dataset
    Stations,

    /// Display a summary of the dataset
    Info,

    /// Pick station and weather variable interactively and re-render on each change
    Interactive,
}
