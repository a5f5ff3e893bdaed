//! Entry point: renders the figures of one simulation run.
mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transport_plots::config::PlotSettings;
use transport_plots::pipeline::{self, PipelineOptions};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = cli::Args::parse();

    let mut settings = PlotSettings::load_or_default(&args.settings);
    if let Some(out) = args.out.clone() {
        settings.output.root = out;
    }
    if let Some(name_by) = args.name_by {
        settings.output.naming = name_by.into();
    }

    let options = PipelineOptions {
        descriptor: PathBuf::from(&args.configuration),
        plot_probabilities: !args.no_multiple_geometries,
        settings,
    };

    match pipeline::run(&options) {
        Ok(report) => {
            info!("Saved figures to {}", report.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
