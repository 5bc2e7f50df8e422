use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod dataset;
mod domain;
mod inputter;
mod model;
mod ui;
mod views;

use controller::Controller;
use domain::{DEFAULT_DATASET, EdaConfig, EdaError};
use model::{Model, Status};
use ui::TableUI;

/// Exploratory data analysis of a CSV file in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file to analyse. The first column is used as row label.
    #[arg(default_value = DEFAULT_DATASET)]
    path: String,

    /// Where to write the log, controlled by RUST_LOG.
    #[arg(long, default_value = "edav.log")]
    log_file: PathBuf,

    /// Terminal event poll interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn init_tracing(log_file: &Path) -> Result<(), EdaError> {
    let file = File::create(log_file)?;
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_tracing(&args.log_file) {
        eprintln!("Could not set up logging: {e}");
    }

    let result = run(&args);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(args: &Args) -> Result<(), EdaError> {
    let dataset = shellexpand::full(&args.path)
        .map_err(|e| EdaError::IoError(std::io::Error::other(e.to_string())))?;
    let cfg = EdaConfig::default()
        .with_default_dataset(PathBuf::from(dataset.as_ref()))
        .with_event_poll_time(args.poll_ms);
    info!("Starting edav with {:?}", cfg);

    let mut terminal = ratatui::init();
    let size = terminal.size()?;

    let mut model = Model::init(&cfg, size.height as usize);
    // A failed default load keeps the UI up so another file can be opened.
    let _ = model.load_default();

    let ui = TableUI::new(&cfg);
    let controller = Controller::new(&cfg);

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(&model, f))?;
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    info!("Quitting edav");
    Ok(())
}
