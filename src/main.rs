use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use helium::StoreConfig;
use helium::replay::{load_actions, replay};

/// Replay recorded actions through a configured store and print the final state
#[derive(Debug, Parser)]
#[command(name = "helium", version, about)]
struct Cli {
    /// Store configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Actions to dispatch: a JSON array, or JSON lines for `.jsonl` files
    actions: PathBuf,

    /// Pretty-print the final state
    #[arg(long)]
    pretty: bool,

    /// Log filter, e.g. "helium=debug" (defaults to RUST_LOG, then "warn")
    #[arg(long)]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    match run(&cli, &mut io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether every action was dispatched successfully
fn run(cli: &Cli, out: &mut impl Write) -> Result<bool, Box<dyn std::error::Error>> {
    let config = StoreConfig::load(&cli.config)?;
    let store = config.build_store()?;
    let actions = load_actions(&cli.actions)?;

    let report = replay(&store, actions);
    for (index, e) in &report.failures {
        eprintln!("✗ action {}: {}", index, e);
    }

    write_state(&store.snapshot().into_value(), cli.pretty, out)?;
    Ok(report.is_success())
}

fn write_state(state: &serde_json::Value, pretty: bool, out: &mut impl Write) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, state)?;
    } else {
        serde_json::to_writer(&mut *out, state)?;
    }
    writeln!(out)
}
