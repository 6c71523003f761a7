//! Cash Ledger CLI
//!
//! Command-line host that runs invocation scripts against the ledger.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > results.csv
//! cargo run -- --strategy sync script.csv > results.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 script.csv > results.csv
//! cargo run -- --init-mode classic --state ledger.json script.csv > results.csv
//! RUST_LOG=cash_ledger=debug cargo run -- script.csv > results.csv
//! ```
//!
//! The program reads invocation records from the script, dispatches them with
//! the selected processing strategy, and writes one result row per invocation
//! to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success, including runs where individual invocations failed
//! - 1: Fatal error (unreadable script or snapshot, failed output)

use cash_ledger::cli;
use cash_ledger::state::MemoryState;
use cash_ledger::strategy;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), String> {
    let state = match &args.state {
        Some(path) if path.exists() => {
            let state = MemoryState::load_snapshot(path).map_err(|e| e.to_string())?;
            info!(path = %path.display(), entries = state.len(), "loaded state snapshot");
            state
        }
        _ => MemoryState::new(),
    };

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.to_chaincode_config(), batch)
    };

    let mut output = std::io::stdout();
    let state = strategy.process(&args.script, state, &mut output)?;

    if let Some(path) = &args.state {
        state.save_snapshot(path).map_err(|e| e.to_string())?;
        info!(path = %path.display(), entries = state.len(), "saved state snapshot");
    }

    Ok(())
}
