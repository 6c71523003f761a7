use crate::core::{ChaincodeConfig, Surface};
use crate::strategy::BatchConfig;
use crate::types::InitMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the cash ledger script host
#[derive(Parser, Debug)]
#[command(name = "cash-ledger")]
#[command(about = "Run ledger invocation scripts against a key/value state store", long_about = None)]
pub struct CliArgs {
    /// Path to the invocation script
    #[arg(value_name = "SCRIPT", help = "Path to the invocation script (CSV)")]
    pub script: PathBuf,

    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for parallel batches"
    )]
    pub strategy: StrategyType,

    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of invocations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Worker threads for parallel groups (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    #[arg(
        long = "init-mode",
        value_name = "MODE",
        default_value = "accounts",
        help = "Contract of 'init': 'accounts' (id, type, amount) or 'classic' (nameA, valueA, nameB, valueB)"
    )]
    pub init_mode: InitModeArg,

    #[arg(
        long = "query-only",
        help = "Route every invocation through the read-only query surface"
    )]
    pub query_only: bool,

    #[arg(
        long = "state",
        value_name = "PATH",
        help = "JSON snapshot to load before the run (if present) and save after it"
    )]
    pub state: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InitModeArg {
    Accounts,
    Classic,
}

impl From<InitModeArg> for InitMode {
    fn from(arg: InitModeArg) -> Self {
        match arg {
            InitModeArg::Accounts => InitMode::Accounts,
            InitModeArg::Classic => InitMode::Classic,
        }
    }
}

impl CliArgs {
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_chaincode_config(&self) -> ChaincodeConfig {
        let surface = if self.query_only {
            Surface::QueryOnly
        } else {
            Surface::Full
        };
        ChaincodeConfig::new(self.init_mode.into(), surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "script.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "script.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "script.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "script.csv"], Some(2000), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "script.csv"], None, Some(8))]
    #[case::no_options(&["program", "script.csv"], None, None)]
    #[case::all_options(
        &["program", "--strategy", "async", "--batch-size", "2000", "--max-concurrent", "8", "script.csv"],
        Some(2000),
        Some(8)
    )]
    fn test_config_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&["program", "script.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "script.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "script.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "script.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[rstest]
    #[case::defaults(&["program", "script.csv"], InitMode::Accounts, Surface::Full)]
    #[case::classic(&["program", "--init-mode", "classic", "script.csv"], InitMode::Classic, Surface::Full)]
    #[case::query_only(&["program", "--query-only", "script.csv"], InitMode::Accounts, Surface::QueryOnly)]
    fn test_chaincode_config_conversion(
        #[case] args: &[&str],
        #[case] init_mode: InitMode,
        #[case] surface: Surface,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(
            parsed.to_chaincode_config(),
            ChaincodeConfig::new(init_mode, surface)
        );
    }

    #[test]
    fn test_state_path() {
        let parsed =
            CliArgs::try_parse_from(["program", "--state", "ledger.json", "script.csv"]).unwrap();
        assert_eq!(parsed.state, Some(PathBuf::from("ledger.json")));
        assert_eq!(parsed.script, PathBuf::from("script.csv"));
    }

    #[rstest]
    #[case::missing_script(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "script.csv"])]
    #[case::invalid_init_mode(&["program", "--init-mode", "legacy", "script.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
