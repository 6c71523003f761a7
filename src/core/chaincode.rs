//! Dispatcher
//!
//! `Chaincode` routes a named function and its positional string arguments to
//! the account registry, the transfer engine or the legacy ledger. It checks
//! the argument count before anything touches state, so an arity failure
//! never reads or writes.
//!
//! Two entry points mirror what a hosting runtime offers:
//! - [`Chaincode::invoke`] accepts every function and may write
//! - [`Chaincode::query`] accepts only the read-only functions and takes `&self`

use crate::core::legacy::{query_entity, LegacyLedger};
use crate::core::registry::{read_account, AccountRegistry};
use crate::core::transfer::TransferEngine;
use crate::state::StateAccessor;
use crate::types::{Function, InitMode, Invocation, LedgerError};
use tracing::debug;

/// Which entry point a host routes its invocations through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Every invocation goes through `invoke`
    #[default]
    Full,
    /// Every invocation goes through `query`; writes are unavailable
    QueryOnly,
}

/// Per-instance dispatcher settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChaincodeConfig {
    pub init_mode: InitMode,
    pub surface: Surface,
}

impl ChaincodeConfig {
    pub fn new(init_mode: InitMode, surface: Surface) -> Self {
        ChaincodeConfig { init_mode, surface }
    }
}

pub struct Chaincode<S: StateAccessor> {
    state: S,
    config: ChaincodeConfig,
}

impl<S: StateAccessor> Chaincode<S> {
    /// Create a dispatcher over `state`
    ///
    /// `state` may be an owned store or `&mut` to one.
    pub fn new(state: S, config: ChaincodeConfig) -> Self {
        Chaincode { state, config }
    }

    pub fn config(&self) -> ChaincodeConfig {
        self.config
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Bootstrap according to the configured [`InitMode`]
    ///
    /// # Returns
    ///
    /// The created account's JSON in `Accounts` mode, an empty body in
    /// `Classic` mode.
    pub fn init(&mut self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match self.config.init_mode {
            InitMode::Accounts => {
                let [id, account_type, amount] = expect_args::<3>(Function::Init, args)?;
                let account =
                    AccountRegistry::new(&mut self.state).create_account(id, account_type, amount)?;
                account.encode()
            }
            InitMode::Classic => {
                let [name_a, value_a, name_b, value_b] = expect_args::<4>(Function::Init, args)?;
                LegacyLedger::new(&mut self.state).initialize(name_a, value_a, name_b, value_b)?;
                Ok(Vec::new())
            }
        }
    }

    /// Run any known function
    ///
    /// # Arguments
    ///
    /// * `function` - Function name, matched case-sensitively
    /// * `args` - Positional arguments
    ///
    /// # Returns
    ///
    /// The response body: account JSON for `createAccount` and `GetCompany`,
    /// the stored bytes for `query`, the `init` response per mode, and an
    /// empty body for everything else.
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` for a name outside the supported set
    /// - `InvalidArgumentCount` when the argument count does not match
    /// - whatever the routed operation reports
    pub fn invoke(&mut self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        let function: Function = function.parse()?;
        debug!(%function, ?args, "invoke");

        match function {
            Function::Init => self.init(args),
            Function::Invoke => {
                let [name_a, name_b, amount] = expect_args::<3>(function, args)?;
                LegacyLedger::new(&mut self.state).invoke(name_a, name_b, amount)?;
                Ok(Vec::new())
            }
            Function::Delete => {
                let [name] = expect_args::<1>(function, args)?;
                LegacyLedger::new(&mut self.state).delete(name)?;
                Ok(Vec::new())
            }
            Function::CreateAccount => {
                let [id, account_type, amount] = expect_args::<3>(function, args)?;
                let account =
                    AccountRegistry::new(&mut self.state).create_account(id, account_type, amount)?;
                account.encode()
            }
            Function::CreateAccounts => {
                let [count] = expect_args::<1>(function, args)?;
                AccountRegistry::new(&mut self.state).create_accounts(count)?;
                Ok(Vec::new())
            }
            Function::Transaction => {
                let [from, to, amount] = expect_args::<3>(function, args)?;
                TransferEngine::new(&mut self.state).transfer(from, to, amount)?;
                Ok(Vec::new())
            }
            Function::Query | Function::GetCompany => self.read(function, args),
        }
    }

    /// Run a read-only function
    ///
    /// Only `query` and `GetCompany` are accepted; any other name, known or
    /// not, fails with `UnknownFunction`.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match function.parse::<Function>() {
            Ok(function) if function.is_query() => {
                debug!(%function, ?args, "query");
                self.read(function, args)
            }
            _ => Err(LedgerError::unknown_function(function)),
        }
    }

    /// Route an invocation through the configured surface
    pub fn dispatch(&mut self, invocation: &Invocation) -> Result<Vec<u8>, LedgerError> {
        match self.config.surface {
            Surface::Full => self.invoke(&invocation.function, &invocation.args),
            Surface::QueryOnly => self.query(&invocation.function, &invocation.args),
        }
    }

    fn read(&self, function: Function, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match function {
            Function::GetCompany => {
                let [id] = expect_args::<1>(function, args)?;
                read_account(&self.state, id)?.encode()
            }
            _ => {
                let [name] = expect_args::<1>(function, args)?;
                query_entity(&self.state, name)
            }
        }
    }
}

/// Check the argument count and borrow the arguments as a fixed-size array
fn expect_args<const N: usize>(
    function: Function,
    args: &[String],
) -> Result<[&str; N], LedgerError> {
    if args.len() != N {
        return Err(LedgerError::invalid_argument_count(
            function.as_str(),
            N,
            args.len(),
        ));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}
