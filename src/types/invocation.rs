//! Invocation types: the function names the dispatcher understands and the
//! record a host hands to it.

use super::account::account_key;
use super::amount::parse_account_count;
use super::error::LedgerError;
use std::fmt;
use std::str::FromStr;

/// Sequence number of an invocation within a script (1-based)
pub type Sequence = u64;

/// Functions routed by the dispatcher
///
/// The string forms are the established external names and are matched
/// case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Legacy raw-entity payment `invoke(nameA, nameB, amount)`
    Invoke,
    /// Bootstrap, contract selected by the configured init mode
    Init,
    /// Remove a raw entity
    Delete,
    /// Create a single account
    CreateAccount,
    /// Bulk-create `company1..companyN`
    CreateAccounts,
    /// Move cash between two accounts
    Transaction,
    /// Read a raw entity's stored bytes
    Query,
    /// Read an account record
    GetCompany,
}

impl Function {
    pub fn as_str(self) -> &'static str {
        match self {
            Function::Invoke => "invoke",
            Function::Init => "init",
            Function::Delete => "delete",
            Function::CreateAccount => "createAccount",
            Function::CreateAccounts => "createAccounts",
            Function::Transaction => "transaction",
            Function::Query => "query",
            Function::GetCompany => "GetCompany",
        }
    }

    /// Whether the function only reads state
    pub fn is_query(self) -> bool {
        matches!(self, Function::Query | Function::GetCompany)
    }
}

impl FromStr for Function {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoke" => Ok(Function::Invoke),
            "init" => Ok(Function::Init),
            "delete" => Ok(Function::Delete),
            "createAccount" => Ok(Function::CreateAccount),
            "createAccounts" => Ok(Function::CreateAccounts),
            "transaction" => Ok(Function::Transaction),
            "query" => Ok(Function::Query),
            "GetCompany" => Ok(Function::GetCompany),
            other => Err(LedgerError::unknown_function(other)),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bootstrap contract `init` follows
///
/// A dispatcher instance has exactly one init contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// `init(id, type, amount)` creates an account
    #[default]
    Accounts,
    /// `init(nameA, valueA, nameB, valueB)` seeds two raw entities
    Classic,
}

/// A single call handed to the dispatcher by a host
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Position in the input script (1-based)
    pub seq: Sequence,

    /// Function name exactly as supplied; resolved at dispatch time so that
    /// unknown names surface as `UnknownFunction`
    pub function: String,

    /// Positional string arguments
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(seq: Sequence, function: &str, args: Vec<String>) -> Self {
        Invocation {
            seq,
            function: function.to_string(),
            args,
        }
    }

    /// State keys this invocation may read or write
    ///
    /// Derived from the function name and arguments alone, without touching
    /// state. Unknown functions touch nothing. `createAccounts` with an
    /// unparsable or oversized count touches nothing since it fails before
    /// any read.
    pub fn touched_keys(&self, init_mode: InitMode) -> Vec<String> {
        let Ok(function) = self.function.parse::<Function>() else {
            return Vec::new();
        };
        let args = &self.args;
        match function {
            Function::Invoke | Function::Delete | Function::Query => {
                args.iter().take(2).cloned().collect()
            }
            Function::Init => match init_mode {
                InitMode::Accounts => args.iter().take(1).map(|id| account_key(id)).collect(),
                InitMode::Classic => args.iter().step_by(2).take(2).cloned().collect(),
            },
            Function::CreateAccount | Function::GetCompany => {
                args.iter().take(1).map(|id| account_key(id)).collect()
            }
            Function::Transaction => args.iter().take(2).map(|id| account_key(id)).collect(),
            Function::CreateAccounts => {
                let count = args
                    .first()
                    .and_then(|raw| parse_account_count(raw).ok())
                    .unwrap_or(0);
                (1..=count)
                    .map(|n| account_key(&format!("company{n}")))
                    .collect()
            }
        }
    }
}
