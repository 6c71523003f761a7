//! Account registry
//!
//! `AccountRegistry` owns the account lifecycle. It creates accounts exactly
//! once, looks them up and persists updated snapshots. Every account lives
//! under `acct:<id>`; the presence of that key is the only lifecycle signal.
//!
//! # Creation leniency
//!
//! A key that holds empty or truncated JSON is treated as "no account yet" and
//! overwritten. Any other malformed record is reported as an encoding error
//! instead of being replaced, so real corruption is not masked.

use crate::state::StateAccessor;
use crate::types::amount::{parse_account_count, parse_amount};
use crate::types::{account_key, Account, AccountType, LedgerError};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Balance given to every account created by [`AccountRegistry::create_accounts`]
pub const BOOTSTRAP_BALANCE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Read and decode the account stored under `id`
///
/// Absent and undecodable records both surface as `AccountNotFound`; this is
/// the lookup used by transfers and the query path.
pub fn read_account<S>(state: &S, id: &str) -> Result<Account, LedgerError>
where
    S: StateAccessor + ?Sized,
{
    let key = account_key(id);
    let bytes = state
        .get(&key)?
        .ok_or_else(|| LedgerError::account_not_found(id))?;

    Account::decode(&bytes).map_err(|e| {
        debug!(%key, error = %e, "stored account does not decode");
        LedgerError::account_not_found(id)
    })
}

/// Manages account creation and persistence on top of a state accessor
pub struct AccountRegistry<'s, S: StateAccessor + ?Sized> {
    state: &'s mut S,
}

impl<'s, S: StateAccessor + ?Sized> AccountRegistry<'s, S> {
    pub fn new(state: &'s mut S) -> Self {
        AccountRegistry { state }
    }

    /// Create an account
    ///
    /// # Arguments
    ///
    /// * `id` - Unique account id
    /// * `account_type` - One of `ADMIN`, `CORPORATE`, `NGO`, `VENDOR`
    /// * `initial_amount` - Starting balance, any real number
    ///
    /// # Errors
    ///
    /// - `InvalidAccountType` for an unrecognized type
    /// - `InvalidAmount` when the amount does not parse
    /// - `AccountAlreadyExists` when a valid record is already stored
    /// - `EncodingError` when the stored record is malformed (not merely empty)
    /// - `IoError` when the state accessor fails
    ///
    /// Performs exactly one write on success and none on failure.
    pub fn create_account(
        &mut self,
        id: &str,
        account_type: &str,
        initial_amount: &str,
    ) -> Result<Account, LedgerError> {
        let account_type: AccountType = account_type.parse()?;
        let balance = parse_amount(initial_amount, id)?;
        let account = Account::new(id, account_type, balance);
        let key = account.key();

        if let Some(existing) = self.state.get(&key)? {
            match Account::decode(&existing) {
                Ok(_) => return Err(LedgerError::account_already_exists(id)),
                Err(e) if e.is_eof() => {
                    warn!(%key, "existing record holds no data, initializing account");
                }
                Err(e) => return Err(LedgerError::encoding(&key, e)),
            }
        }

        self.state.put(&key, account.encode()?)?;
        info!(id, prefix = %account.prefix, balance = %account.cash_balance, "created account");
        Ok(account)
    }

    /// Look up an account
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the key is absent or the record does not decode;
    /// `IoError` when the state accessor fails.
    pub fn get_account(&self, id: &str) -> Result<Account, LedgerError> {
        read_account(&*self.state, id)
    }

    /// Persist updated account snapshots in the given order
    ///
    /// All snapshots go to the state accessor as one batch.
    pub fn save_accounts(&mut self, accounts: &[&Account]) -> Result<(), LedgerError> {
        let mut writes = Vec::with_capacity(accounts.len());
        for account in accounts {
            writes.push((account.key(), account.encode()?));
        }
        self.state.put_batch(writes)?;
        Ok(())
    }

    /// Bootstrap `company1..company<count>` as ADMIN accounts
    ///
    /// Each account starts with [`BOOTSTRAP_BALANCE`]. Creation goes through
    /// [`create_account`](Self::create_account), so an already existing
    /// company stops the run with `AccountAlreadyExists`; accounts created
    /// before that point remain. Counts above
    /// [`MAX_BOOTSTRAP_ACCOUNTS`](crate::types::amount::MAX_BOOTSTRAP_ACCOUNTS)
    /// are rejected with `InvalidAmount` before any write.
    pub fn create_accounts(&mut self, count: &str) -> Result<Vec<Account>, LedgerError> {
        let count = parse_account_count(count)?;

        let balance = BOOTSTRAP_BALANCE.to_string();
        let mut created = Vec::new();
        for n in 1..=count {
            let id = format!("company{n}");
            created.push(self.create_account(&id, AccountType::Admin.as_str(), &balance)?);
        }

        info!(count, "bootstrapped company accounts");
        Ok(created)
    }
}
