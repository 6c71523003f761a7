//! Legacy dual-entity ledger
//!
//! Operates on raw named integers stored under their own names, without the
//! `acct:` prefix. Used by the classic two-party init mode.
//! Unlike the transfer engine, `invoke` has no balance check: values may go
//! negative.

use crate::state::StateAccessor;
use crate::types::amount::parse_integer;
use crate::types::LedgerError;
use tracing::{debug, info};

/// Read the raw bytes stored under `name`
///
/// Absent keys fail with `EntityNotFound`, whose query payload names the
/// entity.
pub fn query_entity<S>(state: &S, name: &str) -> Result<Vec<u8>, LedgerError>
where
    S: StateAccessor + ?Sized,
{
    let bytes = state
        .get(name)?
        .ok_or_else(|| LedgerError::entity_not_found(name))?;

    debug!(
        name,
        amount = %String::from_utf8_lossy(&bytes),
        "query response"
    );
    Ok(bytes)
}

pub struct LegacyLedger<'s, S: StateAccessor + ?Sized> {
    state: &'s mut S,
}

impl<'s, S: StateAccessor + ?Sized> LegacyLedger<'s, S> {
    pub fn new(state: &'s mut S) -> Self {
        LegacyLedger { state }
    }

    /// Seed two raw entities, overwriting whatever is stored under their names
    pub fn initialize(
        &mut self,
        name_a: &str,
        value_a: &str,
        name_b: &str,
        value_b: &str,
    ) -> Result<(), LedgerError> {
        let value_a = parse_integer(value_a, name_a)?;
        let value_b = parse_integer(value_b, name_b)?;

        self.write_value(name_a, value_a)?;
        self.write_value(name_b, value_b)?;

        info!(name_a, value_a, name_b, value_b, "initialized raw entities");
        Ok(())
    }

    /// Pay `amount` units from `name_a` to `name_b`
    ///
    /// # Errors
    ///
    /// - `EntityNotFound` when either entity is absent
    /// - `EncodingError` when a stored value is not an integer
    /// - `InvalidAmount` when `amount` is not an integer
    /// - `ArithmeticOverflow` when a new value leaves the `i64` range
    pub fn invoke(
        &mut self,
        name_a: &str,
        name_b: &str,
        amount: &str,
    ) -> Result<(), LedgerError> {
        let value_a = self.read_value(name_a)?;
        let value_b = self.read_value(name_b)?;
        let amount = parse_integer(amount, "invoke")?;

        let value_a = value_a
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("invoke", name_a))?;
        let value_b = value_b
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("invoke", name_b))?;

        self.write_value(name_a, value_a)?;
        self.write_value(name_b, value_b)?;

        info!(name_a, value_a, name_b, value_b, "raw payment applied");
        Ok(())
    }

    /// Remove a raw entity; an absent entity is not an error
    pub fn delete(&mut self, name: &str) -> Result<(), LedgerError> {
        self.state
            .delete(name)
            .map_err(|e| LedgerError::DeleteFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        info!(name, "deleted raw entity");
        Ok(())
    }

    /// Return the raw bytes stored under `name`
    pub fn query(&self, name: &str) -> Result<Vec<u8>, LedgerError> {
        query_entity(&*self.state, name)
    }

    fn read_value(&self, name: &str) -> Result<i64, LedgerError> {
        let bytes = self
            .state
            .get(name)?
            .ok_or_else(|| LedgerError::entity_not_found(name))?;

        std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .ok_or_else(|| LedgerError::encoding(name, "stored value is not an integer"))
    }

    fn write_value(&mut self, name: &str, value: i64) -> Result<(), LedgerError> {
        self.state.put(name, value.to_string().into_bytes())?;
        Ok(())
    }
}
