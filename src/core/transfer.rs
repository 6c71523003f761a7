//! Transfer engine
//!
//! Moves cash between two existing accounts. The engine enforces:
//! - both accounts exist before anything else is checked
//! - the amount is a strictly positive real number
//! - the sender balance covers the amount (no partial transfers)
//!
//! Both updated snapshots are handed to the state accessor as a single batch,
//! recipient first. Whether that batch lands atomically depends on the
//! accessor; see `StateAccessor::put_batch`.

use crate::core::registry::AccountRegistry;
use crate::state::StateAccessor;
use crate::types::amount::parse_positive_amount;
use crate::types::LedgerError;
use tracing::{debug, info};

pub struct TransferEngine<'s, S: StateAccessor + ?Sized> {
    registry: AccountRegistry<'s, S>,
}

impl<'s, S: StateAccessor + ?Sized> TransferEngine<'s, S> {
    pub fn new(state: &'s mut S) -> Self {
        TransferEngine {
            registry: AccountRegistry::new(state),
        }
    }

    /// Transfer `amount` from `from_id` to `to_id`
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` naming whichever side is missing (sender checked first)
    /// - `InvalidAmount` when the amount does not parse or is not positive
    /// - `InsufficientFunds` when the sender balance is below the amount
    /// - `ArithmeticOverflow` when the recipient balance would overflow
    /// - `IoError` when the state accessor fails
    ///
    /// No write happens unless every check passes. A transfer from an account
    /// to itself is validated the same way and then leaves state untouched.
    pub fn transfer(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: &str,
    ) -> Result<(), LedgerError> {
        let mut from_account = self.registry.get_account(from_id)?;
        let mut to_account = self.registry.get_account(to_id)?;

        let amount = parse_positive_amount(amount, &format!("transfer from {from_id}"))?;

        if from_account.cash_balance < amount {
            return Err(LedgerError::insufficient_funds(
                from_id,
                from_account.cash_balance,
                amount,
            ));
        }

        if from_id == to_id {
            debug!(id = from_id, %amount, "self transfer leaves balance unchanged");
            return Ok(());
        }

        to_account.cash_balance = to_account
            .cash_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", to_id))?;
        from_account.cash_balance = from_account
            .cash_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", from_id))?;

        self.registry.save_accounts(&[&to_account, &from_account])?;

        info!(
            from = from_id,
            to = to_id,
            %amount,
            from_balance = %from_account.cash_balance,
            to_balance = %to_account.cash_balance,
            "transfer completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::read_account;
    use crate::state::testing::FlakyState;
    use crate::state::MemoryState;
    use rstest::rstest;
    use rust_decimal::Decimal;

    /// alice (CORPORATE, 1000.0) and bob (NGO, 500.0)
    fn seeded_state() -> MemoryState {
        let mut state = MemoryState::new();
        let mut registry = AccountRegistry::new(&mut state);
        registry.create_account("alice", "CORPORATE", "1000.0").unwrap();
        registry.create_account("bob", "NGO", "500.0").unwrap();
        state
    }

    fn balance(state: &MemoryState, id: &str) -> Decimal {
        read_account(state, id).unwrap().cash_balance
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut state = seeded_state();

        TransferEngine::new(&mut state)
            .transfer("alice", "bob", "300.0")
            .unwrap();

        assert_eq!(balance(&state, "alice"), Decimal::new(700, 0));
        assert_eq!(balance(&state, "bob"), Decimal::new(800, 0));
    }

    #[rstest]
    #[case::small("0.01")]
    #[case::exact_balance("1000")]
    #[case::scientific("2.5e2")]
    fn test_transfer_conserves_total(#[case] amount: &str) {
        let mut state = seeded_state();
        let before = balance(&state, "alice") + balance(&state, "bob");

        TransferEngine::new(&mut state)
            .transfer("alice", "bob", amount)
            .unwrap();

        let after = balance(&state, "alice") + balance(&state, "bob");
        assert_eq!(before, after);
        assert!(balance(&state, "alice") >= Decimal::ZERO);
    }

    #[test]
    fn test_transfer_with_insufficient_funds_changes_nothing() {
        let mut state = seeded_state();
        let writes_before = state.write_count();

        let err = TransferEngine::new(&mut state)
            .transfer("bob", "alice", "500.01")
            .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientFunds { ref id, .. } if id == "bob"));
        assert_eq!(balance(&state, "alice"), Decimal::new(1000, 0));
        assert_eq!(balance(&state, "bob"), Decimal::new(500, 0));
        assert_eq!(state.write_count(), writes_before);
    }

    #[rstest]
    #[case::missing_sender("carol", "bob", "carol")]
    #[case::missing_recipient("alice", "carol", "carol")]
    #[case::both_missing("dave", "carol", "dave")]
    fn test_transfer_with_missing_account_writes_nothing(
        #[case] from: &str,
        #[case] to: &str,
        #[case] missing: &str,
    ) {
        let mut state = seeded_state();
        let writes_before = state.write_count();

        let err = TransferEngine::new(&mut state)
            .transfer(from, to, "10")
            .unwrap_err();

        assert_eq!(err, LedgerError::account_not_found(missing));
        assert_eq!(state.write_count(), writes_before);
    }

    #[rstest]
    #[case::word("ten")]
    #[case::zero("0")]
    #[case::negative("-5")]
    fn test_transfer_rejects_bad_amount(#[case] amount: &str) {
        let mut state = seeded_state();

        let err = TransferEngine::new(&mut state)
            .transfer("alice", "bob", amount)
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert_eq!(balance(&state, "alice"), Decimal::new(1000, 0));
    }

    #[test]
    fn test_account_lookup_precedes_amount_parsing() {
        let mut state = seeded_state();
        let err = TransferEngine::new(&mut state)
            .transfer("alice", "carol", "not-a-number")
            .unwrap_err();
        assert_eq!(err, LedgerError::account_not_found("carol"));
    }

    #[test]
    fn test_self_transfer_is_a_no_op() {
        let mut state = seeded_state();
        let writes_before = state.write_count();

        TransferEngine::new(&mut state)
            .transfer("alice", "alice", "100")
            .unwrap();

        assert_eq!(balance(&state, "alice"), Decimal::new(1000, 0));
        assert_eq!(state.write_count(), writes_before);
    }

    #[test]
    fn test_self_transfer_still_checks_funds() {
        let mut state = seeded_state();
        let err = TransferEngine::new(&mut state)
            .transfer("bob", "bob", "501")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_failed_second_write_leaves_recipient_credited() {
        // Without an atomic batch the recipient write lands before the sender
        // write fails.
        let mut state = FlakyState {
            inner: seeded_state(),
            fail_put_at: Some(2),
            ..Default::default()
        };

        let err = TransferEngine::new(&mut state)
            .transfer("alice", "bob", "300")
            .unwrap_err();

        assert!(matches!(err, LedgerError::IoError { ref key, .. } if key == "acct:alice"));
        assert_eq!(balance(&state.inner, "bob"), Decimal::new(800, 0));
        assert_eq!(balance(&state.inner, "alice"), Decimal::new(1000, 0));
    }

    #[test]
    fn test_failed_first_write_changes_nothing() {
        let mut state = FlakyState {
            inner: seeded_state(),
            fail_put_at: Some(1),
            ..Default::default()
        };

        let err = TransferEngine::new(&mut state)
            .transfer("alice", "bob", "300")
            .unwrap_err();

        assert!(matches!(err, LedgerError::IoError { ref key, .. } if key == "acct:bob"));
        assert_eq!(balance(&state.inner, "bob"), Decimal::new(500, 0));
        assert_eq!(balance(&state.inner, "alice"), Decimal::new(1000, 0));
    }
}
