//! External capability boundaries
//!
//! The escrow core never custodies value itself: all movement goes through
//! the [`Ledger`] capability, and arbiter identity comes from the
//! [`AccessControl`] capability. Both are injected; the in-memory
//! implementations here back the test suites and local demos.

use crate::error::LedgerError;
use crate::types::AccountId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Asset ledger capability (consumed)
///
/// Both operations may fail (insufficient balance, missing authorization);
/// failure aborts the calling escrow operation. The core never retries.
pub trait Ledger: Send + Sync {
    /// Move `value` from `from` to `to` using a pre-granted authorization
    fn transfer_from(
        &self,
        from: &AccountId,
        to: &AccountId,
        value: u64,
    ) -> std::result::Result<(), LedgerError>;

    /// Move `value` from the core's own escrow account to `to`
    fn transfer(&self, to: &AccountId, value: u64) -> std::result::Result<(), LedgerError>;
}

/// Arbiter identity capability (consumed)
///
/// Who holds the arbiter role, and how it is transferred, is administered
/// outside the core.
pub trait AccessControl: Send + Sync {
    /// Is the caller the current arbiter?
    fn is_arbiter(&self, caller: &AccountId) -> bool;
}

/// In-memory ledger with balances and per-spender allowances
///
/// Reference implementation for tests and demos. The spender on
/// `transfer_from` is always the escrow account this ledger was created for.
#[derive(Debug)]
pub struct InMemoryLedger {
    escrow_account: AccountId,
    balances: RwLock<HashMap<AccountId, u64>>,
    allowances: RwLock<HashMap<(AccountId, AccountId), u64>>,
}

impl InMemoryLedger {
    /// Create an empty ledger acting on behalf of `escrow_account`
    pub fn new(escrow_account: AccountId) -> Self {
        Self {
            escrow_account,
            balances: RwLock::new(HashMap::new()),
            allowances: RwLock::new(HashMap::new()),
        }
    }

    /// Credit an account (mint, for test setup)
    pub fn credit(&self, account: &AccountId, value: u64) {
        let mut balances = self.balances.write();
        *balances.entry(account.clone()).or_insert(0) += value;
    }

    /// Grant `spender` the right to debit up to `value` from `owner`
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, value: u64) {
        let mut allowances = self.allowances.write();
        allowances.insert((owner.clone(), spender.clone()), value);
    }

    /// Current balance (zero for unknown accounts)
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    fn debit(
        balances: &mut HashMap<AccountId, u64>,
        account: &AccountId,
        value: u64,
    ) -> std::result::Result<(), LedgerError> {
        let available = balances.get(account).copied().unwrap_or(0);
        if available < value {
            return Err(LedgerError::InsufficientBalance {
                account: account.to_string(),
                available,
                required: value,
            });
        }
        balances.insert(account.clone(), available - value);
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn transfer_from(
        &self,
        from: &AccountId,
        to: &AccountId,
        value: u64,
    ) -> std::result::Result<(), LedgerError> {
        // Allowance check first: authorization failures should not depend on
        // balance state.
        let key = (from.clone(), self.escrow_account.clone());
        let mut allowances = self.allowances.write();
        let allowed = allowances.get(&key).copied().unwrap_or(0);
        if allowed < value {
            tracing::warn!(from = %from, value, "transfer_from rejected: missing authorization");
            return Err(LedgerError::MissingAuthorization {
                owner: from.to_string(),
                spender: self.escrow_account.to_string(),
            });
        }

        let mut balances = self.balances.write();
        Self::debit(&mut balances, from, value)?;
        *balances.entry(to.clone()).or_insert(0) += value;
        allowances.insert(key, allowed - value);

        tracing::debug!(from = %from, to = %to, value, "transfer_from complete");
        Ok(())
    }

    fn transfer(&self, to: &AccountId, value: u64) -> std::result::Result<(), LedgerError> {
        let mut balances = self.balances.write();
        Self::debit(&mut balances, &self.escrow_account, value)?;
        *balances.entry(to.clone()).or_insert(0) += value;

        tracing::debug!(to = %to, value, "escrow transfer complete");
        Ok(())
    }
}

/// Access control backed by a single fixed arbiter account
#[derive(Debug)]
pub struct SingleArbiter {
    arbiter: AccountId,
}

impl SingleArbiter {
    /// Create with the given arbiter identity
    pub fn new(arbiter: AccountId) -> Self {
        Self { arbiter }
    }
}

impl AccessControl for SingleArbiter {
    fn is_arbiter(&self, caller: &AccountId) -> bool {
        self.arbiter == *caller
    }
}
