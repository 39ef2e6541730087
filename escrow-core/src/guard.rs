//! Authorization guards
//!
//! Composable precondition checks run before any mutation. Each derives the
//! caller's role from the transaction record and rejects unauthorized or
//! already-settled operations; failing a guard leaves all state untouched.

use crate::error::{Error, Result};
use crate::ledger::AccessControl;
use crate::types::{AccountId, Transaction};

/// Caller must be the transaction's user (payer)
pub fn only_user(txn: &Transaction, caller: &AccountId, operation: &'static str) -> Result<()> {
    if txn.user != *caller {
        return Err(Error::Unauthorized {
            caller: caller.to_string(),
            operation,
        });
    }
    Ok(())
}

/// Caller must be the transaction's merchant (payee)
pub fn only_merchant(txn: &Transaction, caller: &AccountId, operation: &'static str) -> Result<()> {
    if txn.merchant != *caller {
        return Err(Error::Unauthorized {
            caller: caller.to_string(),
            operation,
        });
    }
    Ok(())
}

/// Caller must be one of the two parties
pub fn only_parties(txn: &Transaction, caller: &AccountId, operation: &'static str) -> Result<()> {
    if !txn.is_party(caller) {
        return Err(Error::Unauthorized {
            caller: caller.to_string(),
            operation,
        });
    }
    Ok(())
}

/// Caller must hold the current arbiter role
pub fn only_arbiter(
    access: &dyn AccessControl,
    caller: &AccountId,
    operation: &'static str,
) -> Result<()> {
    if !access.is_arbiter(caller) {
        return Err(Error::Unauthorized {
            caller: caller.to_string(),
            operation,
        });
    }
    Ok(())
}

/// Transaction must still be live (not completed)
pub fn not_completed(txn: &Transaction) -> Result<()> {
    if txn.completed {
        return Err(Error::AlreadyCompleted(txn.id));
    }
    Ok(())
}
