//! Error types for the escrow core

use crate::types::{TransactionId, TransactionStatus};
use thiserror::Error;

/// Result type for escrow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Escrow errors
///
/// Every mutating operation is all-or-nothing: any of these leaves the
/// transaction store, claim registry, and ledger balances untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller does not hold the role the operation requires
    #[error("Unauthorized: caller {caller} may not perform {operation}")]
    Unauthorized {
        /// Offending caller
        caller: String,
        /// Operation attempted
        operation: &'static str,
    },

    /// Current status does not admit the transition
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        /// Status the operation requires
        expected: &'static str,
        /// Status actually found
        actual: TransactionStatus,
    },

    /// Transaction already reached a terminal state
    #[error("Transaction {0} already completed")]
    AlreadyCompleted(TransactionId),

    /// Claimant already filed a claim on this transaction
    #[error("Account {claimant} already claimed transaction {id}")]
    AlreadyClaimed {
        /// Transaction claimed
        id: TransactionId,
        /// Repeat claimant
        claimant: String,
    },

    /// Unknown transaction ID
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    /// Ledger refused or failed the transfer (not retried locally)
    #[error("Ledger transfer failed: {0}")]
    LedgerTransferFailed(#[from] LedgerError),

    /// Another operation on the same transaction is between checks and commit
    #[error("Operation already in progress for transaction {0}")]
    OperationInProgress(TransactionId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the external ledger capability
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Source account balance below the transfer amount
    #[error("Insufficient balance in {account}: have {available}, need {required}")]
    InsufficientBalance {
        /// Debited account
        account: String,
        /// Balance on hand
        available: u64,
        /// Amount requested
        required: u64,
    },

    /// Spender lacks (sufficient) allowance on the source account
    #[error("Missing transfer authorization from {owner} to {spender}")]
    MissingAuthorization {
        /// Account whose funds were requested
        owner: String,
        /// Account attempting the debit
        spender: String,
    },

    /// Unknown account
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Any other ledger-side failure
    #[error("Ledger rejected transfer: {0}")]
    Rejected(String),
}
