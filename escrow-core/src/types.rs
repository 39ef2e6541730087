//! Core types for the escrow ledger
//!
//! All types are designed for:
//! - Closed state representation (illegal statuses unrepresentable)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (integer token amounts)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier (wallet address, IBAN, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the item being exchanged
///
/// Advisory metadata only: the escrow core records it but never verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create new asset ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction identifier
///
/// Dense, monotonically assigned, zero-based. Never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Get as u64
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransactionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Escrow transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Value held in escrow (initial)
    Escrow,
    /// Cancelled, value refunded to user (terminal)
    Cancel,
    /// Merchant asserted delivery, awaiting confirmation
    Deliver,
    /// User confirmed delivery, value paid to merchant (terminal)
    Confirm,
    /// One or both parties raised a dispute claim
    Claim,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Escrow => "Escrow",
            TransactionStatus::Cancel => "Cancel",
            TransactionStatus::Deliver => "Deliver",
            TransactionStatus::Confirm => "Confirm",
            TransactionStatus::Claim => "Claim",
        };
        write!(f, "{}", s)
    }
}

/// One escrow agreement between a user and a merchant
///
/// Created only by the `escrow` operation and never deleted; completed
/// transactions persist as audit records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID
    pub id: TransactionId,

    /// Payer account; immutable after creation
    pub user: AccountId,

    /// Payee account; immutable after creation
    pub merchant: AccountId,

    /// Item being exchanged (advisory)
    pub asset: AssetId,

    /// Escrowed amount; immutable after creation
    pub value: u64,

    /// Current status
    pub status: TransactionStatus,

    /// Terminal flag: once true no mutating operation may succeed
    pub completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last transition timestamp
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Check whether the account is one of the two parties
    pub fn is_party(&self, account: &AccountId) -> bool {
        self.user == *account || self.merchant == *account
    }
}
