//! Transaction store
//!
//! Append-only-by-ID table of escrow transactions plus the identifier
//! allocator. Identifiers are dense and zero-based, so the table is a vector
//! and allocation-plus-insert is one atomic step under the write lock.
//! Records are never deleted; completed transactions remain as audit records.

use crate::error::{Error, Result};
use crate::types::{AccountId, AssetId, Transaction, TransactionId, TransactionStatus};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Process-wide transaction table
///
/// Explicit initialization: empty table, counter zero. The counter is the
/// vector length, so no two callers can ever receive the same id.
#[derive(Debug, Default)]
pub struct TransactionStore {
    table: RwLock<Vec<Transaction>>,
}

impl TransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and insert a new Escrow-status record
    ///
    /// Never fails given valid inputs.
    pub fn create(
        &self,
        user: AccountId,
        merchant: AccountId,
        asset: AssetId,
        value: u64,
    ) -> TransactionId {
        let now = Utc::now();
        let mut table = self.table.write();
        let id = TransactionId(table.len() as u64);
        table.push(Transaction {
            id,
            user,
            merchant,
            asset,
            value,
            status: TransactionStatus::Escrow,
            completed: false,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Read-only lookup
    pub fn get(&self, id: TransactionId) -> Result<Transaction> {
        self.table
            .read()
            .get(id.as_u64() as usize)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    /// Number of transactions ever created
    pub fn count(&self) -> u64 {
        self.table.read().len() as u64
    }

    /// Commit a transition: set status and completion atomically
    pub(crate) fn commit(
        &self,
        id: TransactionId,
        status: TransactionStatus,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut table = self.table.write();
        let txn = table
            .get_mut(id.as_u64() as usize)
            .ok_or(Error::NotFound(id))?;
        txn.status = status;
        txn.completed = completed;
        txn.updated_at = at;
        Ok(())
    }

    /// Copy of the full table, id order preserved (read path)
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.table.read().clone()
    }
}
