//! Query index
//!
//! Read-only filter over the transaction store for external observers.
//! Pure read path: no side effects, no locks held across the result.

use crate::types::{Transaction, TransactionId, TransactionStatus};
use serde::{Deserialize, Serialize};

/// Status/completion filter for transaction listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Required status
    pub status: TransactionStatus,
    /// Required completion flag
    pub completed: bool,
}

impl TransactionFilter {
    /// Does the record match?
    pub fn matches(&self, txn: &Transaction) -> bool {
        txn.status == self.status && txn.completed == self.completed
    }
}

/// Filter the table, then return the `[from, to)` window of the filtered,
/// id-ordered sequence.
///
/// The window is clamped to the filtered length: out-of-range bounds yield a
/// shorter or empty result, never an error. (The range is applied to the
/// filtered sequence, not the underlying table.)
pub fn list_transactions(
    snapshot: &[Transaction],
    from: usize,
    to: usize,
    filter: TransactionFilter,
) -> Vec<TransactionId> {
    let matching: Vec<TransactionId> = snapshot
        .iter()
        .filter(|txn| filter.matches(txn))
        .map(|txn| txn.id)
        .collect();

    let to = to.min(matching.len());
    if from >= to {
        return Vec::new();
    }
    matching[from..to].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, AssetId};
    use chrono::Utc;

    fn txn(id: u64, status: TransactionStatus, completed: bool) -> Transaction {
        Transaction {
            id: TransactionId(id),
            user: AccountId::new("alice"),
            merchant: AccountId::new("bob"),
            asset: AssetId::new("sku"),
            value: 10,
            status,
            completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn(0, TransactionStatus::Escrow, false),
            txn(1, TransactionStatus::Cancel, true),
            txn(2, TransactionStatus::Escrow, false),
            txn(3, TransactionStatus::Deliver, false),
            txn(4, TransactionStatus::Escrow, false),
        ]
    }

    #[test]
    fn test_filter_preserves_id_order() {
        let filter = TransactionFilter {
            status: TransactionStatus::Escrow,
            completed: false,
        };
        let ids = list_transactions(&sample(), 0, 10, filter);
        assert_eq!(ids, vec![TransactionId(0), TransactionId(2), TransactionId(4)]);
    }

    #[test]
    fn test_range_applies_to_filtered_sequence() {
        let filter = TransactionFilter {
            status: TransactionStatus::Escrow,
            completed: false,
        };
        // [1, 3) of the filtered sequence [0, 2, 4], not of the table
        let ids = list_transactions(&sample(), 1, 3, filter);
        assert_eq!(ids, vec![TransactionId(2), TransactionId(4)]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let filter = TransactionFilter {
            status: TransactionStatus::Cancel,
            completed: true,
        };
        assert_eq!(
            list_transactions(&sample(), 0, 100, filter),
            vec![TransactionId(1)]
        );
        assert!(list_transactions(&sample(), 5, 100, filter).is_empty());
        assert!(list_transactions(&sample(), 3, 1, filter).is_empty());
    }

    #[test]
    fn test_no_match_yields_empty() {
        let filter = TransactionFilter {
            status: TransactionStatus::Confirm,
            completed: true,
        };
        assert!(list_transactions(&sample(), 0, 10, filter).is_empty());
    }
}
