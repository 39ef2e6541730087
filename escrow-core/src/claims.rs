//! Claim registry
//!
//! Per-transaction record of which parties have raised a dispute claim and
//! when. Purely an evidentiary log for operators; the state machine consults
//! it only to enforce one claim per party per transaction. No expiry, no
//! automatic resolution.

use crate::error::{Error, Result};
use crate::types::{AccountId, TransactionId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Dispute-claim log keyed by (transaction, claimant)
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    claims: DashMap<(TransactionId, AccountId), DateTime<Utc>>,
}

impl ClaimRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim; a second filing by the same claimant fails and does
    /// not overwrite the original timestamp
    pub fn file_claim(
        &self,
        id: TransactionId,
        claimant: &AccountId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        match self.claims.entry((id, claimant.clone())) {
            Entry::Occupied(_) => Err(Error::AlreadyClaimed {
                id,
                claimant: claimant.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(at);
                Ok(())
            }
        }
    }

    /// Has this claimant filed on this transaction?
    pub fn has_claimed(&self, id: TransactionId, claimant: &AccountId) -> bool {
        self.claims.contains_key(&(id, claimant.clone()))
    }

    /// When the claimant filed, if they did
    pub fn claimed_at(&self, id: TransactionId, claimant: &AccountId) -> Option<DateTime<Utc>> {
        self.claims
            .get(&(id, claimant.clone()))
            .map(|entry| *entry.value())
    }
}
