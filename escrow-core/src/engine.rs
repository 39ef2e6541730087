//! Escrow state machine
//!
//! The transition logic: escrow, cancel, deliver, confirm, claim, and
//! arbitration. Every mutating operation follows the same ordering:
//!
//! 1. per-id in-flight guard (serializes same-id operations, rejects
//!    reentrant ledger callbacks before they can move value)
//! 2. authorization and liveness guards
//! 3. status precondition
//! 4. external ledger transfer, if the transition moves value
//! 5. local commit of status/completion
//! 6. notifications
//!
//! A failing transfer aborts before the commit, so no partial state is ever
//! observable. Operations on different ids proceed in parallel.

use crate::claims::ClaimRegistry;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Notification, NotificationBus};
use crate::guard;
use crate::ledger::{AccessControl, Ledger};
use crate::query::{self, TransactionFilter};
use crate::store::TransactionStore;
use crate::types::{AccountId, AssetId, Transaction, TransactionId, TransactionStatus};
use chrono::Utc;
use crossbeam_channel::Receiver;
use dashmap::DashMap;
use std::sync::Arc;

/// The escrow core
///
/// Owns the transaction store, claim registry, and notification bus; consumes
/// the ledger and access-control capabilities.
pub struct EscrowEngine {
    store: TransactionStore,
    claims: ClaimRegistry,
    bus: NotificationBus,
    ledger: Arc<dyn Ledger>,
    access: Arc<dyn AccessControl>,
    in_flight: DashMap<TransactionId, ()>,
    config: Config,
}

impl std::fmt::Debug for EscrowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowEngine")
            .field("transactions", &self.store.count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// RAII marker keeping a transaction id exclusive for one operation
struct OpGuard<'a> {
    in_flight: &'a DashMap<TransactionId, ()>,
    id: TransactionId,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}

impl EscrowEngine {
    /// Create an engine with an empty store and registry
    pub fn new(config: Config, ledger: Arc<dyn Ledger>, access: Arc<dyn AccessControl>) -> Self {
        Self {
            store: TransactionStore::new(),
            claims: ClaimRegistry::new(),
            bus: NotificationBus::new(),
            ledger,
            access,
            in_flight: DashMap::new(),
            config,
        }
    }

    /// Subscribe to notifications
    pub fn subscribe(&self) -> Receiver<Notification> {
        self.bus.subscribe()
    }

    // Mutating operations

    /// Create a transaction, pulling `value` from the user into escrow
    ///
    /// Succeeds iff the ledger authorizes the transfer-from. The new
    /// transaction starts at status `Escrow`, not completed.
    pub fn escrow(
        &self,
        user: &AccountId,
        merchant: &AccountId,
        asset: &AssetId,
        value: u64,
    ) -> Result<TransactionId> {
        self.ledger
            .transfer_from(user, &self.config.escrow_account, value)?;

        let id = self
            .store
            .create(user.clone(), merchant.clone(), asset.clone(), value);

        tracing::info!(id = %id, user = %user, merchant = %merchant, value, "transaction escrowed");
        self.bus.publish(Notification::Escrowed {
            id,
            user: user.clone(),
            merchant: merchant.clone(),
            asset: asset.clone(),
            value,
        });

        Ok(id)
    }

    /// User cancels before delivery; escrowed value refunded to the user
    pub fn cancel_by_user(&self, id: TransactionId, caller: &AccountId) -> Result<()> {
        let _op = self.begin_op(id)?;
        let txn = self.store.get(id)?;

        guard::not_completed(&txn)?;
        guard::only_user(&txn, caller, "cancel_by_user")?;
        require_status(&txn, &[TransactionStatus::Escrow], "Escrow")?;

        self.refund_and_cancel(&txn, caller)
    }

    /// Merchant cancels before or after delivery; value refunded to the user
    pub fn cancel_by_merchant(&self, id: TransactionId, caller: &AccountId) -> Result<()> {
        let _op = self.begin_op(id)?;
        let txn = self.store.get(id)?;

        guard::not_completed(&txn)?;
        guard::only_merchant(&txn, caller, "cancel_by_merchant")?;
        require_status(
            &txn,
            &[TransactionStatus::Escrow, TransactionStatus::Deliver],
            "Escrow or Deliver",
        )?;

        self.refund_and_cancel(&txn, caller)
    }

    /// Merchant asserts delivery, unlocking the user's confirm path
    pub fn deliver(&self, id: TransactionId, caller: &AccountId) -> Result<()> {
        let _op = self.begin_op(id)?;
        let txn = self.store.get(id)?;

        guard::not_completed(&txn)?;
        guard::only_merchant(&txn, caller, "deliver")?;
        require_status(&txn, &[TransactionStatus::Escrow], "Escrow")?;

        self.store
            .commit(id, TransactionStatus::Deliver, false, Utc::now())?;

        tracing::info!(id = %id, merchant = %caller, "delivery recorded");
        self.bus.publish(Notification::Delivered { id });
        Ok(())
    }

    /// User confirms delivery; escrowed value paid to the merchant
    pub fn confirm(&self, id: TransactionId, caller: &AccountId) -> Result<()> {
        let _op = self.begin_op(id)?;
        let txn = self.store.get(id)?;

        guard::not_completed(&txn)?;
        guard::only_user(&txn, caller, "confirm")?;
        require_status(&txn, &[TransactionStatus::Deliver], "Deliver")?;

        self.ledger.transfer(&txn.merchant, txn.value)?;
        self.store
            .commit(id, TransactionStatus::Confirm, true, Utc::now())?;

        tracing::info!(id = %id, merchant = %txn.merchant, value = txn.value, "delivery confirmed, merchant paid");
        self.bus.publish(Notification::Confirmed { id });
        self.bus.publish(Notification::Completed { id });
        Ok(())
    }

    /// Either party flags non-resolution; no value moves
    ///
    /// Each party may claim at most once per transaction.
    pub fn claim(&self, id: TransactionId, caller: &AccountId) -> Result<()> {
        let _op = self.begin_op(id)?;
        let txn = self.store.get(id)?;

        guard::not_completed(&txn)?;
        guard::only_parties(&txn, caller, "claim")?;
        require_status(
            &txn,
            &[TransactionStatus::Deliver, TransactionStatus::Claim],
            "Deliver or Claim",
        )?;

        self.claims.file_claim(id, caller, Utc::now())?;
        self.store
            .commit(id, TransactionStatus::Claim, false, Utc::now())?;

        tracing::info!(id = %id, claimant = %caller, "dispute claim filed");
        self.bus.publish(Notification::Claimed {
            id,
            by: caller.clone(),
        });
        Ok(())
    }

    /// Arbiter force-resolves a live transaction in favor of one party
    ///
    /// Allowed from any non-completed status, not only `Claim`: this is the
    /// escape hatch against a counterparty that never confirms or never
    /// re-claims. The status is left unchanged; only completion is set.
    pub fn handle_claim(
        &self,
        id: TransactionId,
        caller: &AccountId,
        beneficiary: &AccountId,
    ) -> Result<()> {
        let _op = self.begin_op(id)?;
        guard::only_arbiter(self.access.as_ref(), caller, "handle_claim")?;

        let txn = self.store.get(id)?;
        guard::not_completed(&txn)?;
        if !txn.is_party(beneficiary) {
            return Err(Error::Unauthorized {
                caller: beneficiary.to_string(),
                operation: "handle_claim beneficiary",
            });
        }

        self.ledger.transfer(beneficiary, txn.value)?;
        self.store.commit(id, txn.status, true, Utc::now())?;

        tracing::info!(id = %id, beneficiary = %beneficiary, value = txn.value, "claim arbitrated");
        self.bus.publish(Notification::ClaimHandled {
            id,
            beneficiary: beneficiary.clone(),
            value: txn.value,
        });
        self.bus.publish(Notification::Completed { id });
        Ok(())
    }

    // Read API

    /// Read-only transaction lookup
    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.store.get(id)
    }

    /// Number of transactions ever created
    pub fn transaction_count(&self) -> u64 {
        self.store.count()
    }

    /// List ids matching `filter`, windowed to `[from, to)` of the filtered,
    /// id-ordered sequence (clamped)
    pub fn list_transactions(
        &self,
        from: usize,
        to: usize,
        filter: TransactionFilter,
    ) -> Vec<TransactionId> {
        query::list_transactions(&self.store.snapshot(), from, to, filter)
    }

    /// Has this claimant filed on this transaction?
    pub fn has_claimed(&self, id: TransactionId, claimant: &AccountId) -> bool {
        self.claims.has_claimed(id, claimant)
    }

    /// When the claimant filed, if they did
    pub fn claimed_at(
        &self,
        id: TransactionId,
        claimant: &AccountId,
    ) -> Option<chrono::DateTime<Utc>> {
        self.claims.claimed_at(id, claimant)
    }

    // Internals

    /// Mark `id` in flight for the duration of one operation
    ///
    /// A second entrant on the same id, including a ledger implementation
    /// calling back into the core mid-transfer, fails fast here before any
    /// guard or transfer runs.
    fn begin_op(&self, id: TransactionId) -> Result<OpGuard<'_>> {
        use dashmap::mapref::entry::Entry;

        match self.in_flight.entry(id) {
            Entry::Occupied(_) => Err(Error::OperationInProgress(id)),
            Entry::Vacant(entry) => {
                entry.insert(());
                Ok(OpGuard {
                    in_flight: &self.in_flight,
                    id,
                })
            }
        }
    }

    /// Shared tail of both cancel paths: refund target is always the user
    fn refund_and_cancel(&self, txn: &Transaction, by: &AccountId) -> Result<()> {
        self.ledger.transfer(&txn.user, txn.value)?;
        self.store
            .commit(txn.id, TransactionStatus::Cancel, true, Utc::now())?;

        tracing::info!(id = %txn.id, by = %by, value = txn.value, "transaction cancelled, user refunded");
        self.bus.publish(Notification::Cancelled {
            id: txn.id,
            by: by.clone(),
        });
        self.bus.publish(Notification::Completed { id: txn.id });
        Ok(())
    }
}

/// Status precondition for a transition
fn require_status(
    txn: &Transaction,
    allowed: &[TransactionStatus],
    expected: &'static str,
) -> Result<()> {
    if !allowed.contains(&txn.status) {
        return Err(Error::InvalidState {
            expected,
            actual: txn.status,
        });
    }
    Ok(())
}
