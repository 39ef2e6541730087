//! Escrow Core
//!
//! Mediates a value transfer between two untrusting parties by holding a
//! fungible-asset amount in escrow until delivery is confirmed, cancelled, or
//! arbitrated by a trusted third party.
//!
//! # Architecture
//!
//! - **State machine**: five closed statuses, transitions gated by
//!   role/liveness guards
//! - **Capability boundaries**: value movement via [`Ledger`], arbiter
//!   identity via [`AccessControl`] — both injected
//! - **All-or-nothing**: checks, then external transfer, then local commit; a
//!   failing transfer leaves no observable state change
//! - **Audit record**: transactions are never deleted, claims never expire
//!
//! # Invariants
//!
//! - `completed == true` is terminal: no further mutation, no value movement
//! - Escrowed value is disbursed exactly once — to the user, the merchant, or
//!   an arbiter-designated party
//! - Identifiers are dense, zero-based, never reused
//! - At most one claim per party per transaction

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod claims;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod query;
pub mod store;
pub mod types;

// Re-exports
pub use claims::ClaimRegistry;
pub use config::Config;
pub use engine::EscrowEngine;
pub use error::{Error, LedgerError, Result};
pub use events::{Notification, NotificationBus};
pub use ledger::{AccessControl, InMemoryLedger, Ledger, SingleArbiter};
pub use query::TransactionFilter;
pub use store::TransactionStore;
pub use types::{AccountId, AssetId, Transaction, TransactionId, TransactionStatus};
