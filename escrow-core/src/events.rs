//! Notifications
//!
//! One notification per successful operation, emitted synchronously after the
//! local commit. Delivery and ordering to subscribers is not part of the
//! transactional guarantee; logging and indexing are subscriber concerns.

use crate::types::{AccountId, AssetId, TransactionId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Notification emitted by the escrow core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    /// New transaction created, value pulled into escrow
    Escrowed {
        /// Transaction ID
        id: TransactionId,
        /// Payer
        user: AccountId,
        /// Payee
        merchant: AccountId,
        /// Item being exchanged
        asset: AssetId,
        /// Escrowed amount
        value: u64,
    },
    /// Transaction cancelled, value refunded to the user
    Cancelled {
        /// Transaction ID
        id: TransactionId,
        /// Party that cancelled
        by: AccountId,
    },
    /// Merchant asserted delivery
    Delivered {
        /// Transaction ID
        id: TransactionId,
    },
    /// User confirmed delivery, value paid to the merchant
    Confirmed {
        /// Transaction ID
        id: TransactionId,
    },
    /// A party filed a dispute claim
    Claimed {
        /// Transaction ID
        id: TransactionId,
        /// Claimant
        by: AccountId,
    },
    /// Arbiter resolved the transaction in favor of `beneficiary`
    ClaimHandled {
        /// Transaction ID
        id: TransactionId,
        /// Party the value was paid to
        beneficiary: AccountId,
        /// Amount paid
        value: u64,
    },
    /// Transaction reached a terminal state
    ///
    /// Always co-emitted with whichever terminal transition produced it.
    Completed {
        /// Transaction ID
        id: TransactionId,
    },
}

/// Fan-out bus for notifications
///
/// Subscribers receive over unbounded channels; a dropped receiver is pruned
/// on the next publish.
#[derive(Debug, Default)]
pub struct NotificationBus {
    subscribers: Mutex<Vec<Sender<Notification>>>,
}

impl NotificationBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub fn subscribe(&self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Publish to all live subscribers
    pub fn publish(&self, notification: Notification) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(notification.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = NotificationBus::new();
        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();

        bus.publish(Notification::Delivered {
            id: TransactionId(1),
        });

        assert_eq!(
            rx1.try_recv().unwrap(),
            Notification::Delivered {
                id: TransactionId(1)
            }
        );
        assert_eq!(
            rx2.try_recv().unwrap(),
            Notification::Delivered {
                id: TransactionId(1)
            }
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let bus = NotificationBus::new();
        let rx = bus.subscribe();
        drop(rx);

        // Must not fail with a disconnected receiver around
        bus.publish(Notification::Completed {
            id: TransactionId(0),
        });

        let rx2 = bus.subscribe();
        bus.publish(Notification::Completed {
            id: TransactionId(1),
        });
        assert_eq!(
            rx2.try_recv().unwrap(),
            Notification::Completed {
                id: TransactionId(1)
            }
        );
    }

    #[test]
    fn test_publish_with_no_subscribers_is_noop() {
        let bus = NotificationBus::new();
        bus.publish(Notification::Confirmed {
            id: TransactionId(9),
        });
    }
}
