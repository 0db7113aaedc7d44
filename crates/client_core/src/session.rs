//! Session-scoped presentation state, projected from client events.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use shared::{
    amount,
    domain::{TransactionRecord, TxKind, TxStatus},
    error::FailureKind,
};

use crate::ClientEvent;

/// Serializable snapshot of everything the page renders. Holds no truth of
/// its own: every field is a projection of component outputs, applied
/// through [`SessionState::apply`]. Dropped on reload, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub account: Option<Address>,
    /// Last known balance, rounded for display; empty until the first read.
    /// A failed read never clears it.
    pub balance_display: String,
    pub donation_amount: String,
    pub display_name: String,
    pub anonymous: bool,
    pub donate_in_flight: bool,
    pub withdraw_in_flight: bool,
    pub last_transaction: Option<TransactionRecord>,
    pub last_failure: Option<FailureKind>,
}

impl SessionState {
    pub fn apply(&mut self, event: &ClientEvent) {
        match event {
            ClientEvent::Connected { account } => {
                self.account = Some(*account);
                self.last_failure = None;
            }
            ClientEvent::Disconnected => {
                self.account = None;
                self.donate_in_flight = false;
                self.withdraw_in_flight = false;
            }
            ClientEvent::BalanceUpdated { wei } => {
                self.balance_display = amount::format_display(*wei);
            }
            ClientEvent::TransactionSubmitting { kind } => {
                *self.in_flight_mut(*kind) = true;
                self.last_failure = None;
            }
            ClientEvent::TransactionBroadcast { kind, hash } => {
                self.last_transaction = Some(TransactionRecord::broadcast(*kind, *hash));
            }
            ClientEvent::TransactionSettled { record } => {
                *self.in_flight_mut(record.kind) = false;
                self.last_transaction = Some(record.clone());
            }
            ClientEvent::TransactionFailed { kind, failure } => {
                *self.in_flight_mut(*kind) = false;
                self.last_failure = Some(*failure);
                // A failure after broadcast terminates the operation even
                // when no settled record follows (e.g. the provider dropped
                // while awaiting inclusion); the pending record must not
                // outlive its operation.
                if let Some(record) = self.last_transaction.as_mut() {
                    if record.kind == *kind && record.status == TxStatus::Pending {
                        record.status = TxStatus::Failed;
                    }
                }
            }
        }
    }

    fn in_flight_mut(&mut self, kind: TxKind) -> &mut bool {
        match kind {
            TxKind::Donate => &mut self.donate_in_flight,
            TxKind::Withdraw => &mut self.withdraw_in_flight,
        }
    }
}
