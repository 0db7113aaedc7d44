//! Client core for the "Together We Rebuild" fundraiser page.
//!
//! Wires the wallet gateway, the contract binding, the balance poller, and
//! the per-kind transaction lifecycle behind one facade. The UI drives
//! [`FundraiserClient`] and observes [`ClientEvent`]s; the session record is
//! a pure projection of that event stream.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use shared::{
    domain::{DonationRequest, TransactionRecord, TxKind, TxStatus, ValidatedDonation},
    error::{ConnectError, FailureKind, TxError},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};

pub mod contract;
pub mod lifecycle;
pub mod session;
pub mod sync;
pub mod wallet;

pub use contract::ContractClient;
pub use lifecycle::{validate_donation, LifecycleController, OpPhase};
pub use session::SessionState;
pub use sync::BalanceSynchronizer;
pub use wallet::{
    InclusionStatus, MissingWalletProvider, TransactionRequest, WalletGateway, WalletProvider,
};

/// Everything the UI needs to observe, published on a broadcast channel.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Connected { account: Address },
    Disconnected,
    BalanceUpdated { wei: U256 },
    TransactionSubmitting { kind: TxKind },
    TransactionBroadcast { kind: TxKind, hash: B256 },
    TransactionSettled { record: TransactionRecord },
    TransactionFailed { kind: TxKind, failure: FailureKind },
}

/// Fan-out point for component outputs: applies each event to the session
/// projection, then broadcasts it to subscribers. Applying before sending
/// keeps snapshots consistent with what subscribers have seen.
pub(crate) struct EventBus {
    session: Mutex<SessionState>,
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBus {
    fn new() -> Arc<Self> {
        let (sender, _) = broadcast::channel(64);
        Arc::new(Self {
            session: Mutex::new(SessionState::default()),
            sender,
        })
    }

    pub(crate) async fn publish(&self, event: ClientEvent) {
        self.session.lock().await.apply(&event);
        let _ = self.sender.send(event);
    }

    async fn snapshot(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }
}

struct ConnectedContext {
    account: Address,
    contract: Arc<ContractClient>,
    sync: Arc<BalanceSynchronizer>,
}

enum Operation {
    Donate(ValidatedDonation),
    Withdraw,
}

/// Facade over the whole client. One instance per page session; everything
/// in it resets on reload.
pub struct FundraiserClient {
    gateway: WalletGateway,
    connected: Mutex<Option<ConnectedContext>>,
    lifecycle: Mutex<LifecycleController>,
    events: Arc<EventBus>,
}

impl FundraiserClient {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Arc<Self> {
        Arc::new(Self {
            gateway: WalletGateway::new(provider),
            connected: Mutex::new(None),
            lifecycle: Mutex::new(LifecycleController::default()),
            events: EventBus::new(),
        })
    }

    /// Presence check used to gate the connect control.
    pub fn wallet_available(&self) -> bool {
        self.gateway.is_available()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Current presentation snapshot.
    pub async fn session(&self) -> SessionState {
        self.events.snapshot().await
    }

    pub async fn is_connected(&self) -> bool {
        self.connected.lock().await.is_some()
    }

    /// Connects the wallet, binds the contract, starts balance polling, and
    /// issues an immediate refresh.
    pub async fn connect(&self) -> Result<Address, ConnectError> {
        let account = self.gateway.connect().await?;
        let contract = Arc::new(ContractClient::new(self.gateway.provider()));
        let sync = BalanceSynchronizer::new(Arc::clone(&contract), Arc::clone(&self.events));
        sync.start().await;
        {
            let mut connected = self.connected.lock().await;
            if let Some(previous) = connected.take() {
                // Reconnect replaces the old poll loop instead of stacking one.
                previous.sync.stop().await;
            }
            *connected = Some(ConnectedContext {
                account,
                contract,
                sync: Arc::clone(&sync),
            });
        }
        self.events.publish(ClientEvent::Connected { account }).await;
        sync.refresh_now().await;
        Ok(account)
    }

    /// Tears down the per-connection resources. In-flight confirmation
    /// awaits are left to settle on their own; broadcasts cannot be recalled.
    pub async fn disconnect(&self) {
        let previous = self.connected.lock().await.take();
        if let Some(context) = previous {
            context.sync.stop().await;
            info!(account = %context.account, "wallet disconnected");
        }
        self.events.publish(ClientEvent::Disconnected).await;
    }

    /// Out-of-band balance refresh. No-op while disconnected.
    pub async fn refresh_balance(&self) {
        if let Some(sync) = self.sync_handle().await {
            sync.refresh_now().await;
        }
    }

    /// Drives a donation end to end and resolves once it settles.
    ///
    /// Validation failures and an already-in-flight donation are returned
    /// synchronously, before any wallet interaction and without touching the
    /// event stream; the caller still owns the form at that point.
    pub async fn donate(&self, request: DonationRequest) -> Result<TransactionRecord, TxError> {
        let validated = lifecycle::validate_donation(&request)?;
        self.run_operation(TxKind::Donate, Operation::Donate(validated))
            .await
    }

    /// Drives a withdrawal end to end. The contract decides authorization;
    /// an unauthorized caller comes back as a revert failure.
    pub async fn withdraw(&self) -> Result<TransactionRecord, TxError> {
        self.run_operation(TxKind::Withdraw, Operation::Withdraw)
            .await
    }

    async fn run_operation(
        &self,
        kind: TxKind,
        operation: Operation,
    ) -> Result<TransactionRecord, TxError> {
        self.lifecycle.lock().await.begin(kind)?;
        self.events
            .publish(ClientEvent::TransactionSubmitting { kind })
            .await;

        let outcome = self.drive(kind, operation).await;

        // Whatever happened, the machine must come back to Idle.
        self.lifecycle.lock().await.finish(kind);
        match &outcome {
            Ok(record) => {
                info!(%kind, hash = ?record.hash, "operation settled");
                self.events
                    .publish(ClientEvent::TransactionSettled {
                        record: record.clone(),
                    })
                    .await;
            }
            Err(err) => {
                error!(%kind, %err, "operation failed");
                self.events
                    .publish(ClientEvent::TransactionFailed {
                        kind,
                        failure: err.failure_kind(),
                    })
                    .await;
            }
        }

        // Every terminal transition refreshes; confirmations across kinds may
        // land in any order and the last completed read wins.
        self.refresh_balance().await;
        outcome
    }

    async fn drive(
        &self,
        kind: TxKind,
        operation: Operation,
    ) -> Result<TransactionRecord, TxError> {
        let contract = self
            .contract_handle()
            .await
            .ok_or_else(|| TxError::Submission("wallet is not connected".into()))?;

        let pending = match operation {
            Operation::Donate(validated) => contract.donate(&validated).await?,
            Operation::Withdraw => contract.withdraw().await?,
        };
        self.lifecycle.lock().await.mark_broadcast(kind);
        if let Some(hash) = pending.hash {
            self.events
                .publish(ClientEvent::TransactionBroadcast { kind, hash })
                .await;
        }

        let settled = contract.await_confirmation(pending).await?;
        if settled.status == TxStatus::Failed {
            // Record the failed inclusion before surfacing the revert notice.
            self.events
                .publish(ClientEvent::TransactionSettled {
                    record: settled.clone(),
                })
                .await;
            return Err(TxError::Revert("transaction reverted on chain".into()));
        }
        Ok(settled)
    }

    async fn contract_handle(&self) -> Option<Arc<ContractClient>> {
        self.connected
            .lock()
            .await
            .as_ref()
            .map(|context| Arc::clone(&context.contract))
    }

    async fn sync_handle(&self) -> Option<Arc<BalanceSynchronizer>> {
        self.connected
            .lock()
            .await
            .as_ref()
            .map(|context| Arc::clone(&context.sync))
    }
}

#[cfg(test)]
mod tests;
