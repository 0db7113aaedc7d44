//! Periodic and on-demand synchronization of the contract balance.

use std::{sync::Arc, time::Duration};

use alloy_primitives::U256;
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::debug;

use crate::{contract::ContractClient, ClientEvent, EventBus};

/// Cadence of the background refresh loop.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Polls the contract balance and publishes the latest known value. Only the
/// most recent successful read matters: a failed read keeps the prior value
/// and the next cycle retries.
pub struct BalanceSynchronizer {
    contract: Arc<ContractClient>,
    latest: RwLock<Option<U256>>,
    // Held for the duration of one read; an overlapping refresh is skipped
    // rather than queued.
    refresh_gate: Mutex<()>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    events: Arc<EventBus>,
}

impl BalanceSynchronizer {
    pub(crate) fn new(contract: Arc<ContractClient>, events: Arc<EventBus>) -> Arc<Self> {
        Arc::new(Self {
            contract,
            latest: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            poll_task: Mutex::new(None),
            events,
        })
    }

    /// Last successfully fetched balance, in wei.
    pub async fn latest(&self) -> Option<U256> {
        *self.latest.read().await
    }

    /// Starts the fixed-interval poll loop. Re-entrant: a second start while
    /// the loop is running is a no-op, never a duplicate timer.
    pub async fn start(self: &Arc<Self>) {
        let mut task = self.poll_task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        // The task only holds a weak handle, so dropping the synchronizer
        // still aborts the loop.
        let weak = Arc::downgrade(self);
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The interval's first tick completes immediately; the connect
            // path already issues an explicit refresh.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(sync) = weak.upgrade() else { break };
                sync.refresh_now().await;
            }
        }));
    }

    /// Stops the poll loop. Must accompany teardown of the owning client.
    pub async fn stop(&self) {
        if let Some(handle) = self.poll_task.lock().await.take() {
            handle.abort();
        }
    }

    /// Immediate out-of-band refresh. If a refresh is already in flight this
    /// returns without issuing a second read; the in-flight result wins.
    pub async fn refresh_now(&self) {
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            return;
        };
        match self.contract.read_balance().await {
            Ok(wei) => {
                *self.latest.write().await = Some(wei);
                self.events.publish(ClientEvent::BalanceUpdated { wei }).await;
            }
            Err(err) => debug!(%err, "balance read failed; keeping last known value"),
        }
    }
}

impl Drop for BalanceSynchronizer {
    fn drop(&mut self) {
        if let Some(handle) = self.poll_task.get_mut().take() {
            handle.abort();
        }
    }
}
