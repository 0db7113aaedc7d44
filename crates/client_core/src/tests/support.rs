//! Scripted wallet provider double shared by the client tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use shared::error::ProviderError;
use tokio::sync::{Mutex, Notify};

use crate::wallet::{InclusionStatus, TransactionRequest, WalletProvider};

pub const TEST_ACCOUNT: Address = Address::new([0x11; 20]);

/// Installs the test log subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn eth(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u8).pow(U256::from(18u8))
}

pub struct ScriptedProvider {
    available: bool,
    accounts_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    wait_error: Option<ProviderError>,
    wait_status: InclusionStatus,
    /// When set, `wait` parks until a permit arrives via `notify_one`.
    wait_gate: Option<Arc<Notify>>,
    /// When set, `get_balance` parks until a permit arrives.
    balance_gate: Option<Arc<Notify>>,
    balance_script: Mutex<VecDeque<Result<U256, ProviderError>>>,
    balance_fallback: U256,
    balance_reads: AtomicUsize,
    pub sent: Mutex<Vec<TransactionRequest>>,
    hash_counter: AtomicUsize,
}

impl ScriptedProvider {
    /// Happy-path provider: available, every prompt accepted, transactions
    /// confirm, balance reads succeed.
    pub fn connected() -> Self {
        Self {
            available: true,
            accounts_error: None,
            send_error: None,
            wait_error: None,
            wait_status: InclusionStatus::Success,
            wait_gate: None,
            balance_gate: None,
            balance_script: Mutex::new(VecDeque::new()),
            balance_fallback: eth(12),
            balance_reads: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            hash_counter: AtomicUsize::new(0),
        }
    }

    pub fn with_accounts_error(mut self, err: ProviderError) -> Self {
        self.accounts_error = Some(err);
        self
    }

    pub fn with_send_error(mut self, err: ProviderError) -> Self {
        self.send_error = Some(err);
        self
    }

    pub fn with_wait_error(mut self, err: ProviderError) -> Self {
        self.wait_error = Some(err);
        self
    }

    pub fn with_wait_status(mut self, status: InclusionStatus) -> Self {
        self.wait_status = status;
        self
    }

    pub fn with_wait_gate(mut self, gate: Arc<Notify>) -> Self {
        self.wait_gate = Some(gate);
        self
    }

    pub fn with_balance_gate(mut self, gate: Arc<Notify>) -> Self {
        self.balance_gate = Some(gate);
        self
    }

    /// Scripts the next balance reads; once exhausted, the fallback repeats.
    pub fn with_balance_script(self, script: Vec<Result<U256, ProviderError>>) -> Self {
        Self {
            balance_script: Mutex::new(script.into()),
            ..self
        }
    }

    pub fn reads(&self) -> usize {
        self.balance_reads.load(Ordering::SeqCst)
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        match &self.accounts_error {
            Some(err) => Err(err.clone()),
            None => Ok(vec![TEST_ACCOUNT]),
        }
    }

    async fn get_address(&self) -> Result<Address, ProviderError> {
        Ok(TEST_ACCOUNT)
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, ProviderError> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.balance_gate {
            gate.notified().await;
        }
        match self.balance_script.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(self.balance_fallback),
        }
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, ProviderError> {
        self.sent.lock().await.push(request);
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        let n = self.hash_counter.fetch_add(1, Ordering::SeqCst);
        Ok(B256::repeat_byte(n as u8 + 1))
    }

    async fn wait(&self, _hash: B256) -> Result<InclusionStatus, ProviderError> {
        if let Some(gate) = &self.wait_gate {
            gate.notified().await;
        }
        if let Some(err) = &self.wait_error {
            return Err(err.clone());
        }
        Ok(self.wait_status)
    }
}
