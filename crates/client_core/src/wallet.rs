//! The injected wallet provider capability and the connection gateway.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use shared::error::{ConnectError, ProviderError};
use tracing::info;

/// A state-changing call, ready for signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: u64,
}

/// Inclusion outcome reported by the provider once a transaction is mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclusionStatus {
    Success,
    Reverted,
}

/// The browser wallet extension, reduced to the capabilities the client
/// consumes. Signing happens inside the provider and may itself suspend on
/// user interaction.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Synchronous presence check; gates the UI before any connection attempt.
    fn is_available(&self) -> bool;

    /// Prompts the user for account access.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Address of the active signer.
    async fn get_address(&self) -> Result<Address, ProviderError>;

    /// Chain-level native balance of `address`, in wei.
    async fn get_balance(&self, address: Address) -> Result<U256, ProviderError>;

    /// Signs and broadcasts; resolves with the hash as soon as the network
    /// accepted the transaction, before confirmation.
    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256, ProviderError>;

    /// Resolves once the transaction's inclusion status is known. May take
    /// unbounded time; callers are free to abandon the future.
    async fn wait(&self, hash: B256) -> Result<InclusionStatus, ProviderError>;
}

/// Fallback provider for hosts without a wallet extension installed.
pub struct MissingWalletProvider;

#[async_trait]
impl WalletProvider for MissingWalletProvider {
    fn is_available(&self) -> bool {
        false
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn get_address(&self) -> Result<Address, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn send_transaction(&self, _request: TransactionRequest) -> Result<B256, ProviderError> {
        Err(ProviderError::Unavailable)
    }

    async fn wait(&self, _hash: B256) -> Result<InclusionStatus, ProviderError> {
        Err(ProviderError::Unavailable)
    }
}

/// Establishes the wallet connection that `ContractClient` is built on. The
/// provider handle doubles as the signing capability for subsequent calls.
pub struct WalletGateway {
    provider: Arc<dyn WalletProvider>,
}

impl WalletGateway {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Requests the user's permission and resolves the active account.
    pub async fn connect(&self) -> Result<Address, ConnectError> {
        if !self.provider.is_available() {
            return Err(ConnectError::ProviderUnavailable);
        }
        self.provider.request_accounts().await?;
        let account = self.provider.get_address().await?;
        info!(%account, "wallet connected");
        Ok(account)
    }

    pub fn provider(&self) -> Arc<dyn WalletProvider> {
        Arc::clone(&self.provider)
    }
}
