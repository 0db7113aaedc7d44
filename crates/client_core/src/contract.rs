//! Binding of the fixed fundraiser contract to a connected wallet.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use shared::{
    domain::{TransactionRecord, TxKind, TxStatus, ValidatedDonation, CONTRACT_ADDRESS, GAS_LIMIT},
    error::{ReadError, TxError},
};
use tracing::{info, warn};

use crate::wallet::{InclusionStatus, TransactionRequest, WalletProvider};

// Static interface descriptor; the contract exposes nothing else we call.
sol! {
    function donate(string name, bool anonymous) external payable;
    function withdraw() external;
}

/// One instance per successful connection, bound to the deployed contract
/// address and the signing capability behind `provider`.
pub struct ContractClient {
    provider: Arc<dyn WalletProvider>,
    address: Address,
}

impl ContractClient {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            address: CONTRACT_ADDRESS,
        }
    }

    /// Native balance held by the contract, read from the chain itself
    /// rather than contract storage. Callers keep the last good value when
    /// this fails.
    pub async fn read_balance(&self) -> Result<U256, ReadError> {
        self.provider
            .get_balance(self.address)
            .await
            .map_err(|err| ReadError(err.to_string()))
    }

    /// Broadcasts a donation carrying `amount_wei` as the transferred value.
    /// Resolves with a pending record as soon as the hash is known.
    pub async fn donate(&self, donation: &ValidatedDonation) -> Result<TransactionRecord, TxError> {
        let call = donateCall {
            name: donation.display_name.clone(),
            anonymous: donation.anonymous,
        };
        self.submit(TxKind::Donate, call.abi_encode(), donation.amount_wei)
            .await
    }

    /// Broadcasts a withdrawal, transferring no value. Authorization is
    /// enforced contract-side; an unauthorized caller surfaces as a revert
    /// after inclusion.
    pub async fn withdraw(&self) -> Result<TransactionRecord, TxError> {
        self.submit(TxKind::Withdraw, withdrawCall {}.abi_encode(), U256::ZERO)
            .await
    }

    async fn submit(
        &self,
        kind: TxKind,
        data: Vec<u8>,
        value: U256,
    ) -> Result<TransactionRecord, TxError> {
        let request = TransactionRequest {
            to: self.address,
            data: data.into(),
            value,
            gas_limit: GAS_LIMIT,
        };
        let hash = self
            .provider
            .send_transaction(request)
            .await
            .map_err(TxError::from_submission)?;
        info!(%hash, %kind, "transaction broadcast");
        Ok(TransactionRecord::broadcast(kind, hash))
    }

    /// Resolves the record to Confirmed or Failed. The wait is unbounded;
    /// abandoning the future never recalls the broadcast transaction.
    pub async fn await_confirmation(
        &self,
        record: TransactionRecord,
    ) -> Result<TransactionRecord, TxError> {
        let Some(hash) = record.hash else {
            return Err(TxError::Submission("record carries no hash".into()));
        };
        let status = self
            .provider
            .wait(hash)
            .await
            .map_err(|err| TxError::Submission(err.to_string()))?;
        let status = match status {
            InclusionStatus::Success => TxStatus::Confirmed,
            InclusionStatus::Reverted => {
                warn!(%hash, kind = %record.kind, "transaction reverted");
                TxStatus::Failed
            }
        };
        Ok(TransactionRecord { status, ..record })
    }
}
