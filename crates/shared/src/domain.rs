use std::fmt;

use alloy_primitives::{address, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Deployed fundraiser contract on Sepolia.
pub const CONTRACT_ADDRESS: Address = address!("dcecfcf99f1ae176d4c929e6a55380240340d2e1");

/// Fixed gas ceiling carried on every state-changing call.
pub const GAS_LIMIT: u64 = 900_000;

/// Display name recorded for anonymous donations, regardless of any entered
/// username.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Block-explorer base for rendering transaction links. Informational only.
pub const EXPLORER_TX_BASE: &str = "https://sepolia.etherscan.io/tx";

/// Static campaign copy shown next to the live balance.
pub const CAMPAIGN_TARGET: &str = "100 ETH";
pub const CAMPAIGN_END_DATE: &str = "31.12.2025";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    Donate,
    Withdraw,
}

impl TxKind {
    pub fn label(self) -> &'static str {
        match self {
            TxKind::Donate => "donation",
            TxKind::Withdraw => "withdrawal",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

/// One broadcast transaction, from the moment its hash is known until it is
/// confirmed or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: TxKind,
    pub hash: Option<B256>,
    pub status: TxStatus,
}

impl TransactionRecord {
    /// A freshly broadcast transaction whose inclusion is still unknown.
    pub fn broadcast(kind: TxKind, hash: B256) -> Self {
        Self {
            kind,
            hash: Some(hash),
            status: TxStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, TxStatus::Confirmed | TxStatus::Failed)
    }

    /// Public explorer link for the hash, if one is known.
    pub fn explorer_url(&self) -> Option<String> {
        self.hash.map(|hash| format!("{EXPLORER_TX_BASE}/{hash}"))
    }
}

/// Raw donation form input, exactly as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRequest {
    pub amount: String,
    pub display_name: String,
    pub anonymous: bool,
}

/// A donation that passed validation: the amount is exact wei and the display
/// name already honors the anonymous sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDonation {
    pub amount_wei: U256,
    pub display_name: String,
    pub anonymous: bool,
}
