//! Per-kind transaction lifecycle: validation and the in-flight guard.

use shared::{
    amount,
    domain::{DonationRequest, TxKind, ValidatedDonation, ANONYMOUS_NAME},
    error::TxError,
};

/// Where an operation kind currently sits in its lifecycle. Terminal
/// outcomes are momentary: a settled or failed operation returns to `Idle`
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpPhase {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation,
}

/// Tracks the donate and withdraw machines independently and enforces at
/// most one in-flight operation per kind. The underlying account serializes
/// transactions by nonce anyway; refusing a second submission before the
/// first hash is known keeps nonce confusion out of the provider.
#[derive(Debug, Default)]
pub struct LifecycleController {
    donate: OpPhase,
    withdraw: OpPhase,
}

impl LifecycleController {
    pub fn phase(&self, kind: TxKind) -> OpPhase {
        match kind {
            TxKind::Donate => self.donate,
            TxKind::Withdraw => self.withdraw,
        }
    }

    fn slot(&mut self, kind: TxKind) -> &mut OpPhase {
        match kind {
            TxKind::Donate => &mut self.donate,
            TxKind::Withdraw => &mut self.withdraw,
        }
    }

    /// Claims the kind for a new submission. Rejected while a prior
    /// operation of the same kind is non-terminal, before the wallet is
    /// touched.
    pub fn begin(&mut self, kind: TxKind) -> Result<(), TxError> {
        let slot = self.slot(kind);
        if *slot != OpPhase::Idle {
            return Err(TxError::AlreadyInProgress(kind));
        }
        *slot = OpPhase::Submitting;
        Ok(())
    }

    /// The hash is known; the operation now only awaits inclusion.
    pub fn mark_broadcast(&mut self, kind: TxKind) {
        *self.slot(kind) = OpPhase::AwaitingConfirmation;
    }

    /// Terminal transition; success and failure both release the slot.
    pub fn finish(&mut self, kind: TxKind) {
        *self.slot(kind) = OpPhase::Idle;
    }
}

/// Pure pre-submission validation; performs no IO. Anonymous donations
/// record the fixed sentinel regardless of any entered name.
pub fn validate_donation(request: &DonationRequest) -> Result<ValidatedDonation, TxError> {
    let amount_wei = amount::parse_native(&request.amount)?;
    let display_name = if request.anonymous {
        ANONYMOUS_NAME.to_string()
    } else {
        let trimmed = request.display_name.trim();
        if trimmed.is_empty() {
            return Err(TxError::InvalidName);
        }
        trimmed.to_string()
    };
    Ok(ValidatedDonation {
        amount_wei,
        display_name,
        anonymous: request.anonymous,
    })
}
