use alloy_primitives::B256;
use shared::{
    domain::{TransactionRecord, TxKind, TxStatus},
    error::FailureKind,
};

use super::support::{eth, TEST_ACCOUNT};
use crate::{ClientEvent, SessionState};

#[test]
fn events_project_onto_the_session_record() {
    let mut session = SessionState::default();

    session.apply(&ClientEvent::Connected {
        account: TEST_ACCOUNT,
    });
    assert_eq!(session.account, Some(TEST_ACCOUNT));

    session.apply(&ClientEvent::BalanceUpdated { wei: eth(5) });
    assert_eq!(session.balance_display, "5.0000");

    session.apply(&ClientEvent::TransactionSubmitting {
        kind: TxKind::Donate,
    });
    assert!(session.donate_in_flight);
    assert!(!session.withdraw_in_flight);

    let hash = B256::repeat_byte(0xab);
    session.apply(&ClientEvent::TransactionBroadcast {
        kind: TxKind::Donate,
        hash,
    });
    let pending = session.last_transaction.clone().expect("record");
    assert_eq!(pending.status, TxStatus::Pending);
    assert_eq!(pending.hash, Some(hash));

    let settled = TransactionRecord {
        status: TxStatus::Confirmed,
        ..pending
    };
    session.apply(&ClientEvent::TransactionSettled {
        record: settled.clone(),
    });
    assert!(!session.donate_in_flight);
    assert_eq!(session.last_transaction, Some(settled));
}

#[test]
fn failure_notice_clears_the_busy_flag() {
    let mut session = SessionState::default();
    session.apply(&ClientEvent::TransactionSubmitting {
        kind: TxKind::Withdraw,
    });
    session.apply(&ClientEvent::TransactionFailed {
        kind: TxKind::Withdraw,
        failure: FailureKind::Revert,
    });
    assert!(!session.withdraw_in_flight);
    assert_eq!(session.last_failure, Some(FailureKind::Revert));

    // The next submission clears the stale notice.
    session.apply(&ClientEvent::TransactionSubmitting {
        kind: TxKind::Withdraw,
    });
    assert_eq!(session.last_failure, None);
}

#[test]
fn failure_after_broadcast_marks_the_pending_record_failed() {
    let mut session = SessionState::default();
    session.apply(&ClientEvent::TransactionSubmitting {
        kind: TxKind::Donate,
    });
    let hash = B256::repeat_byte(0x42);
    session.apply(&ClientEvent::TransactionBroadcast {
        kind: TxKind::Donate,
        hash,
    });
    session.apply(&ClientEvent::TransactionFailed {
        kind: TxKind::Donate,
        failure: FailureKind::Submission,
    });

    let record = session.last_transaction.clone().expect("record");
    assert_eq!(record.status, TxStatus::Failed);
    assert_eq!(record.hash, Some(hash));

    // A settled record of another kind is not touched by the failure.
    session.apply(&ClientEvent::TransactionFailed {
        kind: TxKind::Withdraw,
        failure: FailureKind::Revert,
    });
    assert_eq!(session.last_transaction, Some(record));
}

#[test]
fn disconnect_clears_the_account_but_not_the_balance() {
    let mut session = SessionState::default();
    session.apply(&ClientEvent::Connected {
        account: TEST_ACCOUNT,
    });
    session.apply(&ClientEvent::BalanceUpdated { wei: eth(3) });
    session.apply(&ClientEvent::TransactionSubmitting {
        kind: TxKind::Donate,
    });

    session.apply(&ClientEvent::Disconnected);
    assert_eq!(session.account, None);
    assert!(!session.donate_in_flight);
    assert_eq!(session.balance_display, "3.0000");
}

#[test]
fn session_state_round_trips_through_serde() {
    let mut session = SessionState::default();
    session.apply(&ClientEvent::Connected {
        account: TEST_ACCOUNT,
    });
    session.apply(&ClientEvent::BalanceUpdated { wei: eth(1) });
    session.donation_amount = "0.5".to_string();
    session.display_name = "alice".to_string();

    let json = serde_json::to_string(&session).expect("serialize");
    let restored: SessionState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, session);
}
