//! Integration tests: store transactions joining a two-phase commit round

use atomix_common::{Participant, TransactionId};
use atomix_coordinator::{TransactionRegistry, TwoPhaseCoordinator};
use atomix_kv::{StoreParticipant, TransactionalResourceStore, Value};
use std::sync::Arc;

fn participant(
    name: &str,
    store: &Arc<TransactionalResourceStore>,
    tid: TransactionId,
) -> Arc<dyn Participant> {
    Arc::new(StoreParticipant::new(name, store.clone(), tid))
}

#[tokio::test]
async fn test_two_stores_commit_atomically() {
    let accounts = Arc::new(TransactionalResourceStore::new());
    let ledger = Arc::new(TransactionalResourceStore::new());

    let accounts_txn = accounts.begin_local();
    accounts.write(accounts_txn, "alice", Value::from(90)).unwrap();
    let ledger_txn = ledger.begin_local();
    ledger.write(ledger_txn, "entry:1", Value::from("alice -10")).unwrap();

    // Nothing visible before the round completes.
    assert_eq!(accounts.get("alice"), None);
    assert_eq!(ledger.get("entry:1"), None);

    let coordinator = TwoPhaseCoordinator::new(Arc::new(TransactionRegistry::new()));
    let id = coordinator.registry().begin();
    let participants = vec![
        participant("accounts", &accounts, accounts_txn),
        participant("ledger", &ledger, ledger_txn),
    ];

    assert!(coordinator.execute(id, &participants).await.unwrap());
    assert_eq!(accounts.get("alice"), Some(Value::from(90)));
    assert_eq!(ledger.get("entry:1"), Some(Value::from("alice -10")));
    assert_eq!(accounts.open_transactions(), 0);
    assert_eq!(ledger.open_transactions(), 0);
}

#[tokio::test]
async fn test_missing_store_transaction_aborts_the_round() {
    let accounts = Arc::new(TransactionalResourceStore::new());
    let ledger = Arc::new(TransactionalResourceStore::new());

    let accounts_txn = accounts.begin_local();
    accounts.write(accounts_txn, "alice", Value::from(90)).unwrap();

    // The ledger transaction is rolled back out-of-band before the round,
    // so its participant votes abort during prepare.
    let ledger_txn = ledger.begin_local();
    ledger.rollback(ledger_txn).unwrap();

    let coordinator = TwoPhaseCoordinator::new(Arc::new(TransactionRegistry::new()));
    let id = coordinator.registry().begin();
    let participants = vec![
        participant("accounts", &accounts, accounts_txn),
        participant("ledger", &ledger, ledger_txn),
    ];

    assert!(!coordinator.execute(id, &participants).await.unwrap());
    // The accounts buffer was rolled back by the coordinator; neither store
    // committed anything.
    assert_eq!(accounts.get("alice"), None);
    assert_eq!(accounts.open_transactions(), 0);
    assert_eq!(ledger.get("entry:1"), None);
}

#[tokio::test]
async fn test_participant_reports_its_transaction_id() {
    let store = Arc::new(TransactionalResourceStore::new());
    let tid = store.begin_local();
    let p = StoreParticipant::new("store", store.clone(), tid);
    assert_eq!(p.transaction_id(), tid);
    assert_eq!(p.name(), "store");
    assert!(p.prepare().await.unwrap());
}
