//! Example: committing across two independent stores with two-phase commit
//!
//! Moves funds between an accounts store and appends to a ledger store so
//! that either both changes land or neither does.

use atomix_common::Participant;
use atomix_coordinator::{TransactionRegistry, TwoPhaseCoordinator};
use atomix_kv::{StoreParticipant, TransactionalResourceStore, Value};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let accounts = Arc::new(TransactionalResourceStore::new());
    let ledger = Arc::new(TransactionalResourceStore::new());

    // Seed the accounts store.
    let setup = accounts.begin_local();
    accounts.write(setup, "alice", Value::from(100)).unwrap();
    accounts.write(setup, "bob", Value::from(0)).unwrap();
    accounts.commit(setup).unwrap();

    // Buffer the transfer in both stores.
    let accounts_txn = accounts.begin_local();
    accounts.write(accounts_txn, "alice", Value::from(90)).unwrap();
    accounts.write(accounts_txn, "bob", Value::from(10)).unwrap();

    let ledger_txn = ledger.begin_local();
    ledger
        .write(ledger_txn, "entry:1", Value::from("alice -> bob: 10"))
        .unwrap();

    // Drive both buffers through one 2PC round.
    let coordinator = TwoPhaseCoordinator::new(Arc::new(TransactionRegistry::new()));
    let id = coordinator.registry().begin();
    println!("started distributed transaction {}", id);

    let participants: Vec<Arc<dyn Participant>> = vec![
        Arc::new(StoreParticipant::new("accounts", accounts.clone(), accounts_txn)),
        Arc::new(StoreParticipant::new("ledger", ledger.clone(), ledger_txn)),
    ];

    let report = coordinator
        .execute_with_report(id, &participants)
        .await
        .unwrap();

    println!("committed: {}", report.committed);
    for (participant, vote) in &report.votes {
        println!("  vote from {}: {:?}", participant, vote);
    }
    for error in &report.post_decision_errors {
        println!("  post-decision failure: {}", error);
    }

    println!(
        "alice = {}, bob = {}, ledger = {}",
        accounts.get("alice").unwrap(),
        accounts.get("bob").unwrap(),
        ledger.get("entry:1").unwrap(),
    );
}
