use byfort::application::engine::{SendRequest, WalletEngine};
use byfort::domain::ports::UserStore;
use byfort::domain::user::{Balance, User};
use byfort::infrastructure::in_memory::{
    InMemoryNotificationStore, InMemoryTransactionStore, InMemoryUserStore,
};
use std::sync::Arc;

async fn engine_with_two_wallets(balance: i64) -> (Arc<WalletEngine>, User, User) {
    let users = InMemoryUserStore::new();
    let transactions = InMemoryTransactionStore::new();
    let notifications = InMemoryNotificationStore::new();

    let mut alice = User::new("08111111111", "123456", "Alice");
    alice.balance = Balance::new(balance);
    let mut bob = User::new("08222222222", "123456", "Bob");
    bob.balance = Balance::new(balance);
    users.store(alice.clone()).await.unwrap();
    users.store(bob.clone()).await.unwrap();

    let engine = Arc::new(WalletEngine::new(
        Box::new(users),
        Box::new(transactions),
        Box::new(notifications.clone()),
        Box::new(notifications),
    ));
    (engine, alice, bob)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposing_transfers_serialize() {
    const ROUNDS: usize = 25;
    const AMOUNT: i64 = 10_000;
    const FEE: i64 = 1_200;

    let (engine, alice, bob) = engine_with_two_wallets(1_000_000).await;

    let forward = {
        let engine = Arc::clone(&engine);
        let sender = alice.id;
        tokio::spawn(async move {
            for _ in 0..ROUNDS {
                engine
                    .send(SendRequest {
                        user_id: sender,
                        recipient_phone: "08222222222".to_string(),
                        original_amount: AMOUNT,
                        notes: None,
                    })
                    .await
                    .unwrap();
            }
        })
    };
    let backward = {
        let engine = Arc::clone(&engine);
        let sender = bob.id;
        tokio::spawn(async move {
            for _ in 0..ROUNDS {
                engine
                    .send(SendRequest {
                        user_id: sender,
                        recipient_phone: "08111111111".to_string(),
                        original_amount: AMOUNT,
                        notes: None,
                    })
                    .await
                    .unwrap();
            }
        })
    };

    forward.await.unwrap();
    backward.await.unwrap();

    // Every transfer nets out except the fee on the sender's side, so each
    // wallet ends exactly ROUNDS fees short, as in any sequential order.
    let rounds = ROUNDS as i64;
    let alice_balance = engine.balance(alice.id).await.unwrap();
    let bob_balance = engine.balance(bob.id).await.unwrap();
    assert_eq!(alice_balance, Balance::new(1_000_000 - rounds * FEE));
    assert_eq!(bob_balance, Balance::new(1_000_000 - rounds * FEE));

    // Two rows per transfer.
    let alice_rows = engine.transactions_for(alice.id).await.unwrap();
    let bob_rows = engine.transactions_for(bob.id).await.unwrap();
    assert_eq!(alice_rows.len(), 2 * ROUNDS);
    assert_eq!(bob_rows.len(), 2 * ROUNDS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_spends_never_overdraw() {
    // 30,000 covers exactly one 20,000 transfer plus its fee; of the two
    // racing spends, exactly one must win.
    let (engine, alice, bob) = engine_with_two_wallets(30_000).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = Arc::clone(&engine);
        let sender = alice.id;
        handles.push(tokio::spawn(async move {
            engine
                .send(SendRequest {
                    user_id: sender,
                    recipient_phone: "08222222222".to_string(),
                    original_amount: 20_000,
                    notes: None,
                })
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let alice_balance = engine.balance(alice.id).await.unwrap();
    let bob_balance = engine.balance(bob.id).await.unwrap();
    assert_eq!(alice_balance, Balance::new(8_800));
    assert_eq!(bob_balance, Balance::new(50_000));
    assert!(alice_balance >= Balance::ZERO);
}
