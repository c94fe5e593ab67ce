mod common;

use engine::{Currency, EngineError, TransactionCmd, TransactionKind, TransactionListFilter};

use common::{account, day, engine, user};

#[tokio::test]
async fn first_account_is_default() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;

    let main = account(&engine, &alice, "Main", 0).await;
    let savings = account(&engine, &alice, "Savings", 0).await;

    assert!(main.is_default);
    assert!(!savings.is_default);
    assert_eq!(main.currency, Currency::Eur);
}

#[tokio::test]
async fn opening_balance_is_recorded_as_transaction() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;

    let main = account(&engine, &alice, "Main", 12_345).await;
    let overdraft = account(&engine, &alice, "Card", -500).await;
    assert_eq!(main.balance, 12_345);
    assert_eq!(overdraft.balance, -500);

    let filter = TransactionListFilter {
        account_id: Some(main.id),
        ..Default::default()
    };
    let txs = engine
        .transactions(alice.id, &filter, None, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TransactionKind::Income);
    assert_eq!(txs[0].amount_minor, 12_345);
    assert_eq!(txs[0].description.as_deref(), Some("Opening balance"));

    let filter = TransactionListFilter {
        account_id: Some(overdraft.id),
        ..Default::default()
    };
    let txs = engine
        .transactions(alice.id, &filter, None, 0)
        .await
        .unwrap();
    assert_eq!(txs[0].kind, TransactionKind::Expense);
    assert_eq!(txs[0].amount_minor, 500);
}

#[tokio::test]
async fn account_names_are_unique_per_user() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    account(&engine, &alice, "Main", 0).await;

    let err = engine
        .create_account(alice.id, " main ", None, 0)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("main".to_string()));

    // Another user may reuse the name.
    account(&engine, &bob, "Main", 0).await;

    assert!(matches!(
        engine.create_account(alice.id, "   ", None, 0).await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn set_default_keeps_a_single_default() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let savings = account(&engine, &alice, "Savings", 0).await;

    let updated = engine
        .set_default_account(alice.id, savings.id)
        .await
        .unwrap();
    assert!(updated.is_default);

    let accounts = engine.accounts(alice.id).await.unwrap();
    let defaults: Vec<_> = accounts.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, savings.id);
    assert!(!engine.account(alice.id, main.id).await.unwrap().is_default);
}

#[tokio::test]
async fn deleting_default_promotes_oldest_remaining() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let savings = account(&engine, &alice, "Savings", 0).await;
    let card = account(&engine, &alice, "Card", 0).await;

    engine.delete_account(alice.id, main.id).await.unwrap();

    assert!(engine.account(alice.id, savings.id).await.unwrap().is_default);
    assert!(!engine.account(alice.id, card.id).await.unwrap().is_default);
    assert!(matches!(
        engine.account(alice.id, main.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn delete_account_removes_its_transactions() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 1_000).await;
    let tx = engine
        .create_transaction(alice.id, TransactionCmd::expense(main.id, 100, day(2026, 3, 1)))
        .await
        .unwrap();

    engine.delete_account(alice.id, main.id).await.unwrap();

    assert!(matches!(
        engine.transaction(alice.id, tx.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn accounts_of_other_users_are_not_found() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let main = account(&engine, &alice, "Main", 0).await;

    assert!(matches!(
        engine.account(bob.id, main.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.rename_account(bob.id, main.id, "Mine").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_account(bob.id, main.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.accounts(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn summary_covers_the_requested_range() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;

    for cmd in [
        TransactionCmd::income(main.id, 300_000, day(2026, 3, 1)),
        TransactionCmd::expense(main.id, 80_000, day(2026, 3, 5)),
        TransactionCmd::expense(main.id, 20_000, day(2026, 3, 31)),
        TransactionCmd::expense(main.id, 5_000, day(2026, 4, 1)),
    ] {
        engine.create_transaction(alice.id, cmd).await.unwrap();
    }

    let summary = engine
        .account_summary(alice.id, main.id, Some(day(2026, 3, 1)), Some(day(2026, 3, 31)))
        .await
        .unwrap();
    assert_eq!(summary.income, 300_000);
    assert_eq!(summary.expense, 100_000);
    assert_eq!(summary.net(), 200_000);
    assert_eq!(summary.transactions, 3);

    assert!(matches!(
        engine
            .account_summary(alice.id, main.id, Some(day(2026, 4, 1)), Some(day(2026, 3, 1)))
            .await,
        Err(EngineError::InvalidDate(_))
    ));
}
