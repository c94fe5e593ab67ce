mod common;

use engine::{
    EngineError, TransactionCmd, TransactionKind, TransactionListFilter, TransactionUpdate,
};

use common::{account, day, engine, user};

#[tokio::test]
async fn income_and_expense_move_the_balance() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;

    engine
        .create_transaction(
            alice.id,
            TransactionCmd::income(main.id, 250_000, day(2026, 5, 1)).description("Salary"),
        )
        .await
        .unwrap();
    engine
        .create_transaction(alice.id, TransactionCmd::expense(main.id, 4_550, day(2026, 5, 2)))
        .await
        .unwrap();

    assert_eq!(
        engine.account(alice.id, main.id).await.unwrap().balance,
        245_450
    );
}

#[tokio::test]
async fn expenses_may_overdraw() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 1_000).await;

    engine
        .create_transaction(alice.id, TransactionCmd::expense(main.id, 1_500, day(2026, 5, 2)))
        .await
        .unwrap();
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, -500);
}

#[tokio::test]
async fn amount_must_be_positive() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;

    for amount in [0, -10] {
        assert!(matches!(
            engine
                .create_transaction(alice.id, TransactionCmd::income(main.id, amount, day(2026, 1, 1)))
                .await,
            Err(EngineError::InvalidAmount(_))
        ));
    }
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 0);
}

#[tokio::test]
async fn category_kind_must_match() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let salary = engine
        .create_category(alice.id, "Salary", TransactionKind::Income)
        .await
        .unwrap();

    let err = engine
        .create_transaction(
            alice.id,
            TransactionCmd::expense(main.id, 100, day(2026, 1, 1)).category_id(salary.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCategory(_)));

    let tx = engine
        .create_transaction(
            alice.id,
            TransactionCmd::income(main.id, 100, day(2026, 1, 1)).category_id(salary.id),
        )
        .await
        .unwrap();
    assert_eq!(tx.category_id, Some(salary.id));
}

#[tokio::test]
async fn foreign_categories_are_rejected() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let bobs = engine
        .create_category(bob.id, "Food", TransactionKind::Expense)
        .await
        .unwrap();

    assert!(matches!(
        engine
            .create_transaction(
                alice.id,
                TransactionCmd::expense(main.id, 100, day(2026, 1, 1)).category_id(bobs.id),
            )
            .await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn update_applies_the_difference() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 10_000).await;
    let tx = engine
        .create_transaction(
            alice.id,
            TransactionCmd::expense(main.id, 2_000, day(2026, 2, 1)).description("Groceries"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            alice.id,
            tx.id,
            TransactionUpdate {
                amount_minor: Some(3_500),
                description: Some(String::new()),
                occurred_on: Some(day(2026, 2, 3)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 3_500);
    assert_eq!(updated.description, None);
    assert_eq!(updated.occurred_on, day(2026, 2, 3));
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 6_500);

    assert_eq!(engine.transaction(alice.id, tx.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_can_set_and_remove_the_category() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 10_000).await;
    let food = engine
        .create_category(alice.id, "Food", TransactionKind::Expense)
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            alice.id,
            TransactionCmd::expense(main.id, 2_000, day(2026, 2, 1)).category_id(food.id),
        )
        .await
        .unwrap();
    assert_eq!(tx.category_id, Some(food.id));

    let updated = engine
        .update_transaction(
            alice.id,
            tx.id,
            TransactionUpdate {
                category_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.amount_minor, 2_000);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 8_000);

    let updated = engine
        .update_transaction(
            alice.id,
            tx.id,
            TransactionUpdate {
                category_id: Some(Some(food.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_id, Some(food.id));
}

#[tokio::test]
async fn delete_reverts_the_balance() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 10_000).await;
    let tx = engine
        .create_transaction(alice.id, TransactionCmd::expense(main.id, 2_500, day(2026, 2, 1)))
        .await
        .unwrap();

    engine.delete_transaction(alice.id, tx.id).await.unwrap();

    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 10_000);
    assert!(matches!(
        engine.delete_transaction(alice.id, tx.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn list_filters_and_pages_newest_first() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let other = account(&engine, &bob, "Main", 0).await;

    for d in 1..=5 {
        engine
            .create_transaction(alice.id, TransactionCmd::income(main.id, 100 * i64::from(d), day(2026, 6, d)))
            .await
            .unwrap();
    }
    engine
        .create_transaction(alice.id, TransactionCmd::expense(main.id, 50, day(2026, 6, 3)))
        .await
        .unwrap();
    engine
        .create_transaction(bob.id, TransactionCmd::income(other.id, 999, day(2026, 6, 3)))
        .await
        .unwrap();

    let all = engine
        .transactions(alice.id, &TransactionListFilter::default(), None, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].occurred_on, day(2026, 6, 5));
    assert!(all.windows(2).all(|w| w[0].occurred_on >= w[1].occurred_on));

    let filter = TransactionListFilter {
        kind: Some(TransactionKind::Income),
        from: Some(day(2026, 6, 2)),
        to: Some(day(2026, 6, 4)),
        ..Default::default()
    };
    let page = engine
        .transactions(alice.id, &filter, Some(2), 0)
        .await
        .unwrap();
    assert_eq!(
        page.iter().map(|t| t.amount_minor).collect::<Vec<_>>(),
        vec![400, 300]
    );
    let next = engine
        .transactions(alice.id, &filter, Some(2), 2)
        .await
        .unwrap();
    assert_eq!(
        next.iter().map(|t| t.amount_minor).collect::<Vec<_>>(),
        vec![200]
    );

    let foreign = TransactionListFilter {
        account_id: Some(other.id),
        ..Default::default()
    };
    assert!(matches!(
        engine.transactions(alice.id, &foreign, None, 0).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
