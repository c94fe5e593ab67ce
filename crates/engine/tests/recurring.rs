mod common;

use sea_orm::{ConnectionTrait, Statement};

use engine::{
    EngineError, Frequency, RecurringCmd, RecurringUpdate, TransactionKind, TransactionListFilter,
};

use common::{account, day, engine, engine_with_db, user};

#[tokio::test]
async fn run_due_catches_up_missed_occurrences() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let rent = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Expense,
                90_000,
                Frequency::Monthly,
                day(2026, 1, 31),
            )
            .description("Rent"),
        )
        .await
        .unwrap();
    assert_eq!(rent.next_run_on, day(2026, 1, 31));

    let report = engine.run_due_recurring(day(2026, 4, 15)).await.unwrap();
    assert_eq!(report.date, day(2026, 4, 15));
    assert_eq!(report.processed, 1);
    assert_eq!(report.created, 3);
    assert_eq!(report.failed, 0);

    let filter = TransactionListFilter {
        account_id: Some(main.id),
        ..Default::default()
    };
    let dates: Vec<_> = engine
        .transactions(alice.id, &filter, None, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|t| {
            assert_eq!(t.recurring_id, Some(rent.id));
            t.occurred_on
        })
        .collect();
    assert_eq!(dates, vec![day(2026, 3, 31), day(2026, 2, 28), day(2026, 1, 31)]);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, -270_000);

    let rent = engine.recurring(alice.id, rent.id).await.unwrap();
    assert_eq!(rent.next_run_on, day(2026, 4, 30));

    // Running again the same day is a no-op.
    let report = engine.run_due_recurring(day(2026, 4, 15)).await.unwrap();
    assert_eq!((report.processed, report.created), (0, 0));
}

#[tokio::test]
async fn template_stops_after_end_date() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let pocket_money = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Income,
                500,
                Frequency::Weekly,
                day(2026, 3, 2),
            )
            .end_on(day(2026, 3, 20)),
        )
        .await
        .unwrap();

    let report = engine.run_due_recurring(day(2026, 6, 1)).await.unwrap();
    assert_eq!(report.created, 3);

    let template = engine.recurring(alice.id, pocket_money.id).await.unwrap();
    assert!(!template.active);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 1_500);
}

#[tokio::test]
async fn one_broken_template_does_not_abort_the_batch() {
    let (engine, db) = engine_with_db().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let salary = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Income,
                300_000,
                Frequency::Monthly,
                day(2026, 5, 1),
            ),
        )
        .await
        .unwrap();
    let broken = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Expense,
                100,
                Frequency::Daily,
                day(2026, 5, 1),
            ),
        )
        .await
        .unwrap();
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "UPDATE recurring SET frequency = ? WHERE id = ?",
        vec!["hourly".into(), broken.id.into()],
    ))
    .await
    .unwrap();

    let report = engine.run_due_recurring(day(2026, 5, 1)).await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.created, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 300_000);

    let salary = engine.recurring(alice.id, salary.id).await.unwrap();
    assert_eq!(salary.next_run_on, day(2026, 6, 1));
}

#[tokio::test]
async fn resume_skips_occurrences_missed_while_paused() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let gym = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Expense,
                3_000,
                Frequency::Monthly,
                day(2026, 1, 10),
            ),
        )
        .await
        .unwrap();

    let paused = engine.pause_recurring(alice.id, gym.id).await.unwrap();
    assert!(!paused.active);
    let report = engine.run_due_recurring(day(2026, 3, 1)).await.unwrap();
    assert_eq!(report.created, 0);

    let resumed = engine
        .resume_recurring(alice.id, gym.id, day(2026, 3, 15))
        .await
        .unwrap();
    assert!(resumed.active);
    assert_eq!(resumed.next_run_on, day(2026, 4, 10));

    let report = engine.run_due_recurring(day(2026, 4, 10)).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, -3_000);
}

#[tokio::test]
async fn run_for_user_only_touches_their_templates() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let bob = user(&engine, "bob").await;
    let alices = account(&engine, &alice, "Main", 0).await;
    let bobs = account(&engine, &bob, "Main", 0).await;
    for (owner, account_id) in [(&alice, alices.id), (&bob, bobs.id)] {
        engine
            .create_recurring(
                owner.id,
                RecurringCmd::new(
                    account_id,
                    TransactionKind::Income,
                    1_000,
                    Frequency::Daily,
                    day(2026, 2, 1),
                ),
            )
            .await
            .unwrap();
    }

    let report = engine
        .run_due_recurring_for_user(alice.id, day(2026, 2, 2))
        .await
        .unwrap();
    assert_eq!((report.processed, report.created), (1, 2));
    assert_eq!(engine.account(alice.id, alices.id).await.unwrap().balance, 2_000);
    assert_eq!(engine.account(bob.id, bobs.id).await.unwrap().balance, 0);
}

#[tokio::test]
async fn update_and_delete_keep_materialized_transactions() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let streaming = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Expense,
                999,
                Frequency::Monthly,
                day(2026, 1, 5),
            ),
        )
        .await
        .unwrap();
    engine.run_due_recurring(day(2026, 1, 5)).await.unwrap();

    let updated = engine
        .update_recurring(
            alice.id,
            streaming.id,
            RecurringUpdate {
                amount_minor: Some(1_299),
                description: Some("Streaming".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 1_299);
    assert_eq!(updated.description.as_deref(), Some("Streaming"));
    assert!(matches!(
        engine
            .update_recurring(
                alice.id,
                streaming.id,
                RecurringUpdate {
                    end_on: Some(Some(day(2025, 12, 31))),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::InvalidDate(_))
    ));

    engine.delete_recurring(alice.id, streaming.id).await.unwrap();
    assert!(engine.recurring_templates(alice.id, None).await.unwrap().is_empty());

    let txs = engine
        .transactions(alice.id, &TransactionListFilter::default(), None, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].recurring_id, None);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, -999);
}

#[tokio::test]
async fn update_can_remove_end_date_and_category() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let bills = engine
        .create_category(alice.id, "Bills", TransactionKind::Expense)
        .await
        .unwrap();
    let phone = engine
        .create_recurring(
            alice.id,
            RecurringCmd::new(
                main.id,
                TransactionKind::Expense,
                1_500,
                Frequency::Monthly,
                day(2026, 1, 20),
            )
            .category_id(bills.id)
            .end_on(day(2026, 6, 30)),
        )
        .await
        .unwrap();

    let updated = engine
        .update_recurring(
            alice.id,
            phone.id,
            RecurringUpdate {
                category_id: Some(None),
                end_on: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.end_on, None);
    assert!(updated.active);

    let report = engine.run_due_recurring(day(2026, 8, 20)).await.unwrap();
    assert_eq!(report.created, 8);
    let txs = engine
        .transactions(alice.id, &TransactionListFilter::default(), None, 0)
        .await
        .unwrap();
    assert!(txs.iter().all(|t| t.category_id.is_none()));
}
