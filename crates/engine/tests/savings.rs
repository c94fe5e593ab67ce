mod common;

use engine::{EngineError, GoalUpdate, PotUpdate};

use common::{account, day, engine, user};

#[tokio::test]
async fn goal_progress_is_capped_and_tracks_completion() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 5_000).await;
    let goal = engine
        .create_goal(alice.id, "Bike", 80_000, Some(day(2026, 12, 1)))
        .await
        .unwrap();
    assert_eq!(goal.progress_bp(), 0);

    let goal = engine
        .contribute_to_goal(alice.id, goal.id, 20_000)
        .await
        .unwrap();
    assert_eq!(goal.progress_bp(), 2_500);
    assert!(!goal.completed());

    let goal = engine
        .contribute_to_goal(alice.id, goal.id, 70_000)
        .await
        .unwrap();
    assert_eq!(goal.current_minor, 90_000);
    assert_eq!(goal.progress_bp(), 10_000);
    assert!(goal.completed());

    // Goals are tracking only.
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 5_000);
}

#[tokio::test]
async fn goal_withdrawal_cannot_go_below_zero() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let goal = engine
        .create_goal(alice.id, "Trip", 10_000, None)
        .await
        .unwrap();
    engine
        .contribute_to_goal(alice.id, goal.id, 3_000)
        .await
        .unwrap();

    assert!(matches!(
        engine.contribute_to_goal(alice.id, goal.id, -3_001).await,
        Err(EngineError::InsufficientFunds(_))
    ));
    let goal = engine
        .contribute_to_goal(alice.id, goal.id, -3_000)
        .await
        .unwrap();
    assert_eq!(goal.current_minor, 0);
    assert!(matches!(
        engine.create_goal(alice.id, "Nothing", 0, None).await,
        Err(EngineError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn goals_are_listed_by_deadline() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    engine
        .create_goal(alice.id, "Someday", 1_000, None)
        .await
        .unwrap();
    engine
        .create_goal(alice.id, "Late", 1_000, Some(day(2027, 1, 1)))
        .await
        .unwrap();
    let soon = engine
        .create_goal(alice.id, "Soon", 1_000, Some(day(2026, 11, 1)))
        .await
        .unwrap();

    let names: Vec<_> = engine
        .goals(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Soon", "Late", "Someday"]);

    let updated = engine
        .update_goal(
            alice.id,
            soon.id,
            GoalUpdate {
                name: Some("Sooner".to_string()),
                target_minor: Some(2_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Sooner");
    assert_eq!(updated.target_minor, 2_000);
    assert_eq!(updated.deadline, Some(day(2026, 11, 1)));

    engine.delete_goal(alice.id, soon.id).await.unwrap();
    assert_eq!(engine.goals(alice.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn pot_moves_money_in_and_out_of_account() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 10_000).await;
    let pot = engine
        .create_pot(alice.id, main.id, "Holidays", Some(8_000))
        .await
        .unwrap();

    let pot = engine.deposit_to_pot(alice.id, pot.id, 6_000).await.unwrap();
    assert_eq!(pot.current_minor, 6_000);
    assert_eq!(pot.progress_bp(), Some(7_500));
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 4_000);

    assert!(matches!(
        engine.deposit_to_pot(alice.id, pot.id, 4_001).await,
        Err(EngineError::InsufficientFunds(_))
    ));
    assert!(matches!(
        engine.withdraw_from_pot(alice.id, pot.id, 6_001).await,
        Err(EngineError::InsufficientFunds(_))
    ));

    let pot = engine
        .withdraw_from_pot(alice.id, pot.id, 1_000)
        .await
        .unwrap();
    assert_eq!(pot.current_minor, 5_000);
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 5_000);

    engine.delete_pot(alice.id, pot.id).await.unwrap();
    assert_eq!(engine.account(alice.id, main.id).await.unwrap().balance, 10_000);
    assert!(engine.pots(alice.id, main.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn pot_names_are_unique_per_account() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;
    let savings = account(&engine, &alice, "Savings", 0).await;
    let pot = engine
        .create_pot(alice.id, main.id, "Rainy day", None)
        .await
        .unwrap();
    assert_eq!(pot.progress_bp(), None);

    assert_eq!(
        engine
            .create_pot(alice.id, main.id, "RAINY DAY", None)
            .await,
        Err(EngineError::ExistingKey("RAINY DAY".to_string()))
    );
    engine
        .create_pot(alice.id, savings.id, "Rainy day", None)
        .await
        .unwrap();

    let updated = engine
        .update_pot(
            alice.id,
            pot.id,
            PotUpdate {
                name: Some("Emergency".to_string()),
                target_minor: Some(Some(50_000)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Emergency");
    assert_eq!(updated.target_minor, Some(50_000));
}

#[tokio::test]
async fn optional_targets_and_deadlines_can_be_cleared() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 0).await;

    let goal = engine
        .create_goal(alice.id, "Car", 500_000, Some(day(2027, 6, 1)))
        .await
        .unwrap();
    let goal = engine
        .update_goal(
            alice.id,
            goal.id,
            GoalUpdate {
                deadline: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(goal.deadline, None);
    assert_eq!(goal.target_minor, 500_000);

    let pot = engine
        .create_pot(alice.id, main.id, "Gifts", Some(20_000))
        .await
        .unwrap();
    let untouched = engine
        .update_pot(alice.id, pot.id, PotUpdate::default())
        .await
        .unwrap();
    assert_eq!(untouched.target_minor, Some(20_000));

    let pot = engine
        .update_pot(
            alice.id,
            pot.id,
            PotUpdate {
                target_minor: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pot.target_minor, None);
    assert_eq!(pot.progress_bp(), None);
    assert_eq!(pot.name, "Gifts");
}
