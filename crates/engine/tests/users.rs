mod common;

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use engine::EngineError;

use common::{account, engine, engine_with_cost, user};

#[tokio::test]
async fn register_trims_and_lowercases_email() {
    let engine = engine().await;

    let user = engine
        .register("  alice ", " Alice@Example.COM ", "correct horse")
        .await
        .unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(engine.user(user.id).await.unwrap(), user);
}

#[tokio::test]
async fn register_reports_every_field_error() {
    let engine = engine().await;

    let err = engine.register("a", "not-an-email", "short").await.unwrap_err();
    let EngineError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.len(), 3);
}

#[tokio::test]
async fn usernames_and_emails_are_unique_ignoring_case() {
    let engine = engine().await;
    user(&engine, "alice").await;

    let err = engine
        .register("ALICE", "other@example.com", "correct horse")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("ALICE".to_string()));

    let err = engine
        .register("bob", "ALICE@example.com", "correct horse")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice@example.com".to_string()));
}

#[tokio::test]
async fn authenticate_accepts_username_or_email() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;

    let by_name = engine.authenticate("Alice", "correct horse").await.unwrap();
    let by_email = engine
        .authenticate("alice@example.com", "correct horse")
        .await
        .unwrap();
    assert_eq!(by_name.id, alice.id);
    assert_eq!(by_email.id, alice.id);
}

#[tokio::test]
async fn authenticate_hides_which_part_was_wrong() {
    let engine = engine().await;
    user(&engine, "alice").await;

    assert_eq!(
        engine.authenticate("alice", "wrong password").await,
        Err(EngineError::InvalidCredentials)
    );
    assert_eq!(
        engine.authenticate("nobody", "correct horse").await,
        Err(EngineError::InvalidCredentials)
    );
}

#[tokio::test]
async fn change_password_requires_current_password() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;

    assert_eq!(
        engine
            .change_password(alice.id, "not it", "battery staple")
            .await,
        Err(EngineError::InvalidCredentials)
    );
    assert!(matches!(
        engine.change_password(alice.id, "correct horse", "short").await,
        Err(EngineError::Validation(_))
    ));

    engine
        .change_password(alice.id, "correct horse", "battery staple")
        .await
        .unwrap();
    assert!(engine.authenticate("alice", "battery staple").await.is_ok());
    assert_eq!(
        engine.authenticate("alice", "correct horse").await,
        Err(EngineError::InvalidCredentials)
    );
}

#[tokio::test]
async fn update_user_rejects_taken_email() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    user(&engine, "bob").await;

    assert_eq!(
        engine.update_user(alice.id, "bob@example.com").await,
        Err(EngineError::ExistingKey("bob@example.com".to_string()))
    );

    let updated = engine
        .update_user(alice.id, "alice@fintrack.test")
        .await
        .unwrap();
    assert_eq!(updated.email, "alice@fintrack.test");
}

#[tokio::test]
async fn delete_user_removes_owned_data() {
    let engine = engine().await;
    let alice = user(&engine, "alice").await;
    let main = account(&engine, &alice, "Main", 10_000).await;

    engine.delete_user(alice.id).await.unwrap();

    assert!(matches!(
        engine.user(alice.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.account(alice.id, main.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    // The username is free again.
    user(&engine, "alice").await;
}

#[tokio::test(flavor = "current_thread")]
async fn password_hashing_does_not_stall_the_runtime() {
    let (engine, _db) = engine_with_cost(10).await;
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(2)).await;
                ticks.fetch_add(1, Ordering::Relaxed);
            }
        })
    };

    let alice = engine
        .register("alice", "alice@example.com", "correct horse")
        .await
        .unwrap();
    engine.authenticate("alice", "correct horse").await.unwrap();
    ticker.abort();

    assert_eq!(alice.username, "alice");
    assert!(
        ticks.load(Ordering::Relaxed) >= 20,
        "runtime only ticked {} times",
        ticks.load(Ordering::Relaxed)
    );
}
