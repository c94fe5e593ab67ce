#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Account, Engine, User};
use migration::MigratorTrait;

pub async fn engine_with_cost(bcrypt_cost: u32) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .bcrypt_cost(bcrypt_cost)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_cost(4).await
}

pub async fn engine() -> Engine {
    engine_with_db().await.0
}

pub async fn user(engine: &Engine, username: &str) -> User {
    engine
        .register(username, &format!("{username}@example.com"), "correct horse")
        .await
        .unwrap()
}

pub async fn account(engine: &Engine, user: &User, name: &str, opening: i64) -> Account {
    engine
        .create_account(user.id, name, None, opening)
        .await
        .unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
