use std::{sync::Arc, time::Duration};

use migration::{Migrator, MigratorTrait};
use server::{AuthManager, ServerState};

mod scheduler;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fintrack={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let db = connect_database(&server.database).await?;
    let mut builder = engine::Engine::builder().database(db);
    if let Some(cost) = server.bcrypt_cost {
        builder = builder.bcrypt_cost(cost);
    }
    let engine = Arc::new(builder.build().await?);
    let auth = AuthManager::new(&server.jwt_secret, Duration::from_secs(server.token_ttl_secs))?;

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, server.port)).await?;
    let state = ServerState {
        engine: engine.clone(),
        auth: Arc::new(auth),
    };
    tasks.spawn(async move {
        if let Err(err) = server::run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    if settings.scheduler.enabled {
        tracing::info!(
            "Scheduling recurring transactions every {}s",
            settings.scheduler.interval_secs
        );
        tasks.spawn(scheduler::run(engine, settings.scheduler));
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("Database ready");
    Ok(database)
}
