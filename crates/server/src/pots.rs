//! Pots API endpoints.
//!
//! Deposits move money from the owning account into the pot, withdrawals
//! move it back.

use api_types::{
    Deleted,
    pot::{PotMove, PotNew, PotUpdate, PotView},
};
use axum::{Extension, extract::State};
use engine::User;
use uuid::Uuid;

use crate::{
    Reply, ServerError, created,
    extract::{ApiJson, ApiPath},
    ok,
    server::ServerState,
    views,
};

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<Vec<PotView>>, ServerError> {
    let pots = state.engine.pots(user.id, account_id).await?;
    Ok(ok("pots retrieved", pots.into_iter().map(views::pot).collect()))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PotNew>,
) -> Result<Reply<PotView>, ServerError> {
    let pot = state
        .engine
        .create_pot(user.id, account_id, &payload.name, payload.target_minor)
        .await?;
    Ok(created("pot created", views::pot(pot)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(pot_id): ApiPath<Uuid>,
) -> Result<Reply<PotView>, ServerError> {
    let pot = state.engine.pot(user.id, pot_id).await?;
    Ok(ok("pot retrieved", views::pot(pot)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(pot_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PotUpdate>,
) -> Result<Reply<PotView>, ServerError> {
    let update = engine::PotUpdate {
        name: payload.name,
        target_minor: payload.target_minor,
    };
    let pot = state.engine.update_pot(user.id, pot_id, update).await?;
    Ok(ok("pot updated", views::pot(pot)))
}

pub async fn deposit(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(pot_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PotMove>,
) -> Result<Reply<PotView>, ServerError> {
    let pot = state
        .engine
        .deposit_to_pot(user.id, pot_id, payload.amount_minor)
        .await?;
    Ok(ok("deposit recorded", views::pot(pot)))
}

pub async fn withdraw(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(pot_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PotMove>,
) -> Result<Reply<PotView>, ServerError> {
    let pot = state
        .engine
        .withdraw_from_pot(user.id, pot_id, payload.amount_minor)
        .await?;
    Ok(ok("withdrawal recorded", views::pot(pot)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(pot_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_pot(user.id, pot_id).await?;
    Ok(ok("pot deleted", Deleted { id: pot_id }))
}
