//! Transfers API endpoints.

use api_types::{
    Deleted,
    transfer::{TransferNew, TransferQuery, TransferView},
};
use axum::{Extension, extract::State};
use engine::{TransferCmd, User};
use uuid::Uuid;

use crate::{
    Reply, ServerError, created,
    extract::{ApiJson, ApiPath, ApiQuery},
    ok,
    server::ServerState,
    views,
};

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<TransferQuery>,
) -> Result<Reply<Vec<TransferView>>, ServerError> {
    let transfers = state.engine.transfers(user.id, query.account_id).await?;
    Ok(ok(
        "transfers retrieved",
        transfers.into_iter().map(views::transfer).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransferNew>,
) -> Result<Reply<TransferView>, ServerError> {
    let mut cmd = TransferCmd::new(
        payload.from_account_id,
        payload.to_account_id,
        payload.amount_minor,
        payload.occurred_on,
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let transfer = state.engine.create_transfer(user.id, cmd).await?;
    Ok(created("transfer created", views::transfer(transfer)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(transfer_id): ApiPath<Uuid>,
) -> Result<Reply<TransferView>, ServerError> {
    let transfer = state.engine.transfer(user.id, transfer_id).await?;
    Ok(ok("transfer retrieved", views::transfer(transfer)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(transfer_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_transfer(user.id, transfer_id).await?;
    Ok(ok("transfer deleted", Deleted { id: transfer_id }))
}
