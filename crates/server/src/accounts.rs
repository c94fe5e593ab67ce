//! Accounts API endpoints.

use api_types::{
    Deleted,
    account::{AccountNew, AccountSummary, AccountUpdate, AccountView, SummaryQuery},
};
use axum::{Extension, extract::State};
use engine::User;
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
) -> Result<Reply<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts(user.id).await?;
    Ok(ok(
        "accounts retrieved",
        accounts.into_iter().map(views::account).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<AccountNew>,
) -> Result<Reply<AccountView>, ServerError> {
    let account = state
        .engine
        .create_account(
            user.id,
            &payload.name,
            payload.currency.map(views::currency_from_api),
            payload.opening_balance_minor.unwrap_or(0),
        )
        .await?;
    Ok(created("account created", views::account(account)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<AccountView>, ServerError> {
    let account = state.engine.account(user.id, account_id).await?;
    Ok(ok("account retrieved", views::account(account)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AccountUpdate>,
) -> Result<Reply<AccountView>, ServerError> {
    let account = state
        .engine
        .rename_account(user.id, account_id, &payload.name)
        .await?;
    Ok(ok("account updated", views::account(account)))
}

pub async fn make_default(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<AccountView>, ServerError> {
    let account = state
        .engine
        .set_default_account(user.id, account_id)
        .await?;
    Ok(ok("default account set", views::account(account)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_account(user.id, account_id).await?;
    Ok(ok("account deleted", Deleted { id: account_id }))
}

pub async fn summary(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<SummaryQuery>,
) -> Result<Reply<AccountSummary>, ServerError> {
    let summary = state
        .engine
        .account_summary(user.id, account_id, query.from, query.to)
        .await?;
    Ok(ok(
        "summary computed",
        views::summary(account_id, query.from, query.to, summary),
    ))
}
