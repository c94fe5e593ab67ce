//! Transactions API endpoints.

use api_types::{
    Deleted,
    transaction::{
        TransactionNew, TransactionPage, TransactionQuery, TransactionUpdate, TransactionView,
    },
};
use axum::{Extension, extract::State};
use engine::{TransactionCmd, TransactionListFilter, User};
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
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Reply<TransactionPage>, ServerError> {
    let filter = TransactionListFilter {
        account_id: query.account_id,
        category_id: query.category_id,
        kind: query.kind.map(views::kind_from_api),
        from: query.from,
        to: query.to,
    };
    let limit = engine::page_limit(query.limit);
    let offset = query.offset.unwrap_or(0);

    let transactions = state
        .engine
        .transactions(user.id, &filter, Some(limit), offset)
        .await?;

    Ok(ok(
        "transactions retrieved",
        TransactionPage {
            transactions: transactions.into_iter().map(views::transaction).collect(),
            limit,
            offset,
        },
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<Reply<TransactionView>, ServerError> {
    let mut cmd = TransactionCmd::new(
        payload.account_id,
        views::kind_from_api(payload.kind),
        payload.amount_minor,
        payload.occurred_on,
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let tx = state.engine.create_transaction(user.id, cmd).await?;
    Ok(created("transaction created", views::transaction(tx)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(transaction_id): ApiPath<Uuid>,
) -> Result<Reply<TransactionView>, ServerError> {
    let tx = state.engine.transaction(user.id, transaction_id).await?;
    Ok(ok("transaction retrieved", views::transaction(tx)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(transaction_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TransactionUpdate>,
) -> Result<Reply<TransactionView>, ServerError> {
    if payload.amount_minor.is_none()
        && payload.category_id.is_none()
        && payload.description.is_none()
        && payload.occurred_on.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let update = engine::TransactionUpdate {
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        description: payload.description,
        occurred_on: payload.occurred_on,
    };
    let tx = state
        .engine
        .update_transaction(user.id, transaction_id, update)
        .await?;
    Ok(ok("transaction updated", views::transaction(tx)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(transaction_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state
        .engine
        .delete_transaction(user.id, transaction_id)
        .await?;
    Ok(ok("transaction deleted", Deleted { id: transaction_id }))
}
