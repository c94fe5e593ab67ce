//! Budgets API endpoints.
//!
//! Budgets are created and listed under their account; single budgets are
//! addressed directly by id.

use api_types::{
    Deleted,
    budget::{Allocation, BudgetNew, BudgetStatus, BudgetUpdate, BudgetView, StatusQuery},
};
use axum::{Extension, extract::State};
use chrono::Utc;
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
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<Vec<BudgetView>>, ServerError> {
    let budgets = state.engine.budgets(user.id, account_id).await?;
    Ok(ok(
        "budgets retrieved",
        budgets.into_iter().map(views::budget).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BudgetNew>,
) -> Result<Reply<BudgetView>, ServerError> {
    let budget = state
        .engine
        .create_budget(
            user.id,
            account_id,
            payload.category_id,
            payload.percentage_bp,
        )
        .await?;
    Ok(created("budget created", views::budget(budget)))
}

pub async fn allocation(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Reply<Allocation>, ServerError> {
    let allocation = state.engine.budget_allocation(user.id, account_id).await?;
    Ok(ok("allocation computed", views::allocation(allocation)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(budget_id): ApiPath<Uuid>,
) -> Result<Reply<BudgetView>, ServerError> {
    let budget = state.engine.budget(user.id, budget_id).await?;
    Ok(ok("budget retrieved", views::budget(budget)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(budget_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<BudgetUpdate>,
) -> Result<Reply<BudgetView>, ServerError> {
    let budget = state
        .engine
        .update_budget(user.id, budget_id, payload.percentage_bp)
        .await?;
    Ok(ok("budget updated", views::budget(budget)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(budget_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_budget(user.id, budget_id).await?;
    Ok(ok("budget deleted", Deleted { id: budget_id }))
}

pub async fn status(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(budget_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Reply<BudgetStatus>, ServerError> {
    let month = match query.month.as_deref() {
        Some(month) => engine::parse_month(month)?,
        None => Utc::now().date_naive(),
    };
    let status = state.engine.budget_status(user.id, budget_id, month).await?;
    Ok(ok("budget status computed", views::budget_status(status)))
}
