//! Recurring templates API endpoints.

use api_types::{
    Deleted,
    recurring::{
        RecurringNew, RecurringQuery, RecurringUpdate, RecurringView, RunReport, RunRequest,
    },
};
use axum::{Extension, extract::State};
use chrono::Utc;
use engine::{EngineError, RecurringCmd, User};
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
    ApiQuery(query): ApiQuery<RecurringQuery>,
) -> Result<Reply<Vec<RecurringView>>, ServerError> {
    let templates = state
        .engine
        .recurring_templates(user.id, query.account_id)
        .await?;
    Ok(ok(
        "recurring transactions retrieved",
        templates.into_iter().map(views::recurring).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<RecurringNew>,
) -> Result<Reply<RecurringView>, ServerError> {
    let mut cmd = RecurringCmd::new(
        payload.account_id,
        views::kind_from_api(payload.kind),
        payload.amount_minor,
        views::frequency_from_api(payload.frequency),
        payload.start_on,
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(end_on) = payload.end_on {
        cmd = cmd.end_on(end_on);
    }

    let template = state.engine.create_recurring(user.id, cmd).await?;
    Ok(created(
        "recurring transaction created",
        views::recurring(template),
    ))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(recurring_id): ApiPath<Uuid>,
) -> Result<Reply<RecurringView>, ServerError> {
    let template = state.engine.recurring(user.id, recurring_id).await?;
    Ok(ok(
        "recurring transaction retrieved",
        views::recurring(template),
    ))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(recurring_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RecurringUpdate>,
) -> Result<Reply<RecurringView>, ServerError> {
    let update = engine::RecurringUpdate {
        amount_minor: payload.amount_minor,
        category_id: payload.category_id,
        description: payload.description,
        end_on: payload.end_on,
    };
    let template = state
        .engine
        .update_recurring(user.id, recurring_id, update)
        .await?;
    Ok(ok("recurring transaction updated", views::recurring(template)))
}

pub async fn pause(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(recurring_id): ApiPath<Uuid>,
) -> Result<Reply<RecurringView>, ServerError> {
    let template = state.engine.pause_recurring(user.id, recurring_id).await?;
    Ok(ok("recurring transaction paused", views::recurring(template)))
}

pub async fn resume(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(recurring_id): ApiPath<Uuid>,
) -> Result<Reply<RecurringView>, ServerError> {
    let template = state
        .engine
        .resume_recurring(user.id, recurring_id, Utc::now().date_naive())
        .await?;
    Ok(ok("recurring transaction resumed", views::recurring(template)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(recurring_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_recurring(user.id, recurring_id).await?;
    Ok(ok("recurring transaction deleted", Deleted { id: recurring_id }))
}

/// Runs the caller's due templates, up to `date` or today.
///
/// `date` may replay a past day but never run ahead of today.
pub async fn run(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<RunRequest>,
) -> Result<Reply<RunReport>, ServerError> {
    let today = Utc::now().date_naive();
    let date = query.date.unwrap_or(today);
    if date > today {
        return Err(EngineError::InvalidDate(format!(
            "cannot run recurring transactions for {date}, which is after today"
        ))
        .into());
    }
    let report = state
        .engine
        .run_due_recurring_for_user(user.id, date)
        .await?;
    Ok(ok("recurring transactions processed", views::run_report(report)))
}
