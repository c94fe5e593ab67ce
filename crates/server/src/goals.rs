//! Savings goals API endpoints.

use api_types::{
    Deleted,
    goal::{Contribution, GoalNew, GoalUpdate, GoalView},
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
) -> Result<Reply<Vec<GoalView>>, ServerError> {
    let goals = state.engine.goals(user.id).await?;
    Ok(ok(
        "goals retrieved",
        goals.into_iter().map(views::goal).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<GoalNew>,
) -> Result<Reply<GoalView>, ServerError> {
    let goal = state
        .engine
        .create_goal(
            user.id,
            &payload.name,
            payload.target_minor,
            payload.deadline,
        )
        .await?;
    Ok(created("goal created", views::goal(goal)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(goal_id): ApiPath<Uuid>,
) -> Result<Reply<GoalView>, ServerError> {
    let goal = state.engine.goal(user.id, goal_id).await?;
    Ok(ok("goal retrieved", views::goal(goal)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(goal_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<GoalUpdate>,
) -> Result<Reply<GoalView>, ServerError> {
    let update = engine::GoalUpdate {
        name: payload.name,
        target_minor: payload.target_minor,
        deadline: payload.deadline,
    };
    let goal = state.engine.update_goal(user.id, goal_id, update).await?;
    Ok(ok("goal updated", views::goal(goal)))
}

pub async fn contribute(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(goal_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Contribution>,
) -> Result<Reply<GoalView>, ServerError> {
    let goal = state
        .engine
        .contribute_to_goal(user.id, goal_id, payload.amount_minor)
        .await?;
    Ok(ok("contribution recorded", views::goal(goal)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(goal_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_goal(user.id, goal_id).await?;
    Ok(ok("goal deleted", Deleted { id: goal_id }))
}
