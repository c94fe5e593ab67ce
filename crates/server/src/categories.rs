//! Categories API endpoints.

use api_types::{
    Deleted,
    category::{CategoryNew, CategoryQuery, CategoryUpdate, CategoryView},
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
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Reply<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(user.id, query.kind.map(views::category_kind_from_api))
        .await?;
    Ok(ok(
        "categories retrieved",
        categories.into_iter().map(views::category).collect(),
    ))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CategoryNew>,
) -> Result<Reply<CategoryView>, ServerError> {
    let category = state
        .engine
        .create_category(
            user.id,
            &payload.name,
            views::category_kind_from_api(payload.kind),
        )
        .await?;
    Ok(created("category created", views::category(category)))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> Result<Reply<CategoryView>, ServerError> {
    let category = state.engine.category(user.id, category_id).await?;
    Ok(ok("category retrieved", views::category(category)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(category_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CategoryUpdate>,
) -> Result<Reply<CategoryView>, ServerError> {
    let category = state
        .engine
        .rename_category(user.id, category_id, &payload.name)
        .await?;
    Ok(ok("category updated", views::category(category)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiPath(category_id): ApiPath<Uuid>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_category(user.id, category_id).await?;
    Ok(ok("category deleted", Deleted { id: category_id }))
}
