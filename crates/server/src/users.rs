//! Registration, login and the `/users/me` endpoints.

use api_types::{
    Deleted,
    auth::{Login, Register, Token},
    user::{PasswordChange, UserUpdate, UserView},
};
use axum::{Extension, extract::State};
use engine::User;

use crate::{Reply, ServerError, created, extract::ApiJson, ok, server::ServerState, views};

pub async fn register(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<Register>,
) -> Result<Reply<UserView>, ServerError> {
    let user = state
        .engine
        .register(&payload.username, &payload.email, &payload.password)
        .await?;
    tracing::info!("registered user {}", user.username);

    Ok(created("user registered", views::user(user)))
}

pub async fn login(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<Login>,
) -> Result<Reply<Token>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.login, &payload.password)
        .await?;
    let access_token = state.auth.issue_token(user.id)?;

    Ok(ok(
        "login successful",
        Token {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.auth.expires_in().as_secs(),
        },
    ))
}

pub async fn me(Extension(user): Extension<User>) -> Reply<UserView> {
    ok("user retrieved", views::user(user))
}

pub async fn update_me(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> Result<Reply<UserView>, ServerError> {
    let user = state.engine.update_user(user.id, &payload.email).await?;
    Ok(ok("user updated", views::user(user)))
}

pub async fn change_password(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<PasswordChange>,
) -> Result<Reply<()>, ServerError> {
    state
        .engine
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;
    Ok(ok("password changed", ()))
}

pub async fn delete_me(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Reply<Deleted>, ServerError> {
    state.engine.delete_user(user.id).await?;
    tracing::info!("deleted user {}", user.username);
    Ok(ok("user deleted", Deleted { id: user.id }))
}
