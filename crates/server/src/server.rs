use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{
    AuthManager, accounts, auth, budgets, categories, goals, pots, recurring, transactions,
    transfers, users,
};
use api_types::ApiResponse;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthManager>,
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("route not found", Vec::new())),
    )
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::<()>::error("method not allowed", Vec::new())),
    )
}

/// Every endpoint except registration and login requires a bearer token.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/users/me",
            get(users::me)
                .patch(users::update_me)
                .delete(users::delete_me),
        )
        .route("/users/me/password", axum::routing::put(users::change_password))
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            get(accounts::get)
                .patch(accounts::update)
                .delete(accounts::delete),
        )
        .route("/accounts/{id}/default", post(accounts::make_default))
        .route("/accounts/{id}/summary", get(accounts::summary))
        .route(
            "/accounts/{id}/budgets",
            get(budgets::list).post(budgets::create),
        )
        .route("/accounts/{id}/budgets/allocation", get(budgets::allocation))
        .route("/accounts/{id}/pots", get(pots::list).post(pots::create))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .patch(budgets::update)
                .delete(budgets::delete),
        )
        .route("/budgets/{id}/status", get(budgets::status))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/transfers",
            get(transfers::list).post(transfers::create),
        )
        .route(
            "/transfers/{id}",
            get(transfers::get).delete(transfers::delete),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route(
            "/goals/{id}",
            get(goals::get).patch(goals::update).delete(goals::delete),
        )
        .route("/goals/{id}/contributions", post(goals::contribute))
        .route(
            "/pots/{id}",
            get(pots::get).patch(pots::update).delete(pots::delete),
        )
        .route("/pots/{id}/deposit", post(pots::deposit))
        .route("/pots/{id}/withdraw", post(pots::withdraw))
        .route(
            "/recurring",
            get(recurring::list).post(recurring::create),
        )
        .route("/recurring/run", post(recurring::run))
        .route(
            "/recurring/{id}",
            get(recurring::get)
                .patch(recurring::update)
                .delete(recurring::delete),
        )
        .route("/recurring/{id}/pause", post(recurring::pause))
        .route("/recurring/{id}/resume", post(recurring::resume))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ))
        .route("/auth/register", post(users::register))
        .route("/auth/login", post(users::login))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
