use api_types::ApiResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use auth::{AuthError, AuthManager};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod accounts;
mod auth;
mod budgets;
mod categories;
mod extract;
mod goals;
mod pots;
mod recurring;
mod server;
mod transactions;
mod transfers;
mod users;
mod views;

/// Successful reply: status code plus the enveloped body.
type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T>(message: &str, data: T) -> Reply<T> {
    (StatusCode::OK, Json(ApiResponse::ok(message, data)))
}

fn created<T>(message: &str, data: T) -> Reply<T> {
    (StatusCode::CREATED, Json(ApiResponse::ok(message, data)))
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::InUse(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Password(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidPercentage(_)
        | EngineError::BudgetExceeded(_)
        | EngineError::InsufficientFunds(_)
        | EngineError::InvalidTransfer(_)
        | EngineError::CurrencyMismatch(_)
        | EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Message and field errors shown to the client. Internal failures are
/// logged and replaced by a generic message.
fn message_for_engine_error(err: EngineError) -> (String, Vec<String>) {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ("internal server error".to_string(), Vec::new())
        }
        EngineError::Password(msg) => {
            tracing::error!("password hashing error: {msg}");
            ("internal server error".to_string(), Vec::new())
        }
        EngineError::Validation(errors) => ("validation failed".to_string(), errors),
        other => (other.to_string(), Vec::new()),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, errors) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let (message, errors) = message_for_engine_error(err);
                (status, message, errors)
            }
            ServerError::Auth(err) => (err.status(), err.public_message(), Vec::new()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, Vec::new()),
        };

        (status, Json(ApiResponse::<()>::error(message, errors))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
