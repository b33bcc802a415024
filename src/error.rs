//! Application error type and its mapping to HTTP responses.
use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::constants::*;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required input missing or not parseable. The message is shown to the client.
    #[error("{0}")]
    Validation(String),

    /// The email used to register is already taken.
    #[error("user already exists")]
    DuplicateUser,

    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The referenced user id does not exist.
    #[error("user not found")]
    UserNotFound,

    /// The request needs a session and has none.
    #[error("not logged in")]
    NotLoggedIn,

    /// The snapshot could not be read and strict reads are enabled.
    #[error("storage read failed: {0}")]
    StorageRead(#[source] StoreError),

    /// The snapshot could not be written.
    #[error("storage write failed: {0}")]
    StorageWrite(#[source] StoreError),

    /// The password hashing library failed.
    #[error("hashing failed: {0}")]
    Hashing(String),

    #[error("session error: {0}")]
    Session(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateUser | AppError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AppError::StorageRead(_)
            | AppError::StorageWrite(_)
            | AppError::Hashing(_)
            | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client. Internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(message) => message.clone(),
            AppError::DuplicateUser => ERR_USER_EXISTS.to_string(),
            AppError::InvalidCredentials => ERR_INVALID_CREDENTIALS.to_string(),
            AppError::UserNotFound => ERR_USER_NOT_FOUND.to_string(),
            AppError::NotLoggedIn => ERR_UNAUTHORIZED.to_string(),
            _ => ERR_INTERNAL.to_string(),
        }
    }
}

/// JSON body extractor whose rejections render like every other [`AppError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}
