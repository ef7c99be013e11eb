//! Error types for the REST layer
//!
//! Variants fall into four groups: not-found, not-implemented,
//! authorization-denied and downstream faults. Only the first three carry a
//! message meant for the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A parent entity named in a relation request does not exist.
    #[error("{model} with id {id} not found")]
    ResourceNotFound { model: String, id: String },

    /// The repository intentionally does not support this method.
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    /// The permission gate rejected the caller.
    #[error("Access is denied")]
    AuthorizationDenied { authenticated: bool },

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored row could not be mapped onto its domain type.
    #[error("Corrupt row in {table}: {source}")]
    RowMapping {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn resource_not_found(model: &str, id: impl ToString) -> Self {
        Self::ResourceNotFound {
            model: model.to_string(),
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::AuthorizationDenied {
                authenticated: false,
            }
            | Self::InvalidSession(_) => StatusCode::UNAUTHORIZED,
            Self::AuthorizationDenied {
                authenticated: true,
            } => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_)
            | Self::Migration(_)
            | Self::Configuration(_)
            | Self::RowMapping { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures of the persistence or configuration layer.
    pub fn is_downstream_fault(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if self.is_downstream_fault() {
            tracing::error!(error = %self, "Request failed with a downstream fault");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        let body = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
