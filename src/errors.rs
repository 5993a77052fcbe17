use crate::table::TableError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Errors returned by the HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Connection or query failure.
    DatabaseError(sqlx::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::DatabaseError(e) => Some(e),
        }
    }
}

impl IntoResponse for AppError {
    /// Every failure is a 500 with a `{"error": ...}` body. Driver details are
    /// logged, not returned.
    fn into_response(self) -> Response {
        let error_message = match &self {
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

/// Errors raised by the report tools.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("PostgreSQL query failed: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("SQL Server query failed: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_database_error_is_500_json() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Database error");
    }

    #[test]
    fn test_report_error_messages() {
        let err = ReportError::from(TableError::NoColumns);
        assert_eq!(err.to_string(), "table must have at least one column");

        let err = ReportError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection error: refused");
    }
}
