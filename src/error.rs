use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    NotFound(&'static str),
    BadRequest(String),
}

impl AppError {
    /// Text shown to the user. Database details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::NotFound(what) => format!("{what} not found"),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Database(msg) = &self {
            tracing::error!(error = %msg, "database error");
        }

        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
