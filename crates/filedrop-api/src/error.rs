//! API error types and conversions

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use filedrop_core::StoreError;

/// Body for a request that is not valid multipart
pub const MALFORMED_FORM: &str = "Could not parse form";
/// Body for a multipart request without the configured file field
pub const MISSING_FILE: &str = "Error retrieving the file";

/// Which write step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// Opening the destination file
    Create,
    /// Copying bytes into it
    Save,
}

/// API error type that converts to plain-text HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request, message is returned to the caller
    BadRequest(&'static str),
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Upload directory missing and not creatable
    DirectoryUnavailable(String),
    /// 500 Destination file could not be created or written
    WriteFailed { stage: WriteStage, detail: String },
}

impl ApiError {
    pub fn malformed_form() -> Self {
        ApiError::BadRequest(MALFORMED_FORM)
    }

    pub fn missing_file() -> Self {
        ApiError::BadRequest(MISSING_FILE)
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::DirectoryUnavailable(_) | ApiError::WriteFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text sent to the caller. Internal details are logged, never returned.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(msg) => *msg,
            ApiError::MethodNotAllowed => "Invalid request method",
            ApiError::DirectoryUnavailable(_) => "Unable to create upload directory",
            ApiError::WriteFailed {
                stage: WriteStage::Create,
                ..
            } => "Unable to create file",
            ApiError::WriteFailed {
                stage: WriteStage::Save,
                ..
            } => "Unable to save file",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        // Log errors at appropriate levels
        match &self {
            ApiError::DirectoryUnavailable(detail) | ApiError::WriteFailed { detail, .. } => {
                tracing::error!(%status, %detail, "{}", message);
            }
            _ => tracing::debug!(%status, "{}", message),
        }

        let body = format!("{}\n", message);

        if matches!(self, ApiError::MethodNotAllowed) {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let detail = err.to_string();
        match err {
            StoreError::CreateDir { .. } => ApiError::DirectoryUnavailable(detail),
            StoreError::CreateFile { .. } | StoreError::UnknownNamingScheme(_) => {
                ApiError::WriteFailed {
                    stage: WriteStage::Create,
                    detail,
                }
            }
            StoreError::Write { .. } => ApiError::WriteFailed {
                stage: WriteStage::Save,
                detail,
            },
        }
    }
}
