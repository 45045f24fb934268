//! HTTP adapter mapping for error reports.
//!
//! Purpose: keep `ErrorReport` HTTP-agnostic while letting Actix handlers
//! turn failures into consistent JSON responses. Workflow failures keep
//! their status and message; lifecycle failures are redacted to a generic
//! 500. Causes are logged here and never reach the client.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::ErrorReport;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ErrorReport>;

/// Message sent to clients in place of lifecycle failures.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status repeated in the body.
    pub status: u16,
    /// Client-facing message.
    pub message: String,
}

fn status_for(report: &ErrorReport) -> StatusCode {
    if report.is_lifecycle() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::from_u16(report.effective_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn client_body(report: &ErrorReport, status: StatusCode) -> ErrorBody {
    let message = if report.is_lifecycle() {
        REDACTED_MESSAGE.to_owned()
    } else {
        report.message().to_owned()
    };
    ErrorBody {
        status: status.as_u16(),
        message,
    }
}

impl ResponseError for ErrorReport {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if self.is_lifecycle() || status.is_server_error() {
            error!(
                status = status.as_u16(),
                lifecycle = self.is_lifecycle(),
                message = %self.message(),
                cause = self.cause_chain().as_deref().unwrap_or("none"),
                "request failed"
            );
        }
        HttpResponse::build(status).json(client_body(self, status))
    }
}

impl From<actix_web::Error> for ErrorReport {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to lifecycle report");
        Self::lifecycle("Request handling failed: {}").with_param(err.to_string())
    }
}
