use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::eyre::eyre;

use crate::services::isrc_lookup::LookupError;

/// Error returned by the JSON API as `{ "error": message }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// A third-party API failed; the report is logged, not returned
    #[error("{message}")]
    Upstream {
        message: String,
        report: color_eyre::Report,
    },
    /// Anything else; the report is logged, not returned
    #[error("{message}")]
    Internal {
        message: String,
        report: color_eyre::Report,
    },
}

impl ApiError {
    pub fn upstream(message: impl Into<String>, report: color_eyre::Report) -> Self {
        Self::Upstream {
            message: message.into(),
            report,
        }
    }

    pub fn internal(message: impl Into<String>, report: color_eyre::Report) -> Self {
        Self::Internal {
            message: message.into(),
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// A body that can't be read as the expected JSON
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::internal(
            "Failed to process request",
            eyre!("{} ({})", rejection.body_text(), rejection.status()),
        )
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::MissingInput => ApiError::BadRequest(err.to_string()),
            LookupError::NoSongs => ApiError::NotFound(err.to_string()),
        }
    }
}

// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream { message, report } | ApiError::Internal { message, report } => {
                log::error!("{message}: {report:?}");
            }
            ApiError::BadRequest(_) | ApiError::NotFound(_) => {}
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::upstream("x", eyre!("boom")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::internal("x", eyre!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_report_is_not_part_of_the_message() {
        let err = ApiError::internal("Failed to process request", eyre!("secret detail"));
        assert_eq!(err.to_string(), "Failed to process request");
    }
}
