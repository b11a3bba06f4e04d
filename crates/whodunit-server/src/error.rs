use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use whodunit_engine::{EngineError, Solution};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ServerError {
    #[display("server io error: {_0}")]
    Io(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ApiErrorBody {
    status: &'static str,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) solution: Option<Solution>,
}

#[derive(Debug)]
pub(crate) struct HttpApiError {
    pub(crate) status: StatusCode,
    pub(crate) body: ApiErrorBody,
}

impl HttpApiError {
    pub(crate) fn bad_request(
        code: &'static str,
        message: impl Into<String>,
        field: Option<&'static str>,
    ) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiErrorBody {
                status: "error",
                code,
                message: message.into(),
                field,
                solution: None,
            },
        }
    }

    pub(crate) fn missing_field(field: &'static str) -> Self {
        Self::bad_request(
            "missing_field",
            format!("missing required field '{field}'"),
            Some(field),
        )
    }
}

impl From<EngineError> for HttpApiError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::NoActiveSession | EngineError::SessionMismatch { .. } => {
                StatusCode::NOT_FOUND
            }
            EngineError::AlreadyVerified { .. }
            | EngineError::RoundOutOfOrder { .. }
            | EngineError::CaseClosed { .. } => StatusCode::CONFLICT,
            EngineError::SessionExpired { .. } => StatusCode::GONE,
            EngineError::UnknownSuspect { .. }
            | EngineError::UnknownWeapon { .. }
            | EngineError::InvalidTriesBudget { .. }
            | EngineError::InvalidConfig { .. } => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            body: ApiErrorBody {
                status: "error",
                code: err.kind(),
                message: err.to_string(),
                field: err.field(),
                solution: err.solution(),
            },
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
