use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{Debug, Display};
use uuid::Uuid;

pub const ENV_VAR_ERROR: i32 = 1;
pub const STORAGE_ERROR: i32 = 2;
pub const CONFIG_ERROR: i32 = 3;
pub const UNEXPECTED_ERROR: i32 = 5;
pub const VALIDATION_ERROR: i32 = 100;
pub const NOT_FOUND_ERROR: i32 = 101;
pub const CONFLICT_ERROR: i32 = 102;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self.code {
            VALIDATION_ERROR => StatusCode::BAD_REQUEST,
            NOT_FOUND_ERROR => StatusCode::NOT_FOUND,
            CONFLICT_ERROR => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        self.code == VALIDATION_ERROR
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == NOT_FOUND_ERROR
    }

    pub fn is_conflict_error(&self) -> bool {
        self.code == CONFLICT_ERROR
    }

    pub fn is_storage_error(&self) -> bool {
        self.code == STORAGE_ERROR
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        storage_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code, "{}", self.message);
        }

        let body = Json(json!({
            "success": false,
            "code": self.code,
            "message": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(field: &str) -> Error {
    Error {
        code: VALIDATION_ERROR,
        message: format!("missing or invalid parameter: {}", field),
    }
}

pub fn invalid_request_error<T: Display>(rejection: T) -> Error {
    Error {
        code: VALIDATION_ERROR,
        message: format!("invalid request: {}", rejection),
    }
}

pub fn not_found_error(entity: &str, id: &Uuid) -> Error {
    Error {
        code: NOT_FOUND_ERROR,
        message: format!("{} not found: {}", entity, id),
    }
}

pub fn conflict_error(booking_id: &Uuid) -> Error {
    Error {
        code: CONFLICT_ERROR,
        message: format!("booking overlaps with booking {}", booking_id),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: ENV_VAR_ERROR,
        message: format!("environment variable error: {}", err),
    }
}

pub fn storage_error<T: Display>(err: T) -> Error {
    Error {
        code: STORAGE_ERROR,
        message: format!("storage error: {}", err),
    }
}

pub fn config_error(variable: &str) -> Error {
    Error {
        code: CONFIG_ERROR,
        message: format!("invalid configuration: {}", variable),
    }
}

pub fn unexpected_error<T: Debug>(err: T) -> Error {
    Error {
        code: UNEXPECTED_ERROR,
        message: format!("unexpected error: {:?}", err),
    }
}

#[test]
fn error_status_mapping() {
    let id = Uuid::new_v4();

    assert_eq!(validation_error("startTime").status(), StatusCode::BAD_REQUEST);
    assert_eq!(not_found_error("vehicle", &id).status(), StatusCode::NOT_FOUND);
    assert_eq!(conflict_error(&id).status(), StatusCode::CONFLICT);
    assert_eq!(
        storage_error("connection reset").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        config_error("BIND_ADDR").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn validation_error_names_field() {
    let err = validation_error("fromPincode");

    assert!(err.is_validation_error());
    assert!(err.message.contains("fromPincode"));
}

#[test]
fn storage_error_keeps_cause() {
    let err = storage_error("pool timed out");

    assert!(err.is_storage_error());
    assert_eq!(err.message, "storage error: pool timed out");
}
