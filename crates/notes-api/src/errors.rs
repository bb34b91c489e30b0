// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    ValidationFailed,
    NotFound,
    Conflict,
    ForeignKeyViolation,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
        )
    }

    #[must_use]
    pub fn validation_failed(field: &str, reason: impl Display) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors":[{"field": field, "reason": reason.to_string()}]}),
        )
    }

    #[must_use]
    pub fn malformed_body(reason: impl Display) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "malformed request body",
            json!({"reason": reason.to_string()}),
        )
    }

    #[must_use]
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{entity} not found"),
            json!({"entity": entity, "id": id}),
        )
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Conflict, message, json!({}))
    }

    #[must_use]
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ForeignKeyViolation, message, json!({}))
    }

    /// 500 payload. Carries no internal detail; callers log the cause.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorCode::Internal, "internal error", json!({}))
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_screaming_snake() {
        let value = serde_json::to_value(ApiErrorCode::ForeignKeyViolation).expect("serialize");
        assert_eq!(value, json!("FOREIGN_KEY_VIOLATION"));
    }

    #[test]
    fn internal_error_carries_no_detail() {
        let err = ApiError::internal();
        assert_eq!(err.message, "internal error");
        assert_eq!(err.details, json!({}));
    }
}
