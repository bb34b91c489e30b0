// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
}

/// Single source of truth for error-code to HTTP-status mapping. Endpoints
/// never pick statuses ad hoc.
#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::ValidationFailed => 422,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::Conflict => 409,
        ApiErrorCode::ForeignKeyViolation => 400,
        ApiErrorCode::Internal => 500,
    };
    ApiErrorMapping { status_code }
}
