// SPDX-License-Identifier: Apache-2.0

use crate::ids::ParseError;

pub const NAME_MAX_LEN: usize = 256;
pub const TITLE_MAX_LEN: usize = 256;
pub const DESCRIPTION_MAX_LEN: usize = 4096;
pub const STATUS_MAX_LEN: usize = 64;
pub const PRIORITY_MAX_LEN: usize = 64;
pub const VERSION_MAX_LEN: usize = 128;
pub const LICENSE_MAX_LEN: usize = 128;

/// Required text field: non-empty, no surrounding whitespace, bounded length.
pub fn parse_required_text(
    field: &'static str,
    raw: &str,
    max_len: usize,
) -> Result<String, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::Empty(field));
    }
    if raw.trim() != raw {
        return Err(ParseError::Trimmed(field));
    }
    if raw.len() > max_len {
        return Err(ParseError::TooLong(field, max_len));
    }
    Ok(raw.to_string())
}

/// Optional text field: absent is fine, present values obey the length bound.
/// Empty strings are accepted (the original records routinely carry them).
pub fn parse_optional_text(
    field: &'static str,
    raw: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, ParseError> {
    match raw {
        None => Ok(None),
        Some(value) => {
            if value.len() > max_len {
                return Err(ParseError::TooLong(field, max_len));
            }
            Ok(Some(value.to_string()))
        }
    }
}
