// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use std::collections::BTreeMap;

pub const MAX_PAGE_LIMIT: usize = 1000;
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Window over a list endpoint: rows `skip..skip+limit` in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub skip: u64,
    pub limit: usize,
}

impl Default for ListWindow {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

pub fn parse_list_window(query: &BTreeMap<String, String>) -> Result<ListWindow, ApiError> {
    parse_list_window_with_limit(query, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
}

/// Out-of-range values are rejected rather than clamped: `skip` must parse as
/// a non-negative integer, `limit` must be in `1..=max_limit`.
pub fn parse_list_window_with_limit(
    query: &BTreeMap<String, String>,
    default_limit: usize,
    max_limit: usize,
) -> Result<ListWindow, ApiError> {
    let skip = if let Some(raw) = query.get("skip") {
        raw.parse::<u64>()
            .map_err(|_| ApiError::invalid_param("skip", raw))?
    } else {
        0
    };

    let limit = if let Some(raw) = query.get("limit") {
        let value = raw
            .parse::<usize>()
            .map_err(|_| ApiError::invalid_param("limit", raw))?;
        if value == 0 || value > max_limit {
            return Err(ApiError::invalid_param("limit", raw));
        }
        value
    } else {
        default_limit
    };

    Ok(ListWindow { skip, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_params_absent() {
        let window = parse_list_window(&query(&[])).expect("valid");
        assert_eq!(window.skip, 0);
        assert_eq!(window.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn rejects_zero_and_oversized_limit() {
        assert!(parse_list_window(&query(&[("limit", "0")])).is_err());
        assert!(parse_list_window(&query(&[("limit", "1001")])).is_err());
        let window = parse_list_window(&query(&[("limit", "1000")])).expect("valid");
        assert_eq!(window.limit, 1000);
    }

    #[test]
    fn rejects_negative_and_garbage_skip() {
        assert!(parse_list_window(&query(&[("skip", "-1")])).is_err());
        assert!(parse_list_window(&query(&[("skip", "abc")])).is_err());
        let window = parse_list_window(&query(&[("skip", "7")])).expect("valid");
        assert_eq!(window.skip, 7);
    }
}
