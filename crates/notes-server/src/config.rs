use notes_api::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Serialize;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub db_busy_timeout: Duration,
    pub max_store_conns: usize,
    pub default_page_limit: usize,
    pub max_page_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(5),
            db_busy_timeout: Duration::from_millis(5000),
            max_store_conns: 32,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
        }
    }
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.request_timeout.is_zero() || api.db_busy_timeout.is_zero() {
        return Err("timeouts must be > 0".to_string());
    }
    if api.max_store_conns == 0 {
        return Err("store connection limit must be > 0".to_string());
    }
    if api.max_page_limit == 0 || api.default_page_limit > api.max_page_limit {
        return Err("page limit contract requires 0 < default <= max".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_startup_validation() {
        validate_startup_config_contract(&ApiConfig::default()).expect("default config valid");
    }

    #[test]
    fn startup_config_validation_rejects_inverted_page_limits() {
        let api = ApiConfig {
            default_page_limit: 500,
            max_page_limit: 100,
            ..ApiConfig::default()
        };
        let err = validate_startup_config_contract(&api).expect_err("inverted limits");
        assert!(err.contains("default <= max"));
    }

    #[test]
    fn startup_config_validation_rejects_zero_timeouts() {
        let api = ApiConfig {
            request_timeout: Duration::ZERO,
            ..ApiConfig::default()
        };
        assert!(validate_startup_config_contract(&api).is_err());
    }
}
