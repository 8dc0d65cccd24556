//! Validation tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test timeout validation (zero, max boundary, valid values).
//! - Test base URL validation (scheme, host, parse failures).

use crate::constants::MAX_TIMEOUT_SECS;
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use std::time::Duration;

fn token_loader() -> ConfigLoader {
    ConfigLoader::new()
        .with_base_url("https://localhost:8089".to_string())
        .with_api_token("test-token".to_string())
}

#[test]
fn test_timeout_zero_invalid() {
    let result = token_loader().with_timeout(Duration::from_secs(0)).build();
    match result {
        Err(ConfigError::InvalidTimeout { message }) => {
            assert!(
                message.contains("must be greater than 0"),
                "Expected message about timeout > 0, got: {}",
                message
            );
        }
        Ok(_) => panic!("Expected InvalidTimeout error for zero timeout, got Ok"),
        Err(ref e) => panic!("Expected InvalidTimeout error, got {:?}", e),
    }
}

#[test]
fn test_timeout_exceeds_max_invalid() {
    let result = token_loader()
        .with_timeout(Duration::from_secs(MAX_TIMEOUT_SECS + 1))
        .build();
    assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));
}

#[test]
fn test_timeout_at_max_valid() {
    let config = token_loader()
        .with_timeout(Duration::from_secs(MAX_TIMEOUT_SECS))
        .build()
        .unwrap();
    assert_eq!(config.connection.timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
}

#[test]
fn test_base_url_rejects_non_http_scheme() {
    let result = ConfigLoader::new()
        .with_base_url("ftp://localhost:8089".to_string())
        .build();
    match result {
        Err(ConfigError::InvalidValue { var, message }) => {
            assert_eq!(var, "base_url");
            assert!(message.contains("scheme"));
        }
        other => panic!("Expected InvalidValue, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_base_url_rejects_relative_url() {
    let result = ConfigLoader::new()
        .with_base_url("localhost:8089/services".to_string())
        .build();
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_blank_base_url_is_missing() {
    let result = ConfigLoader::new().with_base_url("   ".to_string()).build();
    assert!(matches!(result, Err(ConfigError::MissingBaseUrl)));
}
