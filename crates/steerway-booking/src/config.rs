//! Payment gateway configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Payment gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the payment processor (POST initiate / GET verify).
    pub base_url: String,

    /// Merchant store id issued by the processor.
    pub store_id: String,

    /// Merchant signature key issued by the processor.
    pub signature_key: String,

    /// Public base URL this backend is reachable at; the processor
    /// redirects the customer back to
    /// `<callback_base_url>/bookings/verify-payment?...`.
    pub callback_base_url: String,

    /// Request timeout in seconds for gateway calls.
    pub request_timeout_secs: u64,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = GatewayConfig {
            base_url: env::var("PAYMENT_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox.aamarpay.com/jsonpost.php".to_string()),

            store_id: env::var("PAYMENT_STORE_ID").unwrap_or_else(|_| "aamarpaytest".to_string()),

            signature_key: env::var("PAYMENT_SIGNATURE_KEY").unwrap_or_else(|_| {
                // Sandbox key for development
                // In production, this MUST be set via environment variable
                "dbb74894e82415a2f7ff0ec3a97e4183".to_string()
            }),

            callback_base_url: env::var("PAYMENT_CALLBACK_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api/v1".to_string()),

            request_timeout_secs: env::var("PAYMENT_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("PAYMENT_REQUEST_TIMEOUT_SECS".to_string())
                })?,
        };

        if config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired("PAYMENT_BASE_URL".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
