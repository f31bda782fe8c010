//! # Payment Gateway Client
//!
//! The seam to the external payment processor.
//!
//! The processor is an unreliable network collaborator: every call can
//! fail, and failures must surface as [`GatewayError`] - never be
//! swallowed into a success. Services depend on the [`PaymentGateway`]
//! trait; production wires in [`HttpPaymentGateway`], tests wire in a
//! recording fake.
//!
//! ```text
//! request_payment ──► initiate(PaymentRequest) ──► POST base_url (JSON)
//!                                                  ◄── { payment_url }
//!
//! confirm_payment ──► verify(transaction_id)   ──► GET base_url?request_id=..
//!                                                  ◄── { pay_status, ... }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GatewayConfig;
use steerway_core::Money;

// =============================================================================
// Gateway Error
// =============================================================================

/// Failures talking to the payment processor.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Building the HTTP client or a request URL failed.
    #[error("Payment gateway configuration error: {0}")]
    Configuration(String),

    /// Payment initiation failed (network error or non-success reply).
    #[error("Payment initiation failed: {0}")]
    Initiation(String),

    /// Payment verification failed (network error or non-success reply).
    #[error("Payment verification failed: {0}")]
    Verification(String),
}

// =============================================================================
// Wire Types
// =============================================================================

/// Everything the processor needs to start a payment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Correlation id, already persisted on the booking.
    pub transaction_id: String,

    /// Amount to collect.
    pub amount: Money,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,

    /// Booking this payment settles; echoed back in the callback.
    pub booking_id: String,
}

/// Redirect payload returned by a successful initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRedirect {
    /// URL the customer is sent to for checkout.
    pub payment_url: String,
}

/// Verification reply for one transaction id.
///
/// Field set follows the processor; everything is optional because the
/// sandbox omits fields freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationOutcome {
    #[serde(default)]
    pub pay_status: Option<String>,

    #[serde(default)]
    pub amount: Option<String>,

    #[serde(default)]
    pub pay_time: Option<String>,
}

impl VerificationOutcome {
    /// Whether the processor reports this transaction as settled.
    pub fn settled(&self) -> bool {
        self.pay_status.as_deref() == Some("Successful")
    }
}

// =============================================================================
// Trait
// =============================================================================

/// The payment processor as the services see it.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Starts a payment session; returns the customer redirect.
    async fn initiate(&self, request: &PaymentRequest) -> Result<GatewayRedirect, GatewayError>;

    /// Re-verifies one transaction with the processor.
    async fn verify(&self, transaction_id: &str) -> Result<VerificationOutcome, GatewayError>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// JSON body of the initiation POST, in the processor's field names.
#[derive(Debug, Serialize)]
struct InitiateBody<'a> {
    store_id: &'a str,
    signature_key: &'a str,
    tran_id: &'a str,
    success_url: String,
    fail_url: String,
    cancel_url: String,
    amount: String,
    currency: &'a str,
    desc: &'a str,
    cus_name: &'a str,
    cus_email: &'a str,
    cus_add1: &'a str,
    cus_add2: &'a str,
    cus_city: &'a str,
    cus_state: &'a str,
    cus_postcode: &'a str,
    cus_country: &'a str,
    cus_phone: &'a str,
    #[serde(rename = "type")]
    response_type: &'a str,
}

/// reqwest-backed [`PaymentGateway`] implementation.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpPaymentGateway {
    /// Creates a gateway client from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(HttpPaymentGateway { client, config })
    }

    /// Builds the callback URL the processor redirects the customer to.
    ///
    /// The callback carries enough context for `confirm_payment` to
    /// reconcile without a session: booking id, transaction id, amount,
    /// customer name, and the outcome flag.
    fn callback_url(&self, status: &str, request: &PaymentRequest) -> Result<String, GatewayError> {
        let base = format!(
            "{}/bookings/verify-payment",
            self.config.callback_base_url.trim_end_matches('/')
        );
        let url = reqwest::Url::parse_with_params(
            &base,
            &[
                ("status", status),
                ("customerName", request.customer_name.as_str()),
                ("totalPrice", &format!("{}", request.amount)),
                ("transactionId", request.transaction_id.as_str()),
                ("bookingId", request.booking_id.as_str()),
            ],
        )
        .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(&self, request: &PaymentRequest) -> Result<GatewayRedirect, GatewayError> {
        debug!(transaction_id = %request.transaction_id, amount = %request.amount, "Initiating payment");

        let body = InitiateBody {
            store_id: &self.config.store_id,
            signature_key: &self.config.signature_key,
            tran_id: &request.transaction_id,
            success_url: self.callback_url("success", request)?,
            fail_url: self.callback_url("failed", request)?,
            cancel_url: self.callback_url("failed", request)?,
            amount: format!(
                "{}.{:02}",
                request.amount.dollars(),
                request.amount.cents_part()
            ),
            currency: "BDT",
            desc: "Car rental payment",
            cus_name: &request.customer_name,
            cus_email: &request.customer_email,
            cus_add1: &request.customer_address,
            cus_add2: "N/A",
            cus_city: "N/A",
            cus_state: "N/A",
            cus_postcode: "N/A",
            cus_country: "N/A",
            cus_phone: &request.customer_phone,
            response_type: "json",
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Initiation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Initiation(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<GatewayRedirect>()
            .await
            .map_err(|e| GatewayError::Initiation(e.to_string()))
    }

    async fn verify(&self, transaction_id: &str) -> Result<VerificationOutcome, GatewayError> {
        debug!(transaction_id = %transaction_id, "Verifying payment");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("store_id", self.config.store_id.as_str()),
                ("signature_key", self.config.signature_key.as_str()),
                ("type", "json"),
                ("request_id", transaction_id),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Verification(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Verification(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<VerificationOutcome>()
            .await
            .map_err(|e| GatewayError::Verification(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
