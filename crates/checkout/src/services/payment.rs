//! Payment gateway trait and implementations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Money;
use serde::Deserialize;
use thiserror::Error;

use crate::retry::{self, CallError};

/// An order registered with the payment provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrder {
    /// The provider's opaque order identifier.
    pub order_id: String,
    /// The amount the provider will collect.
    pub amount: Money,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Errors from payment order creation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested amount is not chargeable.
    #[error("order amount must be positive, got {0} paise")]
    InvalidAmount(i64),

    /// The provider did not answer within the deadline.
    #[error("payment provider timed out")]
    TimedOut,

    /// The provider could not be reached.
    #[error("payment provider transport error: {0}")]
    Transport(String),

    /// The provider refused the order.
    #[error("payment provider rejected the order ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider answered with something unparseable.
    #[error("unreadable payment provider response: {0}")]
    Decode(String),
}

/// Trait for payment order creation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers an order for `amount` with the provider.
    ///
    /// `receipt` is the caller's idempotency label: the provider
    /// de-duplicates orders carrying the same receipt.
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> Result<ProviderOrder, GatewayError>;
}

/// HTTP client for the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

impl RazorpayGateway {
    /// Creates a gateway against the production Razorpay API.
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self::with_base_url(key_id, key_secret, "https://api.razorpay.com/v1")
    }

    /// Creates a gateway against an alternate endpoint (tests, sandboxes).
    pub fn with_base_url(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[tracing::instrument(skip(self), fields(%amount, receipt))]
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> Result<ProviderOrder, GatewayError> {
        if !amount.is_positive() {
            return Err(GatewayError::InvalidAmount(amount.paise()));
        }

        let url = format!("{}/orders", self.base_url);
        let body = serde_json::json!({
            "amount": amount.paise(),
            "currency": currency,
            "receipt": receipt,
        });

        let response = retry::retry_once(
            retry::CALL_TIMEOUT,
            |err: &reqwest::Error| err.is_connect() || err.is_timeout(),
            || async {
                self.client
                    .post(&url)
                    .basic_auth(&self.key_id, Some(&self.key_secret))
                    .json(&body)
                    .send()
                    .await
            },
        )
        .await
        .map_err(|err| match err {
            CallError::TimedOut => GatewayError::TimedOut,
            CallError::Inner(err) => GatewayError::Transport(err.to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Decode(err.to_string()))?;

        Ok(ProviderOrder {
            order_id: order.id,
            amount: Money::from_paise(order.amount),
            currency: order.currency,
        })
    }
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    orders: HashMap<String, ProviderOrder>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment gateway for testing.
///
/// Mirrors the provider's receipt de-duplication: creating an order with a
/// receipt that already exists returns the existing order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on subsequent create calls.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of distinct orders created.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns the order registered under a receipt, if any.
    pub fn order_for_receipt(&self, receipt: &str) -> Option<ProviderOrder> {
        self.state.read().unwrap().orders.get(receipt).cloned()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> Result<ProviderOrder, GatewayError> {
        if !amount.is_positive() {
            return Err(GatewayError::InvalidAmount(amount.paise()));
        }

        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(GatewayError::Rejected {
                status: 503,
                message: "provider unavailable".to_string(),
            });
        }

        if let Some(existing) = state.orders.get(receipt) {
            return Ok(existing.clone());
        }

        state.next_id += 1;
        let order = ProviderOrder {
            order_id: format!("order_{:04}", state.next_id),
            amount,
            currency: currency.to_string(),
        };
        state.orders.insert(receipt.to_string(), order.clone());

        Ok(order)
    }
}
