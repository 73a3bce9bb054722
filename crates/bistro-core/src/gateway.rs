//! # Payment Gateway Trait
//!
//! Thin contract to an external payment processor. The adapter creates a
//! charge intent for an amount; confirmation happens client-side with the
//! returned secret, outside this system's control.

use crate::error::ApiResult;
use crate::payment::{Currency, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Contract implemented by payment processor adapters.
///
/// Processor failures (network, invalid amount, declined setup) surface
/// unmodified; retry policy belongs to the caller, never to the adapter.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a charge intent for `amount` minor currency units.
    ///
    /// `amount` must be positive; the returned intent carries the
    /// processor's reference and the client confirmation secret.
    async fn create_intent(&self, amount: i64, currency: Currency) -> ApiResult<PaymentIntent>;

    /// Processor name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway handle (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
