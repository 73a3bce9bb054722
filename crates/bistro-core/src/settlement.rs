//! # Settlement Coordinator
//!
//! Orchestrates one checkout attempt: create a charge intent with the
//! gateway, then — after the client confirms the payment on its side —
//! record the payment and reconcile the cart.
//!
//! Per attempt the states run `Initiated → IntentCreated → Recorded →
//! Reconciled`, failing from any non-terminal state. The two halves are
//! separate calls because confirmation happens outside this system; the
//! coordinator never blocks waiting for the processor.
//!
//! Ordering guarantee: the payment record insert always precedes the cart
//! bulk delete. A paid cart is never deleted without a durable payment
//! trail; the inverse failure mode (record written, cleanup incomplete)
//! is tolerated and reported through the combined outcome.

use crate::error::{ApiError, ApiResult};
use crate::gateway::BoxedPaymentGateway;
use crate::payment::{
    CompletedPayment, Currency, PaymentIntent, PaymentRecord, SettlementOutcome,
};
use crate::store::BoxedStore;
use tracing::{info, instrument};

/// Coordinates intent creation and post-confirmation reconciliation
pub struct SettlementCoordinator {
    store: BoxedStore,
    gateway: BoxedPaymentGateway,
}

impl SettlementCoordinator {
    pub fn new(store: BoxedStore, gateway: BoxedPaymentGateway) -> Self {
        Self { store, gateway }
    }

    /// Convert a price in major units to minor units by integer
    /// truncation toward zero.
    ///
    /// This deliberately mirrors the platform's historical rounding: the
    /// amount is whatever `price * 100` truncates to, so 19.99 maps to
    /// 1999 and never 1998 or 2000. Changing this to rounding would move
    /// settled amounts by a cent for some prices.
    pub fn amount_from_price(price: f64) -> i64 {
        (price * 100.0) as i64
    }

    /// `Initiated → IntentCreated`: derive the minor-unit amount and ask
    /// the gateway for a charge intent. Gateway failures propagate with
    /// nothing persisted.
    #[instrument(skip(self))]
    pub async fn create_intent(&self, price: f64, currency: Currency) -> ApiResult<PaymentIntent> {
        let amount = Self::amount_from_price(price);
        if amount <= 0 {
            return Err(ApiError::InvalidRequest(format!(
                "price must be positive, got {price}"
            )));
        }

        self.gateway.create_intent(amount, currency).await
    }

    /// `IntentCreated → Recorded → Reconciled`: insert exactly one
    /// payment record, then bulk-delete the settled cart items scoped to
    /// the record's owner.
    ///
    /// The insert has no compensating rollback; once recorded, the
    /// payment is authoritative. A shortfall in the deleted count is not
    /// an error — it is surfaced in the outcome for the caller to act on.
    #[instrument(skip(self, payment), fields(email = %payment.email, cart_ids = payment.cart_ids.len()))]
    pub async fn settle(&self, payment: CompletedPayment) -> ApiResult<SettlementOutcome> {
        let record = PaymentRecord::from_completed(payment);

        let payment_id = self.store.insert_payment(&record).await?;

        let deleted = self
            .store
            .delete_cart_items(&record.email, &record.cart_ids)
            .await?;

        let outcome = SettlementOutcome {
            payment_id,
            requested: record.cart_ids.len(),
            deleted,
        };

        if !outcome.fully_reconciled() {
            info!(
                requested = outcome.requested,
                deleted = outcome.deleted,
                "settlement reconciled partially"
            );
        }

        Ok(outcome)
    }
}
