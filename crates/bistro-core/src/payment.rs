//! # Payment Types
//!
//! Payment intents are owned by the external processor and never
//! persisted locally. Payment records are append-only documents in the
//! `payments` collection, created exactly once per settlement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 currency code, as the processor
    /// expects it on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A charge intent created with the external processor.
///
/// Immutable once issued; the processor is the system of record. Only the
/// `client_secret` is handed back to the caller for client-side
/// confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor-issued intent reference (e.g., "pi_...")
    pub intent_id: String,

    /// Secret the client uses to confirm the payment
    pub client_secret: String,

    /// Amount in minor currency units
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Processor-reported status (e.g., "requires_payment_method")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A completed payment submitted by the caller after client-side
/// confirmation, carrying the cart items to reconcile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedPayment {
    /// Owning identity email
    pub email: String,

    /// Amount paid, in minor currency units
    pub amount: i64,

    /// Currency
    #[serde(default)]
    pub currency: Currency,

    /// Processor intent reference
    #[serde(rename = "transactionId")]
    pub intent_id: String,

    /// Identifiers of the cart items this payment settles
    #[serde(rename = "cartIds")]
    pub cart_ids: Vec<String>,
}

/// Durable record of a settled payment. Append-only, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owning identity email
    pub email: String,

    /// Amount in minor currency units
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Processor intent reference
    #[serde(rename = "transactionId")]
    pub intent_id: String,

    /// Cart items settled by this payment
    #[serde(rename = "cartIds")]
    pub cart_ids: Vec<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Build the record for a completed payment, stamped now
    pub fn from_completed(payment: CompletedPayment) -> Self {
        Self {
            id: None,
            email: payment.email,
            amount: payment.amount,
            currency: payment.currency,
            intent_id: payment.intent_id,
            cart_ids: payment.cart_ids,
            created_at: Utc::now(),
        }
    }
}

/// Combined result of one settlement attempt.
///
/// `deleted < requested` means reconciliation was partial; the record
/// still stands and the caller decides whether to retry cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Identifier of the inserted payment record
    pub payment_id: String,

    /// How many cart-item identifiers were submitted
    pub requested: usize,

    /// How many cart items the bulk delete removed
    pub deleted: u64,
}

impl SettlementOutcome {
    /// True when every submitted cart item was removed
    pub fn fully_reconciled(&self) -> bool {
        self.deleted as usize == self.requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_wire_format() {
        assert_eq!(Currency::USD.as_str(), "usd");
        assert_eq!(serde_json::to_string(&Currency::EUR).unwrap(), "\"eur\"");
    }

    #[test]
    fn test_record_from_completed() {
        let record = PaymentRecord::from_completed(CompletedPayment {
            email: "amy@example.com".into(),
            amount: 2550,
            currency: Currency::USD,
            intent_id: "pi_123".into(),
            cart_ids: vec!["c1".into(), "c2".into()],
        });

        assert_eq!(record.email, "amy@example.com");
        assert_eq!(record.amount, 2550);
        assert_eq!(record.cart_ids.len(), 2);
        assert!(record.id.is_none());
    }

    #[test]
    fn test_outcome_reconciliation() {
        let outcome = SettlementOutcome {
            payment_id: "p1".into(),
            requested: 2,
            deleted: 1,
        };
        assert!(!outcome.fully_reconciled());
    }
}
