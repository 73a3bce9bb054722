//! # Stripe Payment Intents
//!
//! `PaymentGateway` implementation over Stripe's PaymentIntents API.
//! The adapter creates the intent and hands the client secret back; card
//! confirmation happens on the client with Stripe.js.

use crate::config::StripeConfig;
use async_trait::async_trait;
use bistro_core::{ApiError, ApiResult, Currency, PaymentGateway, PaymentIntent};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Stripe PaymentIntents gateway
pub struct StripeIntentGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeIntentGateway {
    /// Create a new gateway from explicit config
    pub fn new(config: StripeConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ApiResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }
}

#[async_trait]
impl PaymentGateway for StripeIntentGateway {
    #[instrument(skip(self), fields(provider = "stripe"))]
    async fn create_intent(&self, amount: i64, currency: Currency) -> ApiResult<PaymentIntent> {
        if amount <= 0 {
            return Err(ApiError::InvalidRequest(format!(
                "intent amount must be positive, got {amount}"
            )));
        }

        debug!("creating Stripe payment intent: amount={amount} {currency}");

        let form_params: Vec<(&str, String)> = vec![
            ("amount", amount.to_string()),
            ("currency", currency.as_str().to_string()),
            ("payment_method_types[0]", "card".to_string()),
        ];

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={status}, body={body}");

            // Surface Stripe's own message when the body parses
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ApiError::Gateway {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ApiError::Gateway {
                provider: "stripe".to_string(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let intent: StripeIntentResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::Serialization(format!("failed to parse Stripe response: {e}"))
        })?;

        info!("created Stripe payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            intent_id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency,
            status: intent.status,
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: String,
    amount: i64,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(base_url: &str) -> StripeIntentGateway {
        StripeIntentGateway::new(
            StripeConfig::new("sk_test_abc123").with_api_base_url(base_url),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_intent_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=1999"))
            .and(body_string_contains("currency=usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_test_123",
                "client_secret": "pi_test_123_secret_abc",
                "amount": 1999,
                "currency": "usd",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = gateway(&server.uri())
            .create_intent(1999, Currency::USD)
            .await
            .unwrap();

        assert_eq!(intent.intent_id, "pi_test_123");
        assert_eq!(intent.client_secret, "pi_test_123_secret_abc");
        assert_eq!(intent.amount, 1999);
        assert_eq!(intent.status.as_deref(), Some("requires_payment_method"));
    }

    #[tokio::test]
    async fn test_stripe_error_is_surfaced_unmodified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(json!({
                "error": {
                    "message": "Your card setup was declined.",
                    "type": "card_error"
                }
            })))
            .mount(&server)
            .await;

        let err = gateway(&server.uri())
            .create_intent(1999, Currency::USD)
            .await
            .unwrap_err();

        match err {
            ApiError::Gateway { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Your card setup was declined.");
            }
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_never_hits_the_network() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = gateway(&server.uri())
            .create_intent(0, Currency::USD)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
