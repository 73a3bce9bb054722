//! # bistro-stripe
//!
//! Stripe payment gateway adapter for bistro-rs.
//!
//! Implements `bistro_core::PaymentGateway` over the PaymentIntents API:
//! the server creates an intent for the cart total and returns the client
//! secret; the client confirms the card payment directly with Stripe.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bistro_stripe::StripeIntentGateway;
//! use bistro_core::{Currency, PaymentGateway};
//!
//! // Create gateway from environment (STRIPE_SECRET_KEY)
//! let gateway = StripeIntentGateway::from_env()?;
//!
//! let intent = gateway.create_intent(2550, Currency::USD).await?;
//! // Hand intent.client_secret to the browser
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::StripeIntentGateway;
