//! # bistro-core
//!
//! Core types and traits for the bistro-rs ordering backend.
//!
//! This crate provides:
//! - `TokenService` for issuing and verifying identity tokens
//! - `Store` trait over the document collections, plus `MemoryStore`
//! - `PaymentGateway` trait for payment processor adapters
//! - `SettlementCoordinator` for the pay-and-reconcile workflow
//! - `ApiError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use bistro_core::{CompletedPayment, Currency, SettlementCoordinator};
//!
//! let coordinator = SettlementCoordinator::new(store, gateway);
//!
//! // Hand the client a confirmation secret
//! let intent = coordinator.create_intent(25.50, Currency::USD).await?;
//!
//! // Later, once the client confirmed the payment
//! let outcome = coordinator.settle(completed).await?;
//! assert!(outcome.fully_reconciled());
//! ```

pub mod cart;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod memory;
pub mod menu;
pub mod payment;
pub mod settlement;
pub mod store;
pub mod token;

// Re-exports for convenience
pub use cart::CartItem;
pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use identity::{Identity, Role};
pub use memory::MemoryStore;
pub use menu::{MenuItem, MenuItemUpdate, Review};
pub use payment::{
    CompletedPayment, Currency, PaymentIntent, PaymentRecord, SettlementOutcome,
};
pub use settlement::SettlementCoordinator;
pub use store::{BoxedStore, Store, UpdateOutcome};
pub use token::{Claims, TokenError, TokenService, TOKEN_TTL_SECS};
