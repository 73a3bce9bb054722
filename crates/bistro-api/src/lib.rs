//! # bistro-api
//!
//! HTTP API layer for bistro-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Token issuance and the authorization guards
//! - REST endpoints for users, menu, reviews, carts, and payments
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/jwt` | Issue identity token |
//! | GET | `/users` | List users (admin) |
//! | GET | `/menu` | List menu |
//! | POST | `/create-payment-intent` | Create payment intent |
//! | POST | `/payments` | Record payment, reconcile cart |

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
