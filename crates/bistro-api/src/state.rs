//! # Application State
//!
//! Shared state for the Axum application.
//!
//! Every collaborator — store, payment gateway, token service — is built
//! once at startup and injected by handle, so tests can substitute the
//! in-memory store and a stub gateway without touching the handlers.

use bistro_core::{BoxedPaymentGateway, BoxedStore, SettlementCoordinator, TokenService};
use bistro_mongo::{MongoStore, DEFAULT_DB};
use bistro_stripe::StripeIntentGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Database name
    pub db_name: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            mongodb_uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB.to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store handle
    pub store: BoxedStore,
    /// Token issuer/verifier
    pub tokens: TokenService,
    /// Payment settlement coordinator
    pub settlement: Arc<SettlementCoordinator>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: MongoDB store + Stripe gateway
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET not set"))?;
        let tokens = TokenService::new(&secret);

        let store: BoxedStore = Arc::new(
            MongoStore::connect(&config.mongodb_uri, &config.db_name)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to MongoDB: {e}"))?,
        );

        let gateway: BoxedPaymentGateway = Arc::new(
            StripeIntentGateway::from_env()
                .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {e}"))?,
        );

        Ok(Self::with_parts(store, gateway, tokens, config))
    }

    /// Assemble state from explicit parts (tests inject doubles here)
    pub fn with_parts(
        store: BoxedStore,
        gateway: BoxedPaymentGateway,
        tokens: TokenService,
        config: AppConfig,
    ) -> Self {
        let settlement = Arc::new(SettlementCoordinator::new(store.clone(), gateway));
        Self {
            store,
            tokens,
            settlement,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("MONGODB_URI");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_name, "bistroDB");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "bistroDB".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }
}
