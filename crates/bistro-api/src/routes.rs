//! # Routes
//!
//! Axum router configuration for the ordering API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Tokens:
///   - POST /jwt - Issue an identity token
///
/// - Users:
///   - GET    /users - List users (admin)
///   - POST   /users - Register
///   - DELETE /users/{id} - Delete user (admin)
///   - PATCH  /users/admin/{id} - Promote to admin (admin)
///   - GET    /users/admin/{email} - Admin status (self)
///
/// - Menu & reviews:
///   - GET    /menu, GET /menu/{id}
///   - POST   /menu, PATCH /menu/{id}, DELETE /menu/{id} (admin)
///   - GET    /reviews
///
/// - Carts:
///   - GET /carts?email= , POST /carts, DELETE /carts/{id}
///
/// - Payments:
///   - POST /create-payment-intent (authenticated)
///   - POST /payments (authenticated, self)
///   - GET  /payments/{email} (authenticated, self)
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the browser frontend runs on another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route("/", get(handlers::list_users).post(handlers::register_user))
        .route("/{id}", delete(handlers::delete_user))
        // One path shape, two verbs: PATCH takes an id, GET takes an email.
        .route(
            "/admin/{key}",
            get(handlers::admin_status).patch(handlers::promote_user),
        );

    let menu_routes = Router::new()
        .route("/", get(handlers::list_menu).post(handlers::create_menu_item))
        .route(
            "/{id}",
            get(handlers::get_menu_item)
                .patch(handlers::update_menu_item)
                .delete(handlers::delete_menu_item),
        );

    let cart_routes = Router::new()
        .route("/", get(handlers::list_carts).post(handlers::add_cart_item))
        .route("/{id}", delete(handlers::delete_cart_item));

    let payment_routes = Router::new()
        .route("/", post(handlers::record_payment))
        .route("/{email}", get(handlers::payment_history));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Token issuance
        .route("/jwt", post(handlers::issue_token))
        // Collections
        .nest("/users", user_routes)
        .nest("/menu", menu_routes)
        .route("/reviews", get(handlers::list_reviews))
        .nest("/carts", cart_routes)
        // Payments
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .nest("/payments", payment_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
