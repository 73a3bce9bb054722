//! # Request Handlers
//!
//! Axum request handlers for the bistro ordering API.
//! Protected handlers take `AuthClaims` as an argument and apply the
//! admin/self checks before touching the store.

use crate::auth::{require_admin, require_self, AuthClaims};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bistro_core::{
    ApiError, CartItem, CompletedPayment, Currency, Identity, MenuItem, MenuItemUpdate,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Identity payload posted to the token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Registration payload. Role is always `standard` on this path; only an
/// existing admin can promote.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query string for cart listing
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub email: String,
}

/// Price for a new payment intent, in major currency units
#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub price: f64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Map any API error onto a status code and JSON body
pub fn error_response(err: impl Into<ApiError>) -> (StatusCode, Json<ErrorResponse>) {
    let err = err.into();
    let code = err.status_code();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse::new(err.to_string(), code)),
    )
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

// =============================================================================
// Health & Tokens
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bistro-rs",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Issue a signed identity token for the posted payload
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let token = state
        .tokens
        .issue(request.email, request.name)
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "token": token })))
}

// =============================================================================
// Users
// =============================================================================

/// List all identities (admin only)
#[instrument(skip(state, claims))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> HandlerResult<Json<Vec<Identity>>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let users = state.store.list_users().await.map_err(error_response)?;
    Ok(Json(users))
}

/// Register an identity; an already-registered email is a no-op
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let existing = state
        .store
        .find_user(&request.email)
        .await
        .map_err(error_response)?;

    if existing.is_some() {
        return Ok(Json(serde_json::json!({
            "message": "user already exists",
            "insertedId": null
        })));
    }

    let user = Identity::new(request.email, request.name);
    let id = state.store.insert_user(&user).await.map_err(error_response)?;

    Ok(Json(serde_json::json!({ "insertedId": id })))
}

/// Delete an identity by id (admin only)
#[instrument(skip(state, claims))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let deleted = state.store.delete_user(&id).await.map_err(error_response)?;
    Ok(Json(serde_json::json!({ "deletedCount": deleted })))
}

/// Promote an identity to admin (admin only)
#[instrument(skip(state, claims))]
pub async fn promote_user(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let outcome = state
        .store
        .set_user_role(&id, bistro_core::Role::Admin)
        .await
        .map_err(error_response)?;

    info!("promoted user {id} to admin");

    Ok(Json(serde_json::json!({
        "matchedCount": outcome.matched,
        "modifiedCount": outcome.modified
    })))
}

/// Report whether an identity holds the admin role (self only)
#[instrument(skip(state, claims))]
pub async fn admin_status(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(email): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_self(&claims, &email).map_err(error_response)?;

    let user = state.store.find_user(&email).await.map_err(error_response)?;
    let admin = user.map(|u| u.is_admin()).unwrap_or(false);

    Ok(Json(serde_json::json!({ "admin": admin })))
}

// =============================================================================
// Menu & Reviews
// =============================================================================

/// List the full menu
pub async fn list_menu(State(state): State<AppState>) -> HandlerResult<Json<Vec<MenuItem>>> {
    let items = state.store.list_menu().await.map_err(error_response)?;
    Ok(Json(items))
}

/// Get one menu item by id
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<MenuItem>> {
    let item = state
        .store
        .find_menu_item(&id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(ApiError::NotFound {
                what: "menu item".to_string(),
            })
        })?;

    Ok(Json(item))
}

/// Add a menu item (admin only)
#[instrument(skip(state, claims, item), fields(name = %item.name))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(item): Json<MenuItem>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let id = state
        .store
        .insert_menu_item(&item)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "insertedId": id })))
}

/// Field-set update of a menu item (admin only)
#[instrument(skip(state, claims, update))]
pub async fn update_menu_item(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
    Json(update): Json<MenuItemUpdate>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let outcome = state
        .store
        .update_menu_item(&id, &update)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "matchedCount": outcome.matched,
        "modifiedCount": outcome.modified
    })))
}

/// Delete a menu item (admin only)
#[instrument(skip(state, claims))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    require_admin(&state, &claims).await.map_err(error_response)?;

    let deleted = state
        .store
        .delete_menu_item(&id)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "deletedCount": deleted })))
}

/// List all reviews
pub async fn list_reviews(
    State(state): State<AppState>,
) -> HandlerResult<Json<Vec<bistro_core::Review>>> {
    let reviews = state.store.list_reviews().await.map_err(error_response)?;
    Ok(Json(reviews))
}

// =============================================================================
// Carts
// =============================================================================

/// List cart items for an email
pub async fn list_carts(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> HandlerResult<Json<Vec<CartItem>>> {
    let items = state
        .store
        .list_cart_items(&query.email)
        .await
        .map_err(error_response)?;
    Ok(Json(items))
}

/// Add an item to a cart
#[instrument(skip(state, item), fields(email = %item.email, menu_id = %item.menu_id))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(item): Json<CartItem>,
) -> HandlerResult<Json<serde_json::Value>> {
    let id = state
        .store
        .insert_cart_item(&item)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "insertedId": id })))
}

/// Remove one cart item by id
pub async fn delete_cart_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let deleted = state
        .store
        .delete_cart_item(&id)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({ "deletedCount": deleted })))
}

// =============================================================================
// Payments
// =============================================================================

/// Create a payment intent for a price; the client confirms with the
/// returned secret
#[instrument(skip(state, _claims, request), fields(price = request.price))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    AuthClaims(_claims): AuthClaims,
    Json(request): Json<CreateIntentRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let intent = state
        .settlement
        .create_intent(request.price, Currency::USD)
        .await
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({
        "clientSecret": intent.client_secret
    })))
}

/// Record a completed payment and reconcile the settled cart items
/// (self only: the payment must belong to the authenticated identity)
#[instrument(skip(state, claims, payment), fields(email = %payment.email))]
pub async fn record_payment(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payment): Json<CompletedPayment>,
) -> HandlerResult<Json<bistro_core::SettlementOutcome>> {
    require_self(&claims, &payment.email).map_err(error_response)?;

    let outcome = state
        .settlement
        .settle(payment)
        .await
        .map_err(error_response)?;

    Ok(Json(outcome))
}

/// Payment history for an identity (self only)
#[instrument(skip(state, claims))]
pub async fn payment_history(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(email): Path<String>,
) -> HandlerResult<Json<Vec<bistro_core::PaymentRecord>>> {
    require_self(&claims, &email).map_err(error_response)?;

    let records = state
        .store
        .list_payments(&email)
        .await
        .map_err(error_response)?;

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let err = ErrorResponse::new("forbidden access", 403);
        assert_eq!(err.error, "forbidden access");
        assert_eq!(err.code, 403);
    }

    #[test]
    fn test_error_response_status_mapping() {
        let (status, _json) = error_response(ApiError::Unauthenticated);
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _json) = error_response(ApiError::Forbidden);
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
