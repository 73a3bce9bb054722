//! # Document Store Trait
//!
//! Boundary contract to the document store backing the platform's five
//! collections: `users`, `menu`, `reviews`, `carts`, `payments`.
//!
//! The store handle is injected into components at construction so a test
//! double (`MemoryStore`) can stand in for the production backend. Every
//! operation is an awaitable call returning a result or a typed failure;
//! nothing is fire-and-forget. Unknown or unparseable identifiers behave
//! as no-match: deletes succeed with a count of zero, reads yield `None`.

use crate::cart::CartItem;
use crate::error::StoreResult;
use crate::identity::{Identity, Role};
use crate::menu::{MenuItem, MenuItemUpdate, Review};
use crate::payment::PaymentRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of an update-by-id (field-set semantics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Documents matching the identifier (0 or 1)
    pub matched: u64,
    /// Documents actually modified
    pub modified: u64,
}

/// Document store operations the platform depends on
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Equality lookup on the unique email field
    async fn find_user(&self, email: &str) -> StoreResult<Option<Identity>>;

    async fn list_users(&self) -> StoreResult<Vec<Identity>>;

    /// Insert an identity and return its assigned identifier. Uniqueness
    /// of the email is the caller's concern (check-then-insert).
    async fn insert_user(&self, user: &Identity) -> StoreResult<String>;

    /// Delete by identifier; returns the deleted count (0 when absent)
    async fn delete_user(&self, id: &str) -> StoreResult<u64>;

    /// Set the role field on one identity
    async fn set_user_role(&self, id: &str, role: Role) -> StoreResult<UpdateOutcome>;

    // --- menu ---

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>>;

    async fn find_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>>;

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<String>;

    /// Field-set update of one menu item
    async fn update_menu_item(&self, id: &str, update: &MenuItemUpdate)
        -> StoreResult<UpdateOutcome>;

    async fn delete_menu_item(&self, id: &str) -> StoreResult<u64>;

    // --- reviews ---

    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    // --- carts ---

    /// All cart items owned by `email`
    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>>;

    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<String>;

    async fn delete_cart_item(&self, id: &str) -> StoreResult<u64>;

    /// Bulk delete of the listed cart items, scoped to the owning email.
    /// Items owned by anyone else are left in place and show up as a
    /// shortfall in the returned count.
    async fn delete_cart_items(&self, email: &str, ids: &[String]) -> StoreResult<u64>;

    // --- payments ---

    /// Append one payment record and return its assigned identifier
    async fn insert_payment(&self, record: &PaymentRecord) -> StoreResult<String>;

    /// Payment history for one identity
    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>>;
}

/// Type alias for a shared store handle (dynamic dispatch)
pub type BoxedStore = Arc<dyn Store>;
