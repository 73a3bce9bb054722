//! # In-Memory Store
//!
//! `Store` implementation over plain hash maps, used as the substitutable
//! test double for the production document store. Identifiers are v4
//! UUIDs assigned on insert.

use crate::cart::CartItem;
use crate::error::StoreResult;
use crate::identity::{Identity, Role};
use crate::menu::{MenuItem, MenuItemUpdate, Review};
use crate::payment::PaymentRecord;
use crate::store::{Store, UpdateOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, Identity>>,
    menu: RwLock<HashMap<String, MenuItem>>,
    reviews: RwLock<Vec<Review>>,
    carts: RwLock<HashMap<String, CartItem>>,
    payments: RwLock<HashMap<String, PaymentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Seed a review (no insert operation exists on the trait)
    pub fn add_review(&self, review: Review) {
        self.reviews.write().unwrap().push(review);
    }
}

// Lock scopes never span an await; the std RwLock is enough here.
#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, email: &str) -> StoreResult<Option<Identity>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<Identity>> {
        Ok(self.users.read().unwrap().values().cloned().collect())
    }

    async fn insert_user(&self, user: &Identity) -> StoreResult<String> {
        let id = Self::next_id();
        let mut stored = user.clone();
        stored.id = Some(id.clone());
        self.users.write().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete_user(&self, id: &str) -> StoreResult<u64> {
        Ok(self.users.write().unwrap().remove(id).map_or(0, |_| 1))
    }

    async fn set_user_role(&self, id: &str, role: Role) -> StoreResult<UpdateOutcome> {
        let mut users = self.users.write().unwrap();
        match users.get_mut(id) {
            Some(user) => {
                let modified = if user.role == role { 0 } else { 1 };
                user.role = role;
                Ok(UpdateOutcome {
                    matched: 1,
                    modified,
                })
            }
            None => Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            }),
        }
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.menu.read().unwrap().values().cloned().collect())
    }

    async fn find_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.menu.read().unwrap().get(id).cloned())
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<String> {
        let id = Self::next_id();
        let mut stored = item.clone();
        stored.id = Some(id.clone());
        self.menu.write().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn update_menu_item(
        &self,
        id: &str,
        update: &MenuItemUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let mut menu = self.menu.write().unwrap();
        match menu.get_mut(id) {
            Some(item) => {
                item.name = update.name.clone();
                item.category = update.category.clone();
                item.price = update.price;
                item.details = update.details.clone();
                item.recipe = update.recipe.clone();
                item.image = update.image.clone();
                Ok(UpdateOutcome {
                    matched: 1,
                    modified: 1,
                })
            }
            None => Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            }),
        }
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<u64> {
        Ok(self.menu.write().unwrap().remove(id).map_or(0, |_| 1))
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.reviews.read().unwrap().clone())
    }

    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let carts = self.carts.read().unwrap();
        Ok(carts
            .values()
            .filter(|item| item.email == email)
            .cloned()
            .collect())
    }

    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<String> {
        let id = Self::next_id();
        let mut stored = item.clone();
        stored.id = Some(id.clone());
        self.carts.write().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete_cart_item(&self, id: &str) -> StoreResult<u64> {
        Ok(self.carts.write().unwrap().remove(id).map_or(0, |_| 1))
    }

    async fn delete_cart_items(&self, email: &str, ids: &[String]) -> StoreResult<u64> {
        let mut carts = self.carts.write().unwrap();
        let mut deleted = 0;
        for id in ids {
            if carts.get(id).is_some_and(|item| item.email == email) {
                carts.remove(id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn insert_payment(&self, record: &PaymentRecord) -> StoreResult<String> {
        let id = Self::next_id();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.payments.write().unwrap().insert(id.clone(), stored);
        Ok(id)
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        let payments = self.payments.read().unwrap();
        Ok(payments
            .values()
            .filter(|p| p.email == email)
            .cloned()
            .collect())
    }
}
