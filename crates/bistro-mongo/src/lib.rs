//! # bistro-mongo
//!
//! MongoDB implementation of the `bistro_core::Store` trait.
//!
//! One collection per domain type: `users`, `menu`, `reviews`, `carts`,
//! `payments`. Documents travel as BSON; the Mongo `_id` is surfaced to
//! the domain as a hex string under `id`. Identifiers that do not parse
//! as ObjectIds behave as no-match, so idempotent deletes on stale ids
//! succeed with a count of zero.

use async_trait::async_trait;
use bistro_core::{
    CartItem, Identity, MenuItem, MenuItemUpdate, PaymentRecord, Review, Role, Store, StoreError,
    StoreResult, UpdateOutcome,
};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// Default database name
pub const DEFAULT_DB: &str = "bistroDB";

/// MongoDB-backed document store
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Wrap an existing database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect to the deployment at `uri` and select `db_name`
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(backend)?;
        let db = client.database(db_name);

        // Ping once so a bad URI fails at startup, not on first request.
        db.run_command(doc! { "ping": 1 }).await.map_err(backend)?;
        info!("connected to MongoDB database {db_name}");

        Ok(Self { db })
    }

    fn users(&self) -> Collection<Document> {
        self.db.collection("users")
    }

    fn menu(&self) -> Collection<Document> {
        self.db.collection("menu")
    }

    fn reviews(&self) -> Collection<Document> {
        self.db.collection("reviews")
    }

    fn carts(&self) -> Collection<Document> {
        self.db.collection("carts")
    }

    fn payments(&self) -> Collection<Document> {
        self.db.collection("payments")
    }
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Parse a caller-supplied identifier. `None` means "matches nothing".
fn parse_oid(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn to_doc<T: Serialize>(value: &T) -> StoreResult<Document> {
    bson::to_document(value).map_err(|e| StoreError::Malformed(e.to_string()))
}

/// Map a stored document to a domain value, moving `_id` into the
/// domain-facing `id` field as hex.
fn from_doc<T: DeserializeOwned>(mut doc: Document) -> StoreResult<T> {
    if let Ok(oid) = doc.get_object_id("_id") {
        let hex = oid.to_hex();
        doc.remove("_id");
        doc.insert("id", hex);
    }
    bson::from_document(doc).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn inserted_id(result: mongodb::results::InsertOneResult) -> StoreResult<String> {
    result
        .inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .ok_or_else(|| StoreError::Malformed("insert did not yield an ObjectId".to_string()))
}

async fn collect<T: DeserializeOwned>(
    coll: &Collection<Document>,
    filter: Document,
) -> StoreResult<Vec<T>> {
    let mut cursor = coll.find(filter).await.map_err(backend)?;
    let mut out = Vec::new();
    while let Some(doc) = cursor.try_next().await.map_err(backend)? {
        out.push(from_doc(doc)?);
    }
    Ok(out)
}

#[async_trait]
impl Store for MongoStore {
    async fn find_user(&self, email: &str) -> StoreResult<Option<Identity>> {
        let found = self
            .users()
            .find_one(doc! { "email": email })
            .await
            .map_err(backend)?;
        found.map(from_doc).transpose()
    }

    async fn list_users(&self) -> StoreResult<Vec<Identity>> {
        collect(&self.users(), doc! {}).await
    }

    async fn insert_user(&self, user: &Identity) -> StoreResult<String> {
        let result = self
            .users()
            .insert_one(to_doc(user)?)
            .await
            .map_err(backend)?;
        inserted_id(result)
    }

    async fn delete_user(&self, id: &str) -> StoreResult<u64> {
        let Some(oid) = parse_oid(id) else {
            return Ok(0);
        };
        let result = self
            .users()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn set_user_role(&self, id: &str, role: Role) -> StoreResult<UpdateOutcome> {
        let Some(oid) = parse_oid(id) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };
        let result = self
            .users()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "role": role.as_str() } },
            )
            .await
            .map_err(backend)?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        collect(&self.menu(), doc! {}).await
    }

    async fn find_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        let Some(oid) = parse_oid(id) else {
            return Ok(None);
        };
        let found = self
            .menu()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        found.map(from_doc).transpose()
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<String> {
        let result = self
            .menu()
            .insert_one(to_doc(item)?)
            .await
            .map_err(backend)?;
        inserted_id(result)
    }

    async fn update_menu_item(
        &self,
        id: &str,
        update: &MenuItemUpdate,
    ) -> StoreResult<UpdateOutcome> {
        let Some(oid) = parse_oid(id) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };
        let result = self
            .menu()
            .update_one(doc! { "_id": oid }, doc! { "$set": to_doc(update)? })
            .await
            .map_err(backend)?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<u64> {
        let Some(oid) = parse_oid(id) else {
            return Ok(0);
        };
        let result = self
            .menu()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        collect(&self.reviews(), doc! {}).await
    }

    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        collect(&self.carts(), doc! { "email": email }).await
    }

    async fn insert_cart_item(&self, item: &CartItem) -> StoreResult<String> {
        let result = self
            .carts()
            .insert_one(to_doc(item)?)
            .await
            .map_err(backend)?;
        inserted_id(result)
    }

    async fn delete_cart_item(&self, id: &str) -> StoreResult<u64> {
        let Some(oid) = parse_oid(id) else {
            return Ok(0);
        };
        let result = self
            .carts()
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn delete_cart_items(&self, email: &str, ids: &[String]) -> StoreResult<u64> {
        let oids: Vec<ObjectId> = ids.iter().filter_map(|id| parse_oid(id)).collect();
        if oids.is_empty() {
            return Ok(0);
        }
        // Scoped to the owner so a foreign id can never delete someone
        // else's cart item; it just shows up as a shortfall in the count.
        let result = self
            .carts()
            .delete_many(doc! { "_id": { "$in": oids }, "email": email })
            .await
            .map_err(backend)?;
        Ok(result.deleted_count)
    }

    async fn insert_payment(&self, record: &PaymentRecord) -> StoreResult<String> {
        let result = self
            .payments()
            .insert_one(to_doc(record)?)
            .await
            .map_err(backend)?;
        inserted_id(result)
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        collect(&self.payments(), doc! { "email": email }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_ids_match_nothing() {
        assert!(parse_oid("not-an-object-id").is_none());
        assert!(parse_oid("").is_none());
        assert!(parse_oid("507f1f77bcf86cd799439011").is_some());
    }

    #[test]
    fn test_id_surfaces_from_underscore_id() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let doc = doc! {
            "_id": oid,
            "email": "amy@example.com",
            "role": "admin",
        };

        let user: Identity = from_doc(doc).unwrap();
        assert_eq!(user.id.as_deref(), Some("507f1f77bcf86cd799439011"));
        assert!(user.is_admin());
    }

    #[test]
    fn test_missing_role_defaults_to_standard() {
        // Registration payloads written by older clients carry no role.
        let doc = doc! { "email": "amy@example.com" };
        let user: Identity = from_doc(doc).unwrap();
        assert_eq!(user.role, Role::Standard);
    }

    #[test]
    fn test_domain_id_is_not_written_back() {
        let user = Identity::new("amy@example.com", None);
        let doc = to_doc(&user).unwrap();
        assert!(!doc.contains_key("id"));
        assert!(!doc.contains_key("_id"));
    }
}
