//! # Cart Types
//!
//! Cart items live in the `carts` collection, one document per item,
//! owned by an identity email. They are created on add-to-cart and
//! destroyed individually or in bulk on settlement.

use serde::{Deserialize, Serialize};

/// An item in a customer's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owning identity email
    pub email: String,

    /// Menu item this entry references
    #[serde(rename = "menuId")]
    pub menu_id: String,

    /// Name snapshot at add-to-cart time
    pub name: String,

    /// Price snapshot in major currency units
    pub price: f64,

    /// Image URL snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
