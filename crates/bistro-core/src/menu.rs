//! # Menu and Review Types
//!
//! Plain data-access types for the `menu` and `reviews` collections.

use serde::{Deserialize, Serialize};

/// An item on the restaurant menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Store-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Menu category (e.g., "salad", "dessert")
    pub category: String,

    /// Price in major currency units
    pub price: f64,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Recipe notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Field-set update for a menu item. Every field is written; the store
/// applies this with `$set` semantics, leaving the identifier untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub recipe: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A customer review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Reviewer display name
    pub name: String,

    /// Review body
    pub details: String,

    /// Star rating
    pub rating: f64,
}
