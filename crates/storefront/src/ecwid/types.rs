//! Storefront domain types.
//!
//! These are the normalized catalog and cart shapes handed to callers. They
//! are derived from Ecwid responses on every fetch and are never the source
//! of truth.

use serde::{Deserialize, Serialize};

pub use ecwid_headless_core::{CurrencyCode, Money, SelectedOption, VariantId};

// =============================================================================
// Shared Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Minimum price among available variants.
    pub min_variant_price: Money,
    /// Maximum price among available variants.
    pub max_variant_price: Money,
}

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: String,
    /// Image width in pixels (0 when unknown).
    pub width: u32,
    /// Image height in pixels (0 when unknown).
    pub height: u32,
}

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: String,
    /// Meta description.
    pub description: String,
}

// =============================================================================
// Product Types
// =============================================================================

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    /// Option ID (the option name; Ecwid options have no id of their own).
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Ecwid option type (e.g., `DROPDOWN`, `RADIO`, `SIZE`).
    #[serde(rename = "type")]
    pub option_type: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A purchasable option combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Synthetic id: product id plus ordered option pairs.
    pub id: VariantId,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
}

/// A product, reshaped from an Ecwid catalog node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// URL handle; ends in `-p<id>` for clean URLs.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub available_for_sale: bool,
    pub options: Vec<ProductOption>,
    pub variants: Vec<ProductVariant>,
    pub price_range: PriceRange,
    /// "Compare to" price shown struck through, when set.
    pub compare_at_price: Option<Money>,
    pub featured_image: Image,
    pub images: Vec<Image>,
    pub seo: Seo,
    pub updated_at: Option<String>,
}

impl Product {
    /// Find a declared option by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection, reshaped from an Ecwid category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Category id as a string; empty for the synthetic "All" collection.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub seo: Seo,
    /// Storefront path of the collection page.
    pub path: String,
    pub updated_at: Option<String>,
}

/// A navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub title: String,
    pub path: String,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    pub total_tax_amount: Money,
}

/// Cost of a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemCost {
    /// Unit price times quantity.
    pub total_amount: Money,
}

/// Snapshot of what a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    pub id: VariantId,
    /// `Name:Value, ...` or `Default` when the line has no options.
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: Product,
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Same value as the merchandise id.
    pub id: VariantId,
    pub quantity: u32,
    pub cost: CartItemCost,
    pub merchandise: Merchandise,
}

/// A cart, backed by an Ecwid checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    /// Session token; only present on a freshly created cart.
    pub session_token: Option<String>,
    pub checkout_url: String,
    pub cost: CartCost,
    pub total_quantity: u32,
    pub lines: Vec<CartItem>,
}

/// Input for adding a line to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Encoded variant id.
    pub merchandise_id: String,
    pub quantity: u32,
}

/// Input for changing the quantity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line id.
    pub id: String,
    /// Encoded variant id.
    pub merchandise_id: String,
    pub quantity: u32,
}
