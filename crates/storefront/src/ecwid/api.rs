//! Wire types for the Ecwid REST and Storefront APIs.
//!
//! These mirror the provider's JSON closely and are only ever consumed by
//! the reshapers in [`super::reshape`]. Every field defaults when absent:
//! Ecwid omits empty collections and optional fields freely, and a missing
//! field is treated as empty or false rather than as an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Catalog
// =============================================================================

/// A catalog node: either a product or a category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidNode {
    pub id: u64,
    pub enabled: bool,
    pub name: String,
    pub url: String,
    pub create_date: Option<String>,
    pub update_date: Option<String>,
    pub description: Option<String>,
    pub in_stock: bool,
    pub price: Option<Decimal>,
    pub compare_to_price: Option<Decimal>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub original_image: Option<EcwidMedia>,
    pub gallery_images: Vec<EcwidMedia>,
    pub related_products: Option<EcwidRelatedProducts>,
    pub combinations: Vec<EcwidVariation>,
    pub options: Vec<EcwidProductOption>,
}

impl EcwidNode {
    /// Base price, zero when absent.
    #[must_use]
    pub fn base_price(&self) -> Decimal {
        self.price.unwrap_or_default()
    }
}

/// An image attached to a node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidMedia {
    pub id: Option<String>,
    pub name: Option<String>,
    pub alt: Option<String>,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A real stock-keeping unit for one option combination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidVariation {
    pub id: u64,
    pub combination_number: u32,
    pub sku: Option<String>,
    pub in_stock: bool,
    pub quantity: Option<i64>,
    pub unlimited: bool,
    pub price: Option<Decimal>,
    pub compare_to_price: Option<Decimal>,
    pub options: Vec<EcwidVariationOptionValue>,
}

/// One `name = value` pair of a variation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcwidVariationOptionValue {
    pub name: String,
    pub value: String,
}

/// A declared product option with its choices.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidProductOption {
    #[serde(rename = "type")]
    pub option_type: String,
    pub name: String,
    pub choices: Vec<EcwidProductOptionChoice>,
    pub default_choice: Option<u32>,
    pub required: bool,
}

/// One choice of a product option.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidProductOptionChoice {
    pub text: String,
    pub price_modifier: Option<Decimal>,
    pub price_modifier_type: Option<String>,
}

/// Related-products configuration of a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidRelatedProducts {
    pub product_ids: Vec<u64>,
    pub related_category: Option<EcwidRelatedCategory>,
}

/// "Products from category" part of the related-products configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidRelatedCategory {
    pub enabled: bool,
    pub category_id: u64,
    pub product_count: u32,
}

/// Paged search result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidPagedResult<T> {
    pub total: u32,
    pub count: u32,
    pub offset: u32,
    pub limit: u32,
    pub items: Vec<T>,
}

impl<T> Default for EcwidPagedResult<T> {
    fn default() -> Self {
        Self {
            total: 0,
            count: 0,
            offset: 0,
            limit: 0,
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Store profile
// =============================================================================

/// Store profile, limited to `formatsAndUnits(currency)`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidProfile {
    pub formats_and_units: Option<EcwidFormatsAndUnits>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcwidFormatsAndUnits {
    pub currency: Option<String>,
}

// =============================================================================
// Checkout (Storefront API)
// =============================================================================

/// Response of `/checkout/create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidCheckoutSession {
    pub checkout_id: String,
    pub session_token: String,
}

/// Envelope of every session-scoped checkout response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcwidCheckout {
    pub checkout: EcwidOrder,
    pub notices: Vec<Value>,
}

/// The checkout order backing a cart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidOrder {
    pub id: String,
    pub cart_items: Vec<EcwidCartItem>,
    pub amounts: EcwidAmounts,
}

/// Order totals. Amount-only numbers: the currency is the store currency.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidAmounts {
    pub subtotal: Decimal,
    pub subtotal_without_tax: Decimal,
    pub total: Decimal,
    pub total_without_tax: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub is_prices_include_tax: bool,
}

/// One line of a checkout order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidCartItem {
    pub identifier: EcwidCartItemIdentifier,
    pub quantity: u32,
    pub category_id: u64,
    pub price: Decimal,
    pub product_info: EcwidProductInfo,
}

/// Identifies a cart line: product plus selected options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidCartItemIdentifier {
    pub product_id: u64,
    /// `{ "<option name>": { "type": "...", "choice": "..." } }`, in provider order.
    pub selected_options: Option<Map<String, Value>>,
}

impl EcwidCartItemIdentifier {
    /// Selected options as `(name, selection)` pairs, in provider order.
    ///
    /// Entries that do not have the `{type, choice}` shape are skipped.
    #[must_use]
    pub fn selections(&self) -> Vec<(String, EcwidOptionSelection)> {
        self.selected_options
            .iter()
            .flatten()
            .filter_map(|(name, value)| {
                serde_json::from_value::<EcwidOptionSelection>(value.clone())
                    .ok()
                    .map(|selection| (name.clone(), selection))
            })
            .collect()
    }
}

/// Selection of one option on a cart line, as sent to and received from Ecwid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcwidOptionSelection {
    #[serde(rename = "type")]
    pub option_type: String,
    pub choice: String,
}

/// Product snapshot embedded in a cart line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidProductInfo {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub product_price: Option<Decimal>,
    pub slugs: EcwidSlugs,
    pub media_item: Option<EcwidMediaItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidSlugs {
    pub for_route_with_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcwidMediaItem {
    #[serde(rename = "image160pxUrl")]
    pub image_160px_url: Option<String>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Body of `/checkout/add-cart-item`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemPayload {
    pub lang: &'static str,
    pub new_cart_item: NewCartItem,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub identifier: CartItemIdentifierPayload,
    pub quantity: u32,
    pub category_id: u64,
    pub is_preorder: bool,
}

/// Body of `/checkout/remove-cart-item`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemPayload {
    pub lang: &'static str,
    pub cart_item_identifier: CartItemIdentifierPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemIdentifierPayload {
    pub product_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<Map<String, Value>>,
}

/// Body carrying only the storefront language.
#[derive(Debug, Clone, Serialize)]
pub struct LangPayload {
    pub lang: &'static str,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body shapes returned by the two APIs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcwidErrorBody {
    pub errors: Vec<EcwidErrorEntry>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcwidErrorEntry {
    pub status: Option<u16>,
    pub message: Option<String>,
}
