//! Cart reshaping from Ecwid checkout orders.

use crate::ecwid::api::{EcwidCartItem, EcwidOrder};
use crate::ecwid::types::{
    Cart, CartCost, CartItem, CartItemCost, CurrencyCode, Image, Merchandise, Money, PriceRange,
    Product, SelectedOption, Seo, VariantId,
};

/// Merchandise title of a line without options.
pub const DEFAULT_OPTION: &str = "Default";

/// Storefront path of the checkout page for a cart.
fn checkout_url(cart_id: &str) -> String {
    format!("/checkout?id={cart_id}")
}

/// A cart with no lines, as returned right after checkout creation.
#[must_use]
pub fn empty_cart(id: String, session_token: String, currency: &CurrencyCode) -> Cart {
    Cart {
        checkout_url: checkout_url(&id),
        id,
        session_token: Some(session_token),
        cost: CartCost {
            subtotal_amount: Money::zero(currency.clone()),
            total_amount: Money::zero(currency.clone()),
            total_tax_amount: Money::zero(currency.clone()),
        },
        total_quantity: 0,
        lines: Vec::new(),
    }
}

/// Reshape a checkout order into a [`Cart`].
///
/// Ecwid amounts carry no currency, so the store currency is applied.
#[must_use]
pub fn reshape_order(order: &EcwidOrder, currency: &CurrencyCode) -> Cart {
    let total_quantity: u32 = order.cart_items.iter().map(|item| item.quantity).sum();

    let lines = if total_quantity > 0 {
        order
            .cart_items
            .iter()
            .map(|item| reshape_order_line(item, currency))
            .collect()
    } else {
        Vec::new()
    };

    Cart {
        id: order.id.clone(),
        session_token: None,
        checkout_url: checkout_url(&order.id),
        cost: CartCost {
            subtotal_amount: Money::new(order.amounts.subtotal, currency.clone()),
            total_amount: Money::new(order.amounts.total, currency.clone()),
            total_tax_amount: Money::new(order.amounts.tax, currency.clone()),
        },
        total_quantity,
        lines,
    }
}

/// Reshape one checkout line into a [`CartItem`].
///
/// The line id is the same composite key as the matching product variant,
/// so the cart can be mutated with it later.
#[must_use]
pub fn reshape_order_line(item: &EcwidCartItem, currency: &CurrencyCode) -> CartItem {
    let product_id = item.identifier.product_id.to_string();

    let selected_options: Vec<SelectedOption> = item
        .identifier
        .selections()
        .into_iter()
        .map(|(name, selection)| SelectedOption::new(name, selection.choice))
        .collect();

    let id = VariantId::new(product_id.clone(), selected_options.clone());

    let title = if selected_options.is_empty() {
        DEFAULT_OPTION.to_string()
    } else {
        id.options_label()
    };

    let info = &item.product_info;
    let unit_price = Money::new(item.price, currency.clone());

    let product = Product {
        id: product_id.clone(),
        handle: format!("{}-p{product_id}", info.slugs.for_route_with_id),
        title: info.name.clone(),
        description: String::new(),
        description_html: String::new(),
        available_for_sale: true,
        options: Vec::new(),
        variants: Vec::new(),
        price_range: PriceRange {
            min_variant_price: unit_price.clone(),
            max_variant_price: unit_price.clone(),
        },
        compare_at_price: None,
        featured_image: Image {
            url: info
                .media_item
                .as_ref()
                .and_then(|m| m.image_160px_url.clone())
                .unwrap_or_default(),
            alt_text: info.name.clone(),
            width: 0,
            height: 0,
        },
        images: Vec::new(),
        seo: Seo::default(),
        updated_at: None,
    };

    CartItem {
        id: id.clone(),
        quantity: item.quantity,
        cost: CartItemCost {
            total_amount: unit_price.times(item.quantity),
        },
        merchandise: Merchandise {
            id,
            title,
            selected_options,
            product,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn order() -> EcwidOrder {
        serde_json::from_value(json!({
            "id": "ABC-123",
            "cartItems": [
                {
                    "identifier": {
                        "productId": 100,
                        "selectedOptions": {
                            "Size": {"type": "SIZE", "choice": "L"},
                            "Color": {"type": "DROPDOWN", "choice": "Blue"}
                        }
                    },
                    "quantity": 2,
                    "price": 25,
                    "productInfo": {
                        "name": "Shirt",
                        "slugs": {"forRouteWithId": "shirt"},
                        "mediaItem": {"image160pxUrl": "https://cdn.example.com/shirt-160.jpg"}
                    }
                },
                {
                    "identifier": {"productId": 7},
                    "quantity": 3,
                    "price": 9.5,
                    "productInfo": {"name": "Mug", "slugs": {"forRouteWithId": "mug"}}
                }
            ],
            "amounts": {"subtotal": 78.5, "total": 84.78, "tax": 6.28}
        }))
        .unwrap()
    }

    #[test]
    fn test_total_quantity_sums_lines() {
        let cart = reshape_order(&order(), &CurrencyCode::default());
        assert_eq!(cart.total_quantity, 5);
        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_cart_cost_uses_store_currency() {
        let cart = reshape_order(&order(), &CurrencyCode::new("CAD"));
        assert_eq!(cart.id, "ABC-123");
        assert_eq!(cart.checkout_url, "/checkout?id=ABC-123");
        assert_eq!(cart.cost.subtotal_amount.amount, Decimal::new(785, 1));
        assert_eq!(cart.cost.total_amount.amount, Decimal::new(8478, 2));
        assert_eq!(cart.cost.total_tax_amount.amount, Decimal::new(628, 2));
        assert_eq!(cart.cost.total_amount.currency_code.as_str(), "CAD");
    }

    #[test]
    fn test_line_id_matches_variant_id_format() {
        let cart = reshape_order(&order(), &CurrencyCode::default());
        let shirt = &cart.lines[0];
        assert_eq!(shirt.id.to_string(), "100|Size:L|Color:Blue");
        assert_eq!(shirt.merchandise.id, shirt.id);
        assert_eq!(shirt.merchandise.title, "Size:L, Color:Blue");
        assert_eq!(shirt.merchandise.product.handle, "shirt-p100");
        assert_eq!(
            shirt.merchandise.product.featured_image.url,
            "https://cdn.example.com/shirt-160.jpg"
        );
    }

    #[test]
    fn test_line_without_options() {
        let cart = reshape_order(&order(), &CurrencyCode::default());
        let mug = &cart.lines[1];
        assert_eq!(mug.id.to_string(), "7");
        assert_eq!(mug.merchandise.title, DEFAULT_OPTION);
        assert!(mug.merchandise.selected_options.is_empty());
        assert!(mug.merchandise.product.featured_image.url.is_empty());
    }

    #[test]
    fn test_line_cost_is_unit_price_times_quantity() {
        let cart = reshape_order(&order(), &CurrencyCode::default());
        assert_eq!(cart.lines[0].cost.total_amount.amount, Decimal::from(50));
        assert_eq!(cart.lines[1].cost.total_amount.amount, Decimal::new(285, 1));
        assert_eq!(
            cart.lines[1].merchandise.product.price_range.min_variant_price.amount,
            Decimal::new(95, 1)
        );
    }

    #[test]
    fn test_empty_order() {
        let empty: EcwidOrder = serde_json::from_value(json!({"id": "X"})).unwrap();
        let cart = reshape_order(&empty, &CurrencyCode::default());
        assert_eq!(cart.total_quantity, 0);
        assert!(cart.lines.is_empty());
        assert_eq!(cart.cost.total_amount.amount, Decimal::ZERO);
    }

    #[test]
    fn test_empty_cart_carries_session_token() {
        let cart = empty_cart("C1".to_string(), "tok".to_string(), &CurrencyCode::default());
        assert_eq!(cart.session_token.as_deref(), Some("tok"));
        assert_eq!(cart.total_quantity, 0);
    }
}
