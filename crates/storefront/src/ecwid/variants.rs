//! Variant synthesis for Ecwid products.
//!
//! Ecwid only returns combinations that the merchant has customized
//! (own SKU, price or stock). Every other choice combination is still
//! purchasable, so the full variant list is synthesized as the cartesian
//! product of all option choices, and the real combinations are overlaid
//! on top.

use rust_decimal::Decimal;

use super::api::EcwidNode;
use super::types::{CurrencyCode, Money, PriceRange, ProductVariant, SelectedOption, VariantId};

/// Every way of picking one element from each set, in set order.
///
/// The product of zero sets is a single empty combination; any empty set
/// makes the whole product empty.
///
/// ```
/// use ecwid_headless_storefront::ecwid::variants::cartesian_product;
///
/// let combos = cartesian_product(&[vec![1, 2], vec![3, 4, 5]]);
/// assert_eq!(combos.len(), 6);
/// assert_eq!(combos[0], vec![1, 3]);
/// assert_eq!(combos[5], vec![2, 5]);
/// ```
#[must_use]
pub fn cartesian_product<T: Clone>(sets: &[Vec<T>]) -> Vec<Vec<T>> {
    sets.iter().fold(vec![Vec::new()], |acc, set| {
        acc.iter()
            .flat_map(|prefix| {
                set.iter().map(move |item| {
                    let mut combo = prefix.clone();
                    combo.push(item.clone());
                    combo
                })
            })
            .collect()
    })
}

/// Variants of a product together with the derived price range.
#[derive(Debug, Clone)]
pub struct VariantSet {
    pub variants: Vec<ProductVariant>,
    pub price_range: PriceRange,
}

/// Build the full variant list of a product node.
///
/// - No declared options (or an option without choices): one default
///   variant carrying the product id, base price and stock flag.
/// - Otherwise: one variant per choice combination, priced at the base
///   price and stocked like the product, then overlaid with every real
///   combination whose option pairs it selects.
///
/// The price range spans the prices of available variants only; when none
/// is available both ends are the base price.
#[must_use]
pub fn build_variants(node: &EcwidNode, currency: &CurrencyCode) -> VariantSet {
    let base_price = node.base_price();
    let product_id = node.id.to_string();

    let choice_sets: Vec<Vec<SelectedOption>> = node
        .options
        .iter()
        .map(|option| {
            option
                .choices
                .iter()
                .map(|choice| SelectedOption::new(option.name.clone(), choice.text.clone()))
                .collect()
        })
        .collect();

    let combinations = if choice_sets.is_empty() {
        Vec::new()
    } else {
        cartesian_product(&choice_sets)
    };

    let mut variants: Vec<ProductVariant> = combinations
        .into_iter()
        .map(|selected_options| {
            let id = VariantId::new(product_id.clone(), selected_options.clone());
            ProductVariant {
                title: format!("{}({})", node.name, id.options_label()),
                id,
                available_for_sale: node.in_stock,
                selected_options,
                price: Money::new(base_price, currency.clone()),
            }
        })
        .collect();

    if variants.is_empty() {
        variants.push(ProductVariant {
            id: VariantId::new(product_id, Vec::new()),
            title: node.name.clone(),
            available_for_sale: node.in_stock,
            selected_options: Vec::new(),
            price: Money::new(base_price, currency.clone()),
        });
    } else {
        overlay_combinations(node, &mut variants, base_price);
    }

    let price_range = available_price_range(&variants, base_price, currency);

    VariantSet {
        variants,
        price_range,
    }
}

/// Copy stock and price of real combinations onto the synthesized variants.
fn overlay_combinations(node: &EcwidNode, variants: &mut [ProductVariant], base_price: Decimal) {
    for combination in &node.combinations {
        let pairs: Vec<SelectedOption> = combination
            .options
            .iter()
            .map(|o| SelectedOption::new(o.name.clone(), o.value.clone()))
            .collect();

        let price = combination
            .price
            .filter(|p| !p.is_zero())
            .unwrap_or(base_price);

        for variant in variants.iter_mut().filter(|v| v.id.selects_all(&pairs)) {
            variant.available_for_sale = combination.in_stock;
            variant.price.amount = price;
        }
    }
}

fn available_price_range(
    variants: &[ProductVariant],
    base_price: Decimal,
    currency: &CurrencyCode,
) -> PriceRange {
    let mut available = variants
        .iter()
        .filter(|v| v.available_for_sale)
        .map(|v| v.price.amount);

    let (min, max) = match available.next() {
        Some(first) => available.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))),
        None => (base_price, base_price),
    };

    PriceRange {
        min_variant_price: Money::new(min, currency.clone()),
        max_variant_price: Money::new(max, currency.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> EcwidNode {
        serde_json::from_value(value).unwrap()
    }

    fn shirt() -> EcwidNode {
        node(json!({
            "id": 100,
            "name": "Shirt",
            "enabled": true,
            "inStock": true,
            "price": 20,
            "options": [
                {"type": "SIZE", "name": "Size", "choices": [{"text": "S"}, {"text": "M"}, {"text": "L"}]},
                {"type": "DROPDOWN", "name": "Color", "choices": [{"text": "Red"}, {"text": "Blue"}]}
            ],
            "combinations": [
                {"id": 1, "inStock": true, "price": 25, "options": [
                    {"name": "Size", "value": "L"}, {"name": "Color", "value": "Blue"}
                ]},
                {"id": 2, "inStock": false, "price": 5, "options": [
                    {"name": "Size", "value": "S"}, {"name": "Color", "value": "Red"}
                ]}
            ]
        }))
    }

    #[test]
    fn test_cartesian_product_sizes() {
        let sets = vec![vec!['a', 'b'], vec!['c'], vec!['d', 'e', 'f']];
        assert_eq!(cartesian_product(&sets).len(), 6);
        assert_eq!(cartesian_product::<u8>(&[]).len(), 1);
        assert!(cartesian_product(&[vec![1], Vec::new()]).is_empty());
    }

    #[test]
    fn test_variant_count_is_product_of_choice_counts() {
        let set = build_variants(&shirt(), &CurrencyCode::default());
        assert_eq!(set.variants.len(), 3 * 2);
    }

    #[test]
    fn test_variant_ids_and_titles() {
        let set = build_variants(&shirt(), &CurrencyCode::default());
        let first = &set.variants[0];
        assert_eq!(first.id.to_string(), "100|Size:S|Color:Red");
        assert_eq!(first.title, "Shirt(Size:S, Color:Red)");
        assert_eq!(
            first.selected_options,
            vec![
                SelectedOption::new("Size", "S"),
                SelectedOption::new("Color", "Red")
            ]
        );
    }

    #[test]
    fn test_real_combinations_overlay_price_and_stock() {
        let set = build_variants(&shirt(), &CurrencyCode::default());
        let find = |id: &str| {
            set.variants
                .iter()
                .find(|v| v.id.to_string() == id)
                .unwrap()
                .clone()
        };

        let large_blue = find("100|Size:L|Color:Blue");
        assert!(large_blue.available_for_sale);
        assert_eq!(large_blue.price.amount, Decimal::from(25));

        let small_red = find("100|Size:S|Color:Red");
        assert!(!small_red.available_for_sale);

        let medium_red = find("100|Size:M|Color:Red");
        assert!(medium_red.available_for_sale);
        assert_eq!(medium_red.price.amount, Decimal::from(20));
    }

    #[test]
    fn test_price_range_ignores_unavailable_variants() {
        let set = build_variants(&shirt(), &CurrencyCode::default());
        // The out-of-stock S/Red combination costs 5 and must not lower the minimum.
        assert_eq!(set.price_range.min_variant_price.amount, Decimal::from(20));
        assert_eq!(set.price_range.max_variant_price.amount, Decimal::from(25));
    }

    #[test]
    fn test_partial_combination_matches_every_superset() {
        let mut product = shirt();
        product.combinations = vec![
            serde_json::from_value(json!({
                "id": 3, "inStock": false, "options": [{"name": "Color", "value": "Red"}]
            }))
            .unwrap(),
        ];

        let set = build_variants(&product, &CurrencyCode::default());
        let red: Vec<_> = set
            .variants
            .iter()
            .filter(|v| v.selected_options.contains(&SelectedOption::new("Color", "Red")))
            .collect();
        assert_eq!(red.len(), 3);
        assert!(red.iter().all(|v| !v.available_for_sale));
        // Combination without a price keeps the base price.
        assert!(red.iter().all(|v| v.price.amount == Decimal::from(20)));
    }

    #[test]
    fn test_no_options_yields_single_default_variant() {
        let plain = node(json!({"id": 7, "name": "Mug", "inStock": true, "price": 9.5}));
        let set = build_variants(&plain, &CurrencyCode::new("EUR"));
        assert_eq!(set.variants.len(), 1);

        let variant = &set.variants[0];
        assert_eq!(variant.id.to_string(), "7");
        assert_eq!(variant.title, "Mug");
        assert!(variant.selected_options.is_empty());
        assert_eq!(variant.price.amount, Decimal::new(95, 1));
        assert_eq!(variant.price.currency_code.as_str(), "EUR");
        assert_eq!(set.price_range.min_variant_price, set.price_range.max_variant_price);
    }

    #[test]
    fn test_nothing_available_falls_back_to_base_price() {
        let mut product = shirt();
        product.in_stock = false;
        product.combinations.clear();
        let set = build_variants(&product, &CurrencyCode::default());
        assert_eq!(set.price_range.min_variant_price.amount, Decimal::from(20));
        assert_eq!(set.price_range.max_variant_price.amount, Decimal::from(20));
    }

    #[test]
    fn test_min_never_exceeds_max() {
        let mut product = shirt();
        product.combinations = (0..6)
            .map(|i| {
                let size = ["S", "M", "L"][i as usize % 3];
                let color = ["Red", "Blue"][i as usize / 3];
                serde_json::from_value(json!({
                    "id": i,
                    "inStock": i % 2 == 0,
                    "price": 10 + i * 7,
                    "options": [
                        {"name": "Size", "value": size},
                        {"name": "Color", "value": color}
                    ]
                }))
                .unwrap()
            })
            .collect();

        let range = build_variants(&product, &CurrencyCode::default()).price_range;
        assert!(range.min_variant_price.amount <= range.max_variant_price.amount);
    }
}
