//! Product reshaping.

use crate::ecwid::api::{EcwidMedia, EcwidNode};
use crate::ecwid::types::{CurrencyCode, Image, Money, Product, ProductOption, Seo};
use crate::ecwid::variants::build_variants;

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "/static/images/placeholder.png";

/// The placeholder featured image.
#[must_use]
pub fn default_image() -> Image {
    Image {
        url: PLACEHOLDER_IMAGE_URL.to_string(),
        alt_text: String::new(),
        width: 1000,
        height: 1000,
    }
}

pub fn reshape_image(media: &EcwidMedia) -> Image {
    Image {
        url: media.url.clone(),
        alt_text: media
            .alt
            .clone()
            .or_else(|| media.name.clone())
            .unwrap_or_default(),
        width: media.width,
        height: media.height,
    }
}

/// URL handle of a product: its clean URL path without surrounding slashes,
/// percent-encoded.
fn product_handle(url: &str) -> String {
    // Ecwid returns absolute clean URLs; keep only the path.
    let path = url::Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string());
    let path = urlencoding::decode(&path).map_or_else(|_| path.clone(), |p| p.into_owned());
    urlencoding::encode(path.trim_matches('/')).into_owned()
}

/// Reshape a catalog node into a [`Product`].
///
/// Returns `None` for disabled products when `filter_hidden` is set.
#[must_use]
pub fn reshape_product(
    node: &EcwidNode,
    filter_hidden: bool,
    currency: &CurrencyCode,
) -> Option<Product> {
    if filter_hidden && !node.enabled {
        return None;
    }

    let description = node.description.clone().unwrap_or_default();
    let seo = Seo {
        title: node
            .seo_title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| node.name.clone()),
        description: node
            .seo_description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| description.clone()),
    };

    let options = node
        .options
        .iter()
        .map(|option| ProductOption {
            id: option.name.clone(),
            name: option.name.clone(),
            option_type: option.option_type.clone(),
            values: option.choices.iter().map(|c| c.text.clone()).collect(),
        })
        .collect();

    let variant_set = build_variants(node, currency);

    let mut images: Vec<Image> = node.gallery_images.iter().map(reshape_image).collect();
    let featured_image = match &node.original_image {
        Some(original) if !original.url.is_empty() => {
            let featured = reshape_image(original);
            images.insert(0, featured.clone());
            featured
        }
        _ => default_image(),
    };

    let compare_at_price = node
        .compare_to_price
        .filter(|p| !p.is_zero())
        .map(|p| Money::new(p, currency.clone()));

    Some(Product {
        id: node.id.to_string(),
        handle: product_handle(&node.url),
        title: node.name.clone(),
        description_html: description.clone(),
        description,
        available_for_sale: node.in_stock,
        options,
        variants: variant_set.variants,
        price_range: variant_set.price_range,
        compare_at_price,
        featured_image,
        images,
        seo,
        updated_at: node.update_date.clone(),
    })
}

/// Reshape a product list, dropping hidden products.
#[must_use]
pub fn reshape_products(nodes: &[EcwidNode], currency: &CurrencyCode) -> Vec<Product> {
    nodes
        .iter()
        .filter_map(|node| reshape_product(node, true, currency))
        .collect()
}
