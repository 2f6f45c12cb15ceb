//! Collection and menu reshaping.

use crate::ecwid::api::EcwidNode;
use crate::ecwid::types::{Collection, Menu, Seo};

/// Path of the catch-all search page, which doubles as the "All" collection.
pub const ALL_PRODUCTS_PATH: &str = "/search";

/// The synthetic "All" collection listed before the real categories.
#[must_use]
pub fn all_collection() -> Collection {
    Collection {
        handle: String::new(),
        title: "All".to_string(),
        description: "All products".to_string(),
        seo: Seo {
            title: "All".to_string(),
            description: "All products".to_string(),
        },
        path: ALL_PRODUCTS_PATH.to_string(),
        updated_at: None,
    }
}

#[must_use]
pub fn reshape_collection(node: &EcwidNode) -> Collection {
    let description = node.description.clone().unwrap_or_default();

    Collection {
        handle: node.id.to_string(),
        title: node.name.clone(),
        seo: Seo {
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
        },
        description,
        path: node.url.clone(),
        updated_at: node.update_date.clone(),
    }
}

#[must_use]
pub fn reshape_collections(nodes: &[EcwidNode]) -> Vec<Collection> {
    nodes.iter().map(reshape_collection).collect()
}

/// Menu entries for top-level categories, led by "All".
#[must_use]
pub fn reshape_menu(nodes: &[EcwidNode]) -> Vec<Menu> {
    std::iter::once(Menu {
        title: "All".to_string(),
        path: ALL_PRODUCTS_PATH.to_string(),
    })
    .chain(nodes.iter().map(|node| Menu {
        title: node.name.clone(),
        path: node.url.clone(),
    }))
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category() -> EcwidNode {
        serde_json::from_value(json!({
            "id": 314,
            "name": "Kitchen",
            "url": "/search/Kitchen-c314",
            "description": "Pots and pans",
            "seoTitle": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_reshape_collection() {
        let collection = reshape_collection(&category());
        assert_eq!(collection.handle, "314");
        assert_eq!(collection.title, "Kitchen");
        assert_eq!(collection.path, "/search/Kitchen-c314");
        // Empty SEO title falls back to the name.
        assert_eq!(collection.seo.title, "Kitchen");
        assert_eq!(collection.seo.description, "Pots and pans");
    }

    #[test]
    fn test_menu_starts_with_all() {
        let menu = reshape_menu(&[category()]);
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].path, ALL_PRODUCTS_PATH);
        assert_eq!(menu[1].title, "Kitchen");
    }

    #[test]
    fn test_all_collection() {
        let all = all_collection();
        assert!(all.handle.is_empty());
        assert_eq!(all.path, "/search");
    }
}
