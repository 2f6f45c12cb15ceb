//! Catalog reads: store profile, categories, and products.

use tracing::{debug, instrument, warn};

use super::{CacheTag, EcwidClient, EcwidRequest};
use crate::ecwid::EcwidError;
use crate::ecwid::api::{EcwidNode, EcwidPagedResult, EcwidProfile};
use crate::ecwid::reshape::{
    all_collection, reshape_collection, reshape_collections, reshape_menu, reshape_product,
    reshape_products,
};
use crate::ecwid::reshape::collections::ALL_PRODUCTS_PATH;
use crate::ecwid::sorting::SortFilterItem;
use crate::ecwid::types::{Collection, CurrencyCode, Menu, Product};

/// Pseudo-collections used by the home page; they list every product.
pub const HOMEPAGE_COLLECTIONS: [&str; 2] =
    ["hidden-homepage-carousel", "hidden-homepage-featured-items"];

/// Product id at the end of a product handle (`Enamel-Mug-p42` → `42`).
///
/// Takes the text after the last `-p`; a handle without one is returned
/// whole, so a bare id works too.
#[must_use]
pub fn product_id_from_handle(handle: &str) -> &str {
    id_after_marker(handle, "-p")
}

/// Category id at the end of a collection handle (`Kitchen-c314` → `314`).
#[must_use]
pub fn category_id_from_handle(handle: &str) -> &str {
    id_after_marker(handle, "-c")
}

fn id_after_marker<'a>(handle: &'a str, marker: &str) -> &'a str {
    handle.rsplit_once(marker).map_or(handle, |(_, id)| id)
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Append the catalog's clean-URL parameters.
fn with_clean_urls(request: EcwidRequest, base_url: &str) -> EcwidRequest {
    request.query("cleanUrls", "true").query("baseUrl", base_url)
}

fn with_sort(request: EcwidRequest, sort: &SortFilterItem) -> EcwidRequest {
    match sort.sort_by_param() {
        Some(sort_by) => request.query("sortBy", sort_by),
        None => request,
    }
}

impl EcwidClient {
    // =========================================================================
    // Store Profile
    // =========================================================================

    /// Read the store currency from the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. A profile without a
    /// currency yields `USD`.
    #[instrument(skip(self))]
    pub async fn get_store_currency_code(&self) -> Result<CurrencyCode, EcwidError> {
        let request = EcwidRequest::get("/profile")
            .query("responseFields", "formatsAndUnits(currency)")
            .tag(CacheTag::Profile);

        let profile: Option<EcwidProfile> = self.fetch(request).await?;

        Ok(profile
            .and_then(|p| p.formats_and_units)
            .and_then(|f| f.currency)
            .filter(|c| !c.trim().is_empty())
            .map_or_else(CurrencyCode::default, |c| CurrencyCode::new(&c)))
    }

    /// Load the store currency into the shared currency state.
    ///
    /// Failures are logged and the previous value is kept, so this never
    /// blocks startup.
    pub async fn init_currency_code(&self) -> CurrencyCode {
        match self.get_store_currency_code().await {
            Ok(code) => {
                tracing::info!(currency = %code, "Store currency loaded");
                self.set_currency_code(code.clone());
                code
            }
            Err(e) => {
                let current = self.currency_code();
                warn!(
                    error = %e,
                    currency = %current,
                    "Failed to load store currency, keeping current"
                );
                current
            }
        }
    }

    // =========================================================================
    // Menu & Collection Methods
    // =========================================================================

    /// Navigation menu: "All" followed by the first top-level categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Vec<Menu>, EcwidError> {
        if handle.ends_with("footer-menu") {
            return Ok(Vec::new());
        }

        let request = EcwidRequest::get("/categories")
            .query("parent", "0")
            .query("limit", "2")
            .tag(CacheTag::Collections);
        let request = with_clean_urls(request, ALL_PRODUCTS_PATH);

        let result: Option<EcwidPagedResult<EcwidNode>> = self.fetch(request).await?;

        Ok(reshape_menu(&result.unwrap_or_default().items))
    }

    /// All collections, led by the synthetic "All" collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, EcwidError> {
        let request = with_clean_urls(
            EcwidRequest::get("/categories").tag(CacheTag::Collections),
            ALL_PRODUCTS_PATH,
        );

        let result: Option<EcwidPagedResult<EcwidNode>> = self.fetch(request).await?;

        let mut collections = vec![all_collection()];
        collections.extend(reshape_collections(&result.unwrap_or_default().items));
        Ok(collections)
    }

    /// Get a collection by its handle.
    ///
    /// Returns `Ok(None)` when the handle carries no numeric id or Ecwid
    /// does not know the category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(&self, handle: &str) -> Result<Option<Collection>, EcwidError> {
        let category_id = category_id_from_handle(handle);
        if !is_numeric_id(category_id) {
            debug!("Collection handle has no category id");
            return Ok(None);
        }

        let request =
            EcwidRequest::get(format!("/categories/{category_id}")).tag(CacheTag::Collections);

        match self.fetch::<EcwidNode>(request).await {
            Ok(node) => Ok(node.map(|n| reshape_collection(&n))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Enabled products of a collection.
    ///
    /// The home page pseudo-collections list products from every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, sort), fields(collection = %collection))]
    pub async fn get_collection_products(
        &self,
        collection: &str,
        sort: &SortFilterItem,
    ) -> Result<Vec<Product>, EcwidError> {
        let mut request = EcwidRequest::get("/products")
            .query("enabled", "true")
            .tag(CacheTag::Products);
        request = with_clean_urls(request, "/");

        if !HOMEPAGE_COLLECTIONS.contains(&collection) {
            request = request.query("categories", category_id_from_handle(collection));
        }
        request = with_sort(request, sort);

        let result: Option<EcwidPagedResult<EcwidNode>> = self.fetch(request).await?;

        match result {
            Some(page) => Ok(reshape_products(&page.items, &self.currency_code())),
            None => {
                debug!("No products found for collection");
                Ok(Vec::new())
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Search products by keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, sort))]
    pub async fn get_products(
        &self,
        query: Option<&str>,
        sort: &SortFilterItem,
    ) -> Result<Vec<Product>, EcwidError> {
        let mut request =
            with_clean_urls(EcwidRequest::get("/products").tag(CacheTag::Products), "/");

        if let Some(keyword) = query.filter(|q| !q.is_empty()) {
            request = request.query("keyword", keyword);
        }
        request = with_sort(request, sort);

        let result: Option<EcwidPagedResult<EcwidNode>> = self.fetch(request).await?;

        Ok(reshape_products(
            &result.unwrap_or_default().items,
            &self.currency_code(),
        ))
    }

    /// Fetch a product node by id, `None` when Ecwid does not know it.
    pub(super) async fn get_product_node(
        &self,
        product_id: &str,
    ) -> Result<Option<EcwidNode>, EcwidError> {
        if !is_numeric_id(product_id) {
            return Ok(None);
        }

        let request = EcwidRequest::get(format!("/products/{product_id}")).tag(CacheTag::Products);

        match self.fetch::<EcwidNode>(request).await {
            Ok(node) => Ok(node),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a product by its handle.
    ///
    /// Hidden products are reported as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Option<Product>, EcwidError> {
        let node = self.get_product_node(product_id_from_handle(handle)).await?;

        Ok(node.and_then(|n| reshape_product(&n, true, &self.currency_code())))
    }

    /// Products the merchant configured as related to `product_id`.
    ///
    /// Uses the explicit related product ids and, when enabled, products
    /// from the related category. The source product is never included.
    ///
    /// # Errors
    ///
    /// Returns an error if either API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &str,
    ) -> Result<Vec<Product>, EcwidError> {
        let Some(node) = self.get_product_node(product_id).await? else {
            return Ok(Vec::new());
        };
        let related = node.related_products.unwrap_or_default();

        let mut request = EcwidRequest::get("/products").tag(CacheTag::Products);
        let mut has_source = false;

        if !related.product_ids.is_empty() {
            let ids = related
                .product_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            request = request.query("productId", ids);
            has_source = true;
        }

        if let Some(category) = related.related_category.filter(|c| c.enabled) {
            request = request
                .query("categories", category.category_id.to_string())
                .query("includeProductsFromSubcategories", "true")
                .query("limit", category.product_count.to_string());
            has_source = true;
        }

        if !has_source {
            return Ok(Vec::new());
        }

        let result: Option<EcwidPagedResult<EcwidNode>> =
            self.fetch(with_clean_urls(request, "/")).await?;

        let items: Vec<EcwidNode> = result
            .unwrap_or_default()
            .items
            .into_iter()
            .filter(|n| n.id != node.id)
            .collect();

        Ok(reshape_products(&items, &self.currency_code()))
    }
}
