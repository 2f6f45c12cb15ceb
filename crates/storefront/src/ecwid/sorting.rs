//! Product sort orders offered by the storefront.

/// Sort key understood by the product search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Ecwid's default relevance ordering; sends no `sortBy`.
    Relevance,
    AddedTime,
    Price,
}

impl SortKey {
    const fn as_param(self) -> &'static str {
        match self {
            Self::Relevance => "RELEVANCE",
            Self::AddedTime => "ADDED_TIME",
            Self::Price => "PRICE",
        }
    }
}

/// A sort option as listed in the storefront's sort menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortFilterItem {
    pub title: &'static str,
    /// URL slug (`?sort=price-asc`); `None` for the default.
    pub slug: Option<&'static str>,
    pub sort_key: SortKey,
    pub reverse: bool,
}

impl SortFilterItem {
    /// Value of the `sortBy` query parameter, e.g. `PRICE_DESC`.
    #[must_use]
    pub fn sort_by_param(&self) -> Option<String> {
        if self.sort_key == SortKey::Relevance {
            return None;
        }
        let direction = if self.reverse { "DESC" } else { "ASC" };
        Some(format!("{}_{direction}", self.sort_key.as_param()))
    }
}

pub const DEFAULT_SORT: SortFilterItem = SortFilterItem {
    title: "Relevance",
    slug: None,
    sort_key: SortKey::Relevance,
    reverse: false,
};

pub const SORTING: [SortFilterItem; 4] = [
    DEFAULT_SORT,
    SortFilterItem {
        title: "Latest arrivals",
        slug: Some("latest-desc"),
        sort_key: SortKey::AddedTime,
        reverse: true,
    },
    SortFilterItem {
        title: "Price: Low to high",
        slug: Some("price-asc"),
        sort_key: SortKey::Price,
        reverse: false,
    },
    SortFilterItem {
        title: "Price: High to low",
        slug: Some("price-desc"),
        sort_key: SortKey::Price,
        reverse: true,
    },
];

/// Look up a sort option by slug, falling back to [`DEFAULT_SORT`].
#[must_use]
pub fn sort_for_slug(slug: Option<&str>) -> SortFilterItem {
    slug.and_then(|s| SORTING.into_iter().find(|item| item.slug == Some(s)))
        .unwrap_or(DEFAULT_SORT)
}
