//! URL construction for the two REST scopes.
//!
//! Storefront calls are addressed to a store view
//! (`{base}/rest/{store}/V1/...`), admin calls to the global scope
//! (`{base}/rest/V1/...`). Path segments are pushed one at a time so values
//! like SKUs are percent-encoded and can never introduce extra segments.

use thiserror::Error;
use url::Url;

use crate::config::PlatformConfig;

/// Errors building an [`Endpoints`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("base URL must use http or https, got `{0}`")]
    UnsupportedScheme(String),
    #[error("base URL cannot carry path segments: {0}")]
    CannotBeABase(String),
    #[error("store code cannot be empty")]
    EmptyStoreCode,
}

/// Which REST scope a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Store-view scoped (customer and cart calls).
    Storefront,
    /// Global scope (admin catalog and sales calls).
    Admin,
}

/// Builds request URLs for a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    store_code: String,
}

impl Endpoints {
    /// Create a builder for `base` and `store_code`.
    ///
    /// # Errors
    ///
    /// Returns error if `base` is not an http(s) URL or the store code is blank.
    pub fn new(mut base: Url, store_code: impl Into<String>) -> Result<Self, EndpointError> {
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(base.scheme().to_string()));
        }
        if base.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(base.to_string()));
        }
        let store_code = store_code.into();
        if store_code.trim().is_empty() {
            return Err(EndpointError::EmptyStoreCode);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base, store_code })
    }

    /// Builder for the configured platform.
    ///
    /// # Errors
    ///
    /// See [`Endpoints::new`].
    pub fn from_config(config: &PlatformConfig) -> Result<Self, EndpointError> {
        Self::new(config.base_url.clone(), config.store_code.clone())
    }

    /// The store view code used for storefront calls.
    #[must_use]
    pub fn store_code(&self) -> &str {
        &self.store_code
    }

    /// URL for `segments` under `scope`.
    #[must_use]
    pub fn url<I, S>(&self, scope: Scope, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("rest");
            if scope == Scope::Storefront {
                path.push(&self.store_code);
            }
            path.push("V1").extend(segments);
        }
        url
    }

    /// Storefront-scoped URL.
    #[must_use]
    pub fn storefront<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.url(Scope::Storefront, segments)
    }

    /// Admin-scoped URL.
    #[must_use]
    pub fn admin<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.url(Scope::Admin, segments)
    }
}

/// Magento-style `searchCriteria` query.
///
/// Filters inside a group are OR-ed, groups are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub filter_groups: Vec<Vec<Filter>>,
    pub page_size: Option<u32>,
    pub current_page: Option<u32>,
}

/// One `field <condition> value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub condition_type: String,
}

impl Filter {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        condition_type: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            condition_type: condition_type.into(),
        }
    }
}

impl SearchCriteria {
    /// Match `field` with a SQL `LIKE` pattern.
    #[must_use]
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::default().and(Filter::new(field, pattern, "like"))
    }

    /// Exact match on `field`.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::default().and(Filter::new(field, value, "eq"))
    }

    /// Add a filter as its own group.
    #[must_use]
    pub fn and(mut self, filter: Filter) -> Self {
        self.filter_groups.push(vec![filter]);
        self
    }

    #[must_use]
    pub const fn page(mut self, page_size: u32, current_page: u32) -> Self {
        self.page_size = Some(page_size);
        self.current_page = Some(current_page);
        self
    }

    /// Bracket-notation query pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (g, group) in self.filter_groups.iter().enumerate() {
            for (f, filter) in group.iter().enumerate() {
                let prefix = format!("searchCriteria[filter_groups][{g}][filters][{f}]");
                pairs.push((format!("{prefix}[field]"), filter.field.clone()));
                pairs.push((format!("{prefix}[value]"), filter.value.clone()));
                pairs.push((
                    format!("{prefix}[condition_type]"),
                    filter.condition_type.clone(),
                ));
            }
        }
        if let Some(size) = self.page_size {
            pairs.push(("searchCriteria[pageSize]".to_string(), size.to_string()));
        }
        if let Some(page) = self.current_page {
            pairs.push(("searchCriteria[currentPage]".to_string(), page.to_string()));
        }
        pairs
    }
}
