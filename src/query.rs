//! Options for the domain query operations.
//!
//! Each type turns into the [`QueryParameters`] of one endpoint family.

use crate::gateway::{ParamValue, QueryParameters};

/// Sorting and filtering shared by the list endpoints
/// (countries, country codes, codecs, states, languages, tags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Attribute the list is sorted by.
    pub order: String,
    pub reverse: bool,
    /// Do not count broken stations.
    pub hidebroken: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            order: "name".to_string(),
            reverse: false,
            hidebroken: false,
        }
    }
}

impl ListOptions {
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn hidebroken(mut self, hidebroken: bool) -> Self {
        self.hidebroken = hidebroken;
        self
    }

    pub fn to_params(&self) -> QueryParameters {
        QueryParameters::new()
            .with("order", self.order.as_str())
            .with("reverse", self.reverse)
            .with("hidebroken", self.hidebroken)
    }
}

/// Paging for the full station list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationsOptions {
    pub order: String,
    pub reverse: bool,
    /// Index of the first returned station.
    pub offset: u32,
    /// Maximum number of returned stations.
    pub limit: u32,
}

impl Default for StationsOptions {
    fn default() -> Self {
        Self {
            order: "name".to_string(),
            reverse: false,
            offset: 0,
            limit: 100_000,
        }
    }
}

impl StationsOptions {
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn to_params(&self) -> QueryParameters {
        QueryParameters::new()
            .with("order", self.order.as_str())
            .with("reverse", self.reverse)
            .with("offset", self.offset)
            .with("limit", self.limit)
    }
}

/// Advanced station search.
///
/// Only fields that were set are sent; the server applies its own defaults
/// for the rest. See <https://de1.api.radio-browser.info/#Advanced_station_search>.
///
/// ```rust,ignore
/// let query = SearchQuery::new().name("Radio Record").limit(2);
/// let stations = client.search(&query).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    params: QueryParameters,
}

macro_rules! search_field {
    ($($(#[$doc:meta])* $field:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $field(mut self, value: $ty) -> Self {
                self.params.insert(stringify!($field), value);
                self
            }
        )*
    };
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    search_field! {
        /// Station name contains the term.
        name: &str,
        /// Only exact name matches.
        name_exact: bool,
        country: &str,
        country_exact: bool,
        /// ISO 3166-1 alpha-2 country code.
        countrycode: &str,
        state: &str,
        state_exact: bool,
        language: &str,
        language_exact: bool,
        tag: &str,
        tag_exact: bool,
        /// Comma-separated tags that must all match.
        tag_list: &str,
        /// Minimum bitrate in kbps.
        bitrate_min: u32,
        /// Maximum bitrate in kbps.
        bitrate_max: u32,
        order: &str,
        reverse: bool,
        offset: u32,
        limit: u32,
        hidebroken: bool,
    }

    /// Sets a parameter that has no dedicated setter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn params(&self) -> &QueryParameters {
        &self.params
    }
}
