// src/query.rs

use serde::Serialize;
use serde_json::Value;

use crate::coordinate::Coordinate;
use crate::error::BreweryError;
use crate::types::{BreweryType, SortOrder};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 200;

/// Validated filter criteria for a brewery search.
///
/// A `SearchQuery` only exists in a valid state: it is produced by
/// [`SearchQueryBuilder::build`], which checks every filter up front.
///
/// ```
/// use brewcli::query::SearchQuery;
///
/// let query = SearchQuery::builder()
///     .city("Grand Rapids")
///     .ids(["123", "456"])
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     query.to_params(),
///     vec![
///         ("by_city".to_string(), "Grand Rapids".to_string()),
///         ("by_ids".to_string(), "123,456".to_string()),
///         ("page".to_string(), "1".to_string()),
///         ("per_page".to_string(), "50".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    city: Option<String>,
    country: Option<String>,
    coord: Option<Coordinate>,
    name: Option<String>,
    state: Option<String>,
    postal: Option<String>,
    brewery_type: Option<BreweryType>,
    sort_order: Option<SortOrder>,
    ids: Option<Vec<String>>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            city: None,
            country: None,
            coord: None,
            name: None,
            state: None,
            postal: None,
            brewery_type: None,
            sort_order: None,
            ids: None,
            page: Some(DEFAULT_PAGE),
            per_page: Some(DEFAULT_PER_PAGE),
        }
    }
}

impl SearchQuery {
    /// A query with no filters and the default paging.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn coord(&self) -> Option<Coordinate> {
        self.coord
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn postal(&self) -> Option<&str> {
        self.postal.as_deref()
    }

    pub fn brewery_type(&self) -> Option<BreweryType> {
        self.brewery_type
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }

    pub fn ids(&self) -> Option<&[String]> {
        self.ids.as_deref()
    }

    pub fn page(&self) -> Option<u32> {
        self.page
    }

    pub fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Query parameters for the search endpoint.
    ///
    /// Absent filters are omitted, ids are comma-joined and the distance
    /// filter is rendered as `"<latitude>,<longitude>"`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                params.push((key.to_string(), v));
            }
        };

        push("by_city", self.city.clone());
        push("by_country", self.country.clone());
        push("by_dist", self.coord.map(|c| c.to_string()));
        push(
            "by_ids",
            self.ids
                .as_ref()
                .filter(|ids| !ids.is_empty())
                .map(|ids| ids.join(",")),
        );
        push("by_name", self.name.clone());
        push("by_state", self.state.clone());
        push("by_postal", self.postal.clone());
        push("by_type", self.brewery_type.map(|t| t.as_str().to_string()));
        push("page", self.page.map(|p| p.to_string()));
        push("per_page", self.per_page.map(|p| p.to_string()));
        push("sort_order", self.sort_order.map(|s| s.as_str().to_string()));
        params
    }
}

/// Collects raw search inputs; nothing is checked until [`build`](Self::build).
///
/// `page` and `per_page` accept any serializable value so that inputs such as
/// `12.5` or `"abc"` surface as `InvalidValue` instead of being coerced.
/// Pass `None::<u32>` to drop the parameter entirely.
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    city: Option<String>,
    country: Option<String>,
    coord: Option<Coordinate>,
    name: Option<String>,
    state: Option<String>,
    postal: Option<String>,
    brewery_type: Option<String>,
    sort_order: Option<String>,
    ids: Option<Vec<String>>,
    page: Result<Value, String>,
    per_page: Result<Value, String>,
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self {
            city: None,
            country: None,
            coord: None,
            name: None,
            state: None,
            postal: None,
            brewery_type: None,
            sort_order: None,
            ids: None,
            page: Ok(Value::from(DEFAULT_PAGE)),
            per_page: Ok(Value::from(DEFAULT_PER_PAGE)),
        }
    }
}

impl SearchQueryBuilder {
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sorts results by distance from `coord`.
    pub fn coord(mut self, coord: Coordinate) -> Self {
        self.coord = Some(coord);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn postal(mut self, postal: impl Into<String>) -> Self {
        self.postal = Some(postal.into());
        self
    }

    /// Must be one of the lowercase [`BreweryType`] wire values.
    pub fn brewery_type(mut self, brewery_type: impl Into<String>) -> Self {
        self.brewery_type = Some(brewery_type.into());
        self
    }

    /// `"asc"` or `"desc"`.
    pub fn sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn page<V: Serialize>(mut self, page: V) -> Self {
        self.page = serde_json::to_value(page).map_err(|e| e.to_string());
        self
    }

    pub fn per_page<V: Serialize>(mut self, per_page: V) -> Self {
        self.per_page = serde_json::to_value(per_page).map_err(|e| e.to_string());
        self
    }

    /// Validates every filter and produces the query.
    ///
    /// # Errors
    /// `InvalidValue` naming the first offending filter.
    pub fn build(self) -> Result<SearchQuery, BreweryError> {
        let sort_order = self
            .sort_order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?;

        let page = integer_param("page", &self.page, 1, None, "greater than or equal to 1")?;
        let per_page = integer_param(
            "per_page",
            &self.per_page,
            1,
            Some(MAX_PER_PAGE),
            "from 1 to 200",
        )?;

        let brewery_type = self
            .brewery_type
            .as_deref()
            .map(str::parse::<BreweryType>)
            .transpose()?;

        Ok(SearchQuery {
            city: self.city,
            country: self.country,
            coord: self.coord,
            name: self.name,
            state: self.state,
            postal: self.postal,
            brewery_type,
            sort_order,
            ids: self.ids,
            page,
            per_page,
        })
    }
}

// Accepts only JSON integers in [min, max]; `null` means "not set".
fn integer_param(
    field: &str,
    raw: &Result<Value, String>,
    min: u32,
    max: Option<u32>,
    expectation: &str,
) -> Result<Option<u32>, BreweryError> {
    let invalid = |shown: &str| {
        BreweryError::invalid(field, format!("{}. Must be an integer {}", shown, expectation))
    };

    let value = raw.as_ref().map_err(|e| invalid(e.as_str()))?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let parsed = n
                .as_i64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v >= min && max.map_or(true, |m| *v <= m));
            parsed.map(Some).ok_or_else(|| invalid(&n.to_string()))
        }
        other => Err(invalid(&other.to_string())),
    }
}
