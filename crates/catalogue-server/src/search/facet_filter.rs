//! Search parameters shared by every list endpoint

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CatalogueError, CatalogueResult};

pub const DEFAULT_QUANTITY: usize = 10;

/// Quantity used when every match is wanted
pub const MAX_QUANTITY: usize = 10_000;

/// Field name used for free text in rendered queries
pub const SEARCHABLE_AREA: &str = "searchableArea";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub order: SortOrder,
}

/// Keyword, paging, ordering, filters and requested facets
///
/// Values of one filter are OR'd, different filters are AND'd.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetFilter {
    pub keyword: Option<String>,
    pub from: usize,
    pub quantity: usize,
    pub order_by: Option<OrderBy>,
    pub filters: BTreeMap<String, Vec<String>>,
    pub browse_by: Vec<String>,
}

impl Default for FacetFilter {
    fn default() -> Self {
        Self {
            keyword: None,
            from: 0,
            quantity: DEFAULT_QUANTITY,
            order_by: None,
            filters: BTreeMap::new(),
            browse_by: Vec::new(),
        }
    }
}

fn parse_number(name: &str, value: &str) -> CatalogueResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| CatalogueError::validation(format!("'{}' must be a non-negative number", name)))
}

impl FacetFilter {
    /// Everything matching `filters`
    pub fn all() -> Self {
        Self {
            quantity: MAX_QUANTITY,
            ..Default::default()
        }
    }

    /// Build from raw query parameters
    ///
    /// `query`, `from`, `quantity`, `order` and `orderField` are consumed, any
    /// other parameter becomes a filter. Comma separated values are split.
    pub fn from_params<I>(params: I) -> CatalogueResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut ff = Self::default();
        let mut order = SortOrder::Asc;
        let mut order_field = None;

        for (key, value) in params {
            match key.as_str() {
                "query" | "keyword" => {
                    ff.keyword = Some(value).filter(|v| !v.trim().is_empty());
                },
                "from" => ff.from = parse_number("from", &value)?,
                "quantity" => ff.quantity = parse_number("quantity", &value)?.min(MAX_QUANTITY),
                "order" => {
                    order = match value.to_lowercase().as_str() {
                        "desc" => SortOrder::Desc,
                        _ => SortOrder::Asc,
                    }
                },
                "orderField" => order_field = Some(value).filter(|v| !v.is_empty()),
                "browseBy" => {
                    for field in value.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                        if !ff.browse_by.iter().any(|b| b == field) {
                            ff.browse_by.push(field.to_string());
                        }
                    }
                },
                _ => {
                    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        ff.add_filter(&key, part);
                    }
                },
            }
        }

        ff.order_by = order_field.map(|field| OrderBy { field, order });
        Ok(ff)
    }

    /// Add a value to a filter, ignoring duplicates
    pub fn add_filter(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let values = self.filters.entry(field.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    /// Replace a filter with a single value
    pub fn set_filter(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.filters.insert(field.to_string(), vec![value.into()]);
        self
    }

    pub fn with_filter(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set_filter(field, value);
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn keywords(&self) -> Vec<&str> {
        self.keyword
            .as_deref()
            .map(|k| k.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Render as a registry query string, used in logs
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();

        let keywords = self.keywords();
        if !keywords.is_empty() {
            let terms: Vec<String> = keywords
                .iter()
                .map(|k| format!("{}={}", SEARCHABLE_AREA, k))
                .collect();
            parts.push(format!("( {} )", terms.join(" OR ")));
        }

        for (field, values) in &self.filters {
            let terms: Vec<String> = values.iter().map(|v| format!("{}={}", field, v)).collect();
            match terms.len() {
                0 => {},
                1 => parts.push(terms.join("")),
                _ => parts.push(format!("( {} )", terms.join(" OR "))),
            }
        }

        parts.join(" AND ")
    }
}
