//! Faceted search primitives

pub mod facet_filter;
pub mod paging;

pub use facet_filter::{FacetFilter, OrderBy, SortOrder, DEFAULT_QUANTITY, MAX_QUANTITY};
pub use paging::{Facet, FacetValue, Paging};
