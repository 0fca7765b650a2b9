//! Search over the places gateway
//!
//! - `service` picks the gateway call for a filter set
//! - `filter` applies the client-side rating and price predicates
//! - `pagination` reveals filtered results a page at a time

pub mod filter;
pub mod pagination;
pub mod service;

pub use filter::{apply, matches, sort_by_distance};
pub use pagination::{PagedResults, Pagination, paginate};
pub use service::{SearchPlan, SearchService};
