//! REST access to the CMS backend.
//!
//! - [`client`] - the single outbound HTTP path (base URL, timeout, bearer token)
//! - [`resources`] - collection descriptors driving the generic state containers
//! - `endpoints` - non-CRUD calls, added as inherent methods on [`ApiClient`]

pub mod client;
mod endpoints;
pub mod resources;

pub use client::{ApiClient, ApiError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use endpoints::DEFAULT_CRAWL_LIMIT;
pub use resources::{
    Categories, CrawlLogs, ListQuery, ListShape, Posts, Resource, Sources, Tags, Tenants, Users,
    Writable,
};
