//! Collection descriptors for the admin API.
//!
//! Each backend collection is a zero-sized marker type implementing
//! [`Resource`] (read side) and, when it can be edited, [`Writable`]. The
//! generic [`crate::store::Container`] is parameterised over these markers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::client::{ApiClient, ApiError};
use crate::models::{
    Category, CategoryPayload, CrawlLog, CrawlStatus, CrawlType, Entity, Page, Post, PostPayload,
    PostStatus, Role, Source, SourcePayload, Tag, TagPayload, Tenant, TenantPayload, User,
    UserPayload,
};

/// How a collection endpoint wraps its list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// Bare JSON array.
    Plain,
    /// Spring page envelope (`content`, `totalElements`, ...).
    Paged,
}

/// A backend collection that can be listed.
pub trait Resource: Send + Sync + 'static {
    type Item: Entity + DeserializeOwned;

    /// Collection path relative to the API base, without trailing slash.
    const PATH: &'static str;
    const SHAPE: ListShape;
    /// Human-readable name used in logs and status messages.
    const NAME: &'static str;
}

/// A collection that also supports create, update and delete.
pub trait Writable: Resource {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
}

/// Filters accepted by list endpoints. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<PostStatus>,
    pub q: Option<String>,
    pub source_id: Option<i64>,
    pub crawl_type: Option<CrawlType>,
    pub crawl_status: Option<CrawlStatus>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl ListQuery {
    pub fn with_status(status: PostStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Query pairs in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(source_id) = self.source_id {
            pairs.push(("sourceId", source_id.to_string()));
        }
        if let Some(crawl_type) = self.crawl_type {
            pairs.push(("crawlType", enum_wire_name(&crawl_type)));
        }
        if let Some(status) = self.crawl_status {
            pairs.push(("status", enum_wire_name(&status)));
        }
        if let Some(role) = self.role {
            pairs.push(("role", enum_wire_name(&role)));
        }
        if let Some(active) = self.is_active {
            pairs.push(("isActive", active.to_string()));
        }
        pairs
    }
}

/// Wire spelling of a unit enum variant (whatever serde renames it to).
fn enum_wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Fetch a collection, unwrapping the page envelope when there is one.
///
/// Returns the items plus the server-reported total for paged collections.
pub async fn fetch_list<R: Resource>(
    api: &ApiClient,
    query: &ListQuery,
) -> Result<(Vec<R::Item>, Option<i64>), ApiError> {
    let pairs = query.pairs();
    match R::SHAPE {
        ListShape::Plain => {
            let items: Vec<R::Item> = api.get(R::PATH, &pairs).await?;
            Ok((items, None))
        }
        ListShape::Paged => {
            let page: Page<R::Item> = api.get(R::PATH, &pairs).await?;
            let total = if page.total_elements > 0 || page.content.is_empty() {
                page.total_elements
            } else {
                page.content.len() as i64
            };
            Ok((page.content, Some(total)))
        }
    }
}

pub fn item_path<R: Resource>(id: i64) -> String {
    format!("{}/{}", R::PATH, id)
}

// ============================================================================
// Collections
// ============================================================================

pub struct Categories;

impl Resource for Categories {
    type Item = Category;
    const PATH: &'static str = "/admin/categories";
    const SHAPE: ListShape = ListShape::Plain;
    const NAME: &'static str = "categories";
}

impl Writable for Categories {
    type Create = CategoryPayload;
    type Update = CategoryPayload;
}

pub struct Posts;

impl Resource for Posts {
    type Item = Post;
    const PATH: &'static str = "/admin/posts";
    const SHAPE: ListShape = ListShape::Paged;
    const NAME: &'static str = "posts";
}

impl Writable for Posts {
    type Create = PostPayload;
    type Update = PostPayload;
}

pub struct Sources;

impl Resource for Sources {
    type Item = Source;
    const PATH: &'static str = "/admin/sources";
    const SHAPE: ListShape = ListShape::Plain;
    const NAME: &'static str = "sources";
}

impl Writable for Sources {
    type Create = SourcePayload;
    type Update = SourcePayload;
}

pub struct Tags;

impl Resource for Tags {
    type Item = Tag;
    const PATH: &'static str = "/admin/tags";
    const SHAPE: ListShape = ListShape::Plain;
    const NAME: &'static str = "tags";
}

impl Writable for Tags {
    type Create = TagPayload;
    type Update = TagPayload;
}

pub struct Users;

impl Resource for Users {
    type Item = User;
    const PATH: &'static str = "/admin/users";
    const SHAPE: ListShape = ListShape::Paged;
    const NAME: &'static str = "users";
}

impl Writable for Users {
    type Create = UserPayload;
    type Update = UserPayload;
}

pub struct Tenants;

impl Resource for Tenants {
    type Item = Tenant;
    const PATH: &'static str = "/admin/tenants";
    const SHAPE: ListShape = ListShape::Paged;
    const NAME: &'static str = "tenants";
}

impl Writable for Tenants {
    type Create = TenantPayload;
    type Update = TenantPayload;
}

/// Crawl history. Read-only.
pub struct CrawlLogs;

impl Resource for CrawlLogs {
    type Item = CrawlLog;
    const PATH: &'static str = "/admin/crawl-logs";
    const SHAPE: ListShape = ListShape::Paged;
    const NAME: &'static str = "crawl logs";
}
