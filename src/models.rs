//! Wire types shared with the CMS backend.
//!
//! Every struct mirrors the JSON the backend emits (camelCase field names).
//! Fields the backend sometimes omits are `#[serde(default)]` so a partial
//! DTO still deserializes. Payload types (`*Payload`) are what we send back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity trait
// ============================================================================

/// An entity held in a state container, addressed by its numeric id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Backend identifier.
    fn id(&self) -> i64;

    /// Combine a fresh server copy (`self`) with the entry it replaces.
    ///
    /// The default is a full replacement. Entities whose update responses may
    /// omit fields override this so omitted fields keep their previous value.
    fn merge_over(self, _previous: &Self) -> Self {
        self
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Category
// ============================================================================

/// A topical grouping of articles. At most two levels deep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Where a category sits in the two-level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-level category.
    Root,
    /// Second-level category under the root with this id.
    Child { parent_id: i64 },
}

impl Category {
    /// The category's placement, derived from the nullable `parentId` field.
    pub fn placement(&self) -> Placement {
        match self.parent_id {
            None => Placement::Root,
            Some(parent_id) => Placement::Child { parent_id },
        }
    }

    pub fn is_root(&self) -> bool {
        self.placement() == Placement::Root
    }
}

impl Entity for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Create/update body for categories.
///
/// `parent_id` is always serialized: `null` moves the category to the top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

/// Category reference embedded in other DTOs (posts, sources).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

// ============================================================================
// Post
// ============================================================================

/// Editorial state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[serde(alias = "DRAFT")]
    Draft,
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "PUBLISHED")]
    Published,
    #[serde(alias = "REMOVED")]
    Removed,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Pending,
        PostStatus::Published,
        PostStatus::Removed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Published => "published",
            PostStatus::Removed => "removed",
        }
    }

    /// Next entry in the status selector cycle: all -> draft -> ... -> removed -> all.
    pub fn cycle(current: Option<PostStatus>) -> Option<PostStatus> {
        match current {
            None => Some(PostStatus::Draft),
            Some(PostStatus::Draft) => Some(PostStatus::Pending),
            Some(PostStatus::Pending) => Some(PostStatus::Published),
            Some(PostStatus::Published) => Some(PostStatus::Removed),
            Some(PostStatus::Removed) => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An article as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub status: PostStatus,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub origin_url: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub delete_status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Category label for display and search: nested object first, then the flat name.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .or(self.category_name.as_deref())
    }
}

impl Entity for Post {
    fn id(&self) -> i64 {
        self.id
    }

    fn merge_over(self, previous: &Self) -> Self {
        Post {
            id: self.id,
            title: if self.title.is_empty() {
                previous.title.clone()
            } else {
                self.title
            },
            slug: self.slug.or_else(|| previous.slug.clone()),
            category_id: self.category_id.or(previous.category_id),
            category_name: self
                .category_name
                .or_else(|| previous.category_name.clone()),
            category: self.category.or_else(|| previous.category.clone()),
            thumbnail: self.thumbnail.or_else(|| previous.thumbnail.clone()),
            status: self.status,
            view_count: self.view_count,
            summary: self.summary.or_else(|| previous.summary.clone()),
            content: self.content.or_else(|| previous.content.clone()),
            origin_url: self.origin_url.or_else(|| previous.origin_url.clone()),
            base_url: self.base_url.or_else(|| previous.base_url.clone()),
            meta_title: self.meta_title.or_else(|| previous.meta_title.clone()),
            meta_description: self
                .meta_description
                .or_else(|| previous.meta_description.clone()),
            tag_ids: if self.tag_ids.is_empty() {
                previous.tag_ids.clone()
            } else {
                self.tag_ids
            },
            delete_status: self
                .delete_status
                .or_else(|| previous.delete_status.clone()),
            published_at: self.published_at.or(previous.published_at),
            created_at: self.created_at.or(previous.created_at),
        }
    }
}

/// Partial post body for create/update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
}

// ============================================================================
// Source (crawler configuration)
// ============================================================================

/// Crawler configuration record. Selectors are opaque to this client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub list_url: String,
    #[serde(default)]
    pub list_item_selector: String,
    #[serde(default)]
    pub link_attr: Option<String>,
    #[serde(default)]
    pub title_selector: Option<String>,
    #[serde(default)]
    pub content_selector: Option<String>,
    #[serde(default)]
    pub thumbnail_selector: Option<String>,
    #[serde(default)]
    pub author_selector: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub article_count: Option<i64>,
}

impl Entity for Source {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Create/update body for sources, produced by [`crate::forms::SourceDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePayload {
    pub category_id: i64,
    pub name: String,
    pub base_url: String,
    pub list_url: String,
    pub list_item_selector: String,
    pub link_attr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_selector: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Tag
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub post_count: i64,
}

impl Entity for Tag {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// ============================================================================
// User / Tenant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role_code: Option<Role>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_code: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub max_users: Option<u32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Entity for Tenant {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ============================================================================
// Crawl logs / crawler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrawlType {
    Link,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrawlStatus {
    Success,
    Error,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggeredBy {
    Manual,
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlLog {
    pub id: i64,
    #[serde(default)]
    pub source: Option<Source>,
    pub crawl_type: CrawlType,
    pub status: CrawlStatus,
    #[serde(default)]
    pub triggered_by: Option<TriggeredBy>,
    #[serde(default)]
    pub total_found: Option<i64>,
    #[serde(default)]
    pub total_inserted: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Entity for CrawlLog {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Summary returned by the crawler trigger endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlResult {
    pub total_found: Option<i64>,
    pub total_inserted: Option<i64>,
    pub total_updated: Option<i64>,
    pub message: Option<String>,
}

// ============================================================================
// Dashboard / envelopes
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_posts: i64,
    #[serde(rename = "totalUsers7d")]
    pub total_users_7d: i64,
    pub today_users: i64,
    pub total_sources: i64,
    pub total_categories: i64,
}

/// Spring-style paged list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

// ============================================================================
// Timestamps
// ============================================================================

/// Lenient optional timestamp: RFC 3339 with offset, or a zone-less local
/// datetime (`2024-05-01T08:30:00[.fff]`) which is read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn post(id: i64, title: &str) -> Post {
        serde_json::from_value(json!({"id": id, "title": title, "status": "draft"})).unwrap()
    }

    #[test]
    fn test_category_placement_from_parent_id() {
        let root: Category =
            serde_json::from_value(json!({"id": 1, "slug": "tech", "name": "Tech", "parentId": null}))
                .unwrap();
        let child: Category =
            serde_json::from_value(json!({"id": 2, "slug": "ai", "name": "AI", "parentId": 1}))
                .unwrap();

        assert_eq!(root.placement(), Placement::Root);
        assert_eq!(child.placement(), Placement::Child { parent_id: 1 });
        assert!(root.is_active, "isActive defaults to true when omitted");
    }

    #[test]
    fn test_post_status_accepts_both_cases() {
        let lower: Post =
            serde_json::from_value(json!({"id": 1, "status": "published"})).unwrap();
        let upper: Post =
            serde_json::from_value(json!({"id": 2, "status": "PENDING"})).unwrap();
        assert_eq!(lower.status, PostStatus::Published);
        assert_eq!(upper.status, PostStatus::Pending);
    }

    #[test]
    fn test_timestamp_formats() {
        let p: Post = serde_json::from_value(json!({
            "id": 1,
            "status": "draft",
            "publishedAt": "2024-05-01T08:30:00",
            "createdAt": "2024-05-01T08:30:00Z"
        }))
        .unwrap();
        assert_eq!(p.published_at, p.created_at);
        assert!(p.published_at.is_some());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<Post, _> = serde_json::from_value(json!({
            "id": 1,
            "status": "draft",
            "publishedAt": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_post_merge_keeps_fields_missing_from_response() {
        let mut previous = post(7, "Old title");
        previous.category_name = Some("Tech".to_string());
        previous.summary = Some("Summary".to_string());

        let mut fresh = post(7, "New title");
        fresh.status = PostStatus::Published;

        let merged = fresh.merge_over(&previous);
        assert_eq!(merged.title, "New title");
        assert_eq!(merged.status, PostStatus::Published);
        assert_eq!(merged.category_name.as_deref(), Some("Tech"));
        assert_eq!(merged.summary.as_deref(), Some("Summary"));
    }

    #[test]
    fn test_category_label_prefers_nested_object() {
        let p: Post = serde_json::from_value(json!({
            "id": 1,
            "status": "draft",
            "categoryName": "Flat",
            "category": {"id": 3, "name": "Nested"}
        }))
        .unwrap();
        assert_eq!(p.category_label(), Some("Nested"));
    }

    #[test]
    fn test_category_payload_serializes_null_parent() {
        let payload = CategoryPayload {
            code: None,
            name: "Tech".to_string(),
            description: None,
            is_active: true,
            parent_id: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({"name": "Tech", "isActive": true, "parentId": null})
        );
    }

    #[test]
    fn test_page_envelope_defaults() {
        let page: Page<Tag> =
            serde_json::from_value(json!({"content": [{"id": 1, "name": "rust"}]})).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.content[0].post_count, 0);
    }

    #[test]
    fn test_status_cycle_wraps_to_all() {
        let mut status = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            status = PostStatus::cycle(status);
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                Some(PostStatus::Draft),
                Some(PostStatus::Pending),
                Some(PostStatus::Published),
                Some(PostStatus::Removed),
                None
            ]
        );
    }
}
