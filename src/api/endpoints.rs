//! Endpoints beyond plain CRUD: counts, editorial actions, crawler triggers, auth.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::client::{ApiClient, ApiError};
use crate::models::{Category, CrawlResult, DashboardStats, Post, Source, Tag, TagPayload, User};
use crate::util::encode_path_segment;

/// Default number of articles pulled per source by a content crawl.
pub const DEFAULT_CRAWL_LIMIT: u32 = 200;

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login response. The token may arrive as `token` or `accessToken`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

impl ApiClient {
    // ========================================================================
    // Categories
    // ========================================================================

    /// Number of articles filed under the category with `slug`.
    pub async fn category_article_count(&self, slug: &str) -> Result<u64, ApiError> {
        let path = format!(
            "/admin/categories/{}/posts-count",
            encode_path_segment(slug)
        );
        self.get(&path, &[]).await
    }

    pub async fn active_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/admin/categories/active", &[]).await
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub async fn publish_post(&self, id: i64) -> Result<Option<Post>, ApiError> {
        self.put::<Option<Post>, ()>(&format!("/admin/posts/{id}/publish"), None)
            .await
    }

    pub async fn restore_post(&self, id: i64) -> Result<Option<Post>, ApiError> {
        self.put::<Option<Post>, ()>(&format!("/admin/posts/{id}/restore"), None)
            .await
    }

    /// Ask the backend to (re)generate a post's content from its crawled source.
    pub async fn generate_post(&self, id: i64) -> Result<Post, ApiError> {
        self.post::<Post, ()>(&format!("/admin/posts/{id}/generate"), None)
            .await
    }

    // ========================================================================
    // Sources / tags
    // ========================================================================

    pub async fn active_sources(&self) -> Result<Vec<Source>, ApiError> {
        self.get("/admin/sources/active", &[]).await
    }

    /// Create the tag if its name is new, otherwise update it.
    pub async fn upsert_tag(&self, payload: &TagPayload) -> Result<Tag, ApiError> {
        self.post("/admin/tags/upsert", Some(payload)).await
    }

    // ========================================================================
    // Crawler
    // ========================================================================

    /// Crawl listing pages of every active source for new article links.
    pub async fn crawl_links_all(&self) -> Result<CrawlResult, ApiError> {
        self.post::<Option<CrawlResult>, ()>("/admin/crawler/links/all", None)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Fetch article bodies for up to `limit` pending links of one source.
    pub async fn crawl_content_by_source(
        &self,
        source_id: i64,
        limit: u32,
    ) -> Result<CrawlResult, ApiError> {
        self.request::<Option<CrawlResult>, ()>(
            reqwest::Method::POST,
            "/admin/crawler/content/by-source",
            None,
            &[
                ("sourceId", source_id.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
        .map(Option::unwrap_or_default)
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Headline counters. The backend wraps them in a one-element array.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let value: serde_json::Value = self.get("/admin/stats", &[]).await?;
        let value = match value {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            serde_json::Value::Array(_) | serde_json::Value::Null => return Ok(DashboardStats::default()),
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Log in and attach the returned bearer token to this client.
    ///
    /// Returns the user if the login response carried one.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<User>, ApiError> {
        let response: LoginResponse = self
            .post("/auth/login", Some(&Credentials { username, password }))
            .await?;
        match response.token {
            Some(token) if !token.is_empty() => {
                self.set_token(Some(SecretString::from(token)));
                tracing::info!(username = %username, "Logged in");
            }
            _ => {
                tracing::warn!(
                    username = %username,
                    "Login response carried no token; requests stay unauthenticated"
                );
            }
        }
        Ok(response.user)
    }

    /// Identity of the current session.
    pub async fn whoami(&self) -> Result<User, ApiError> {
        self.get("/auth/me", &[]).await
    }

    /// End the session. The local token is dropped even if the call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.post::<(), ()>("/auth/logout", None).await;
        self.set_token(None);
        result
    }
}
