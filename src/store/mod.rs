//! Per-feature state containers.
//!
//! Each backend collection gets its own [`Container`]; there is no global
//! store. [`Store`] just bundles one of each, built from a shared
//! [`ApiClient`], so the console can hand individual containers to the tasks
//! that need them.

mod auth;
mod container;

pub use auth::{AuthSession, AuthState};
pub use container::{Container, ContainerState, DEFAULT_BULK_PAGE_SIZE};

use crate::api::{
    ApiClient, ApiError, Categories, CrawlLogs, Posts, Sources, Tags, Tenants, Users,
};
use crate::models::{Entity, Post, PostStatus};

pub type CategoryContainer = Container<Categories>;
pub type PostContainer = Container<Posts>;
pub type SourceContainer = Container<Sources>;
pub type TagContainer = Container<Tags>;
pub type UserContainer = Container<Users>;
pub type TenantContainer = Container<Tenants>;
pub type CrawlLogContainer = Container<CrawlLogs>;

/// Transient UI state shared across listing views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub search_query: String,
}

impl UiState {
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }
}

/// One container per entity, all talking through the same client.
#[derive(Clone)]
pub struct Store {
    pub categories: CategoryContainer,
    pub posts: PostContainer,
    pub sources: SourceContainer,
    pub tags: TagContainer,
    pub users: UserContainer,
    pub tenants: TenantContainer,
    pub crawl_logs: CrawlLogContainer,
    pub auth: AuthSession,
}

impl Store {
    pub fn new(api: ApiClient, bulk_page_size: u32) -> Self {
        Self {
            categories: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            posts: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            sources: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            tags: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            users: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            tenants: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            crawl_logs: Container::with_bulk_page_size(api.clone(), bulk_page_size),
            auth: AuthSession::new(api),
        }
    }
}

// ============================================================================
// Post editorial actions
// ============================================================================

impl PostContainer {
    /// Publish a post. The held entry flips to `published` (merged with the
    /// server copy when one is returned).
    pub async fn publish(&self, id: i64) -> Result<(), ApiError> {
        let returned = self
            .api()
            .publish_post(id)
            .await
            .map_err(|e| self.record_failure(e))?;
        self.apply_status_change(id, returned, PostStatus::Published);
        Ok(())
    }

    /// Restore a removed post back to `draft`.
    pub async fn restore(&self, id: i64) -> Result<(), ApiError> {
        let returned = self
            .api()
            .restore_post(id)
            .await
            .map_err(|e| self.record_failure(e))?;
        self.apply_status_change(id, returned, PostStatus::Draft);
        Ok(())
    }

    /// Regenerate a post. Unlike `update`, a post missing from the held list
    /// is prepended.
    pub async fn generate(&self, id: i64) -> Result<Post, ApiError> {
        let post = self
            .api()
            .generate_post(id)
            .await
            .map_err(|e| self.record_failure(e))?;
        let mut state = self.lock();
        if !state.merge_in_place(post.clone()) {
            state.prepend(post.clone());
        }
        Ok(post)
    }

    fn apply_status_change(
        &self,
        id: i64,
        returned: Option<Post>,
        fallback: PostStatus,
    ) {
        match returned {
            Some(post) if post.id() == id => self.apply_update(post),
            _ => {
                let mut state = self.lock();
                if let Some(existing) = state.items.iter_mut().find(|p| p.id == id) {
                    existing.status = fallback;
                }
            }
        }
    }
}
