use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::resources::{fetch_list, item_path};
use crate::api::{ApiClient, ApiError, ListQuery, ListShape, Resource, Writable};
use crate::models::Entity;

/// Page size requested from paged endpoints when loading a whole collection.
pub const DEFAULT_BULK_PAGE_SIZE: u32 = 1000;

/// Last-known contents of one collection.
#[derive(Debug, Clone)]
pub struct ContainerState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Server-side total for paged collections.
    pub total: Option<i64>,
}

impl<T> Default for ContainerState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            total: None,
        }
    }
}

impl<T: Entity> ContainerState<T> {
    /// A list request went out.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the held list wholesale.
    pub fn replace(&mut self, items: Vec<T>, total: Option<i64>) {
        self.loading = false;
        self.items = items;
        self.total = total;
    }

    pub fn fail_load(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Put a newly created item at the head of the list.
    ///
    /// Any stale copy with the same id is dropped first so the id appears once.
    pub fn prepend(&mut self, item: T) {
        let id = item.id();
        self.items.retain(|existing| existing.id() != id);
        self.items.insert(0, item);
        if let Some(total) = self.total.as_mut() {
            *total += 1;
        }
    }

    /// Merge a fresh server copy into the entry with the same id.
    ///
    /// Returns false, leaving the list untouched, when no entry matches.
    pub fn merge_in_place(&mut self, item: T) -> bool {
        let id = item.id();
        match self.items.iter().position(|existing| existing.id() == id) {
            Some(idx) => {
                let merged = item.merge_over(&self.items[idx]);
                self.items[idx] = merged;
                true
            }
            None => false,
        }
    }

    /// Drop every entry with `id`. Returns how many were removed.
    pub fn remove(&mut self, id: i64) -> usize {
        let before = self.items.len();
        self.items.retain(|existing| existing.id() != id);
        let removed = before - self.items.len();
        if let Some(total) = self.total.as_mut() {
            *total = (*total - 1).max(0);
        }
        removed
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// State container for one backend collection.
///
/// Operations call the REST client and write their outcome into shared state
/// when the response arrives. Nothing is coalesced or cancelled: two
/// overlapping `list` calls both land, and whichever resolves last wins.
/// The state lock is only held for the synchronous write, never across an
/// await.
pub struct Container<R: Resource> {
    api: ApiClient,
    bulk_page_size: u32,
    state: Arc<Mutex<ContainerState<R::Item>>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for Container<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            bulk_page_size: self.bulk_page_size,
            state: Arc::clone(&self.state),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Container<R> {
    pub fn new(api: ApiClient) -> Self {
        Self::with_bulk_page_size(api, DEFAULT_BULK_PAGE_SIZE)
    }

    pub fn with_bulk_page_size(api: ApiClient, bulk_page_size: u32) -> Self {
        Self {
            api,
            bulk_page_size,
            state: Arc::new(Mutex::new(ContainerState::default())),
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ContainerState<R::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Note a failed mutation in `error`; the held list is left alone.
    pub(crate) fn record_failure(&self, error: ApiError) -> ApiError {
        tracing::warn!(resource = R::NAME, error = %error, "Request failed");
        self.lock().error = Some(error.to_string());
        error
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ContainerState<R::Item> {
        self.lock().clone()
    }

    /// Copy of the held items.
    pub fn items(&self) -> Vec<R::Item> {
        self.lock().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Read the state in place without cloning the list.
    pub fn read<O>(&self, f: impl FnOnce(&ContainerState<R::Item>) -> O) -> O {
        f(&self.lock())
    }

    /// Reload the whole collection, replacing the held list.
    ///
    /// Paged endpoints are asked for a single large page (page 0, bulk size)
    /// unless the query pins its own paging.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<R::Item>, ApiError> {
        let mut query = query.clone();
        if R::SHAPE == ListShape::Paged {
            query.page.get_or_insert(0);
            query.size.get_or_insert(self.bulk_page_size);
        }

        self.lock().begin_load();
        tracing::debug!(resource = R::NAME, "Loading collection");

        match fetch_list::<R>(&self.api, &query).await {
            Ok((items, total)) => {
                tracing::debug!(resource = R::NAME, count = items.len(), "Collection loaded");
                self.lock().replace(items.clone(), total);
                Ok(items)
            }
            Err(e) => {
                self.lock().fail_load(e.to_string());
                Err(e)
            }
        }
    }
}

impl<R: Writable> Container<R> {
    /// Create an item; on success it is prepended to the held list.
    pub async fn create(&self, payload: &R::Create) -> Result<R::Item, ApiError> {
        let item: R::Item = self
            .api
            .post(R::PATH, Some(payload))
            .await
            .map_err(|e| self.record_failure(e))?;
        tracing::info!(resource = R::NAME, id = item.id(), "Created");
        self.lock().prepend(item.clone());
        Ok(item)
    }

    /// Update an item; on success the matching entry is merged in place.
    ///
    /// If the id is no longer in the held list the response is dropped and
    /// the list stays as it was.
    pub async fn update(&self, id: i64, payload: &R::Update) -> Result<R::Item, ApiError> {
        let item: R::Item = self
            .api
            .put(&item_path::<R>(id), Some(payload))
            .await
            .map_err(|e| self.record_failure(e))?;
        self.apply_update(item.clone());
        Ok(item)
    }

    /// Delete an item; on success every entry with that id is removed.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api
            .delete(&item_path::<R>(id))
            .await
            .map_err(|e| self.record_failure(e))?;
        let removed = self.lock().remove(id);
        tracing::info!(resource = R::NAME, id, removed, "Deleted");
        Ok(())
    }

    pub(crate) fn apply_update(&self, item: R::Item) {
        let id = item.id();
        if !self.lock().merge_in_place(item) {
            // TODO: decide whether an update for an unlisted id should insert it
            tracing::debug!(resource = R::NAME, id, "Update for id not in list, ignoring");
        }
    }
}
