//! Background task plumbing shared by input and event handling.
//!
//! Every network call runs in its own tokio task and reports back over the
//! `AppEvent` channel. Tasks are never cancelled; a late result still lands in
//! its container.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiError, ListQuery};
use crate::app::{AppEvent, Tab};
use crate::store::Store;
use crate::tree::fetch_counts;

/// Catch panics from a task body and return them as a string.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Failed to send app event (receiver dropped)");
    }
}

/// Run `work` in the background and forward the event it produces.
fn spawn_task<F>(tx: &mpsc::Sender<AppEvent>, work: F)
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic) => AppEvent::TaskPanicked(panic),
        };
        send(&tx, event).await;
    });
}

/// Run a mutation; success reports `Done` with the returned message.
pub(super) fn spawn_mutation<F>(tx: &mpsc::Sender<AppEvent>, tab: Tab, work: F)
where
    F: Future<Output = Result<String, ApiError>> + Send + 'static,
{
    spawn_task(tx, async move {
        match work.await {
            Ok(message) => AppEvent::Done { tab, message },
            Err(e) => AppEvent::Failed(e.to_string()),
        }
    });
}

/// Reload the collection behind `tab`.
pub(super) fn spawn_reload(store: &Store, tab: Tab, tx: &mpsc::Sender<AppEvent>) {
    let store = store.clone();
    spawn_task(tx, async move {
        let query = ListQuery::default();
        let result = match tab {
            Tab::Articles => store.posts.list(&query).await.map(|v| v.len()),
            Tab::Categories => store.categories.list(&query).await.map(|v| v.len()),
            Tab::Sources => store.sources.list(&query).await.map(|v| v.len()),
            Tab::Tags => store.tags.list(&query).await.map(|v| v.len()),
        };
        AppEvent::Loaded {
            tab,
            result: result.map_err(|e| e.to_string()),
        }
    });
}

/// Fetch one article count per slug, forwarding each as it completes.
pub(super) fn spawn_count_fetch(api: &ApiClient, slugs: Vec<String>, tx: &mpsc::Sender<AppEvent>) {
    if slugs.is_empty() {
        return;
    }
    tracing::debug!(count = slugs.len(), "Fetching article counts");
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let mut results = Box::pin(fetch_counts(api, slugs));
        while let Some((slug, result)) = results.next().await {
            send(&tx, AppEvent::CountFetched { slug, result }).await;
        }
    });
}
