//! Application event handling.
//!
//! Applies background task results to the console state: reloads, article
//! counts and mutation outcomes.

use tokio::sync::mpsc;

use crate::app::{App, AppEvent, Tab};

use super::helpers::spawn_count_fetch;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::Loaded { tab, result } => match result {
            Ok(count) => {
                if tab == Tab::Categories {
                    let slugs = app.rebuild_tree();
                    spawn_count_fetch(app.store.categories.api(), slugs, event_tx);
                }
                app.clamp_selection();
                app.set_status(format!("Loaded {} {}", count, tab.title().to_lowercase()));
            }
            Err(message) => {
                app.set_status(format!("Failed to load {}: {}", tab.title().to_lowercase(), message));
            }
        },
        AppEvent::CountFetched { slug, result } => {
            app.counts.apply(slug, result);
        }
        AppEvent::Done { tab, message } => {
            if tab == Tab::Categories {
                let slugs: Vec<String> = app
                    .rebuild_tree()
                    .into_iter()
                    .filter(|slug| !app.counts.is_known(slug))
                    .collect();
                spawn_count_fetch(app.store.categories.api(), slugs, event_tx);
            }
            app.clamp_selection();
            app.set_status(message);
        }
        AppEvent::Failed(message) => {
            app.set_status(format!("Error: {}", message));
        }
        AppEvent::TaskPanicked(message) => {
            tracing::error!(panic = %message, "Background task panicked");
            app.set_status(format!("Internal error: {}", message));
        }
    }
}
