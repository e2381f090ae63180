//! Input handling for the TUI.
//!
//! Keys are routed by mode: an open confirmation, prompt or editor captures
//! everything, then search mode, then the per-tab bindings.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::DEFAULT_CRAWL_LIMIT;
use crate::app::{App, AppEvent, ConfirmAction, Prompt, PromptKind, Tab};
use crate::editor::{Draft, EditTarget, Editor};
use crate::forms::{CategoryDraft, SourceDraft, TagDraft, ValidationError};
use crate::models::PostStatus;

use super::helpers::{spawn_mutation, spawn_reload};
use super::Action;

/// Maximum search query length.
const MAX_SEARCH_LENGTH: usize = 256;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    if app.pending_confirm.is_some() {
        handle_confirm_input(app, code, event_tx);
        return Ok(Action::Continue);
    }

    if app.prompt.is_some() {
        handle_prompt_input(app, code, event_tx);
        return Ok(Action::Continue);
    }

    if app.editor.is_some() {
        handle_editor_input(app, code, event_tx);
        return Ok(Action::Continue);
    }

    if app.search_mode {
        handle_search_input(app, code);
        return Ok(Action::Continue);
    }

    handle_browse_input(app, code, event_tx)
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Tab => app.switch_tab(app.tab.next()),
        KeyCode::BackTab => app.switch_tab(app.tab.prev()),
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char(']') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('[') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Char('/') => {
            app.search_mode = true;
            let current = app.listing(app.tab).query().to_string();
            app.ui.set_search_query(current);
        }
        KeyCode::Char('r') => {
            app.set_status(format!("Reloading {}...", app.tab.title().to_lowercase()));
            spawn_reload(&app.store, app.tab, event_tx);
        }
        KeyCode::Char('d') => request_delete(app),
        KeyCode::Enter if app.tab == Tab::Categories => app.toggle_selected_category(),
        KeyCode::Char('a') => toggle_active(app, event_tx),
        KeyCode::Char('n') if matches!(app.tab, Tab::Articles | Tab::Sources) => {
            open_editor(app, false)
        }
        KeyCode::Char('e') => open_editor(app, true),
        KeyCode::Char('n') => open_prompt(app, false),
        KeyCode::Char('N') => open_prompt(app, true),
        KeyCode::Char('s') if app.tab == Tab::Articles => app.cycle_post_status(),
        KeyCode::Char('p') if app.tab == Tab::Articles => post_action(app, PostAction::Publish, event_tx),
        KeyCode::Char('u') if app.tab == Tab::Articles => post_action(app, PostAction::Restore, event_tx),
        KeyCode::Char('g') if app.tab == Tab::Articles => post_action(app, PostAction::Generate, event_tx),
        KeyCode::Char('c') if app.tab == Tab::Sources => crawl_selected_source(app, event_tx),
        KeyCode::Char('C') if app.tab == Tab::Sources => {
            let api = app.store.sources.api().clone();
            app.set_status("Crawling links for all sources...");
            spawn_mutation(event_tx, Tab::Sources, async move {
                let result = api.crawl_links_all().await?;
                Ok(crawl_summary("Link crawl", &result))
            });
        }
        _ => {}
    }
    Ok(Action::Continue)
}

// ============================================================================
// Search
// ============================================================================

fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.ui.set_search_query("");
            app.apply_search();
        }
        KeyCode::Enter => {
            app.search_mode = false;
        }
        KeyCode::Backspace => {
            app.ui.search_query.pop();
            app.apply_search();
        }
        KeyCode::Char(c) => {
            if app.ui.search_query.len() < MAX_SEARCH_LENGTH && !c.is_control() {
                app.ui.search_query.push(c);
                app.apply_search();
            }
        }
        _ => {}
    }
}

// ============================================================================
// Delete confirmation
// ============================================================================

fn request_delete(app: &mut App) {
    let confirm = match app.tab {
        Tab::Articles => app.selected_post().map(|p| ConfirmAction::DeletePost {
            id: p.id,
            title: p.title,
        }),
        Tab::Categories => app
            .selected_category_row()
            .map(|row| ConfirmAction::DeleteCategory {
                id: row.category_id,
                name: row.name,
            }),
        Tab::Sources => app.selected_source().map(|s| ConfirmAction::DeleteSource {
            id: s.id,
            name: s.name,
        }),
        Tab::Tags => app.selected_tag().map(|t| ConfirmAction::DeleteTag {
            id: t.id,
            name: t.name,
        }),
    };
    app.pending_confirm = confirm;
}

fn handle_confirm_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(confirm) = app.pending_confirm.take() {
                dispatch_delete(app, confirm, event_tx);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_confirm = None;
        }
        _ => {}
    }
}

fn dispatch_delete(app: &mut App, confirm: ConfirmAction, event_tx: &mpsc::Sender<AppEvent>) {
    let label = confirm.label().to_string();
    match confirm {
        ConfirmAction::DeletePost { id, .. } => {
            let posts = app.store.posts.clone();
            spawn_mutation(event_tx, Tab::Articles, async move {
                posts.delete(id).await?;
                Ok(format!("Deleted article \"{}\"", label))
            });
        }
        ConfirmAction::DeleteCategory { id, .. } => {
            let categories = app.store.categories.clone();
            spawn_mutation(event_tx, Tab::Categories, async move {
                categories.delete(id).await?;
                Ok(format!("Deleted category \"{}\"", label))
            });
        }
        ConfirmAction::DeleteSource { id, .. } => {
            let sources = app.store.sources.clone();
            spawn_mutation(event_tx, Tab::Sources, async move {
                sources.delete(id).await?;
                Ok(format!("Deleted source \"{}\"", label))
            });
        }
        ConfirmAction::DeleteTag { id, .. } => {
            let tags = app.store.tags.clone();
            spawn_mutation(event_tx, Tab::Tags, async move {
                tags.delete(id).await?;
                Ok(format!("Deleted tag \"{}\"", label))
            });
        }
    }
    app.set_status("Deleting...");
}

// ============================================================================
// Create prompt
// ============================================================================

/// Open the one-line create prompt. `under_selected` creates a subcategory of
/// the selected root on the Categories tab.
fn open_prompt(app: &mut App, under_selected: bool) {
    let kind = match app.tab {
        Tab::Tags => PromptKind::NewTag,
        Tab::Categories if under_selected => {
            let Some(row) = app.selected_category_row().filter(|r| r.depth == 0) else {
                app.set_status("Select a top-level category first");
                return;
            };
            PromptKind::NewCategory {
                parent_id: Some(row.category_id),
            }
        }
        Tab::Categories => PromptKind::NewCategory { parent_id: None },
        _ => return,
    };
    app.prompt = Some(Prompt {
        kind,
        input: String::new(),
    });
}

fn handle_prompt_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => app.prompt = None,
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        KeyCode::Char(c) if !c.is_control() => prompt.input.push(c),
        KeyCode::Enter => {
            if let Some(prompt) = app.prompt.take() {
                submit_prompt(app, prompt, event_tx);
            }
        }
        _ => {}
    }
}

fn submit_prompt(app: &mut App, prompt: Prompt, event_tx: &mpsc::Sender<AppEvent>) {
    match prompt.kind {
        PromptKind::NewTag => {
            let payload = match (TagDraft {
                name: prompt.input,
                color: String::new(),
            })
            .into_payload()
            {
                Ok(payload) => payload,
                Err(e) => return app.set_status(e.to_string()),
            };
            let tags = app.store.tags.clone();
            spawn_mutation(event_tx, Tab::Tags, async move {
                let tag = tags.create(&payload).await?;
                Ok(format!("Created tag \"{}\"", tag.name))
            });
        }
        PromptKind::NewCategory { parent_id } => {
            let draft = CategoryDraft {
                name: prompt.input,
                parent_id,
                ..Default::default()
            };
            let existing = app.store.categories.items();
            let payload = match draft.into_payload(&existing, None) {
                Ok(payload) => payload,
                Err(e) => return app.set_status(e.to_string()),
            };
            let categories = app.store.categories.clone();
            spawn_mutation(event_tx, Tab::Categories, async move {
                let category = categories.create(&payload).await?;
                Ok(format!("Created category \"{}\"", category.name))
            });
        }
    }
    app.set_status("Saving...");
}

// ============================================================================
// Create/edit editor
// ============================================================================

/// Open the multi-field editor for a new item, or for the selected one.
fn open_editor(app: &mut App, edit_selected: bool) {
    let categories = app.store.categories.items();
    let editor = match (app.tab, edit_selected) {
        (Tab::Sources, false) => Some(Editor::new_source(&categories)),
        (Tab::Sources, true) => app
            .selected_source()
            .map(|s| Editor::edit_source(&s, &categories)),
        (Tab::Articles, false) => Some(Editor::new_post(&categories)),
        (Tab::Articles, true) => app
            .selected_post()
            .map(|p| Editor::edit_post(&p, &categories)),
        (Tab::Tags, true) => app.selected_tag().map(|t| Editor::edit_tag(&t)),
        _ => None,
    };
    if editor.is_some() {
        app.editor = editor;
    }
}

fn handle_editor_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(editor) = app.editor.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => app.editor = None,
        KeyCode::Tab | KeyCode::Down => editor.focus_next(),
        KeyCode::BackTab | KeyCode::Up => editor.focus_prev(),
        KeyCode::Left => editor.step(false),
        KeyCode::Right => editor.step(true),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Char(c) if !c.is_control() => editor.insert(c),
        KeyCode::Enter => {
            if let Some(editor) = app.editor.take() {
                submit_editor(app, editor, event_tx);
            }
        }
        _ => {}
    }
}

/// Keep the editor open with the validation message so the user can fix it.
fn reject(app: &mut App, editor: Editor, error: ValidationError) {
    app.set_status(error.to_string());
    app.editor = Some(editor);
}

fn submit_editor(app: &mut App, editor: Editor, event_tx: &mpsc::Sender<AppEvent>) {
    let target = editor.target;
    match editor.draft.clone() {
        Draft::Source(draft) => {
            let payload = match draft.into_payload() {
                Ok(payload) => payload,
                Err(e) => return reject(app, editor, e),
            };
            let sources = app.store.sources.clone();
            spawn_mutation(event_tx, Tab::Sources, async move {
                match target {
                    EditTarget::Source(id) => {
                        let source = sources.update(id, &payload).await?;
                        Ok(format!("Updated source \"{}\"", source.name))
                    }
                    _ => {
                        let source = sources.create(&payload).await?;
                        Ok(format!("Created source \"{}\"", source.name))
                    }
                }
            });
        }
        Draft::Post(draft) => {
            let payload = match draft.into_payload() {
                Ok(payload) => payload,
                Err(e) => return reject(app, editor, e),
            };
            let posts = app.store.posts.clone();
            spawn_mutation(event_tx, Tab::Articles, async move {
                match target {
                    EditTarget::Post(id) => {
                        let post = posts.update(id, &payload).await?;
                        Ok(format!("Updated article \"{}\"", post.title))
                    }
                    _ => {
                        let post = posts.create(&payload).await?;
                        Ok(format!("Created article \"{}\"", post.title))
                    }
                }
            });
        }
        Draft::Tag(draft) => {
            let EditTarget::Tag(id) = target else {
                return;
            };
            let payload = match draft.into_payload() {
                Ok(payload) => payload,
                Err(e) => return reject(app, editor, e),
            };
            let tags = app.store.tags.clone();
            spawn_mutation(event_tx, Tab::Tags, async move {
                let tag = tags.update(id, &payload).await?;
                Ok(format!("Updated tag \"{}\"", tag.name))
            });
        }
    }
    app.set_status("Saving...");
}

// ============================================================================
// Entity actions
// ============================================================================

/// Flip the active flag of the selected category or source.
fn toggle_active(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.tab {
        Tab::Categories => {
            let Some(category) = app.selected_category() else {
                return;
            };
            let mut draft = CategoryDraft::from_category(&category);
            draft.is_active = !draft.is_active;
            let existing = app.store.categories.items();
            let payload = match draft.into_payload(&existing, Some(category.id)) {
                Ok(payload) => payload,
                Err(e) => return app.set_status(e.to_string()),
            };
            let categories = app.store.categories.clone();
            spawn_mutation(event_tx, Tab::Categories, async move {
                let updated = categories.update(category.id, &payload).await?;
                Ok(active_message(&updated.name, updated.is_active))
            });
        }
        Tab::Sources => {
            let Some(source) = app.selected_source() else {
                return;
            };
            let mut draft = SourceDraft::from_source(&source);
            draft.is_active = !draft.is_active;
            let payload = match draft.into_payload() {
                Ok(payload) => payload,
                Err(e) => return app.set_status(e.to_string()),
            };
            let sources = app.store.sources.clone();
            spawn_mutation(event_tx, Tab::Sources, async move {
                let updated = sources.update(source.id, &payload).await?;
                Ok(active_message(&updated.name, updated.is_active))
            });
        }
        _ => {}
    }
}

fn active_message(name: &str, is_active: bool) -> String {
    if is_active {
        format!("\"{}\" activated", name)
    } else {
        format!("\"{}\" deactivated", name)
    }
}

#[derive(Debug, Clone, Copy)]
enum PostAction {
    Publish,
    Restore,
    Generate,
}

fn post_action(app: &mut App, action: PostAction, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(post) = app.selected_post() else {
        return;
    };
    if matches!(action, PostAction::Publish) && post.status == PostStatus::Published {
        app.set_status("Already published");
        return;
    }
    let posts = app.store.posts.clone();
    let id = post.id;
    let title = post.title;
    spawn_mutation(event_tx, Tab::Articles, async move {
        match action {
            PostAction::Publish => {
                posts.publish(id).await?;
                Ok(format!("Published \"{}\"", title))
            }
            PostAction::Restore => {
                posts.restore(id).await?;
                Ok(format!("Restored \"{}\" to draft", title))
            }
            PostAction::Generate => {
                let post = posts.generate(id).await?;
                Ok(format!("Regenerated \"{}\"", post.title))
            }
        }
    });
    app.set_status("Working...");
}

fn crawl_selected_source(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(source) = app.selected_source() else {
        return;
    };
    let api = app.store.sources.api().clone();
    app.set_status(format!("Crawling content for \"{}\"...", source.name));
    spawn_mutation(event_tx, Tab::Sources, async move {
        let result = api
            .crawl_content_by_source(source.id, DEFAULT_CRAWL_LIMIT)
            .await?;
        Ok(crawl_summary(&source.name, &result))
    });
}

fn crawl_summary(label: &str, result: &crate::models::CrawlResult) -> String {
    if let Some(message) = result.message.as_deref().filter(|m| !m.is_empty()) {
        return format!("{}: {}", label, message);
    }
    format!(
        "{}: found {}, inserted {}",
        label,
        result.total_found.unwrap_or(0),
        result.total_inserted.unwrap_or(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::models::{Category, Tag};
    use crate::store::Store;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:8888/api", Duration::from_secs(5)).unwrap();
        App::new(Store::new(api, 1000), 10)
    }

    fn app_for(server: &MockServer) -> App {
        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        App::new(Store::new(api, 1000), 10)
    }

    fn type_text(app: &mut App, text: &str, tx: &mpsc::Sender<AppEvent>) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), tx);
        }
    }

    fn world() -> Category {
        Category {
            id: 3,
            slug: "world".into(),
            code: None,
            name: "World".into(),
            description: None,
            is_active: true,
            parent_id: None,
        }
    }

    async fn next_message(rx: &mut mpsc::Receiver<AppEvent>) -> String {
        match rx.recv().await {
            Some(AppEvent::Done { message, .. }) => message,
            other => panic!("unexpected event: {:?}", other),
        }
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx).unwrap(),
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_search_typing_filters_live_and_esc_clears() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.store.tags.lock().replace(
            vec![
                Tag {
                    id: 1,
                    name: "rust".into(),
                    slug: None,
                    color: None,
                    post_count: 0,
                },
                Tag {
                    id: 2,
                    name: "go".into(),
                    slug: None,
                    color: None,
                    post_count: 0,
                },
            ],
            None,
        );
        app.switch_tab(Tab::Tags);

        press(&mut app, KeyCode::Char('/'), &tx);
        press(&mut app, KeyCode::Char('r'), &tx);
        press(&mut app, KeyCode::Char('u'), &tx);
        assert!(app.search_mode);
        assert_eq!(app.tag_page().1, 1);

        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.search_mode);
        assert_eq!(app.tag_page().1, 2);
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.store.tags.lock().replace(
            vec![Tag {
                id: 7,
                name: "rust".into(),
                slug: None,
                color: None,
                post_count: 0,
            }],
            None,
        );
        app.switch_tab(Tab::Tags);

        press(&mut app, KeyCode::Char('d'), &tx);
        assert_eq!(
            app.pending_confirm,
            Some(ConfirmAction::DeleteTag {
                id: 7,
                name: "rust".into()
            })
        );

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.pending_confirm.is_none());
        assert_eq!(app.store.tags.items().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_tag_prompt_rejected_before_request() {
        let mut app = test_app();
        let (tx, mut rx) = mpsc::channel(8);
        app.switch_tab(Tab::Tags);

        press(&mut app, KeyCode::Char('n'), &tx);
        assert!(app.prompt.is_some());
        press(&mut app, KeyCode::Char(' '), &tx);
        press(&mut app, KeyCode::Enter, &tx);

        assert!(app.prompt.is_none());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Tag name must not be empty");
        assert!(rx.try_recv().is_err(), "no task was spawned");
    }

    #[tokio::test]
    async fn test_subcategory_prompt_requires_root_selection() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.store.categories.lock().replace(
            vec![Category {
                id: 1,
                slug: "tech".into(),
                code: None,
                name: "Tech".into(),
                description: None,
                is_active: true,
                parent_id: None,
            }],
            None,
        );
        app.rebuild_tree();
        app.switch_tab(Tab::Categories);

        press(&mut app, KeyCode::Char('N'), &tx);
        assert_eq!(
            app.prompt.as_ref().map(|p| p.kind),
            Some(PromptKind::NewCategory { parent_id: Some(1) })
        );
    }

    #[tokio::test]
    async fn test_source_editor_keeps_open_on_blank_required_field() {
        let mut app = test_app();
        let (tx, mut rx) = mpsc::channel(8);
        app.store.categories.lock().replace(vec![world()], None);
        app.switch_tab(Tab::Sources);

        press(&mut app, KeyCode::Char('n'), &tx);
        type_text(&mut app, "Daily", &tx);
        press(&mut app, KeyCode::Enter, &tx);

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Base URL must not be empty");
        assert!(app.editor.is_some(), "editor stays open for correction");
        assert!(rx.try_recv().is_err(), "no task was spawned");

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.editor.is_none());
    }

    #[tokio::test]
    async fn test_new_source_editor_creates_source() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/sources"))
            .and(body_partial_json(json!({
                "name": "Daily",
                "categoryId": 3,
                "baseUrl": "https://daily.example",
                "listUrl": "https://daily.example/world",
                "listItemSelector": "article h3 a",
                "linkAttr": "href",
                "isActive": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 21, "name": "Daily", "baseUrl": "https://daily.example", "categoryId": 3
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        app.store.categories.lock().replace(vec![world()], None);
        app.switch_tab(Tab::Sources);

        press(&mut app, KeyCode::Char('n'), &tx);
        type_text(&mut app, "Daily", &tx);
        press(&mut app, KeyCode::Tab, &tx);
        press(&mut app, KeyCode::Right, &tx);
        press(&mut app, KeyCode::Tab, &tx);
        type_text(&mut app, "https://daily.example", &tx);
        press(&mut app, KeyCode::Tab, &tx);
        type_text(&mut app, "https://daily.example/world", &tx);
        press(&mut app, KeyCode::Tab, &tx);
        type_text(&mut app, "article h3 a", &tx);
        press(&mut app, KeyCode::Enter, &tx);

        assert!(app.editor.is_none());
        assert_eq!(next_message(&mut rx).await, "Created source \"Daily\"");
        assert_eq!(app.store.sources.items()[0].id, 21);
    }

    #[tokio::test]
    async fn test_edit_article_sends_update() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/posts/5"))
            .and(body_partial_json(json!({
                "title": "Budget vote passes",
                "categoryId": 3,
                "status": "pending"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "title": "Budget vote passes", "status": "pending"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        let post = serde_json::from_value(json!({
            "id": 5, "title": "Budget vote", "status": "pending", "categoryId": 3
        }))
        .unwrap();
        app.store.posts.lock().replace(vec![post], Some(1));

        press(&mut app, KeyCode::Char('e'), &tx);
        type_text(&mut app, " passes", &tx);
        press(&mut app, KeyCode::Enter, &tx);

        assert_eq!(next_message(&mut rx).await, "Updated article \"Budget vote passes\"");
        assert_eq!(app.store.posts.items()[0].title, "Budget vote passes");
    }

    #[tokio::test]
    async fn test_blank_article_title_rejected() {
        let mut app = test_app();
        let (tx, mut rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('n'), &tx);
        press(&mut app, KeyCode::Enter, &tx);

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Title must not be empty");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tag_rename_updates_in_place() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/admin/tags/7"))
            .and(body_partial_json(json!({"name": "rustlang"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7, "name": "rustlang", "postCount": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = app_for(&server);
        let (tx, mut rx) = mpsc::channel(8);
        app.store.tags.lock().replace(
            vec![Tag {
                id: 7,
                name: "rust".into(),
                slug: None,
                color: None,
                post_count: 4,
            }],
            None,
        );
        app.switch_tab(Tab::Tags);

        press(&mut app, KeyCode::Char('e'), &tx);
        type_text(&mut app, "lang", &tx);
        press(&mut app, KeyCode::Enter, &tx);

        assert_eq!(next_message(&mut rx).await, "Updated tag \"rustlang\"");
        let names: Vec<String> = app.store.tags.items().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["rustlang"]);
    }
}
