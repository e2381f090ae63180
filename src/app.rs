use std::borrow::Cow;

use tokio::time::Instant;

use crate::api::resources::Resource;
use crate::api::ApiError;
use crate::editor::Editor;
use crate::listing::{filter_items, Listing, Searchable};
use crate::models::{Category, Post, Source, Tag};
use crate::store::{Container, Store, UiState};
use crate::tree::{visible_rows, ArticleCounts, CategoryTree, Expansion, TreeRow};

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Tabs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Articles,
    Categories,
    Sources,
    Tags,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Articles, Tab::Categories, Tab::Sources, Tab::Tags];

    pub fn index(self) -> usize {
        match self {
            Tab::Articles => 0,
            Tab::Categories => 1,
            Tab::Sources => 2,
            Tab::Tags => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Articles => "Articles",
            Tab::Categories => "Categories",
            Tab::Sources => "Sources",
            Tab::Tags => "Tags",
        }
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ============================================================================
// Dialogs
// ============================================================================

/// Pending confirmation for a destructive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeletePost { id: i64, title: String },
    DeleteCategory { id: i64, name: String },
    DeleteSource { id: i64, name: String },
    DeleteTag { id: i64, name: String },
}

impl ConfirmAction {
    pub fn label(&self) -> &str {
        match self {
            ConfirmAction::DeletePost { title, .. } => title,
            ConfirmAction::DeleteCategory { name, .. }
            | ConfirmAction::DeleteSource { name, .. }
            | ConfirmAction::DeleteTag { name, .. } => name,
        }
    }
}

/// What a one-line prompt will create when submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewTag,
    NewCategory { parent_id: Option<i64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

// ============================================================================
// Background events
// ============================================================================

/// Completion events sent by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A collection reload finished; `Ok` carries the item count.
    Loaded {
        tab: Tab,
        result: Result<usize, String>,
    },
    /// One article count arrived.
    CountFetched {
        slug: String,
        result: Result<u64, ApiError>,
    },
    /// A mutation succeeded.
    Done { tab: Tab, message: String },
    /// A mutation failed; the message is shown as-is.
    Failed(String),
    /// A background task panicked.
    TaskPanicked(String),
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub store: Store,
    pub ui: UiState,

    pub tab: Tab,
    listings: [Listing; 4],
    selected: [usize; 4],

    pub tree: CategoryTree,
    pub expansion: Expansion,
    pub counts: ArticleCounts,

    pub search_mode: bool,
    pub prompt: Option<Prompt>,
    pub editor: Option<Editor>,
    pub pending_confirm: Option<ConfirmAction>,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(store: Store, page_size: usize) -> Self {
        Self {
            store,
            ui: UiState::default(),
            tab: Tab::Articles,
            listings: std::array::from_fn(|_| Listing::new(page_size)),
            selected: [0; 4],
            tree: CategoryTree::default(),
            expansion: Expansion::default(),
            counts: ArticleCounts::default(),
            search_mode: false,
            prompt: None,
            editor: None,
            pending_confirm: None,
            status_message: None,
            needs_redraw: true,
        }
    }

    pub fn listing(&self, tab: Tab) -> &Listing {
        &self.listings[tab.index()]
    }

    pub fn listing_mut(&mut self, tab: Tab) -> &mut Listing {
        &mut self.listings[tab.index()]
    }

    /// Selected row on the current tab's visible page.
    pub fn selected(&self) -> usize {
        self.selected[self.tab.index()]
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.search_mode = false;
        self.ui.set_search_query(self.listing(tab).query().to_string());
    }

    // ------------------------------------------------------------------------
    // Visible rows
    // ------------------------------------------------------------------------

    pub fn post_page(&mut self) -> (Vec<Post>, usize) {
        page_from(&self.store.posts, &mut self.listings[Tab::Articles.index()])
    }

    pub fn source_page(&mut self) -> (Vec<Source>, usize) {
        page_from(&self.store.sources, &mut self.listings[Tab::Sources.index()])
    }

    pub fn tag_page(&mut self) -> (Vec<Tag>, usize) {
        page_from(&self.store.tags, &mut self.listings[Tab::Tags.index()])
    }

    /// Rows of the Categories tab: the tree, or a flat filtered page while a
    /// search query is active.
    pub fn category_rows(&mut self) -> Vec<TreeRow> {
        if self.listing(Tab::Categories).query().trim().is_empty() {
            return visible_rows(&self.tree, &self.expansion, &self.counts);
        }
        let (page, _) = page_from(
            &self.store.categories,
            &mut self.listings[Tab::Categories.index()],
        );
        page.into_iter()
            .map(|c| TreeRow {
                article_count: self.counts.get(&c.slug),
                category_id: c.id,
                name: c.name,
                slug: c.slug,
                depth: 0,
                has_children: false,
                is_expanded: false,
            })
            .collect()
    }

    /// Number of rows the current tab shows plus the filtered total.
    fn row_counts(&mut self) -> (usize, usize) {
        match self.tab {
            Tab::Articles => {
                let (page, total) = self.post_page();
                (page.len(), total)
            }
            Tab::Categories => {
                let rows = self.category_rows().len();
                let query = self.listing(Tab::Categories).query();
                let total = if query.trim().is_empty() {
                    rows
                } else {
                    self.store
                        .categories
                        .read(|s| filter_items(&s.items, query, None).len())
                };
                (rows, total)
            }
            Tab::Sources => {
                let (page, total) = self.source_page();
                (page.len(), total)
            }
            Tab::Tags => {
                let (page, total) = self.tag_page();
                (page.len(), total)
            }
        }
    }

    pub fn selected_post(&mut self) -> Option<Post> {
        let idx = self.selected[Tab::Articles.index()];
        self.post_page().0.into_iter().nth(idx)
    }

    pub fn selected_source(&mut self) -> Option<Source> {
        let idx = self.selected[Tab::Sources.index()];
        self.source_page().0.into_iter().nth(idx)
    }

    pub fn selected_tag(&mut self) -> Option<Tag> {
        let idx = self.selected[Tab::Tags.index()];
        self.tag_page().0.into_iter().nth(idx)
    }

    pub fn selected_category_row(&mut self) -> Option<TreeRow> {
        let idx = self.selected[Tab::Categories.index()];
        self.category_rows().into_iter().nth(idx)
    }

    pub fn selected_category(&mut self) -> Option<Category> {
        let row = self.selected_category_row()?;
        self.store
            .categories
            .read(|s| s.find(row.category_id).cloned())
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        let idx = self.tab.index();
        self.selected[idx] = self.selected[idx].saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let (rows, _) = self.row_counts();
        let idx = self.tab.index();
        if rows > 0 {
            self.selected[idx] = self.selected[idx].saturating_add(1).min(rows - 1);
        }
    }

    /// The category tree is not paged; only its flat search results are.
    fn is_paged(&self) -> bool {
        self.tab != Tab::Categories || !self.listing(Tab::Categories).query().trim().is_empty()
    }

    pub fn next_page(&mut self) {
        if !self.is_paged() {
            return;
        }
        let (_, total) = self.row_counts();
        let tab = self.tab;
        self.listing_mut(tab).next_page(total);
        self.selected[tab.index()] = 0;
    }

    pub fn prev_page(&mut self) {
        if !self.is_paged() {
            return;
        }
        let tab = self.tab;
        self.listing_mut(tab).prev_page();
        self.selected[tab.index()] = 0;
    }

    /// Keep the selection inside the visible rows.
    pub fn clamp_selection(&mut self) {
        let (rows, _) = self.row_counts();
        let idx = self.tab.index();
        self.selected[idx] = self.selected[idx].min(rows.saturating_sub(1));
    }

    /// Apply the search buffer to the current tab's listing.
    pub fn apply_search(&mut self) {
        let tab = self.tab;
        let query = self.ui.search_query.clone();
        self.listing_mut(tab).set_query(query);
        self.selected[tab.index()] = 0;
    }

    pub fn cycle_post_status(&mut self) {
        self.listing_mut(Tab::Articles).cycle_status();
        self.selected[Tab::Articles.index()] = 0;
    }

    // ------------------------------------------------------------------------
    // Category tree
    // ------------------------------------------------------------------------

    /// Rebuild the tree from the category container and return every node's
    /// slug so the caller can fetch counts.
    pub fn rebuild_tree(&mut self) -> Vec<String> {
        self.tree = self.store.categories.read(|s| CategoryTree::build(&s.items));
        self.expansion.retain_in(&self.tree);
        self.tree.slugs()
    }

    /// Toggle the selected root. Children and flat search rows are ignored.
    pub fn toggle_selected_category(&mut self) {
        let Some(row) = self.selected_category_row() else {
            return;
        };
        if row.depth != 0 || self.tree.root(row.category_id).is_none() {
            return;
        }
        self.expansion.toggle(row.category_id);

        // Keep the cursor on the toggled root.
        let rows = self.category_rows();
        if let Some(pos) = rows.iter().position(|r| r.category_id == row.category_id) {
            self.selected[Tab::Categories.index()] = pos;
        }
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it is older than three seconds.
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

fn page_from<R>(container: &Container<R>, listing: &mut Listing) -> (Vec<R::Item>, usize)
where
    R: Resource,
    R::Item: Searchable,
{
    container.read(|state| {
        let (page, total) = listing.apply(&state.items);
        (page.into_iter().cloned().collect(), total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::models::PostStatus;
    use std::time::Duration;
    use tokio::time;

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:8888/api", Duration::from_secs(5)).unwrap();
        App::new(Store::new(api, 1000), 10)
    }

    fn cat(id: i64, parent_id: Option<i64>, slug: &str) -> Category {
        Category {
            id,
            slug: slug.to_string(),
            code: None,
            name: slug.to_string(),
            description: None,
            is_active: true,
            parent_id,
        }
    }

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            slug: None,
            color: None,
            post_count: 0,
        }
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Tags.next(), Tab::Articles);
        assert_eq!(Tab::Articles.prev(), Tab::Tags);
        assert_eq!(Tab::Categories.next(), Tab::Sources);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Saved");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_rebuild_tree_and_toggle() {
        let mut app = test_app();
        app.store.categories.lock().replace(
            vec![
                cat(1, None, "tech"),
                cat(2, Some(1), "ai"),
                cat(3, Some(99), "orphan"),
                cat(4, None, "sports"),
            ],
            None,
        );
        let slugs = app.rebuild_tree();
        assert_eq!(slugs, vec!["tech", "ai", "sports"]);

        app.switch_tab(Tab::Categories);
        app.toggle_selected_category();
        let rows: Vec<String> = app.category_rows().into_iter().map(|r| r.slug).collect();
        assert_eq!(rows, vec!["tech", "ai", "sports"]);

        // Move to "sports" and open it: "tech" closes.
        app.nav_down();
        app.nav_down();
        app.toggle_selected_category();
        assert_eq!(app.expansion.expanded(), Some(4));
        assert_eq!(app.selected(), 1);
    }

    #[tokio::test]
    async fn test_toggle_on_child_is_ignored() {
        let mut app = test_app();
        app.store
            .categories
            .lock()
            .replace(vec![cat(1, None, "tech"), cat(2, Some(1), "ai")], None);
        app.rebuild_tree();
        app.switch_tab(Tab::Categories);
        app.toggle_selected_category();
        app.nav_down();
        app.toggle_selected_category();
        assert_eq!(app.expansion.expanded(), Some(1));
    }

    #[tokio::test]
    async fn test_category_search_shows_flat_rows() {
        let mut app = test_app();
        app.store
            .categories
            .lock()
            .replace(vec![cat(1, None, "tech"), cat(2, Some(1), "ai")], None);
        app.rebuild_tree();
        app.switch_tab(Tab::Categories);
        app.ui.set_search_query("ai");
        app.apply_search();

        let rows = app.category_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slug, "ai");
        assert_eq!(rows[0].depth, 0);
    }

    #[tokio::test]
    async fn test_paging_ignored_on_category_tree() {
        let mut app = test_app();
        let categories: Vec<Category> = (1..=25).map(|i| cat(i, None, &format!("c{i}"))).collect();
        app.store.categories.lock().replace(categories, None);
        app.rebuild_tree();
        app.switch_tab(Tab::Categories);
        app.nav_down();

        app.next_page();
        assert_eq!(app.listing(Tab::Categories).page(), 1);
        assert_eq!(app.selected(), 1);

        // A later search must start on its first page.
        app.ui.set_search_query("c");
        app.apply_search();
        assert_eq!(app.category_rows().len(), 10);
        app.next_page();
        assert_eq!(app.listing(Tab::Categories).page(), 2);
    }

    #[tokio::test]
    async fn test_nav_clamps_to_page() {
        let mut app = test_app();
        let tags: Vec<Tag> = (0..12).map(|i| tag(i, &format!("t{i}"))).collect();
        app.store.tags.lock().replace(tags, None);
        app.switch_tab(Tab::Tags);

        for _ in 0..20 {
            app.nav_down();
        }
        assert_eq!(app.selected(), 9);

        app.next_page();
        assert_eq!(app.listing(Tab::Tags).page(), 2);
        assert_eq!(app.selected(), 0);
        for _ in 0..20 {
            app.nav_down();
        }
        assert_eq!(app.selected(), 1);
        assert_eq!(app.selected_tag().map(|t| t.id), Some(11));
    }

    #[tokio::test]
    async fn test_status_filter_resets_page() {
        let mut app = test_app();
        let posts: Vec<Post> = (0..25)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": i,
                    "title": format!("p{i}"),
                    "status": if i % 2 == 0 { "published" } else { "draft" }
                }))
                .unwrap()
            })
            .collect();
        app.store.posts.lock().replace(posts, Some(25));
        app.next_page();
        assert_eq!(app.listing(Tab::Articles).page(), 2);

        app.cycle_post_status();
        assert_eq!(app.listing(Tab::Articles).page(), 1);
        assert_eq!(app.listing(Tab::Articles).status(), Some(PostStatus::Draft));
        let (page, total) = app.post_page();
        assert_eq!(total, 12);
        assert!(page.iter().all(|p| p.status == PostStatus::Draft));
    }
}
