//! Client-side search and pagination over fully loaded collections.
//!
//! Containers fetch everything in one large page; the views then filter and
//! slice locally. Pages are 1-based to match what the console displays.

use crate::models::{Category, Post, PostStatus, Source, Tag, Tenant, User};

/// Items per listing page.
pub const PAGE_SIZE: usize = 10;

/// Entities that can be matched by a free-text query.
pub trait Searchable {
    /// Fields compared against the query, in no particular order.
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared against the status selector, if the entity has one.
    fn status_key(&self) -> Option<PostStatus> {
        None
    }
}

impl Searchable for Post {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.category_label());
        fields.extend(self.base_url.as_deref());
        fields
    }

    fn status_key(&self) -> Option<PostStatus> {
        Some(self.status)
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.code.as_deref());
        fields
    }
}

impl Searchable for Source {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.base_url.as_str()]
    }
}

impl Searchable for Tag {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.username.as_str()];
        fields.extend(self.full_name.as_deref());
        fields.extend(self.email.as_deref());
        fields
    }
}

impl Searchable for Tenant {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

/// Case-insensitive substring match against any searched field.
///
/// A blank query matches everything.
pub fn matches_query<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Items matching both the query and (when set) the status selector, in order.
pub fn filter_items<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    status: Option<PostStatus>,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| match status {
            Some(wanted) => item.status_key() == Some(wanted),
            None => true,
        })
        .filter(|item| matches_query(*item, query))
        .collect()
}

/// Number of pages needed for `len` items. An empty set has zero pages.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Filter text, status selector and current page of one listing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    query: String,
    status: Option<PostStatus>,
    page: usize,
    page_size: usize,
}

impl Default for Listing {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Listing {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            status: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> Option<PostStatus> {
        self.status
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the filter text; the page goes back to 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Change the status selector; the page goes back to 1.
    pub fn set_status(&mut self, status: Option<PostStatus>) {
        self.status = status;
        self.page = 1;
    }

    pub fn cycle_status(&mut self) {
        self.set_status(PostStatus::cycle(self.status));
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page < page_count(total, self.page_size)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Advance one page; does nothing on the last page.
    pub fn next_page(&mut self, total: usize) {
        if self.has_next(total) {
            self.page += 1;
        }
    }

    /// Go back one page; does nothing on page 1.
    pub fn prev_page(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    /// Pull the page back in range after the underlying set shrank.
    pub fn clamp(&mut self, total: usize) {
        let last = page_count(total, self.page_size).max(1);
        self.page = self.page.clamp(1, last);
    }

    /// Filter `items` and return the current page plus the filtered count.
    pub fn apply<'a, T: Searchable>(&mut self, items: &'a [T]) -> (Vec<&'a T>, usize) {
        let filtered = filter_items(items, &self.query, self.status);
        let total = filtered.len();
        self.clamp(total);
        let start = (self.page - 1) * self.page_size;
        let page = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        (page, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            slug: None,
            color: None,
            post_count: 0,
        }
    }

    fn tags(n: usize) -> Vec<Tag> {
        (0..n).map(|i| tag(i as i64, &format!("tag-{i}"))).collect()
    }

    fn post(id: i64, title: &str, status: PostStatus) -> Post {
        let mut p: Post = serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "status": "draft"
        }))
        .unwrap();
        p.status = status;
        p
    }

    #[test]
    fn test_empty_query_matches_all() {
        let items = tags(5);
        assert_eq!(filter_items(&items, "", None).len(), 5);
        assert_eq!(filter_items(&items, "   ", None).len(), 5);
    }

    #[test]
    fn test_absent_query_matches_nothing() {
        let items = tags(5);
        assert!(filter_items(&items, "zzz-not-there", None).is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let items = vec![tag(1, "Rust"), tag(2, "Go")];
        let hits = filter_items(&items, "rUsT", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_post_matches_category_and_base_url() {
        let mut p = post(1, "Election night", PostStatus::Draft);
        p.category_name = Some("Politics".to_string());
        p.base_url = Some("https://vnexpress.net".to_string());
        let items = vec![p];

        assert_eq!(filter_items(&items, "politic", None).len(), 1);
        assert_eq!(filter_items(&items, "VNEXPRESS", None).len(), 1);
        assert!(filter_items(&items, "sports", None).is_empty());
    }

    #[test]
    fn test_category_matches_code() {
        let c = Category {
            id: 1,
            slug: "tech".into(),
            code: Some("TECH01".into()),
            name: "Technology".into(),
            description: Some("gadgets".into()),
            is_active: true,
            parent_id: None,
        };
        assert!(matches_query(&c, "tech01"));
        assert!(!matches_query(&c, "gadgets"), "description is not searched");
    }

    #[test]
    fn test_status_selector_narrows_posts() {
        let items = vec![
            post(1, "a", PostStatus::Draft),
            post(2, "b", PostStatus::Published),
            post(3, "c", PostStatus::Published),
        ];
        let hits = filter_items(&items, "", Some(PostStatus::Published));
        let ids: Vec<i64> = hits.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_query_change_resets_page() {
        let items = tags(35);
        let mut listing = Listing::default();
        listing.next_page(items.len());
        listing.next_page(items.len());
        assert_eq!(listing.page(), 3);

        listing.set_query("tag");
        assert_eq!(listing.page(), 1);

        listing.next_page(items.len());
        listing.set_status(Some(PostStatus::Draft));
        assert_eq!(listing.page(), 1);
    }

    #[test]
    fn test_navigation_stops_at_bounds() {
        let mut listing = Listing::default();
        listing.prev_page();
        assert_eq!(listing.page(), 1);

        for _ in 0..10 {
            listing.next_page(25);
        }
        assert_eq!(listing.page(), 3);
        assert!(!listing.has_next(25));
    }

    #[test]
    fn test_apply_slices_current_page() {
        let items = tags(23);
        let mut listing = Listing::default();
        listing.next_page(items.len());
        listing.next_page(items.len());

        let (page, total) = listing.apply(&items);
        assert_eq!(total, 23);
        let ids: Vec<i64> = page.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![20, 21, 22]);
    }

    #[test]
    fn test_apply_clamps_after_shrink() {
        let items = tags(30);
        let mut listing = Listing::default();
        listing.next_page(items.len());
        listing.next_page(items.len());

        let (page, _) = listing.apply(&items[..5]);
        assert_eq!(listing.page(), 1);
        assert_eq!(page.len(), 5);
    }

    #[test]
    fn test_page_count_edges() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
