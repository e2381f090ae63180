//! Two-level category tree with lazily fetched article counts.
//!
//! The backend hands us a flat list. [`CategoryTree::build`] partitions it
//! into roots and their direct children; anything that does not fit the
//! two-level shape (missing parent, parent that is itself a child) is left
//! out of the tree. Counts are fetched per node by slug and cached in
//! [`ArticleCounts`] for the session.

use std::collections::HashMap;

use futures::stream::{FuturesUnordered, Stream};

use crate::api::{ApiClient, ApiError};
use crate::models::{Category, Placement};

/// A root category and its children, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub category: Category,
    pub children: Vec<Category>,
}

/// The category forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    nodes: Vec<TreeNode>,
}

impl CategoryTree {
    /// Partition a flat category list into roots and children.
    ///
    /// Orphans (parent id not in the list) and grandchildren (parent is not a
    /// root) are silently omitted.
    pub fn build(categories: &[Category]) -> Self {
        let mut nodes: Vec<TreeNode> = categories
            .iter()
            .filter(|c| c.placement() == Placement::Root)
            .map(|c| TreeNode {
                category: c.clone(),
                children: Vec::new(),
            })
            .collect();

        let root_index: HashMap<i64, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.category.id, idx))
            .collect();

        let mut omitted = 0usize;
        for category in categories {
            if let Placement::Child { parent_id } = category.placement() {
                match root_index.get(&parent_id) {
                    Some(&idx) => nodes[idx].children.push(category.clone()),
                    None => omitted += 1,
                }
            }
        }

        if omitted > 0 {
            tracing::debug!(omitted, "Categories without a top-level parent left out of tree");
        }

        Self { nodes }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of categories in the tree (roots plus children).
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| 1 + n.children.len()).sum()
    }

    /// Every category in the tree, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.nodes
            .iter()
            .flat_map(|n| std::iter::once(&n.category).chain(n.children.iter()))
    }

    /// Slugs of every node, used to issue one count fetch per node.
    pub fn slugs(&self) -> Vec<String> {
        self.iter()
            .filter(|c| !c.slug.is_empty())
            .map(|c| c.slug.clone())
            .collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.iter().any(|c| c.id == id)
    }

    pub fn root(&self, id: i64) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.category.id == id)
    }
}

/// Exclusive expansion: at most one root is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expansion {
    expanded: Option<i64>,
}

impl Expansion {
    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    pub fn is_expanded(&self, root_id: i64) -> bool {
        self.expanded == Some(root_id)
    }

    /// Open `root_id`, closing whichever root was open before.
    pub fn expand(&mut self, root_id: i64) {
        self.expanded = Some(root_id);
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Select a root: a different root replaces the open one, the open root closes.
    pub fn toggle(&mut self, root_id: i64) {
        if self.is_expanded(root_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(root_id);
        }
    }

    /// Forget the expanded root if it is no longer part of `tree`.
    pub fn retain_in(&mut self, tree: &CategoryTree) {
        if let Some(id) = self.expanded {
            if tree.root(id).is_none() {
                self.expanded = None;
            }
        }
    }
}

/// Session cache of article counts, keyed by category slug.
#[derive(Debug, Clone, Default)]
pub struct ArticleCounts {
    counts: HashMap<String, u64>,
}

impl ArticleCounts {
    /// Count for `slug`; 0 until its fetch completes.
    pub fn get(&self, slug: &str) -> u64 {
        self.counts.get(slug).copied().unwrap_or(0)
    }

    pub fn is_known(&self, slug: &str) -> bool {
        self.counts.contains_key(slug)
    }

    pub fn record(&mut self, slug: impl Into<String>, count: u64) {
        self.counts.insert(slug.into(), count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fold one fetch outcome into the cache. Failures are logged and leave
    /// the slug at its previous value.
    pub fn apply(&mut self, slug: String, result: Result<u64, ApiError>) {
        match result {
            Ok(count) => self.record(slug, count),
            Err(e) => {
                tracing::warn!(slug = %slug, error = %e, "Failed to fetch article count");
            }
        }
    }
}

/// Issue one count request per slug, all in flight at once.
///
/// Results arrive in completion order; a slow or failing request does not
/// hold back the others.
pub fn fetch_counts(
    api: ApiClient,
    slugs: Vec<String>,
) -> impl Stream<Item = (String, Result<u64, ApiError>)> {
    slugs
        .into_iter()
        .map(|slug| {
            let api = api.clone();
            async move {
                let result = api.category_article_count(&slug).await;
                (slug, result)
            }
        })
        .collect::<FuturesUnordered<_>>()
}

/// One visible row of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    /// 0 for roots, 1 for children.
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub article_count: u64,
}

/// Flatten the tree for display: every root, followed by its children when
/// it is the expanded root.
pub fn visible_rows(
    tree: &CategoryTree,
    expansion: &Expansion,
    counts: &ArticleCounts,
) -> Vec<TreeRow> {
    let mut rows = Vec::with_capacity(tree.len());
    for node in tree.roots() {
        let is_expanded = expansion.is_expanded(node.category.id);
        rows.push(TreeRow {
            category_id: node.category.id,
            name: node.category.name.clone(),
            slug: node.category.slug.clone(),
            depth: 0,
            has_children: !node.children.is_empty(),
            is_expanded,
            article_count: counts.get(&node.category.slug),
        });
        if is_expanded {
            rows.extend(node.children.iter().map(|child| TreeRow {
                category_id: child.id,
                name: child.name.clone(),
                slug: child.slug.clone(),
                depth: 1,
                has_children: false,
                is_expanded: false,
                article_count: counts.get(&child.slug),
            }));
        }
    }
    rows
}

/// Plain-text outline of the whole tree with counts, every root expanded.
pub fn outline(tree: &CategoryTree, counts: &ArticleCounts) -> String {
    let mut out = String::new();
    for node in tree.roots() {
        let c = &node.category;
        out.push_str(&format!("{} [{}] ({})\n", c.name, c.slug, counts.get(&c.slug)));
        for child in &node.children {
            out.push_str(&format!(
                "  {} [{}] ({})\n",
                child.name,
                child.slug,
                counts.get(&child.slug)
            ));
        }
    }
    out
}
