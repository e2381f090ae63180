//! Form drafts and client-side validation.
//!
//! A draft holds the raw text the user typed. `into_payload` trims every
//! field, turns empty optional fields into `None`, and rejects the draft
//! before any request is sent when a required field is blank.

use thiserror::Error;

use crate::models::{
    Category, CategoryPayload, Post, PostPayload, PostStatus, Source, SourcePayload, Tag,
    TagPayload,
};

/// Link attribute used when a source leaves it blank.
pub const DEFAULT_LINK_ATTR: &str = "href";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Required { field: &'static str },

    #[error("A category cannot be its own parent")]
    SelfParent,

    #[error("Parent category {0} does not exist")]
    ParentNotFound(i64),

    #[error("Parent category {0} is itself a subcategory; only two levels are supported")]
    NestingTooDeep(i64),

    #[error("Category has subcategories and cannot be moved under another category")]
    HasChildren,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            is_active: true,
            parent_id: None,
        }
    }
}

impl CategoryDraft {
    /// Prefill a draft from an existing category for editing.
    pub fn from_category(category: &Category) -> Self {
        Self {
            code: category.code.clone().unwrap_or_default(),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            is_active: category.is_active,
            parent_id: category.parent_id,
        }
    }

    /// The slug the backend is expected to derive from the name.
    pub fn slug_preview(&self) -> String {
        slug::slugify(self.name.trim())
    }

    /// Validate against the currently loaded categories and build the payload.
    ///
    /// `editing` is the id of the category being edited, if any. The chosen
    /// parent must be a loaded top-level category other than the one being
    /// edited, and a category that already has children cannot become a child.
    pub fn into_payload(
        self,
        existing: &[Category],
        editing: Option<i64>,
    ) -> Result<CategoryPayload, ValidationError> {
        let name = required(&self.name, "Name")?;

        if let Some(parent_id) = self.parent_id {
            if editing == Some(parent_id) {
                return Err(ValidationError::SelfParent);
            }
            let parent = existing
                .iter()
                .find(|c| c.id == parent_id)
                .ok_or(ValidationError::ParentNotFound(parent_id))?;
            if !parent.is_root() {
                return Err(ValidationError::NestingTooDeep(parent_id));
            }
            if let Some(id) = editing {
                if existing.iter().any(|c| c.parent_id == Some(id)) {
                    return Err(ValidationError::HasChildren);
                }
            }
        }

        Ok(CategoryPayload {
            code: optional(&self.code),
            name,
            description: optional(&self.description),
            is_active: self.is_active,
            parent_id: self.parent_id,
        })
    }
}

// ============================================================================
// Source
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDraft {
    pub category_id: Option<i64>,
    pub name: String,
    pub base_url: String,
    pub list_url: String,
    pub list_item_selector: String,
    pub link_attr: String,
    pub title_selector: String,
    pub content_selector: String,
    pub thumbnail_selector: String,
    pub author_selector: String,
    pub is_active: bool,
    pub note: String,
}

impl Default for SourceDraft {
    fn default() -> Self {
        Self {
            category_id: None,
            name: String::new(),
            base_url: String::new(),
            list_url: String::new(),
            list_item_selector: String::new(),
            link_attr: DEFAULT_LINK_ATTR.to_string(),
            title_selector: String::new(),
            content_selector: String::new(),
            thumbnail_selector: String::new(),
            author_selector: String::new(),
            is_active: true,
            note: String::new(),
        }
    }
}

impl SourceDraft {
    /// Prefill a draft from an existing source for editing.
    pub fn from_source(source: &Source) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            category_id: source.category_id,
            name: source.name.clone(),
            base_url: source.base_url.clone(),
            list_url: source.list_url.clone(),
            list_item_selector: source.list_item_selector.clone(),
            link_attr: source
                .link_attr
                .clone()
                .unwrap_or_else(|| DEFAULT_LINK_ATTR.to_string()),
            title_selector: text(&source.title_selector),
            content_selector: text(&source.content_selector),
            thumbnail_selector: text(&source.thumbnail_selector),
            author_selector: text(&source.author_selector),
            is_active: source.is_active,
            note: text(&source.note),
        }
    }

    /// Selectors are passed through untouched apart from trimming.
    pub fn into_payload(self) -> Result<SourcePayload, ValidationError> {
        let name = required(&self.name, "Name")?;
        let base_url = required(&self.base_url, "Base URL")?;
        let list_url = required(&self.list_url, "List URL")?;
        let list_item_selector = required(&self.list_item_selector, "List item selector")?;
        let category_id = self
            .category_id
            .ok_or(ValidationError::Required { field: "Category" })?;

        Ok(SourcePayload {
            category_id,
            name,
            base_url,
            list_url,
            list_item_selector,
            link_attr: optional(&self.link_attr).unwrap_or_else(|| DEFAULT_LINK_ATTR.to_string()),
            title_selector: optional(&self.title_selector),
            content_selector: optional(&self.content_selector),
            thumbnail_selector: optional(&self.thumbnail_selector),
            author_selector: optional(&self.author_selector),
            is_active: self.is_active,
            note: optional(&self.note),
        })
    }
}

// ============================================================================
// Tag
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDraft {
    pub name: String,
    pub color: String,
}

impl TagDraft {
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            name: tag.name.clone(),
            color: tag.color.clone().unwrap_or_default(),
        }
    }

    pub fn into_payload(self) -> Result<TagPayload, ValidationError> {
        Ok(TagPayload {
            name: required(&self.name, "Tag name")?,
            color: optional(&self.color),
        })
    }
}

// ============================================================================
// Post
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub category_id: Option<i64>,
    pub thumbnail: String,
    pub summary: String,
    pub content: String,
    pub meta_title: String,
    pub meta_description: String,
    pub status: Option<PostStatus>,
    pub tag_ids: Vec<i64>,
}

impl PostDraft {
    /// Prefill a draft from a listed post. The category comes from the flat
    /// id when present, otherwise from the nested category object.
    pub fn from_post(post: &Post) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            title: post.title.clone(),
            slug: text(&post.slug),
            category_id: post
                .category_id
                .or_else(|| post.category.as_ref().and_then(|c| c.id)),
            thumbnail: text(&post.thumbnail),
            summary: text(&post.summary),
            content: text(&post.content),
            meta_title: text(&post.meta_title),
            meta_description: text(&post.meta_description),
            status: Some(post.status),
            tag_ids: post.tag_ids.clone(),
        }
    }

    /// Content is always sent, trimmed, even when empty.
    pub fn into_payload(self) -> Result<PostPayload, ValidationError> {
        let title = required(&self.title, "Title")?;
        Ok(PostPayload {
            title: Some(title),
            slug: optional(&self.slug),
            category_id: self.category_id,
            thumbnail: optional(&self.thumbnail),
            summary: optional(&self.summary),
            content: Some(self.content.trim().to_string()),
            meta_title: optional(&self.meta_title),
            meta_description: optional(&self.meta_description),
            status: self.status,
            tag_ids: (!self.tag_ids.is_empty()).then_some(self.tag_ids),
        })
    }
}
