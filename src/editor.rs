//! Multi-field editor behind the create/edit dialogs.
//!
//! An [`Editor`] wraps one typed draft from [`crate::forms`] and exposes it
//! as an ordered list of fields. Text fields take typed characters; choice
//! fields (category, status) and toggles step with Left/Right. Validation
//! stays in the draft's `into_payload`, so the editor never decides what is
//! required.

use std::borrow::Cow;

use crate::forms::{PostDraft, SourceDraft, TagDraft};
use crate::models::{Category, Post, PostStatus, Source, Tag};

/// Longest value a single field accepts.
const MAX_FIELD_LENGTH: usize = 2048;

/// What a submitted editor creates or updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    NewSource,
    Source(i64),
    NewPost,
    Post(i64),
    Tag(i64),
}

impl EditTarget {
    pub fn title(self) -> &'static str {
        match self {
            EditTarget::NewSource => " New Source ",
            EditTarget::Source(_) => " Edit Source ",
            EditTarget::NewPost => " New Article ",
            EditTarget::Post(_) => " Edit Article ",
            EditTarget::Tag(_) => " Edit Tag ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Source(SourceDraft),
    Post(PostDraft),
    Tag(TagDraft),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    Toggle,
}

/// One rendered line of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView<'a> {
    pub label: &'static str,
    pub value: Cow<'a, str>,
    pub kind: FieldKind,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Category,
    BaseUrl,
    ListUrl,
    ListItemSelector,
    LinkAttr,
    TitleSelector,
    ContentSelector,
    ThumbnailSelector,
    AuthorSelector,
    Active,
    Note,
    Title,
    Slug,
    Status,
    Thumbnail,
    Summary,
    Content,
    MetaTitle,
    MetaDescription,
    Color,
}

const SOURCE_FIELDS: &[Field] = &[
    Field::Name,
    Field::Category,
    Field::BaseUrl,
    Field::ListUrl,
    Field::ListItemSelector,
    Field::LinkAttr,
    Field::TitleSelector,
    Field::ContentSelector,
    Field::ThumbnailSelector,
    Field::AuthorSelector,
    Field::Active,
    Field::Note,
];

const POST_FIELDS: &[Field] = &[
    Field::Title,
    Field::Slug,
    Field::Category,
    Field::Status,
    Field::Thumbnail,
    Field::Summary,
    Field::Content,
    Field::MetaTitle,
    Field::MetaDescription,
];

const TAG_FIELDS: &[Field] = &[Field::Name, Field::Color];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Category => "Category",
            Field::BaseUrl => "Base URL",
            Field::ListUrl => "List URL",
            Field::ListItemSelector => "List item selector",
            Field::LinkAttr => "Link attribute",
            Field::TitleSelector => "Title selector",
            Field::ContentSelector => "Content selector",
            Field::ThumbnailSelector => "Thumbnail selector",
            Field::AuthorSelector => "Author selector",
            Field::Active => "Active",
            Field::Note => "Note",
            Field::Title => "Title",
            Field::Slug => "Slug",
            Field::Status => "Status",
            Field::Thumbnail => "Thumbnail",
            Field::Summary => "Summary",
            Field::Content => "Content",
            Field::MetaTitle => "Meta title",
            Field::MetaDescription => "Meta description",
            Field::Color => "Color",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Field::Category | Field::Status => FieldKind::Choice,
            Field::Active => FieldKind::Toggle,
            _ => FieldKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub target: EditTarget,
    pub draft: Draft,
    focus: usize,
    /// Category choices as `(id, name)`, in list order.
    categories: Vec<(i64, String)>,
}

fn category_choices(categories: &[Category]) -> Vec<(i64, String)> {
    categories.iter().map(|c| (c.id, c.name.clone())).collect()
}

impl Editor {
    pub fn new_source(categories: &[Category]) -> Self {
        Self::with(EditTarget::NewSource, Draft::Source(SourceDraft::default()), categories)
    }

    pub fn edit_source(source: &Source, categories: &[Category]) -> Self {
        Self::with(
            EditTarget::Source(source.id),
            Draft::Source(SourceDraft::from_source(source)),
            categories,
        )
    }

    /// New articles start as drafts.
    pub fn new_post(categories: &[Category]) -> Self {
        let draft = PostDraft {
            status: Some(PostStatus::Draft),
            ..PostDraft::default()
        };
        Self::with(EditTarget::NewPost, Draft::Post(draft), categories)
    }

    pub fn edit_post(post: &Post, categories: &[Category]) -> Self {
        Self::with(
            EditTarget::Post(post.id),
            Draft::Post(PostDraft::from_post(post)),
            categories,
        )
    }

    pub fn edit_tag(tag: &Tag) -> Self {
        Self::with(EditTarget::Tag(tag.id), Draft::Tag(TagDraft::from_tag(tag)), &[])
    }

    fn with(target: EditTarget, draft: Draft, categories: &[Category]) -> Self {
        Self {
            target,
            draft,
            focus: 0,
            categories: category_choices(categories),
        }
    }

    fn fields(&self) -> &'static [Field] {
        match self.draft {
            Draft::Source(_) => SOURCE_FIELDS,
            Draft::Post(_) => POST_FIELDS,
            Draft::Tag(_) => TAG_FIELDS,
        }
    }

    fn focused(&self) -> Field {
        self.fields()[self.focus]
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_kind(&self) -> FieldKind {
        self.focused().kind()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn insert(&mut self, c: char) {
        let field = self.focused();
        if let Some(value) = self.text_mut(field) {
            if value.chars().count() < MAX_FIELD_LENGTH {
                value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if let Some(value) = self.text_mut(field) {
            value.pop();
        }
    }

    /// Step the focused choice or toggle. Text fields are left alone.
    pub fn step(&mut self, forward: bool) {
        let field = self.focused();
        let ids: Vec<i64> = self.categories.iter().map(|(id, _)| *id).collect();
        match (&mut self.draft, field) {
            (Draft::Source(d), Field::Category) => {
                let options: Vec<Option<i64>> = ids.into_iter().map(Some).collect();
                d.category_id = step_through(&options, d.category_id, forward);
            }
            (Draft::Post(d), Field::Category) => {
                // Articles may be left without a category.
                let options: Vec<Option<i64>> =
                    std::iter::once(None).chain(ids.into_iter().map(Some)).collect();
                d.category_id = step_through(&options, d.category_id, forward);
            }
            (Draft::Post(d), Field::Status) => {
                let options: Vec<Option<PostStatus>> =
                    PostStatus::ALL.iter().copied().map(Some).collect();
                d.status = step_through(&options, d.status, forward);
            }
            (Draft::Source(d), Field::Active) => d.is_active = !d.is_active,
            _ => {}
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match (&mut self.draft, field) {
            (Draft::Source(d), Field::Name) => Some(&mut d.name),
            (Draft::Source(d), Field::BaseUrl) => Some(&mut d.base_url),
            (Draft::Source(d), Field::ListUrl) => Some(&mut d.list_url),
            (Draft::Source(d), Field::ListItemSelector) => Some(&mut d.list_item_selector),
            (Draft::Source(d), Field::LinkAttr) => Some(&mut d.link_attr),
            (Draft::Source(d), Field::TitleSelector) => Some(&mut d.title_selector),
            (Draft::Source(d), Field::ContentSelector) => Some(&mut d.content_selector),
            (Draft::Source(d), Field::ThumbnailSelector) => Some(&mut d.thumbnail_selector),
            (Draft::Source(d), Field::AuthorSelector) => Some(&mut d.author_selector),
            (Draft::Source(d), Field::Note) => Some(&mut d.note),
            (Draft::Post(d), Field::Title) => Some(&mut d.title),
            (Draft::Post(d), Field::Slug) => Some(&mut d.slug),
            (Draft::Post(d), Field::Thumbnail) => Some(&mut d.thumbnail),
            (Draft::Post(d), Field::Summary) => Some(&mut d.summary),
            (Draft::Post(d), Field::Content) => Some(&mut d.content),
            (Draft::Post(d), Field::MetaTitle) => Some(&mut d.meta_title),
            (Draft::Post(d), Field::MetaDescription) => Some(&mut d.meta_description),
            (Draft::Tag(d), Field::Name) => Some(&mut d.name),
            (Draft::Tag(d), Field::Color) => Some(&mut d.color),
            _ => None,
        }
    }

    fn value(&self, field: Field) -> Cow<'_, str> {
        fn text(s: &str) -> Cow<'static, str> {
            Cow::Owned(s.to_string())
        }
        match (&self.draft, field) {
            (Draft::Source(d), Field::Name) => text(&d.name),
            (Draft::Source(d), Field::Category) => self.category_label(d.category_id),
            (Draft::Source(d), Field::BaseUrl) => text(&d.base_url),
            (Draft::Source(d), Field::ListUrl) => text(&d.list_url),
            (Draft::Source(d), Field::ListItemSelector) => text(&d.list_item_selector),
            (Draft::Source(d), Field::LinkAttr) => text(&d.link_attr),
            (Draft::Source(d), Field::TitleSelector) => text(&d.title_selector),
            (Draft::Source(d), Field::ContentSelector) => text(&d.content_selector),
            (Draft::Source(d), Field::ThumbnailSelector) => text(&d.thumbnail_selector),
            (Draft::Source(d), Field::AuthorSelector) => text(&d.author_selector),
            (Draft::Source(d), Field::Active) => Cow::Borrowed(if d.is_active { "yes" } else { "no" }),
            (Draft::Source(d), Field::Note) => text(&d.note),
            (Draft::Post(d), Field::Title) => text(&d.title),
            (Draft::Post(d), Field::Slug) => text(&d.slug),
            (Draft::Post(d), Field::Category) => self.category_label(d.category_id),
            (Draft::Post(d), Field::Status) => {
                Cow::Borrowed(d.status.map(PostStatus::as_str).unwrap_or("-"))
            }
            (Draft::Post(d), Field::Thumbnail) => text(&d.thumbnail),
            (Draft::Post(d), Field::Summary) => text(&d.summary),
            (Draft::Post(d), Field::Content) => text(&d.content),
            (Draft::Post(d), Field::MetaTitle) => text(&d.meta_title),
            (Draft::Post(d), Field::MetaDescription) => text(&d.meta_description),
            (Draft::Tag(d), Field::Name) => text(&d.name),
            (Draft::Tag(d), Field::Color) => text(&d.color),
            _ => Cow::Borrowed(""),
        }
    }

    fn category_label(&self, id: Option<i64>) -> Cow<'_, str> {
        match id {
            None => Cow::Borrowed("(none)"),
            Some(id) => self
                .categories
                .iter()
                .find(|(cid, _)| *cid == id)
                .map(|(_, name)| Cow::Borrowed(name.as_str()))
                .unwrap_or_else(|| Cow::Owned(format!("#{}", id))),
        }
    }

    /// Every field in focus order, for rendering.
    pub fn field_views(&self) -> Vec<FieldView<'_>> {
        self.fields()
            .iter()
            .enumerate()
            .map(|(idx, &field)| FieldView {
                label: field.label(),
                value: self.value(field),
                kind: field.kind(),
                focused: idx == self.focus,
            })
            .collect()
    }
}

/// The option after (or before) `current`, wrapping. An unknown `current`
/// lands on the first (or last) option.
fn step_through<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    if options.is_empty() {
        return current;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(pos) if forward => (pos + 1) % len,
        Some(pos) => (pos + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    options[next]
}
