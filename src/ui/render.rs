//! Render functions for the TUI.
//!
//! Lays out the tab bar, the active tab's list and the status bar, then
//! draws any open dialog on top.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, ConfirmAction, Prompt, PromptKind, Tab};
use crate::editor::{Editor, FieldKind};
use crate::forms::CategoryDraft;
use crate::listing::{page_count, Listing};
use crate::util::{display_width, fit_width, fit_width_tail, single_line};

use super::{articles, categories, sources, status, tags};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Sanitize, truncate and pad `text` to exactly `width` columns.
pub(super) fn column(text: &str, width: usize) -> String {
    let line = single_line(text);
    let fitted = fit_width(&line, width);
    let pad = width.saturating_sub(display_width(&fitted));
    format!("{}{}", fitted, " ".repeat(pad))
}

/// Block title with filtered count, page position and active query.
pub(super) fn list_title(name: &str, listing: &Listing, total: usize) -> String {
    let pages = page_count(total, listing.page_size()).max(1);
    let mut title = format!("{} ({}) page {}/{}", name, total, listing.page(), pages);
    if !listing.query().is_empty() {
        title.push_str(&format!(" - search: {}", listing.query()));
    }
    title
}

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tab_bar(f, app, chunks[0]);
    match app.tab {
        Tab::Articles => articles::render(f, app, chunks[1]),
        Tab::Categories => categories::render(f, app, chunks[1]),
        Tab::Sources => sources::render(f, app, chunks[1]),
        Tab::Tags => tags::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);

    if let Some(confirm) = app.pending_confirm.clone() {
        render_confirm_overlay(f, &confirm);
    }
    if let Some(prompt) = app.prompt.clone() {
        render_prompt_overlay(f, app, &prompt);
    }
    if let Some(editor) = app.editor.as_ref() {
        render_editor_overlay(f, editor);
    }
}

fn render_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();

    let user = app
        .store
        .auth
        .snapshot()
        .user
        .map(|u| format!(" {} ", u.username))
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(user.len() as u16)])
        .split(area);

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);
    f.render_widget(
        Paragraph::new(user).style(Style::default().fg(Color::Green)),
        chunks[1],
    );
}

/// Centered rectangle of at most `width` x `height`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm_overlay(f: &mut Frame, confirm: &ConfirmAction) {
    let what = match confirm {
        ConfirmAction::DeletePost { .. } => "article",
        ConfirmAction::DeleteCategory { .. } => "category",
        ConfirmAction::DeleteSource { .. } => "source",
        ConfirmAction::DeleteTag { .. } => "tag",
    };
    let text = format!(
        "Delete {} \"{}\"?\n\n(y) Confirm  (n/Esc) Cancel",
        what,
        fit_width(&single_line(confirm.label()), 40)
    );

    let overlay = centered(f.area(), 56, 7);
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, overlay);
}

fn render_prompt_overlay(f: &mut Frame, app: &App, prompt: &Prompt) {
    let (title, extra) = match prompt.kind {
        PromptKind::NewTag => (" New Tag ".to_string(), String::new()),
        PromptKind::NewCategory { parent_id } => {
            let draft = CategoryDraft {
                name: prompt.input.clone(),
                parent_id,
                ..Default::default()
            };
            let parent = parent_id
                .and_then(|id| app.tree.root(id))
                .map(|node| format!("Parent: {}\n", node.category.name))
                .unwrap_or_default();
            (
                " New Category ".to_string(),
                format!("{}Slug:   {}\n", parent, draft.slug_preview()),
            )
        }
    };

    let text = format!(
        "Name:   {}_\n{}\n(Enter) Save  (Esc) Cancel",
        prompt.input, extra
    );

    let overlay = centered(f.area(), 60, 9);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    f.render_widget(paragraph, overlay);
}

/// One `label  value` line per field; the focused field is highlighted.
pub(super) fn editor_lines(editor: &Editor, width: usize) -> Vec<Line<'static>> {
    let fields = editor.field_views();
    let label_width = fields.iter().map(|v| v.label.len()).max().unwrap_or(0);
    let value_width = width.saturating_sub(label_width + 2);

    fields
        .iter()
        .map(|field| {
            let value = single_line(&field.value).into_owned();
            let value = match field.kind {
                FieldKind::Text if field.focused => {
                    fit_width_tail(&format!("{}_", value), value_width).into_owned()
                }
                FieldKind::Text => fit_width(&value, value_width).into_owned(),
                FieldKind::Choice | FieldKind::Toggle => {
                    fit_width(&format!("< {} >", value), value_width).into_owned()
                }
            };
            let style = if field.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(
                format!("{:<width$}  {}", field.label, value, width = label_width),
                style,
            )
        })
        .collect()
}

fn render_editor_overlay(f: &mut Frame, editor: &Editor) {
    let field_count = editor.field_views().len() as u16;
    let overlay = centered(f.area(), 76, field_count + 4);
    if overlay.width < 30 || overlay.height < 5 {
        return;
    }

    let mut lines = editor_lines(editor, overlay.width.saturating_sub(2) as usize);
    lines.push(Line::from(""));
    lines.push(Line::from(
        "(Tab) Next field  (Left/Right) Change  (Enter) Save  (Esc) Cancel",
    ));

    f.render_widget(Clear, overlay);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(editor.target.title()),
    );
    f.render_widget(paragraph, overlay);
}
