use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Tab};
use crate::models::PostStatus;

use super::render::{column, list_title};

fn status_style(status: PostStatus) -> Style {
    match status {
        PostStatus::Draft => Style::default().fg(Color::Gray),
        PostStatus::Pending => Style::default().fg(Color::Yellow),
        PostStatus::Published => Style::default().fg(Color::Green),
        PostStatus::Removed => Style::default().fg(Color::Red),
    }
}

/// Short date for list rows; empty when unknown.
pub(super) fn format_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Render the article list.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let (page, total) = app.post_page();
    let listing = app.listing(Tab::Articles).clone();
    let loading = app.store.posts.is_loading();

    // status(10) views(8) date(11) plus borders and gaps
    let fixed = 10 + 8 + 11 + 6;
    let title_width = (area.width as usize).saturating_sub(fixed).max(10);
    let category_width = (title_width / 3).min(20);
    let title_width = title_width.saturating_sub(category_width + 1);

    let items: Vec<ListItem> = if page.is_empty() {
        vec![ListItem::new(if loading { "Loading..." } else { "No articles" })]
    } else {
        page.iter()
            .map(|post| {
                let date = post.published_at.or(post.created_at);
                ListItem::new(Line::from(vec![
                    Span::styled(column(post.status.as_str(), 10), status_style(post.status)),
                    Span::styled(
                        column(&post.title, title_width),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        column(post.category_label().unwrap_or("-"), category_width),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(format!("{:>7} ", post.view_count)),
                    Span::styled(
                        column(&format_date(date), 11),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let status = listing
        .status()
        .map(|s| s.as_str())
        .unwrap_or("all");
    let title = format!(
        "{} [status: {}]",
        list_title("Articles", &listing, total),
        status
    );

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let selected = (!page.is_empty()).then(|| app.selected());
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
