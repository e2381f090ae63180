use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Tab};

use super::render::{column, list_title};

/// Render the crawl source list.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let (page, total) = app.source_page();
    let listing = app.listing(Tab::Sources).clone();
    let loading = app.store.sources.is_loading();

    let width = (area.width as usize).saturating_sub(2 + 4 + 8 + 16 + 3);
    let name_width = (width / 3).max(8);
    let url_width = width.saturating_sub(name_width).max(8);

    let items: Vec<ListItem> = if page.is_empty() {
        vec![ListItem::new(if loading { "Loading..." } else { "No sources" })]
    } else {
        page.iter()
            .map(|source| {
                let (marker, marker_style) = if source.is_active {
                    ("on  ", Style::default().fg(Color::Green))
                } else {
                    ("off ", Style::default().fg(Color::DarkGray))
                };
                let articles = source
                    .article_count
                    .map(|n| format!("{:>6}  ", n))
                    .unwrap_or_else(|| "     -  ".to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(marker, marker_style),
                    Span::raw(column(&source.name, name_width)),
                    Span::raw(" "),
                    Span::styled(
                        column(&source.base_url, url_width),
                        Style::default().fg(Color::Blue),
                    ),
                    Span::raw(" "),
                    Span::raw(articles),
                    Span::styled(
                        column(source.category_name.as_deref().unwrap_or("-"), 16),
                        Style::default().fg(Color::Cyan),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(list_title("Sources", &listing, total)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let selected = (!page.is_empty()).then(|| app.selected());
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
