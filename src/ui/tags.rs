use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Tab};

use super::render::{column, list_title};

/// Map the backend's color names onto terminal colors.
fn tag_color(name: Option<&str>) -> Color {
    match name.map(str::to_ascii_lowercase).as_deref() {
        Some("blue") => Color::Blue,
        Some("emerald") | Some("green") => Color::Green,
        Some("purple") => Color::Magenta,
        Some("orange") | Some("yellow") => Color::Yellow,
        Some("red") => Color::Red,
        _ => Color::White,
    }
}

/// Render the tag list.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let (page, total) = app.tag_page();
    let listing = app.listing(Tab::Tags).clone();
    let loading = app.store.tags.is_loading();
    let name_width = (area.width as usize).saturating_sub(2 + 10 + 24).max(8);

    let items: Vec<ListItem> = if page.is_empty() {
        vec![ListItem::new(if loading { "Loading..." } else { "No tags" })]
    } else {
        page.iter()
            .map(|tag| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        column(&tag.name, name_width),
                        Style::default().fg(tag_color(tag.color.as_deref())),
                    ),
                    Span::raw(format!(" {:>7} posts ", tag.post_count)),
                    Span::styled(
                        column(tag.slug.as_deref().unwrap_or(""), 18),
                        Style::default().fg(Color::DarkGray),
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
                .title(list_title("Tags", &listing, total)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let selected = (!page.is_empty()).then(|| app.selected());
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
