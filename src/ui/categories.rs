use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Tab};

use super::render::column;

/// Render the category tree (or flat search results) with article counts.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let rows = app.category_rows();
    let searching = !app.listing(Tab::Categories).query().trim().is_empty();
    let loading = app.store.categories.is_loading();
    let inactive: Vec<i64> = app.store.categories.read(|s| {
        s.items
            .iter()
            .filter(|c| !c.is_active)
            .map(|c| c.id)
            .collect()
    });

    let name_width = (area.width as usize).saturating_sub(2 + 4 + 10 + 24).max(8);

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(if loading {
            "Loading..."
        } else {
            "No categories"
        })]
    } else {
        rows.iter()
            .map(|row| {
                let indent = "  ".repeat(row.depth);
                let icon = if row.has_children {
                    if row.is_expanded {
                        "v "
                    } else {
                        "> "
                    }
                } else {
                    "  "
                };

                let style = if inactive.contains(&row.category_id) {
                    Style::default().fg(Color::DarkGray)
                } else if row.depth == 0 {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}{}", indent, icon), style),
                    Span::styled(column(&row.name, name_width.saturating_sub(indent.len())), style),
                    Span::styled(
                        format!(" {:>6} ", row.article_count),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(column(&row.slug, 24), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect()
    };

    let title = if searching {
        format!(
            "Categories - search: {}",
            app.listing(Tab::Categories).query()
        )
    } else {
        format!("Categories ({} in tree)", app.tree.len())
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let selected = (!rows.is_empty()).then(|| app.selected());
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
