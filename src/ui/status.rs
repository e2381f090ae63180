use crate::app::{App, Tab};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Key hints for the browse mode of each tab.
fn hints(tab: Tab) -> &'static str {
    match tab {
        Tab::Articles => {
            "[n]ew [e]dit [/]search [s]tatus [p]ublish [u]restore [g]enerate [d]elete [r]eload [[ ]]page [q]uit"
        }
        Tab::Categories => {
            "[Enter]expand [n]ew [N]ew child [a]ctive [d]elete [/]search [r]eload [q]uit"
        }
        Tab::Sources => {
            "[n]ew [e]dit [c]rawl [C]rawl all links [a]ctive [d]elete [/]search [r]eload [q]uit"
        }
        Tab::Tags => "[n]ew [e]dit [d]elete [/]search [r]eload [[ ]]page [q]uit",
    }
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg)
    } else if app.search_mode {
        Cow::Owned(format!(
            "Search: {}_  (Enter keep, Esc clear)",
            app.ui.search_query
        ))
    } else {
        Cow::Borrowed(hints(app.tab))
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
