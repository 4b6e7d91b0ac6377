//! Top header bar showing the active ordering, filters and position.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::i18n;
use crate::tui::app::{App, Screen};
use crate::tui::theme::current_theme;

/// Render the top header bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();
    let left = match app.screen {
        Screen::Viewer => viewer_summary(app),
        Screen::Grid => grid_summary(app),
    };

    let mut spans = vec![Span::styled(left.clone(), theme.header_bar)];

    // Right-aligned help hint
    let right_text = i18n::tui_help_hint();
    let used = left.width() + right_text.width();
    let width = area.width as usize;
    if width > used {
        spans.push(Span::styled(" ".repeat(width - used), theme.header_bar));
    }
    spans.push(Span::styled(right_text, theme.header_bar));

    let bar = Paragraph::new(Line::from(spans)).style(theme.header_bar);
    frame.render_widget(bar, area);
}

fn viewer_summary(app: &App) -> String {
    let mut text = format!(
        " {} | {} | {}: {}",
        i18n::app_name(),
        app.client.base_url(),
        i18n::tui_order(),
        app.ordering
    );
    if let Some(offset) = app.offset() {
        if !app.ordering.is_random() {
            text.push_str(&format!(" | {}: {offset}", i18n::tui_offset()));
        }
    }
    if app.filters.min_size > 0 {
        text.push_str(&format!(
            " | {} {}",
            i18n::tui_min_size(),
            humansize::format_size(app.filters.min_size, humansize::BINARY)
        ));
    }
    let docs = if app.filters.allow_octet_like {
        i18n::tui_docs_shown()
    } else {
        i18n::tui_docs_hidden()
    };
    text.push_str(&format!(" | {docs}"));
    text
}

fn grid_summary(app: &App) -> String {
    let mut text = format!(" {}", i18n::app_name());
    if let Some(grid) = &app.grid {
        let query = grid.query();
        let types = if query.all_types {
            i18n::tui_all_types()
        } else {
            i18n::tui_images_only()
        };
        text.push_str(&format!(
            " | {}: {} {} | {types} | {} {} {} {}",
            i18n::tui_order(),
            query.order.as_str(),
            query.direction.as_str(),
            i18n::msg_page(),
            grid.page(),
            i18n::msg_of(),
            grid.total_pages()
        ));
    }
    text
}
