//! Bottom status bar showing transient messages or context-sensitive keyboard hints.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::i18n;
use crate::tui::app::{App, Screen};
use crate::tui::theme::current_theme;

/// Version string shown at the right edge of the status bar.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the status bar at the bottom with context-sensitive hints and version.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let version_text = format!("v{VERSION} ");
    let version_width = version_text.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(version_width)])
        .split(area);

    let content = if let Some((msg, _)) = &app.status_message {
        Line::from(Span::styled(format!(" {msg}"), theme.status_bar))
    } else if app.is_busy() {
        Line::from(Span::styled(
            format!(" {}", i18n::tui_busy()),
            theme.status_bar,
        ))
    } else {
        let mut spans = Vec::new();
        for (i, (key, desc)) in build_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ", theme.status_bar));
            }
            spans.push(Span::styled(format!(" {key}"), theme.key_hint));
            spans.push(Span::styled(format!(":{desc}"), theme.status_bar));
        }
        Line::from(spans)
    };

    let bar = Paragraph::new(content).style(theme.status_bar);
    frame.render_widget(bar, chunks[0]);

    let version = Paragraph::new(Line::from(Span::styled(version_text, theme.border)))
        .alignment(Alignment::Right)
        .style(theme.status_bar);
    frame.render_widget(version, chunks[1]);
}

/// Hint pairs (key, description) for the active screen.
fn build_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = Vec::new();

    match app.screen {
        Screen::Viewer => {
            hints.push(("n", i18n::tui_hint_next()));
            if !app.ordering.is_random() {
                hints.push(("p", i18n::tui_hint_prev()));
            }
            hints.push(("o", i18n::tui_hint_order()));
            hints.push(("f", i18n::tui_hint_filter()));
            hints.push(("x", i18n::tui_hint_docs()));
            if app.current_record().is_some() {
                hints.push(("d", i18n::tui_hint_delete()));
                hints.push(("s", i18n::tui_hint_save()));
            }
            hints.push(("g", i18n::tui_hint_grid()));
        }
        Screen::Grid => {
            hints.push(("[/]", i18n::tui_hint_page()));
            hints.push(("o", i18n::tui_hint_order()));
            hints.push(("D", i18n::tui_hint_direction()));
            hints.push(("a", i18n::tui_hint_all()));
            hints.push(("s", i18n::tui_hint_save()));
            hints.push(("Esc", i18n::tui_hint_back()));
        }
    }
    hints.push(("?", i18n::tui_hint_help()));
    hints.push(("q", i18n::tui_hint_quit()));

    hints
}
