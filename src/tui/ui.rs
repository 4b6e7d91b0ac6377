//! Main render function that dispatches to widgets.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::app::{App, Screen};
use super::theme::current_theme;
use super::widgets;

/// Render the entire TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let banner_height = u16::from(app.error_banner.is_some());

    // header (1) + banner (0/1) + content (flex) + status (1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    widgets::header_bar::render(frame, app, vertical[0]);

    if let Some(msg) = &app.error_banner {
        let theme = current_theme();
        let banner = Paragraph::new(Line::from(Span::styled(format!(" ! {msg}"), theme.error_banner)))
            .style(theme.error_banner);
        frame.render_widget(banner, vertical[1]);
    }

    match app.screen {
        Screen::Viewer => widgets::attachment_view::render(frame, app, vertical[2]),
        Screen::Grid => widgets::image_grid::render(frame, app, vertical[2]),
    }

    widgets::status_bar::render(frame, app, vertical[3]);

    // Popups (rendered on top of everything)
    if app.confirm_delete {
        widgets::confirm_popup::render(frame, app);
    }
    if app.show_help {
        widgets::help_popup::render(frame, app);
    }
}
