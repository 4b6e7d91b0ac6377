//! Delete confirmation popup.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{centered_rect_exact, truncate_str};
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Render the confirmation popup for the attachment on screen.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = current_theme();
    let screen = frame.area();
    let width = 56u16.min(screen.width.saturating_sub(4));
    let area = centered_rect_exact(width, 6, screen);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.popup_title)
        .title(i18n::tui_confirm_title())
        .style(theme.popup);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let name = app
        .current_record()
        .map(|r| format!("{} ({})", r.display_name(), r.attachment_id))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_str(&name, inner.width.saturating_sub(2) as usize)),
            theme.field_value,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", i18n::tui_confirm_delete()),
            theme.key_hint,
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
