//! Image grid: one backend page of images as a table.

use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};
use ratatui::Frame;

use super::truncate_str;
use crate::i18n;
use crate::tui::app::App;
use crate::tui::theme::current_theme;

/// Render the grid table with the selected row highlighted.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let border_style = if app.is_busy() {
        theme.border_busy
    } else {
        theme.border
    };
    let title = match &app.grid {
        Some(grid) => format!(
            "{}[{}/{}] ",
            i18n::tui_images_title(),
            grid.page(),
            grid.total_pages()
        ),
        None => i18n::tui_images_title().to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let images = match &app.grid {
        Some(grid) if grid.is_loaded() && !grid.images().is_empty() => grid.images(),
        Some(grid) if grid.is_loaded() => {
            empty_state(frame, inner, i18n::msg_no_attachments());
            return;
        }
        _ => {
            empty_state(frame, inner, i18n::tui_loading());
            return;
        }
    };

    if inner.height < 2 {
        return;
    }

    let id_w = 10u16;
    let type_w = 18u16.min(inner.width / 5);
    let size_w = 10u16;
    let subject_w = (inner.width / 3).max(10);
    let fixed = id_w + type_w + size_w + subject_w + 4;
    let name_w = inner.width.saturating_sub(fixed).max(8);

    let header = Row::new(vec![
        i18n::tui_col_id(),
        i18n::tui_col_filename(),
        i18n::tui_col_type(),
        i18n::tui_col_size(),
        i18n::tui_col_subject(),
    ])
    .style(theme.list_header);

    // Keep the selected row on screen
    let viewport = (inner.height as usize).saturating_sub(1).max(1);
    let start = app.grid_selected.saturating_sub(viewport - 1);

    let rows: Vec<Row> = images
        .iter()
        .enumerate()
        .skip(start)
        .take(viewport)
        .map(|(idx, record)| {
            let style = if idx == app.grid_selected {
                theme.list_selected
            } else if record.is_image() {
                theme.list_normal
            } else {
                theme.content_type_doc
            };
            Row::new(vec![
                truncate_str(&record.attachment_id.to_string(), id_w as usize),
                truncate_str(&record.display_name(), name_w as usize),
                truncate_str(&record.content_type, type_w as usize),
                humansize::format_size(record.size, humansize::BINARY),
                truncate_str(record.email_subject().unwrap_or(""), subject_w as usize),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(id_w),
            Constraint::Min(name_w),
            Constraint::Length(type_w),
            Constraint::Length(size_w),
            Constraint::Length(subject_w),
        ],
    )
    .header(header)
    .column_spacing(1);

    frame.render_widget(table, inner);
}

fn empty_state(frame: &mut Frame, area: Rect, text: &str) {
    let theme = current_theme();
    let line = Line::from(Span::styled(format!(" {text}"), theme.empty_state));
    frame.render_widget(Paragraph::new(line), area);
}
