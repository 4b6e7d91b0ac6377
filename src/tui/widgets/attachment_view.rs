//! Attachment view: the record the cursor currently sits on.

use chrono::{DateTime, NaiveDateTime};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::truncate_str;
use crate::cursor::NotFoundReason;
use crate::i18n;
use crate::model::attachment::AttachmentRecord;
use crate::tui::app::App;
use crate::tui::theme::{current_theme, Theme};

/// Metadata keys already shown as named fields.
const SHOWN_KEYS: &[&str] = &[
    "email_subject",
    "subject",
    "email_from",
    "from",
    "email_date",
    "date",
    "email_folder",
    "folder",
];

/// Render the attachment panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = current_theme();

    let border_style = if app.is_busy() {
        theme.border_busy
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(i18n::tui_attachment_title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.current_record() {
        Some(record) => record_lines(record, inner.width as usize, &theme),
        None => {
            let text = if app.is_busy() {
                i18n::tui_loading()
            } else {
                match app.not_found {
                    Some(NotFoundReason::Empty) => i18n::msg_no_attachments(),
                    Some(NotFoundReason::FilterExhausted) => i18n::msg_no_match(),
                    None => "",
                }
            };
            vec![Line::from(Span::styled(format!(" {text}"), theme.empty_state))]
        }
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn record_lines(record: &AttachmentRecord, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let value_width = width.saturating_sub(12);
    let type_style = if record.is_image() {
        theme.content_type_image
    } else if crate::cursor::filter::is_octet_like(&record.content_type) {
        theme.content_type_doc
    } else {
        theme.field_value
    };

    let mut lines = Vec::new();
    let mut field = |label: &'static str, value: String, style: Style| {
        lines.push(Line::from(vec![
            Span::styled(format!(" {label}"), theme.field_label),
            Span::styled(truncate_str(&value, value_width), style),
        ]));
    };

    field(i18n::tui_field_filename(), record.display_name(), theme.field_value);
    field(i18n::tui_field_type(), record.content_type.clone(), type_style);
    field(
        i18n::tui_field_size(),
        format!(
            "{} ({} B)",
            humansize::format_size(record.size, humansize::BINARY),
            record.size
        ),
        theme.field_value,
    );
    field(i18n::tui_field_id(), record.attachment_id.to_string(), theme.field_value);
    if let Some(subject) = record.email_subject() {
        field(i18n::tui_field_subject(), subject.to_string(), theme.field_value);
    }
    if let Some(from) = record.email_from() {
        field(i18n::tui_field_from(), from.to_string(), theme.field_value);
    }
    if let Some(date) = record.email_date() {
        field(i18n::tui_field_date(), pretty_date(date), theme.field_value);
    }
    if let Some(folder) = record.email_folder() {
        field(i18n::tui_field_folder(), folder.to_string(), theme.field_value);
    }

    let mut extra: Vec<(&String, String)> = record
        .metadata
        .iter()
        .filter(|(k, _)| !SHOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| {
            let text = match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k, text)
        })
        .collect();
    if !extra.is_empty() {
        extra.sort();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", i18n::tui_field_other()),
            theme.help_section,
        )));
        for (key, text) in extra {
            lines.push(Line::from(vec![
                Span::styled(format!("   {key}: "), theme.help_dim),
                Span::styled(
                    truncate_str(&text, width.saturating_sub(key.len() + 5)),
                    theme.field_value,
                ),
            ]));
        }
    }

    lines
}

/// Render RFC 3339 / RFC 2822 / ISO timestamps as `YYYY-MM-DD HH:MM`;
/// anything else is shown as given.
fn pretty_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_date() {
        assert_eq!(pretty_date("2023-04-05T10:11:12+02:00"), "2023-04-05 10:11");
        assert_eq!(pretty_date("Wed, 5 Apr 2023 10:11:12 +0000"), "2023-04-05 10:11");
        assert_eq!(pretty_date("2023-04-05T10:11:12.123"), "2023-04-05 10:11");
        assert_eq!(pretty_date("last tuesday"), "last tuesday");
    }
}
