//! TUI widgets for rendering different UI panels.

pub mod attachment_view;
pub mod confirm_popup;
pub mod header_bar;
pub mod help_popup;
pub mod image_grid;
pub mod status_bar;

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    let width = UnicodeWidthStr::width(s);
    if width <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let mut result = String::new();
        let mut current_width = 0;
        for ch in s.chars() {
            let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + ch_width + 3 > max_width {
                break;
            }
            result.push(ch);
            current_width += ch_width;
        }
        result.push_str("...");
        result
    }
}

/// Centered rectangle with exact dimensions, clamped to `area`.
pub(crate) fn centered_rect_exact(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a long filename.pdf", 10), "a long ...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
        // Wide characters count as two columns
        assert_eq!(truncate_str("日本語のファイル", 9), "日本語...");
    }

    #[test]
    fn test_centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_exact(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_exact(50, 50, area), area);
    }
}
