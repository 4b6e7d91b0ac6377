//! Color theme definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// A complete color theme for the TUI.
pub struct Theme {
    pub header_bar: Style,
    pub status_bar: Style,
    pub key_hint: Style,
    pub list_selected: Style,
    pub list_header: Style,
    pub list_normal: Style,
    pub field_label: Style,
    pub field_value: Style,
    pub content_type_image: Style,
    pub content_type_doc: Style,
    pub empty_state: Style,
    pub error_banner: Style,
    pub border: Style,
    pub border_busy: Style,
    pub popup: Style,
    pub popup_title: Style,
    pub help_section: Style,
    pub help_dim: Style,
}

impl Theme {
    /// Dark theme (default).
    pub fn dark() -> Self {
        Self {
            header_bar: Style::default()
                .fg(Color::Rgb(200, 200, 220))
                .bg(Color::Rgb(30, 30, 46)),
            status_bar: Style::default()
                .fg(Color::Rgb(150, 150, 170))
                .bg(Color::Rgb(30, 30, 46)),
            key_hint: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            list_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(60, 60, 100)),
            list_header: Style::default()
                .fg(Color::Rgb(180, 180, 200))
                .bg(Color::Rgb(40, 40, 60))
                .add_modifier(Modifier::BOLD),
            list_normal: Style::default().fg(Color::Rgb(200, 200, 220)),
            field_label: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            field_value: Style::default().fg(Color::Rgb(220, 220, 230)),
            content_type_image: Style::default().fg(Color::Green),
            content_type_doc: Style::default().fg(Color::Rgb(230, 180, 90)),
            empty_state: Style::default()
                .fg(Color::Rgb(150, 150, 170))
                .add_modifier(Modifier::ITALIC),
            error_banner: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(140, 30, 40))
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Rgb(80, 80, 100)),
            border_busy: Style::default().fg(Color::Rgb(230, 180, 90)),
            popup: Style::default()
                .fg(Color::Rgb(220, 220, 230))
                .bg(Color::Rgb(20, 20, 35)),
            popup_title: Style::default()
                .fg(Color::Rgb(130, 170, 255))
                .add_modifier(Modifier::BOLD),
            help_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_dim: Style::default().fg(Color::Rgb(110, 110, 130)),
        }
    }
}

/// Return the active theme.
pub fn current_theme() -> Theme {
    Theme::dark()
}
