//! Keyboard and input event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Screen};
use crate::cursor::Direction;

/// Process a key event and update the application state.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    // Ctrl+C always quits, even over a popup
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    // ── Popup handling (captures all keys) ────────────────
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Ok(());
    }

    if app.confirm_delete {
        match key.code {
            // 's' for the Spanish prompt
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('s') | KeyCode::Char('S') => {
                app.delete_current();
            }
            _ => app.confirm_delete = false,
        }
        return Ok(());
    }

    // ── Always-available shortcuts ────────────────────────
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return Ok(());
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return Ok(());
        }
        _ => {}
    }

    match app.screen {
        Screen::Viewer => handle_viewer_keys(app, key),
        Screen::Grid => handle_grid_keys(app, key),
    }
    Ok(())
}

/// Keys on the single-attachment viewer.
fn handle_viewer_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('n') | KeyCode::Right | KeyCode::Char('l') => app.navigate(Direction::Next),
        KeyCode::Char('p') | KeyCode::Left | KeyCode::Char('h') => {
            app.navigate(Direction::Previous)
        }
        KeyCode::Char('r') => app.navigate(Direction::Initial),
        KeyCode::Char('o') => app.cycle_ordering(),
        KeyCode::Char('f') => app.cycle_min_size(),
        KeyCode::Char('x') => app.toggle_octet_like(),
        KeyCode::Char('d') | KeyCode::Delete => {
            if !app.is_busy() && app.current_record().is_some() {
                app.confirm_delete = true;
            }
        }
        KeyCode::Char('s') => app.save_selected(),
        KeyCode::Char('g') => app.open_grid(),
        _ => {}
    }
}

/// Keys on the image grid.
fn handle_grid_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.grid_select(1),
        KeyCode::Char('k') | KeyCode::Up => app.grid_select(-1),
        KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Right => app.grid_next_page(),
        KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Left => app.grid_previous_page(),
        KeyCode::Char('o') => app.grid_cycle_order(),
        KeyCode::Char('D') => app.grid_flip_direction(),
        KeyCode::Char('a') => app.grid_toggle_all_types(),
        KeyCode::Char('s') | KeyCode::Enter => app.save_selected(),
        KeyCode::Esc | KeyCode::Char('g') => app.screen = Screen::Viewer,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClient;
    use crate::config::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(rt: &tokio::runtime::Runtime) -> App {
        let client = HttpClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1))
            .expect("client");
        App::new(client, &Config::default(), rt.handle().clone())
    }

    #[test]
    fn test_help_popup_captures_keys() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        handle_key_event(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert!(!app.is_busy());
        handle_key_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(!app.show_help);
    }

    #[test]
    fn test_delete_needs_a_record() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        handle_key_event(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert!(!app.confirm_delete);
    }

    #[test]
    fn test_quit_and_ctrl_c() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);

        let mut app = test_app(&rt);
        app.show_help = true;
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        )
        .unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_leaves_grid() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = test_app(&rt);
        app.screen = Screen::Grid;
        handle_key_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.screen, Screen::Viewer);
    }
}
