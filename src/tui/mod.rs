//! Terminal UI: main entry point and event loop.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

use std::io;
use std::time::Duration;

use crossterm::event::{poll as ct_poll, read as ct_read, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;

use self::app::App;
use crate::client::HttpClient;
use crate::config::Config;
use crate::cursor::Direction;

/// Run the TUI application. Blocks until the user quits.
///
/// `runtime` must belong to a runtime that is not driving the calling
/// thread; all requests are spawned onto it.
pub fn run_tui(client: HttpClient, config: &Config, runtime: Handle) -> anyhow::Result<()> {
    let mut app = App::new(client, config, runtime);
    app.navigate(Direction::Initial);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    // Restore terminal (always, even on error)
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main event loop: render → poll → handle → repeat.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|frame| {
            ui::render(frame, &app);
        })?;

        if ct_poll(tick_rate)? {
            if let Event::Key(key) = ct_read()? {
                event::handle_key_event(&mut app, key)?;
            }
        }

        // Collect finished requests, expire status messages
        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
