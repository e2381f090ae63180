//! Console event loop.
//!
//! One `select!` waits on key presses, background results, a redraw tick and
//! process shutdown. The terminal is put back into cooked mode when the
//! [`TerminalGuard`] drops, whether the loop exits normally or through `?`.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, Tab};

use super::events::handle_app_event;
use super::helpers::spawn_reload;
use super::input::handle_input;
use super::render::render;

/// Status expiry and redraw cadence.
const TICK: Duration = Duration::from_millis(250);

/// What the loop does after a key press.
pub enum Action {
    Continue,
    Quit,
}

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Leave the alternate screen before the default hook prints a panic.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

/// Resolves when the process is asked to stop (SIGTERM on unix).
async fn shutdown_requested() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                return;
            }
            Err(e) => tracing::warn!(error = %e, "Could not install SIGTERM handler"),
        }
    }
    std::future::pending::<()>().await
}

/// Run the console until the user quits. Every tab starts loading on entry.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    install_panic_hook();
    let mut guard = TerminalGuard::enter()?;

    let mut keys = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let shutdown = shutdown_requested();
    tokio::pin!(shutdown);

    for tab in Tab::ALL {
        spawn_reload(&app.store, tab, &event_tx);
    }

    loop {
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }
        if std::mem::take(&mut app.needs_redraw) {
            guard.terminal.draw(|f| render(f, app))?;
        }

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, leaving console");
                break;
            }

            key = keys.next() => match key {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.needs_redraw = true;
                    match handle_input(app, key.code, key.modifiers, &event_tx) {
                        Ok(Action::Quit) => break,
                        Ok(Action::Continue) => {}
                        Err(e) => app.set_status(format!("Error: {}", e)),
                    }
                }
                Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => tracing::warn!(error = %e, "Terminal input error"),
                None => break,
            },

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event, &event_tx);
                // Fold in anything else that finished meanwhile before redrawing.
                while let Ok(event) = event_rx.try_recv() {
                    handle_app_event(app, event, &event_tx);
                }
                app.needs_redraw = true;
            }

            _ = ticker.tick() => {}
        }
    }

    Ok(())
}
