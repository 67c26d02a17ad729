use std::io;
use std::panic;
use std::sync::Once;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Theme;
use crate::engine::Snapshot;
use crate::input::{GameInput, InputHandler};
use crate::logging;
use crate::renderer;

type Backend = CrosstermBackend<io::Stdout>;

static PANIC_HOOK: Once = Once::new();

/// The terminal while a game is on screen: raw mode, alternate screen, hidden
/// cursor, and the key source the loop polls.
///
/// Dropping it, or panicking while it is open, puts the terminal back.
pub struct GameTerminal {
    terminal: Terminal<Backend>,
    input: InputHandler,
}

impl GameTerminal {
    pub fn open() -> io::Result<Self> {
        PANIC_HOOK.call_once(install_panic_hook);

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            restore();
            return Err(error);
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| restore())?;
        debug!("terminal switched to game mode");

        Ok(Self {
            terminal,
            input: InputHandler::new(),
        })
    }

    /// Paints one frame of `snapshot`.
    pub fn draw(&mut self, snapshot: &Snapshot, theme: &Theme) -> io::Result<()> {
        self.terminal
            .draw(|frame| renderer::render(frame, snapshot, theme))?;
        Ok(())
    }

    /// Waits up to `timeout` for the next mapped key.
    pub fn next_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        self.input.poll_input(timeout)
    }
}

impl Drop for GameTerminal {
    fn drop(&mut self) {
        restore();
        debug!("terminal restored");
    }
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        logging::log_panic(panic_info);
        restore();
        default_hook(panic_info);
    }));
}

fn restore() {
    if let Err(error) = disable_raw_mode() {
        warn!("could not leave raw mode: {error}");
    }
    if let Err(error) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
        warn!("could not leave the alternate screen: {error}");
    }
}
