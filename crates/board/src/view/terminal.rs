use std::{
    io::{self, Stdout, Write},
    panic, thread,
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub type BoardTerminal = Terminal<CrosstermBackend<Stdout>>;

const INPUT_POLL: Duration = Duration::from_millis(100);

pub fn setup_terminal() -> anyhow::Result<BoardTerminal> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut BoardTerminal) -> anyhow::Result<()> {
    reset_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leaves the alternate screen even when raw mode cannot be switched off.
fn reset_screen<W: Write>(out: &mut W) -> io::Result<()> {
    let raw_mode = disable_raw_mode();
    execute!(out, LeaveAlternateScreen, cursor::Show)?;
    raw_mode
}

/// Puts the terminal back before the panic message is printed.
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = reset_screen(&mut io::stdout());
        previous(info);
    }));
}

/// Forwards terminal events from a blocking reader thread until `cancel`
/// fires or the receiving side goes away.
pub fn spawn_input_thread(
    events_tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !cancel.is_cancelled() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if events_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Terminal input failed: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!("Terminal input failed: {}", e);
                    break;
                }
            }
        }
    })
}
