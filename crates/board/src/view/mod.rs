use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use feed::store::BoardSnapshot;
use ratatui::{Terminal, backend::Backend};
use tokio::{
    sync::{mpsc, watch},
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod row;
pub mod table;
pub mod terminal;

/// Redraw even without new data so resizes and the clock stay current.
const REDRAW_PERIOD: Duration = Duration::from_secs(1);

/// Takes over the terminal and shows the board until the user quits or
/// `cancel` fires. The terminal is restored on every exit path.
pub async fn run(
    mut board_rx: watch::Receiver<BoardSnapshot>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut terminal = terminal::setup_terminal()?;

    let input_cancel = cancel.child_token();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let _input_thread = terminal::spawn_input_thread(events_tx, input_cancel.clone());

    let result = event_loop(&mut terminal, &mut board_rx, &mut events_rx, &cancel).await;

    input_cancel.cancel();
    terminal::restore_terminal(&mut terminal)?;
    result
}

pub async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    board_rx: &mut watch::Receiver<BoardSnapshot>,
    events_rx: &mut mpsc::UnboundedReceiver<Event>,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let board = board_rx.borrow_and_update().clone();
        terminal.draw(|f| table::draw(f, &board))?;

        tokio::select! {
            _ = cancel.cancelled() => break,

            changed = board_rx.changed() => {
                if changed.is_err() {
                    info!("Signal store dropped, closing board");
                    break;
                }
            }

            event = events_rx.recv() => match event {
                Some(Event::Key(key)) if is_quit(&key) => {
                    info!("Quit requested from keyboard");
                    break;
                }
                Some(_) => {}
                None => break,
            },

            _ = time::sleep(REDRAW_PERIOD) => {}
        }
    }
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
