use std::sync::atomic::{AtomicU64, Ordering};

use common::models::{Signal, SignalPage};
use tokio::sync::watch;

/// What the board currently shows. `generation` is the poll that produced it,
/// 0 until the first successful poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub signals: Vec<Signal>,
    pub total: u64,
    pub generation: u64,
}

impl BoardSnapshot {
    pub fn newest_first(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().rev()
    }
}

/// Latest applied page plus the generation counter handed out to polls.
pub struct SignalStore {
    board_tx: watch::Sender<BoardSnapshot>,
    issued: AtomicU64,
}

impl SignalStore {
    pub fn new() -> Self {
        let (board_tx, _) = watch::channel(BoardSnapshot::default());
        Self {
            board_tx,
            issued: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.board_tx.subscribe()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board_tx.borrow().clone()
    }

    pub fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Replaces the board with `page` unless a newer poll already landed.
    /// Returns whether the page was applied.
    pub fn apply(&self, generation: u64, page: SignalPage) -> bool {
        self.board_tx.send_if_modified(|board| {
            if generation <= board.generation {
                return false;
            }
            *board = BoardSnapshot {
                signals: page.signals,
                total: page.total,
                generation,
            };
            true
        })
    }
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{Action, SignalId};

    fn page(symbols: &[&str], total: u64) -> SignalPage {
        SignalPage {
            signals: symbols
                .iter()
                .enumerate()
                .map(|(i, symbol)| Signal {
                    id: SignalId::Number(i as i64 + 1),
                    symbol: Some(symbol.to_string()),
                    price: None,
                    action: Action::Hold,
                    confidence: None,
                    timestamp: None,
                })
                .collect(),
            total,
        }
    }

    #[test]
    fn test_starts_empty() {
        let store = SignalStore::new();
        assert_eq!(store.snapshot(), BoardSnapshot::default());
    }

    #[test]
    fn test_apply_replaces_wholesale() {
        let store = SignalStore::new();
        assert!(store.apply(store.next_generation(), page(&["BTC", "ETH", "SOL"], 3)));
        assert!(store.apply(store.next_generation(), page(&["DOGE"], 40)));

        let board = store.snapshot();
        assert_eq!(board.signals.len(), 1);
        assert_eq!(board.signals[0].symbol.as_deref(), Some("DOGE"));
        assert_eq!(board.total, 40);
        assert_eq!(board.generation, 2);
    }

    #[test]
    fn test_older_generation_is_discarded() {
        let store = SignalStore::new();
        let older = store.next_generation();
        let newer = store.next_generation();

        assert!(store.apply(newer, page(&["ETH"], 2)));
        assert!(!store.apply(older, page(&["BTC"], 1)));

        let board = store.snapshot();
        assert_eq!(board.signals[0].symbol.as_deref(), Some("ETH"));
        assert_eq!(board.generation, newer);
    }

    #[test]
    fn test_newest_first_reverses_server_order() {
        let store = SignalStore::new();
        store.apply(store.next_generation(), page(&["s1", "s2", "s3"], 3));

        let order: Vec<String> = store
            .snapshot()
            .newest_first()
            .filter_map(|s| s.symbol.clone())
            .collect();
        assert_eq!(order, vec!["s3", "s2", "s1"]);
    }

    #[tokio::test]
    async fn test_subscribers_see_applied_pages_only() {
        let store = SignalStore::new();
        let mut board_rx = store.subscribe();

        let stale = store.next_generation();
        store.apply(store.next_generation(), page(&["ETH"], 9));
        assert!(board_rx.has_changed().unwrap());
        board_rx.borrow_and_update();

        store.apply(stale, page(&["BTC"], 1));
        assert!(!board_rx.has_changed().unwrap());
        assert_eq!(board_rx.borrow().total, 9);
    }
}
