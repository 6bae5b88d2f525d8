pub mod signal;
pub mod timestamp;

pub use signal::{Action, Signal, SignalId, SignalPage};
