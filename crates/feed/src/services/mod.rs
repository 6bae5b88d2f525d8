pub use signal_poller::SignalPoller;

pub mod signal_poller;
