pub mod error;
pub mod remote;
pub mod services;
pub mod store;
pub mod traits;
