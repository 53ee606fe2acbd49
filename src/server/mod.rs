//! Accept loop and shutdown handling.

pub mod listener;
pub mod shutdown;

pub use listener::Server;
pub use shutdown::{wait_for_signal, Shutdown};
