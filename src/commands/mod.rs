//! Board Commands
//!
//! Requests the board sends to the server.

mod task;

pub use task::*;
