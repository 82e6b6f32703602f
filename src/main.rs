//! Kanban Board Entry Point
//!
//! Drag-and-drop for server-rendered task boards: cards dropped into another
//! status column are posted back to the page as a form.

mod board;
mod commands;
mod config;
mod dom;
mod error;
mod models;

use board::{expose_init_function, BoardController};
use config::BoardConfig;
use error::BoardResult;

fn main() {
    console_error_panic_hook::set_once();

    let document = match dom::document() {
        Ok(document) => document,
        Err(err) => {
            console_logger::init("info");
            tracing::error!(%err, "kanban board failed to start");
            return;
        }
    };

    let (config, config_err) = BoardConfig::load(&document);
    console_logger::init(&config.log_level);
    if let Some(err) = config_err {
        tracing::error!(%err, "using default board config");
    }

    if let Err(err) = start(config) {
        tracing::error!(%err, "kanban board failed to start");
    }
}

fn start(config: BoardConfig) -> BoardResult<()> {
    if config.expose_init_function {
        expose_init_function(config.clone())?;
    }
    BoardController::with_pointer_drag(config).mount()
}
