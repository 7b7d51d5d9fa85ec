mod board;
mod poller;
mod source;

pub use board::{Board, SelectError};
pub use poller::{disabled_ids, spawn_poller, Poller, Visibility, DEFAULT_INTERVAL};
pub use source::{HttpStatusSource, StatusSource};
