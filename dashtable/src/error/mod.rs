//! Error types

mod action;
mod config;
mod row_id;
mod state;
mod table;

pub use action::*;
pub use config::*;
pub use row_id::*;
pub use state::*;
pub use table::*;
