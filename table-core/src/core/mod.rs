//! Table entities and the orchestrator

mod cell;
mod column;
mod column_def;
mod config;
mod headers;
mod options;
mod row;
mod row_model;
mod state;
mod table;

pub use cell::*;
pub use column::*;
pub use column_def::*;
pub use config::*;
pub use headers::*;
pub use options::*;
pub use row::*;
pub use row_model::*;
pub use state::*;
pub use table::*;
