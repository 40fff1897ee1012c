//! Headless table engine
//!
//! Derives row models (filtered, sorted, grouped, expanded, paginated) from
//! in-memory rows and declarative column definitions, and exposes per-table,
//! per-column, per-row and per-cell getters for a rendering layer to read.
//! Nothing is rendered here.
//!
//! Every derived value is memoized on the values it was computed from, so
//! repeated reads without a state change return the same `Rc`.

pub mod core;
pub mod error;
pub mod features;
pub mod fns;
pub mod memo;
pub mod model;
pub mod row_models;

pub use crate::core::ColumnDef;
pub use crate::core::Table;
pub use crate::core::TableConfig;
pub use crate::core::TableOptions;
pub use crate::core::TableState;
pub use error::Result;
pub use error::TableError;
pub use model::Record;
pub use model::RowData;
pub use model::Value;
