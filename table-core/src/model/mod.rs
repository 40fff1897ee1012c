//! Row data and cell values

mod record;
mod row_data;
mod value;

pub use record::*;
pub use row_data::*;
pub use value::*;
