//! Stock table features
//!
//! Each feature contributes initial state, default options, a default
//! column-definition fragment and entity hooks through [`TableFeature`], and
//! adds its getters and setters to the entities in `impl` blocks of its own
//! module. Methods of a feature that is not registered fall back to neutral
//! results and ignore writes.

mod column_faceting;
mod column_filtering;
mod column_grouping;
mod column_ordering;
mod column_pinning;
mod column_sizing;
mod column_visibility;
mod feature;
mod global_faceting;
mod global_filtering;
mod row_expanding;
mod row_pagination;
mod row_pinning;
mod row_selection;
mod row_sorting;

pub use column_faceting::*;
pub use column_filtering::*;
pub use column_grouping::*;
pub use column_ordering::*;
pub use column_pinning::*;
pub use column_sizing::*;
pub use column_visibility::*;
pub use feature::*;
pub use global_faceting::*;
pub use global_filtering::*;
pub use row_expanding::*;
pub use row_pagination::*;
pub use row_pinning::*;
pub use row_selection::*;
pub use row_sorting::*;

pub(crate) use column_filtering::RowFilterResults;
pub(crate) use column_ordering::order_leaf_columns;
