//! Row model builders
//!
//! Each function returns a factory to plug into [`TableOptions`]. A factory
//! is invoked once per table and yields that table's memoized getter for
//! the stage; the getter recomputes only when its inputs change and passes
//! the upstream model through (same `Rc`) when it has nothing to do.
//!
//! [`TableOptions`]: crate::core::TableOptions

mod core;
mod expanded;
mod faceted;
mod filtered;
mod grouped;
mod paginated;
mod sorted;

use std::rc::Rc;

pub use self::core::core_row_model;
pub use expanded::expanded_row_model;
pub use faceted::faceted_min_max_values;
pub use faceted::faceted_row_model;
pub use faceted::faceted_unique_values;
pub use filtered::filtered_row_model;
pub use grouped::grouped_row_model;
pub use paginated::pagination_row_model;
pub use sorted::sorted_row_model;

pub(crate) use expanded::expand_rows;
pub(crate) use filtered::filter_rows;

use crate::core::DebugFlag;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::RowModelFn;
use crate::core::Table;
use crate::memo::Memo;
use crate::model::RowData;

/// Builds a stage factory from a dependency reader and a compute step.
///
/// Every table gets its own [`Memo`], keyed by `key` in debug logs.
fn stage<T, D>(
    key: &'static str,
    deps: impl Fn(&Table<T>) -> D + 'static,
    compute: impl Fn(&Table<T>, &D) -> Rc<RowModel<T>> + 'static,
) -> RowModelFactory<T>
where
    T: RowData,
    D: PartialEq + 'static,
{
    let deps = Rc::new(deps);
    let compute = Rc::new(compute);
    Rc::new(move |table: &Table<T>| {
        let memo: Memo<D, Rc<RowModel<T>>> = Memo::new(table.memo_options(key, DebugFlag::Table));
        let deps = deps.clone();
        let compute = compute.clone();
        let getter: RowModelFn<T> = Rc::new(move |table: &Table<T>| {
            let model = memo.get(deps(table), |deps| compute(table, deps));
            model.as_ref().clone()
        });
        getter
    })
}
