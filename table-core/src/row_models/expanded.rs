//! Expanded rows

use std::rc::Rc;

use super::stage;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::Table;
use crate::memo::ById;
use crate::model::RowData;

/// Lists the sub rows of expanded rows right after their parent, so they
/// count toward pagination. Passes through when nothing is expanded or when
/// expanded rows are not paginated (the pagination stage expands the page
/// instead).
pub fn expanded_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getExpandedRowModel",
        |table: &Table<T>| {
            (
                ById(table.get_pre_expanded_row_model()),
                table.get_state().expanded().clone(),
                table.config().paginate_expanded_rows,
            )
        },
        |table, (pre, expanded, paginate_expanded_rows)| {
            if pre.0.is_empty() || expanded.is_empty() || !paginate_expanded_rows.unwrap_or(true) {
                return pre.0.clone();
            }
            Rc::new(expand_rows(table, &pre.0))
        },
    )
}

/// Depth-first listing of `model.rows` that descends only into expanded
/// rows. `flat_rows` and `rows_by_id` are kept from `model`.
pub(crate) fn expand_rows<T: RowData>(table: &Table<T>, model: &RowModel<T>) -> RowModel<T> {
    let mut rows = Vec::new();
    for row in &model.rows {
        push_expanded(table, row, &mut rows);
    }
    RowModel {
        rows,
        flat_rows: model.flat_rows.clone(),
        rows_by_id: model.rows_by_id.clone(),
    }
}

fn push_expanded<T: RowData>(table: &Table<T>, row: &Rc<Row<T>>, rows: &mut Vec<Rc<Row<T>>>) {
    rows.push(row.clone());
    if !row.sub_rows.is_empty() && row.get_is_expanded(table) {
        for sub_row in &row.sub_rows {
            push_expanded(table, sub_row, rows);
        }
    }
}
