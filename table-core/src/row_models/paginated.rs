//! Paginated rows

use std::collections::HashSet;
use std::rc::Rc;

use super::expand_rows;
use super::stage;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::Table;
use crate::memo::ById;
use crate::model::RowData;

/// Slices the current page out of the top-level rows.
///
/// With `paginate_expanded_rows` off, the page is cut first and expanded
/// afterwards, so sub rows never push rows onto the next page. `rows_by_id`
/// keeps every pre-pagination row.
pub fn pagination_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getPaginationRowModel",
        |table: &Table<T>| {
            let state = table.get_state();
            let paginate_expanded_rows = table.config().paginate_expanded_rows.unwrap_or(true);
            let expanded = if paginate_expanded_rows {
                None
            } else {
                Some(state.expanded().clone())
            };
            (
                ById(table.get_pre_pagination_row_model()),
                state.pagination(),
                paginate_expanded_rows,
                expanded,
            )
        },
        |table, (pre, pagination, paginate_expanded_rows, _)| {
            if pre.0.is_empty() {
                return pre.0.clone();
            }
            let total = pre.0.rows.len();
            let start = pagination.page_index.saturating_mul(pagination.page_size).min(total);
            let end = start.saturating_add(pagination.page_size).min(total);
            let page = RowModel {
                rows: pre.0.rows[start..end].to_vec(),
                flat_rows: Vec::new(),
                rows_by_id: pre.0.rows_by_id.clone(),
            };
            let mut page = if *paginate_expanded_rows {
                page
            } else {
                expand_rows(table, &page)
            };
            page.flat_rows = flatten_unique(&page.rows);
            Rc::new(page)
        },
    )
}

/// Pre-order closure of `rows`; rows listed twice (an expanded child right
/// after its parent) appear once.
fn flatten_unique<T>(rows: &[Rc<Row<T>>]) -> Vec<Rc<Row<T>>> {
    fn visit<T>(row: &Rc<Row<T>>, seen: &mut HashSet<String>, flat: &mut Vec<Rc<Row<T>>>) {
        if !seen.insert(row.id.clone()) {
            return;
        }
        flat.push(row.clone());
        for sub_row in &row.sub_rows {
            visit(sub_row, seen, flat);
        }
    }

    let mut seen = HashSet::new();
    let mut flat = Vec::new();
    for row in rows {
        visit(row, &mut seen, &mut flat);
    }
    flat
}
