//! Filtered rows

use std::rc::Rc;

use super::stage;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::Table;
use crate::features::RowFilterResults;
use crate::memo::ById;
use crate::model::RowData;

const DEFAULT_MAX_LEAF_ROW_FILTER_DEPTH: usize = 100;

/// Keeps the rows that pass every active column filter and the global
/// filter. Every kept row carries its per-filter outcome.
pub fn filtered_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getFilteredRowModel",
        |table: &Table<T>| {
            let config = table.config();
            (
                ById(table.get_pre_filtered_row_model()),
                ById(table.get_row_filter_results()),
                config.filter_from_leaf_rows,
                config.max_leaf_row_filter_depth,
            )
        },
        |table, (pre, results, _, _)| {
            if pre.0.is_empty() || results.0.is_empty() {
                return pre.0.clone();
            }
            Rc::new(filter_rows(table, &pre.0.rows, &results.0, &results.0.filterable_ids))
        },
    )
}

/// Filters a row tree against `ids`.
///
/// Top-down by default: a failing row drops its whole subtree. With
/// `filter_from_leaf_rows` a row is kept when it passes or any descendant
/// does. Rows deeper than `max_leaf_row_filter_depth` keep their sub rows
/// unfiltered.
pub(crate) fn filter_rows<T: RowData>(
    table: &Table<T>,
    rows: &[Rc<Row<T>>],
    results: &RowFilterResults,
    ids: &[String],
) -> RowModel<T> {
    let config = table.config();
    let filter = RowFilter {
        table,
        results,
        ids,
        max_depth: config
            .max_leaf_row_filter_depth
            .unwrap_or(DEFAULT_MAX_LEAF_ROW_FILTER_DEPTH),
    };
    let rows = if config.filter_from_leaf_rows.unwrap_or(false) {
        filter.from_leafs(rows, 0)
    } else {
        filter.from_root(rows, 0)
    };
    RowModel::from_rows(rows)
}

struct RowFilter<'a, T> {
    table: &'a Table<T>,
    results: &'a RowFilterResults,
    ids: &'a [String],
    max_depth: usize,
}

impl<T: RowData> RowFilter<'_, T> {
    fn passes(&self, row: &Row<T>) -> bool {
        self.results.passes(&row.id, self.ids)
    }

    fn rebuild(&self, row: &Row<T>, sub_rows: Vec<Rc<Row<T>>>) -> Rc<Row<T>> {
        let mut next = row.derive(self.table, row.depth, row.parent_id.clone(), sub_rows);
        if next.filtering.is_some() {
            if let Some(filtering) = self.results.by_row.get(&row.id) {
                next.filtering = Some(filtering.clone());
            }
        }
        Rc::new(next)
    }

    fn from_root(&self, rows: &[Rc<Row<T>>], depth: usize) -> Vec<Rc<Row<T>>> {
        let mut kept = Vec::new();
        for row in rows {
            if !self.passes(row) {
                continue;
            }
            let sub_rows = if !row.sub_rows.is_empty() && depth < self.max_depth {
                self.from_root(&row.sub_rows, depth + 1)
            } else {
                row.sub_rows.clone()
            };
            kept.push(self.rebuild(row, sub_rows));
        }
        kept
    }

    fn from_leafs(&self, rows: &[Rc<Row<T>>], depth: usize) -> Vec<Rc<Row<T>>> {
        let mut kept = Vec::new();
        for row in rows {
            if !row.sub_rows.is_empty() && depth < self.max_depth {
                let sub_rows = self.from_leafs(&row.sub_rows, depth + 1);
                if !sub_rows.is_empty() || self.passes(row) {
                    kept.push(self.rebuild(row, sub_rows));
                }
            } else if self.passes(row) {
                kept.push(self.rebuild(row, row.sub_rows.clone()));
            }
        }
        kept
    }
}
