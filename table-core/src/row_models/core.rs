//! Core rows

use std::rc::Rc;

use super::stage;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::Table;
use crate::memo::ById;
use crate::model::RowData;

/// Builds one row per data item (and per sub item, recursively), in data
/// order. Rebuilt when the data or the column tree changes.
pub fn core_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getRowModel",
        |table: &Table<T>| (ById(table.options().data.clone()), ById(table.column_accessors())),
        |table, (data, _)| {
            if table.options().get_row_id.is_none() && !data.0.is_empty() {
                table.warn_positional_row_ids();
            }
            Rc::new(RowModel::from_rows(access_rows(table, &data.0, 0, None)))
        },
    )
}

fn row_id<T: RowData>(table: &Table<T>, original: &T, index: usize, parent_id: Option<&str>) -> String {
    if let Some(get_row_id) = &table.options().get_row_id {
        return get_row_id(original, index, parent_id);
    }
    match parent_id {
        Some(parent_id) => format!("{}.{}", parent_id, index),
        None => index.to_string(),
    }
}

fn access_rows<T: RowData>(
    table: &Table<T>,
    originals: &[Rc<T>],
    depth: usize,
    parent_id: Option<&str>,
) -> Vec<Rc<Row<T>>> {
    let get_sub_rows = table.options().get_sub_rows.clone();
    originals
        .iter()
        .enumerate()
        .map(|(index, original)| {
            let id = row_id(table, original, index, parent_id);
            let mut row = table.create_row(id, original.clone(), index, depth, parent_id.map(str::to_string));
            if let Some(get_sub_rows) = &get_sub_rows {
                if let Some(children) = get_sub_rows(original, index) {
                    let children: Vec<Rc<T>> = children.into_iter().map(Rc::new).collect();
                    if !children.is_empty() {
                        row.sub_rows = access_rows(table, &children, depth + 1, Some(&row.id));
                    }
                    row.original_sub_rows = Some(children);
                }
            }
            Rc::new(row)
        })
        .collect()
}
