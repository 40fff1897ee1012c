//! Faceted rows, unique values and numeric bounds
//!
//! A column's facets are computed over the rows that pass every active
//! filter except the column's own, so a filter UI can list the values its
//! own filter would let through. The global facets (column id
//! [`GLOBAL_FILTER_ID`]) skip the global filter in the same way.

use std::collections::HashMap;
use std::rc::Rc;

use super::filter_rows;
use crate::core::Column;
use crate::core::DebugFlag;
use crate::core::FacetedMinMaxFactory;
use crate::core::FacetedMinMaxFn;
use crate::core::FacetedRowModelFactory;
use crate::core::FacetedUniqueValuesFactory;
use crate::core::FacetedUniqueValuesFn;
use crate::core::RowModel;
use crate::core::RowModelFn;
use crate::core::Table;
use crate::features::GLOBAL_FILTER_ID;
use crate::features::RowFilterResults;
use crate::memo::ById;
use crate::memo::Memo;
use crate::model::RowData;
use crate::model::Value;

type FacetDeps<T> = (ById<Rc<RowModel<T>>>, ById<Rc<Vec<Rc<Column<T>>>>>);

pub fn faceted_row_model<T: RowData>() -> FacetedRowModelFactory<T> {
    Rc::new(|table: &Table<T>, column_id: &str| {
        let column_id = column_id.to_string();
        let memo: Memo<(ById<Rc<RowModel<T>>>, ById<Rc<RowFilterResults>>), Rc<RowModel<T>>> =
            Memo::new(table.memo_options("getFacetedRowModel", DebugFlag::Table));
        let getter: RowModelFn<T> = Rc::new(move |table: &Table<T>| {
            let deps = (
                ById(table.get_pre_filtered_row_model()),
                ById(table.get_row_filter_results()),
            );
            let model = memo.get(deps, |(pre, results)| {
                if pre.0.is_empty() || results.0.is_empty() {
                    return pre.0.clone();
                }
                let ids: Vec<String> = results
                    .0
                    .filterable_ids
                    .iter()
                    .filter(|id| **id != column_id)
                    .cloned()
                    .collect();
                Rc::new(filter_rows(table, &pre.0.rows, &results.0, &ids))
            });
            model.as_ref().clone()
        });
        getter
    })
}

/// Occurrence count of every value in the faceted rows. Arrays returned by
/// a unique-values function count each element.
pub fn faceted_unique_values<T: RowData>() -> FacetedUniqueValuesFactory<T> {
    Rc::new(|table: &Table<T>, column_id: &str| {
        let column_id = column_id.to_string();
        let memo: Memo<FacetDeps<T>, HashMap<Value, usize>> =
            Memo::new(table.memo_options("getFacetedUniqueValues", DebugFlag::Table));
        let getter: FacetedUniqueValuesFn<T> = Rc::new(move |table: &Table<T>| {
            let deps = facet_deps(table, &column_id);
            memo.get(deps, |(model, _)| {
                let column_ids = facet_column_ids(table, &column_id);
                let mut counts = HashMap::new();
                for row in &model.0.flat_rows {
                    for id in &column_ids {
                        for value in row.get_unique_values(id) {
                            *counts.entry(value).or_insert(0) += 1;
                        }
                    }
                }
                counts
            })
        });
        getter
    })
}

/// Smallest and largest numeric value in the faceted rows; `None` when
/// there is none. Arrays are flattened and non-numeric values skipped.
pub fn faceted_min_max_values<T: RowData>() -> FacetedMinMaxFactory<T> {
    Rc::new(|table: &Table<T>, column_id: &str| {
        let column_id = column_id.to_string();
        let memo: Memo<FacetDeps<T>, Option<(f64, f64)>> =
            Memo::new(table.memo_options("getFacetedMinMaxValues", DebugFlag::Table));
        let getter: FacetedMinMaxFn<T> = Rc::new(move |table: &Table<T>| {
            let deps = facet_deps(table, &column_id);
            let bounds = memo.get(deps, |(model, _)| {
                let column_ids = facet_column_ids(table, &column_id);
                model
                    .0
                    .flat_rows
                    .iter()
                    .flat_map(|row| column_ids.iter().flat_map(move |id| row.get_unique_values(id)))
                    .flat_map(|value| match value {
                        Value::Array(items) => items,
                        other => vec![other],
                    })
                    .filter_map(|value| value.as_f64())
                    .filter(|number| !number.is_nan())
                    .fold(None, |bounds: Option<(f64, f64)>, number| match bounds {
                        Some((min, max)) => Some((min.min(number), max.max(number))),
                        None => Some((number, number)),
                    })
            });
            *bounds
        });
        getter
    })
}

fn facet_deps<T: RowData>(table: &Table<T>, column_id: &str) -> FacetDeps<T> {
    let model = if column_id == GLOBAL_FILTER_ID {
        table.get_global_faceted_row_model()
    } else {
        match table.get_column(column_id) {
            Some(column) => column.get_faceted_row_model(table),
            None => table.get_pre_filtered_row_model(),
        }
    };
    (ById(model), ById(table.get_all_leaf_columns()))
}

/// Columns whose values feed a facet: the column itself, or every globally
/// filterable leaf column for the global facets.
fn facet_column_ids<T: RowData>(table: &Table<T>, column_id: &str) -> Vec<String> {
    if column_id != GLOBAL_FILTER_ID {
        return vec![column_id.to_string()];
    }
    table
        .get_all_leaf_columns()
        .iter()
        .filter(|column| column.get_can_global_filter(table))
        .map(|column| column.id.clone())
        .collect()
}
