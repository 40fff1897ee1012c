//! Sorted rows

use std::cmp::Ordering;
use std::rc::Rc;

use super::stage;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::SortUndefined;
use crate::core::Table;
use crate::fns::SortingFn;
use crate::memo::ById;
use crate::model::RowData;

struct SortEntry<T> {
    column_id: String,
    desc: bool,
    invert: bool,
    sort_undefined: Option<SortUndefined>,
    sorting_fn: SortingFn<T>,
}

/// Orders every level of the row tree by the sort list. Entries naming a
/// column that cannot sort are skipped; ties keep their upstream order.
///
/// # Panics
///
/// The getter panics when a sorted column names a sorting function that is
/// neither registered nor built in.
pub fn sorted_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getSortedRowModel",
        |table: &Table<T>| {
            (
                ById(table.get_pre_sorted_row_model()),
                ById(table.get_all_leaf_columns()),
                table.get_state().sorting().to_vec(),
            )
        },
        |table, (pre, _, sorting)| {
            if pre.0.is_empty() || sorting.is_empty() {
                return pre.0.clone();
            }
            let entries: Vec<SortEntry<T>> = sorting
                .iter()
                .filter_map(|sort| {
                    let column = table.get_column(&sort.id)?;
                    if !column.get_can_sort(table) {
                        return None;
                    }
                    let sorting_fn = match column.get_sorting_fn(table) {
                        Some(sorting_fn) => sorting_fn,
                        None => panic!("column `{}` names an unknown sorting function", sort.id),
                    };
                    Some(SortEntry {
                        column_id: sort.id.clone(),
                        desc: sort.desc,
                        invert: column.column_def.invert_sorting.unwrap_or(false),
                        sort_undefined: column.column_def.sort_undefined,
                        sorting_fn,
                    })
                })
                .collect();
            if entries.is_empty() {
                return pre.0.clone();
            }
            Rc::new(RowModel::from_rows(sort_rows(table, &pre.0.rows, &entries)))
        },
    )
}

fn sort_rows<T: RowData>(table: &Table<T>, rows: &[Rc<Row<T>>], entries: &[SortEntry<T>]) -> Vec<Rc<Row<T>>> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_rows(a, b, entries));
    sorted
        .into_iter()
        .map(|row| {
            if row.sub_rows.is_empty() {
                return row;
            }
            let sub_rows = sort_rows(table, &row.sub_rows, entries);
            Rc::new(row.derive(table, row.depth, row.parent_id.clone(), sub_rows))
        })
        .collect()
}

fn compare_rows<T: RowData>(a: &Row<T>, b: &Row<T>, entries: &[SortEntry<T>]) -> Ordering {
    for entry in entries {
        let mut ordering = Ordering::Equal;
        if let Some(sort_undefined) = entry.sort_undefined {
            let a_null = a.get_value(&entry.column_id).is_null();
            let b_null = b.get_value(&entry.column_id).is_null();
            if a_null != b_null {
                let null_first = if a_null { Ordering::Less } else { Ordering::Greater };
                match sort_undefined {
                    // Independent of the direction.
                    SortUndefined::First => return null_first,
                    SortUndefined::Last => return null_first.reverse(),
                    SortUndefined::Less => ordering = null_first,
                    SortUndefined::Greater => ordering = null_first.reverse(),
                    SortUndefined::Ignore => {}
                }
            }
        }
        if ordering == Ordering::Equal {
            ordering = (entry.sorting_fn)(a, b, &entry.column_id);
        }
        if ordering != Ordering::Equal {
            if entry.desc {
                ordering = ordering.reverse();
            }
            if entry.invert {
                ordering = ordering.reverse();
            }
            return ordering;
        }
    }
    Ordering::Equal
}
