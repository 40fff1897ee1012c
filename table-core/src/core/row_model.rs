//! Row model snapshots and builder signatures

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::Row;
use super::Table;
use crate::model::Value;

/// Immutable snapshot of one pipeline stage.
///
/// `rows` holds the top-level rows in display order, `flat_rows` every row
/// reachable from them and `rows_by_id` indexes rows by id.
pub struct RowModel<T> {
    pub rows: Vec<Rc<Row<T>>>,
    pub flat_rows: Vec<Rc<Row<T>>>,
    pub rows_by_id: HashMap<String, Rc<Row<T>>>,
}

impl<T> Default for RowModel<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            flat_rows: Vec::new(),
            rows_by_id: HashMap::new(),
        }
    }
}

impl<T> Clone for RowModel<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            flat_rows: self.flat_rows.clone(),
            rows_by_id: self.rows_by_id.clone(),
        }
    }
}

impl<T> RowModel<T> {
    /// Builds a model from top-level rows; `flat_rows` is their pre-order
    /// closure through `sub_rows`.
    pub fn from_rows(rows: Vec<Rc<Row<T>>>) -> Self {
        let mut flat_rows = Vec::new();
        collect_flat(&rows, &mut flat_rows);
        let rows_by_id = flat_rows.iter().map(|row| (row.id.clone(), row.clone())).collect();
        Self {
            rows,
            flat_rows,
            rows_by_id,
        }
    }

    /// Looks up a row by id.
    pub fn row(&self, id: &str) -> Option<&Rc<Row<T>>> {
        self.rows_by_id.get(id)
    }

    /// Top-level row ids in order.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn collect_flat<T>(rows: &[Rc<Row<T>>], flat: &mut Vec<Rc<Row<T>>>) {
    for row in rows {
        flat.push(row.clone());
        collect_flat(&row.sub_rows, flat);
    }
}

impl<T> fmt::Debug for RowModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowModel")
            .field("rows", &self.rows.len())
            .field("flat_rows", &self.flat_rows.len())
            .finish()
    }
}

/// Per-table memoized getter for one stage.
pub type RowModelFn<T> = Rc<dyn Fn(&Table<T>) -> Rc<RowModel<T>>>;

/// Creates a stage getter for a table; invoked once per table on first use.
pub type RowModelFactory<T> = Rc<dyn Fn(&Table<T>) -> RowModelFn<T>>;

/// Unique-value counts for faceting.
pub type FacetedUniqueValuesFn<T> = Rc<dyn Fn(&Table<T>) -> Rc<HashMap<Value, usize>>>;

/// Numeric `(min, max)` for faceting.
pub type FacetedMinMaxFn<T> = Rc<dyn Fn(&Table<T>) -> Option<(f64, f64)>>;

/// Creates the faceted row model getter for a column id.
pub type FacetedRowModelFactory<T> = Rc<dyn Fn(&Table<T>, &str) -> RowModelFn<T>>;

/// Creates the unique-values getter for a column id.
pub type FacetedUniqueValuesFactory<T> = Rc<dyn Fn(&Table<T>, &str) -> FacetedUniqueValuesFn<T>>;

/// Creates the min/max getter for a column id.
pub type FacetedMinMaxFactory<T> = Rc<dyn Fn(&Table<T>, &str) -> FacetedMinMaxFn<T>>;
