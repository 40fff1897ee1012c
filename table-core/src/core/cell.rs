//! Cell entity

use std::fmt;
use std::rc::Rc;
use std::rc::Weak;

use super::Column;
use super::Row;
use super::Table;
use crate::features::FeatureKind;
use crate::features::FeatureSet;
use crate::model::RowData;
use crate::model::Value;

/// One (row, leaf column) pair.
///
/// Cells are owned by their row's cell cache and refer back to the row
/// without owning it.
pub struct Cell<T> {
    pub(crate) id: String,
    pub(crate) row: Weak<Row<T>>,
    pub(crate) column: Rc<Column<T>>,
    pub(crate) features: FeatureSet,
}

impl<T> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell").field("id", &self.id).finish()
    }
}

/// Everything a renderer needs to paint a cell.
pub struct CellContext<'a, T> {
    pub table: &'a Table<T>,
    pub cell: &'a Cell<T>,
    pub column: &'a Column<T>,
    pub row: Option<Rc<Row<T>>>,
}

impl<T: RowData> CellContext<'_, T> {
    pub fn get_value(&self) -> Value {
        self.cell.get_value()
    }

    pub fn render_value(&self) -> Value {
        self.cell.render_value(self.table)
    }
}

impl<T: RowData> Cell<T> {
    pub(crate) fn new(row: &Rc<Row<T>>, column: Rc<Column<T>>) -> Self {
        Self {
            id: format!("{}_{}", row.id(), column.id()),
            row: Rc::downgrade(row),
            column,
            features: FeatureSet::default(),
        }
    }

    /// `"{row id}_{column id}"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn column(&self) -> &Rc<Column<T>> {
        &self.column
    }

    /// The owning row, if it is still alive.
    pub fn row(&self) -> Option<Rc<Row<T>>> {
        self.row.upgrade()
    }

    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.contains(kind)
    }

    pub fn get_value(&self) -> Value {
        self.row()
            .map(|row| row.get_value(self.column.id()))
            .unwrap_or_default()
    }

    pub fn render_value(&self, table: &Table<T>) -> Value {
        match self.row() {
            Some(row) => row.render_value(table, self.column.id()),
            None => table.config().render_fallback_value.clone().unwrap_or_default(),
        }
    }

    pub fn get_context<'a>(&'a self, table: &'a Table<T>) -> CellContext<'a, T> {
        CellContext {
            table,
            cell: self,
            column: &self.column,
            row: self.row(),
        }
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// The cell shows the value its group row was grouped by.
    pub fn get_is_grouped(&self, table: &Table<T>) -> bool {
        let Some(row) = self.row() else {
            return false;
        };
        self.column.get_is_grouped(table) && row.grouping_column_id() == Some(self.column.id())
    }

    /// The cell sits in a grouped column but below the level it was grouped at.
    pub fn get_is_placeholder(&self, table: &Table<T>) -> bool {
        !self.get_is_grouped(table) && self.column.get_is_grouped(table)
    }

    /// The cell shows an aggregate over its row's sub rows.
    pub fn get_is_aggregated(&self, table: &Table<T>) -> bool {
        let has_sub_rows = self.row().is_some_and(|row| !row.sub_rows().is_empty());
        !self.get_is_grouped(table) && !self.get_is_placeholder(table) && has_sub_rows
    }
}
