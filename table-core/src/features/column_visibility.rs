//! Column visibility

use std::collections::BTreeMap;
use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Cell;
use crate::core::Column;
use crate::core::ColumnPosition;
use crate::core::DebugFlag;
use crate::core::Row;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::memo::ById;
use crate::model::RowData;

/// Show and hide columns.
pub struct ColumnVisibility;

impl<T: RowData> TableFeature<T> for ColumnVisibility {
    fn name(&self) -> &'static str {
        "ColumnVisibility"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnVisibility)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            column_visibility: Some(BTreeMap::new()),
            ..TableState::default()
        }
    }
}

impl<T: RowData> Column<T> {
    /// A leaf is visible unless the state hides it; a group column is
    /// visible while any child is.
    pub fn get_is_visible(&self, table: &Table<T>) -> bool {
        if !table.has_feature(FeatureKind::ColumnVisibility) {
            return true;
        }
        let state = table.get_state();
        self.is_visible_in(state.column_visibility())
    }

    fn is_visible_in(&self, visibility: &BTreeMap<String, bool>) -> bool {
        if self.columns.is_empty() {
            visibility.get(&self.id).copied().unwrap_or(true)
        } else {
            self.columns.iter().any(|child| child.is_visible_in(visibility))
        }
    }

    pub fn get_can_hide(&self, table: &Table<T>) -> bool {
        self.column_def.enable_hiding.unwrap_or(true) && table.config().enable_hiding.unwrap_or(true)
    }

    /// Shows or hides this column; `None` flips it. Ignored when the column
    /// cannot hide.
    pub fn toggle_visibility(&self, table: &Table<T>, visible: Option<bool>) {
        if !self.get_can_hide(table) {
            return;
        }
        let visible = visible.unwrap_or_else(|| !self.get_is_visible(table));
        let id = self.id.clone();
        table.set_column_visibility(Updater::with(move |old: &BTreeMap<String, bool>| {
            let mut next = old.clone();
            next.insert(id, visible);
            next
        }));
    }
}

impl<T: RowData> Row<T> {
    /// Cells of the visible leaf columns: left pinned, center, right pinned.
    pub fn get_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        if table.has_feature(FeatureKind::ColumnPinning) {
            let mut cells = self.get_left_visible_cells(table);
            cells.extend(self.get_center_visible_cells(table));
            cells.extend(self.get_right_visible_cells(table));
            return cells;
        }
        self.get_all_cells(table)
            .iter()
            .filter(|cell| cell.column.get_is_visible(table))
            .cloned()
            .collect()
    }
}

impl<T: RowData> Table<T> {
    pub fn get_visible_flat_columns(&self) -> Rc<Vec<Rc<Column<T>>>> {
        let state = self.get_state();
        let deps = (ById(self.get_all_flat_columns()), state.column_visibility().clone());
        self.memo("getVisibleFlatColumns", DebugFlag::Columns, deps, |(columns, _)| {
            columns.0.iter().filter(|column| column.get_is_visible(self)).cloned().collect()
        })
    }

    /// Visible leaf columns in display order.
    pub fn get_visible_leaf_columns(&self) -> Rc<Vec<Rc<Column<T>>>> {
        let state = self.get_state();
        let deps = (ById(self.get_all_leaf_columns()), state.column_visibility().clone());
        self.memo("getVisibleLeafColumns", DebugFlag::Columns, deps, |(columns, _)| {
            columns.0.iter().filter(|column| column.get_is_visible(self)).cloned().collect()
        })
    }

    pub fn get_left_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.get_left_leaf_columns()
            .into_iter()
            .filter(|column| column.get_is_visible(self))
            .collect()
    }

    pub fn get_center_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.get_center_leaf_columns()
            .into_iter()
            .filter(|column| column.get_is_visible(self))
            .collect()
    }

    pub fn get_right_visible_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        self.get_right_leaf_columns()
            .into_iter()
            .filter(|column| column.get_is_visible(self))
            .collect()
    }

    /// Visible leaf columns of a region, or of the whole table with `None`.
    pub(crate) fn visible_leaf_columns_in(&self, position: Option<ColumnPosition>) -> Vec<Rc<Column<T>>> {
        match position {
            Some(ColumnPosition::Left) => self.get_left_visible_leaf_columns(),
            Some(ColumnPosition::Center) => self.get_center_visible_leaf_columns(),
            Some(ColumnPosition::Right) => self.get_right_visible_leaf_columns(),
            None => self.get_visible_leaf_columns().to_vec(),
        }
    }

    pub fn set_column_visibility(&self, updater: impl Into<Updater<BTreeMap<String, bool>>>) {
        let next = updater.into().apply(self.get_state().column_visibility());
        self.commit_slice(
            FeatureKind::ColumnVisibility,
            "columnVisibility",
            next,
            |options| options.on_column_visibility_change.clone(),
            |state, next| state.column_visibility = Some(next),
        );
    }

    pub fn reset_column_visibility(&self, default_state: bool) {
        let next = if default_state {
            BTreeMap::new()
        } else {
            self.initial_state().column_visibility().clone()
        };
        self.set_column_visibility(next);
    }

    /// Shows every leaf column, or hides every hideable one; `None` flips
    /// between the two.
    pub fn toggle_all_columns_visible(&self, visible: Option<bool>) {
        let visible = visible.unwrap_or_else(|| !self.get_is_all_columns_visible());
        let next: BTreeMap<String, bool> = self
            .get_all_leaf_columns()
            .iter()
            .map(|column| {
                let shown = visible || !column.get_can_hide(self);
                (column.id.clone(), shown)
            })
            .collect();
        self.set_column_visibility(next);
    }

    pub fn get_is_all_columns_visible(&self) -> bool {
        self.get_all_leaf_columns().iter().all(|column| column.get_is_visible(self))
    }

    pub fn get_is_some_columns_visible(&self) -> bool {
        self.get_all_leaf_columns().iter().any(|column| column.get_is_visible(self))
    }
}
