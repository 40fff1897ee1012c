//! Column pinning

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Cell;
use crate::core::Column;
use crate::core::ColumnPinningPosition;
use crate::core::ColumnPinningState;
use crate::core::DebugFlag;
use crate::core::Row;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::memo::ById;
use crate::model::RowData;

/// Pin leaf columns to the left or right edge.
pub struct ColumnPinning;

impl<T: RowData> TableFeature<T> for ColumnPinning {
    fn name(&self) -> &'static str {
        "ColumnPinning"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnPinning)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            column_pinning: Some(ColumnPinningState::default()),
            ..TableState::default()
        }
    }
}

fn columns_by_ids<T>(ids: &[String], columns: &[Rc<Column<T>>]) -> Vec<Rc<Column<T>>> {
    ids.iter()
        .filter_map(|id| columns.iter().find(|column| &column.id == id).cloned())
        .collect()
}

impl<T: RowData> Column<T> {
    /// Pins this column's leaf columns to a side, or unpins them with `None`.
    /// Newly pinned ids go after the ones already pinned on that side.
    pub fn pin(self: &Rc<Self>, table: &Table<T>, position: Option<ColumnPinningPosition>) {
        let ids: Vec<String> = self.get_leaf_columns(table).iter().map(|column| column.id.clone()).collect();
        table.set_column_pinning(Updater::with(move |old: &ColumnPinningState| {
            let mut left: Vec<String> = old.left.iter().filter(|id| !ids.contains(id)).cloned().collect();
            let mut right: Vec<String> = old.right.iter().filter(|id| !ids.contains(id)).cloned().collect();
            match position {
                Some(ColumnPinningPosition::Left) => left.extend(ids),
                Some(ColumnPinningPosition::Right) => right.extend(ids),
                None => {}
            }
            ColumnPinningState { left, right }
        }));
    }

    /// A column can pin when any of its leaf columns may.
    pub fn get_can_pin(self: &Rc<Self>, table: &Table<T>) -> bool {
        let config = table.config();
        let table_allows = config.enable_column_pinning.or(config.enable_pinning).unwrap_or(true);
        table_allows
            && self
                .get_leaf_columns(table)
                .iter()
                .any(|column| column.column_def.enable_pinning.unwrap_or(true))
    }

    /// Side holding any of this column's leaf columns, left first.
    pub fn get_is_pinned(self: &Rc<Self>, table: &Table<T>) -> Option<ColumnPinningPosition> {
        let ids: Vec<String> = self.get_leaf_columns(table).iter().map(|column| column.id.clone()).collect();
        let state = table.get_state();
        let pinning = state.column_pinning();
        if ids.iter().any(|id| pinning.left.contains(id)) {
            Some(ColumnPinningPosition::Left)
        } else if ids.iter().any(|id| pinning.right.contains(id)) {
            Some(ColumnPinningPosition::Right)
        } else {
            None
        }
    }

    /// Position of this column's id on its pinned side.
    pub fn get_pinned_index(self: &Rc<Self>, table: &Table<T>) -> Option<usize> {
        let position = self.get_is_pinned(table)?;
        let state = table.get_state();
        let pinning = state.column_pinning();
        let side = match position {
            ColumnPinningPosition::Left => &pinning.left,
            ColumnPinningPosition::Right => &pinning.right,
        };
        side.iter().position(|id| *id == self.id)
    }
}

impl<T: RowData> Row<T> {
    fn visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        self.get_all_cells(table)
            .iter()
            .filter(|cell| cell.column.get_is_visible(table))
            .cloned()
            .collect()
    }

    /// Visible cells of the left-pinned columns, in pinning order.
    pub fn get_left_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let cells = self.visible_cells(table);
        let state = table.get_state();
        state
            .column_pinning()
            .left
            .iter()
            .filter_map(|id| cells.iter().find(|cell| &cell.column.id == id).cloned())
            .collect()
    }

    /// Visible cells of the unpinned columns.
    pub fn get_center_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let state = table.get_state();
        let pinning = state.column_pinning();
        self.visible_cells(table)
            .into_iter()
            .filter(|cell| !pinning.left.contains(&cell.column.id) && !pinning.right.contains(&cell.column.id))
            .collect()
    }

    /// Visible cells of the right-pinned columns, in pinning order.
    pub fn get_right_visible_cells(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Cell<T>>> {
        let cells = self.visible_cells(table);
        let state = table.get_state();
        state
            .column_pinning()
            .right
            .iter()
            .filter_map(|id| cells.iter().find(|cell| &cell.column.id == id).cloned())
            .collect()
    }
}

impl<T: RowData> Table<T> {
    pub fn set_column_pinning(&self, updater: impl Into<Updater<ColumnPinningState>>) {
        let next = updater.into().apply(self.get_state().column_pinning());
        self.commit_slice(
            FeatureKind::ColumnPinning,
            "columnPinning",
            next,
            |options| options.on_column_pinning_change.clone(),
            |state, next| state.column_pinning = Some(next),
        );
    }

    pub fn reset_column_pinning(&self, default_state: bool) {
        let next = if default_state {
            ColumnPinningState::default()
        } else {
            self.initial_state().column_pinning().clone()
        };
        self.set_column_pinning(next);
    }

    /// Any column pinned on `position`, or on either side with `None`.
    pub fn get_is_some_columns_pinned(&self, position: Option<ColumnPinningPosition>) -> bool {
        let state = self.get_state();
        let pinning = state.column_pinning();
        match position {
            Some(ColumnPinningPosition::Left) => !pinning.left.is_empty(),
            Some(ColumnPinningPosition::Right) => !pinning.right.is_empty(),
            None => !pinning.left.is_empty() || !pinning.right.is_empty(),
        }
    }

    /// Left-pinned leaf columns in pinning order; unknown ids are skipped.
    pub fn get_left_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        let state = self.get_state();
        let deps = (ById(self.get_all_leaf_columns()), state.column_pinning().left.clone());
        self.memo("getLeftLeafColumns", DebugFlag::Columns, deps, |(columns, left)| {
            columns_by_ids(left, &columns.0)
        })
        .to_vec()
    }

    /// Right-pinned leaf columns in pinning order; unknown ids are skipped.
    pub fn get_right_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        let state = self.get_state();
        let deps = (ById(self.get_all_leaf_columns()), state.column_pinning().right.clone());
        self.memo("getRightLeafColumns", DebugFlag::Columns, deps, |(columns, right)| {
            columns_by_ids(right, &columns.0)
        })
        .to_vec()
    }

    /// Unpinned leaf columns in display order.
    pub fn get_center_leaf_columns(&self) -> Vec<Rc<Column<T>>> {
        let state = self.get_state();
        let pinning = state.column_pinning();
        let deps = (
            ById(self.get_all_leaf_columns()),
            pinning.left.clone(),
            pinning.right.clone(),
        );
        self.memo("getCenterLeafColumns", DebugFlag::Columns, deps, |(columns, left, right)| {
            columns
                .0
                .iter()
                .filter(|column| !left.contains(&column.id) && !right.contains(&column.id))
                .cloned()
                .collect::<Vec<_>>()
        })
        .to_vec()
    }
}
