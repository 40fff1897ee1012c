//! Column sizing
//!
//! Widths only; resize interaction belongs to the renderer, which writes
//! the new widths back through [`Table::set_column_sizing`].

use std::collections::BTreeMap;
use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::ColumnDef;
use crate::core::ColumnPosition;
use crate::core::Header;
use crate::core::HeaderGroup;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::model::RowData;

pub const DEFAULT_COLUMN_SIZE: f64 = 150.0;
pub const DEFAULT_MIN_COLUMN_SIZE: f64 = 20.0;

/// Column widths.
pub struct ColumnSizing;

impl<T: RowData> TableFeature<T> for ColumnSizing {
    fn name(&self) -> &'static str {
        "ColumnSizing"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnSizing)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            column_sizing: Some(BTreeMap::new()),
            ..TableState::default()
        }
    }

    fn get_default_column_def(&self) -> ColumnDef<T> {
        ColumnDef {
            size: Some(DEFAULT_COLUMN_SIZE),
            min_size: Some(DEFAULT_MIN_COLUMN_SIZE),
            max_size: Some(f64::MAX),
            ..ColumnDef::default()
        }
    }
}

fn sum_sizes<T: RowData>(table: &Table<T>, columns: &[Rc<Column<T>>]) -> f64 {
    columns.iter().map(|column| column.get_size(table)).sum()
}

impl<T: RowData> Column<T> {
    /// Width from the state, else the definition, clamped to the min and max.
    pub fn get_size(&self, table: &Table<T>) -> f64 {
        let state = table.get_state();
        let size = state
            .column_sizing()
            .get(&self.id)
            .copied()
            .or(self.column_def.size)
            .unwrap_or(DEFAULT_COLUMN_SIZE);
        let min = self.column_def.min_size.unwrap_or(DEFAULT_MIN_COLUMN_SIZE);
        let max = self.column_def.max_size.unwrap_or(f64::MAX);
        size.max(min).min(max)
    }

    /// Offset of this column within the visible leaf columns of a region
    /// (or the whole table with `None`).
    pub fn get_start(&self, table: &Table<T>, position: Option<ColumnPosition>) -> f64 {
        let columns = table.visible_leaf_columns_in(position);
        let index = self.get_index(table, position).unwrap_or(0);
        sum_sizes(table, &columns[..index.min(columns.len())])
    }

    /// Width of the visible leaf columns after this one.
    pub fn get_after(&self, table: &Table<T>, position: Option<ColumnPosition>) -> f64 {
        let columns = table.visible_leaf_columns_in(position);
        match self.get_index(table, position) {
            Some(index) => sum_sizes(table, &columns[index + 1..]),
            None => 0.0,
        }
    }

    pub fn get_can_resize(&self, table: &Table<T>) -> bool {
        self.column_def.enable_resizing.unwrap_or(true) && table.config().enable_column_resizing.unwrap_or(true)
    }

    /// Drops this column's width from the state.
    pub fn reset_size(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_column_sizing(Updater::with(move |old: &BTreeMap<String, f64>| {
            let mut next = old.clone();
            next.remove(&id);
            next
        }));
    }
}

impl<T: RowData> Header<T> {
    /// Sum of the widths of the leaf columns below this header.
    pub fn get_size(&self, table: &Table<T>) -> f64 {
        if self.sub_headers.is_empty() {
            return self.column.get_size(table);
        }
        self.sub_headers.iter().map(|header| header.get_size(table)).sum()
    }

    /// Offset of this header within `group`.
    pub fn get_start(&self, table: &Table<T>, group: &HeaderGroup<T>) -> f64 {
        group
            .headers
            .iter()
            .take(self.index)
            .map(|header| header.get_size(table))
            .sum()
    }
}

impl<T: RowData> Table<T> {
    pub fn set_column_sizing(&self, updater: impl Into<Updater<BTreeMap<String, f64>>>) {
        let next = updater.into().apply(self.get_state().column_sizing());
        self.commit_slice(
            FeatureKind::ColumnSizing,
            "columnSizing",
            next,
            |options| options.on_column_sizing_change.clone(),
            |state, next| state.column_sizing = Some(next),
        );
    }

    pub fn reset_column_sizing(&self, default_state: bool) {
        let next = if default_state {
            BTreeMap::new()
        } else {
            self.initial_state().column_sizing().clone()
        };
        self.set_column_sizing(next);
    }

    fn total_size(&self, groups: &[HeaderGroup<T>]) -> f64 {
        groups
            .first()
            .map(|group| group.headers.iter().map(|header| header.get_size(self)).sum())
            .unwrap_or(0.0)
    }

    /// Width of every visible leaf column.
    pub fn get_total_size(&self) -> f64 {
        self.total_size(&self.get_header_groups())
    }

    pub fn get_left_total_size(&self) -> f64 {
        self.total_size(&self.get_left_header_groups())
    }

    pub fn get_center_total_size(&self) -> f64 {
        self.total_size(&self.get_center_header_groups())
    }

    pub fn get_right_total_size(&self) -> f64 {
        self.total_size(&self.get_right_header_groups())
    }
}
