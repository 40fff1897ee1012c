//! Column ordering

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::ColumnPosition;
use crate::core::GroupedColumnMode;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::model::RowData;

/// Explicit leaf column order.
pub struct ColumnOrdering;

impl<T: RowData> TableFeature<T> for ColumnOrdering {
    fn name(&self) -> &'static str {
        "ColumnOrdering"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnOrdering)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            column_order: Some(Vec::new()),
            ..TableState::default()
        }
    }
}

/// Orders leaf columns: the ids in `order` first (unknown ids ignored), then
/// the remaining columns in their current order. With an active grouping,
/// `mode` then moves grouped columns to the front or drops them.
pub(crate) fn order_leaf_columns<T>(
    columns: Vec<Rc<Column<T>>>,
    order: &[String],
    grouping: &[String],
    mode: Option<GroupedColumnMode>,
) -> Vec<Rc<Column<T>>> {
    let ordered = if order.is_empty() {
        columns
    } else {
        let mut remaining = columns;
        let mut ordered = Vec::with_capacity(remaining.len());
        for id in order {
            if remaining.is_empty() {
                break;
            }
            if let Some(index) = remaining.iter().position(|column| &column.id == id) {
                ordered.push(remaining.remove(index));
            }
        }
        ordered.extend(remaining);
        ordered
    };

    if grouping.is_empty() {
        return ordered;
    }
    match mode {
        None | Some(GroupedColumnMode::Off) => ordered,
        Some(GroupedColumnMode::Remove) => ordered
            .into_iter()
            .filter(|column| !grouping.contains(&column.id))
            .collect(),
        Some(GroupedColumnMode::Reorder) => {
            let mut reordered: Vec<Rc<Column<T>>> = grouping
                .iter()
                .filter_map(|id| ordered.iter().find(|column| &column.id == id).cloned())
                .collect();
            reordered.extend(ordered.into_iter().filter(|column| !grouping.contains(&column.id)));
            reordered
        }
    }
}

impl<T: RowData> Column<T> {
    /// Position among the visible leaf columns of a region (or of the whole
    /// table with `None`).
    pub fn get_index(&self, table: &Table<T>, position: Option<ColumnPosition>) -> Option<usize> {
        table
            .visible_leaf_columns_in(position)
            .iter()
            .position(|column| column.id == self.id)
    }

    pub fn get_is_first_column(&self, table: &Table<T>, position: Option<ColumnPosition>) -> bool {
        table
            .visible_leaf_columns_in(position)
            .first()
            .is_some_and(|column| column.id == self.id)
    }

    pub fn get_is_last_column(&self, table: &Table<T>, position: Option<ColumnPosition>) -> bool {
        table
            .visible_leaf_columns_in(position)
            .last()
            .is_some_and(|column| column.id == self.id)
    }
}

impl<T: RowData> Table<T> {
    pub fn set_column_order(&self, updater: impl Into<Updater<Vec<String>>>) {
        let next = updater.into().apply(&self.get_state().column_order().to_vec());
        self.commit_slice(
            FeatureKind::ColumnOrdering,
            "columnOrder",
            next,
            |options| options.on_column_order_change.clone(),
            |state, next| state.column_order = Some(next),
        );
    }

    pub fn reset_column_order(&self, default_state: bool) {
        let next = if default_state {
            Vec::new()
        } else {
            self.initial_state().column_order().to_vec()
        };
        self.set_column_order(next);
    }
}
