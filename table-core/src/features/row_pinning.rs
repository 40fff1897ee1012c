//! Row pinning

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::DebugFlag;
use crate::core::Row;
use crate::core::RowPinningPosition;
use crate::core::RowPinningState;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::core::Updater;
use crate::memo::ById;
use crate::model::RowData;

/// Pin rows to the top or bottom of the table.
pub struct RowPinning;

impl<T: RowData> TableFeature<T> for RowPinning {
    fn name(&self) -> &'static str {
        "RowPinning"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::RowPinning)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            row_pinning: Some(RowPinningState::default()),
            ..TableState::default()
        }
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::new().with_keep_pinned_rows(true)
    }
}

impl<T: RowData> Row<T> {
    /// Pins this row to a side, or unpins it with `None`.
    ///
    /// `include_leaf_rows` and `include_parent_rows` apply the same change to
    /// the row's descendants and ancestors. Pinned ids are appended after
    /// the ones already on that side, ancestors first.
    pub fn pin(
        &self,
        table: &Table<T>,
        position: Option<RowPinningPosition>,
        include_leaf_rows: bool,
        include_parent_rows: bool,
    ) {
        let mut ids: Vec<String> = Vec::new();
        if include_parent_rows {
            ids.extend(self.get_parent_rows(table).iter().map(|row| row.id.clone()));
        }
        ids.push(self.id.clone());
        if include_leaf_rows {
            ids.extend(self.get_leaf_rows().iter().map(|row| row.id.clone()));
        }
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        table.set_row_pinning(Updater::with(move |old: &RowPinningState| {
            let mut top: Vec<String> = old.top.iter().filter(|id| !unique.contains(id)).cloned().collect();
            let mut bottom: Vec<String> = old.bottom.iter().filter(|id| !unique.contains(id)).cloned().collect();
            match position {
                Some(RowPinningPosition::Top) => top.extend(unique),
                Some(RowPinningPosition::Bottom) => bottom.extend(unique),
                None => {}
            }
            RowPinningState { top, bottom }
        }));
    }

    pub fn get_can_pin(&self, table: &Table<T>) -> bool {
        if let Some(predicate) = table.options().can_pin_row.clone() {
            return predicate(self);
        }
        let config = table.config();
        config.enable_row_pinning.or(config.enable_pinning).unwrap_or(true)
    }

    pub fn get_is_pinned(&self, table: &Table<T>) -> Option<RowPinningPosition> {
        let state = table.get_state();
        let pinning = state.row_pinning();
        if pinning.top.contains(&self.id) {
            Some(RowPinningPosition::Top)
        } else if pinning.bottom.contains(&self.id) {
            Some(RowPinningPosition::Bottom)
        } else {
            None
        }
    }

    /// Position among the displayed pinned rows of its side.
    pub fn get_pinned_index(&self, table: &Table<T>) -> Option<usize> {
        let rows = match self.get_is_pinned(table)? {
            RowPinningPosition::Top => table.get_top_rows(),
            RowPinningPosition::Bottom => table.get_bottom_rows(),
        };
        rows.iter().position(|row| row.id == self.id)
    }
}

impl<T: RowData> Table<T> {
    pub fn set_row_pinning(&self, updater: impl Into<Updater<RowPinningState>>) {
        let next = updater.into().apply(self.get_state().row_pinning());
        self.commit_slice(
            FeatureKind::RowPinning,
            "rowPinning",
            next,
            |options| options.on_row_pinning_change.clone(),
            |state, next| state.row_pinning = Some(next),
        );
    }

    pub fn reset_row_pinning(&self, default_state: bool) {
        let next = if default_state {
            RowPinningState::default()
        } else {
            self.initial_state().row_pinning().clone()
        };
        self.set_row_pinning(next);
    }

    /// Any row pinned on `position`, or on either side with `None`.
    pub fn get_is_some_rows_pinned(&self, position: Option<RowPinningPosition>) -> bool {
        let state = self.get_state();
        let pinning = state.row_pinning();
        match position {
            Some(RowPinningPosition::Top) => !pinning.top.is_empty(),
            Some(RowPinningPosition::Bottom) => !pinning.bottom.is_empty(),
            None => !pinning.top.is_empty() || !pinning.bottom.is_empty(),
        }
    }

    /// Resolves pinned ids to rows.
    ///
    /// With `keep_pinned_rows` a pinned row shows even when filtered out or
    /// paged away, as long as its ancestors are expanded. Otherwise only
    /// pinned rows among the displayed rows show.
    fn pinned_rows(&self, visible: &[Rc<Row<T>>], ids: &[String]) -> Vec<Rc<Row<T>>> {
        if self.config().keep_pinned_rows.unwrap_or(true) {
            ids.iter()
                .filter_map(|id| self.get_row(id, true).ok())
                .filter(|row| row.get_is_all_parents_expanded(self))
                .collect()
        } else {
            ids.iter()
                .filter_map(|id| visible.iter().find(|row| &row.id == id).cloned())
                .collect()
        }
    }

    pub fn get_top_rows(&self) -> Rc<Vec<Rc<Row<T>>>> {
        let state = self.get_state();
        let deps = (
            ById(self.get_row_model()),
            state.row_pinning().top.clone(),
            state.expanded().clone(),
        );
        self.memo("getTopRows", DebugFlag::Rows, deps, |(model, top, _)| {
            self.pinned_rows(&model.0.rows, top)
        })
    }

    pub fn get_bottom_rows(&self) -> Rc<Vec<Rc<Row<T>>>> {
        let state = self.get_state();
        let deps = (
            ById(self.get_row_model()),
            state.row_pinning().bottom.clone(),
            state.expanded().clone(),
        );
        self.memo("getBottomRows", DebugFlag::Rows, deps, |(model, bottom, _)| {
            self.pinned_rows(&model.0.rows, bottom)
        })
    }

    /// Displayed rows that are pinned to neither side.
    pub fn get_center_rows(&self) -> Rc<Vec<Rc<Row<T>>>> {
        let state = self.get_state();
        let pinning = state.row_pinning();
        let deps = (ById(self.get_row_model()), pinning.top.clone(), pinning.bottom.clone());
        self.memo("getCenterRows", DebugFlag::Rows, deps, |(model, top, bottom)| {
            model
                .0
                .rows
                .iter()
                .filter(|row| !top.contains(&row.id) && !bottom.contains(&row.id))
                .cloned()
                .collect()
        })
    }
}
