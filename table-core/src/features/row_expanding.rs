//! Row expansion

use std::collections::BTreeMap;
use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::ExpandedState;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::core::Updater;
use crate::model::RowData;

/// Expandable sub rows and group rows.
pub struct RowExpanding;

impl<T: RowData> TableFeature<T> for RowExpanding {
    fn name(&self) -> &'static str {
        "RowExpanding"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::RowExpanding)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            expanded: Some(ExpandedState::default()),
            ..TableState::default()
        }
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::new().with_paginate_expanded_rows(true)
    }
}

impl<T: RowData> Row<T> {
    /// Expands or collapses this row; `None` flips it.
    ///
    /// Collapsing one row while every row is expanded turns the state into
    /// an explicit map of the other displayed rows.
    pub fn toggle_expanded(&self, table: &Table<T>, expanded: Option<bool>) {
        let old = table.get_state().expanded().clone();
        let exists = old.is_expanded(&self.id);
        let expanded = expanded.unwrap_or(!exists);
        if exists == expanded {
            return;
        }
        let mut rows = match old {
            ExpandedState::All => table
                .get_row_model()
                .rows_by_id
                .keys()
                .map(|id| (id.clone(), true))
                .collect(),
            ExpandedState::Rows(rows) => rows,
        };
        if expanded {
            rows.insert(self.id.clone(), true);
        } else {
            rows.remove(&self.id);
        }
        table.set_expanded(ExpandedState::Rows(rows));
    }

    pub fn get_is_expanded(&self, table: &Table<T>) -> bool {
        match table.options().get_is_row_expanded.clone() {
            Some(predicate) => predicate(self),
            None => table.get_state().expanded().is_expanded(&self.id),
        }
    }

    pub fn get_can_expand(&self, table: &Table<T>) -> bool {
        match table.options().get_row_can_expand.clone() {
            Some(predicate) => predicate(self),
            None => table.config().enable_expanding.unwrap_or(true) && !self.sub_rows.is_empty(),
        }
    }

    /// Returns `true` when every ancestor of this row is expanded.
    pub fn get_is_all_parents_expanded(&self, table: &Table<T>) -> bool {
        let mut parent_id = self.parent_id.clone();
        while let Some(id) = parent_id {
            match table.get_row(&id, true) {
                Ok(parent) => {
                    if !parent.get_is_expanded(table) {
                        return false;
                    }
                    parent_id = parent.parent_id.clone();
                }
                Err(_) => break,
            }
        }
        true
    }
}

impl<T: RowData> Table<T> {
    pub fn set_expanded(&self, updater: impl Into<Updater<ExpandedState>>) {
        let next = updater.into().apply(self.get_state().expanded());
        self.commit_slice(
            FeatureKind::RowExpanding,
            "expanded",
            next,
            |options| options.on_expanded_change.clone(),
            |state, next| state.expanded = Some(next),
        );
    }

    /// Expands (`Some(true)`) or collapses every row; `None` flips between
    /// all expanded and none.
    pub fn toggle_all_rows_expanded(&self, expanded: Option<bool>) {
        if expanded.unwrap_or_else(|| !self.get_is_all_rows_expanded()) {
            self.set_expanded(ExpandedState::All);
        } else {
            self.set_expanded(ExpandedState::Rows(BTreeMap::new()));
        }
    }

    pub fn reset_expanded(&self, default_state: bool) {
        let next = if default_state {
            ExpandedState::default()
        } else {
            self.initial_state().expanded().clone()
        };
        self.set_expanded(next);
    }

    /// Resets the expansion when data or grouping changes, unless disabled.
    pub(crate) fn auto_reset_expanded(&self) {
        if !self.has_feature(FeatureKind::RowExpanding) {
            return;
        }
        let config = self.config();
        let enabled = config
            .auto_reset_all
            .or(config.auto_reset_expanded)
            .unwrap_or(!config.manual_expanding.unwrap_or(false));
        if enabled && self.get_state().expanded() != self.initial_state().expanded() {
            log::debug!("auto-resetting expanded rows");
            self.reset_expanded(false);
        }
    }

    pub fn get_can_some_rows_expand(&self) -> bool {
        self.get_pre_pagination_row_model()
            .flat_rows
            .iter()
            .any(|row| row.get_can_expand(self))
    }

    pub fn get_is_some_rows_expanded(&self) -> bool {
        match self.get_state().expanded() {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) => rows.values().any(|expanded| *expanded),
        }
    }

    pub fn get_is_all_rows_expanded(&self) -> bool {
        match self.get_state().expanded() {
            ExpandedState::All => true,
            ExpandedState::Rows(rows) if rows.is_empty() => false,
            ExpandedState::Rows(_) => self
                .get_row_model()
                .flat_rows
                .iter()
                .all(|row| row.get_is_expanded(self)),
        }
    }

    /// Deepest expanded level, counted from the dotted segments of the
    /// expanded row ids.
    pub fn get_expanded_depth(&self) -> usize {
        let state = self.get_state();
        let depth = |id: &String| id.split('.').count();
        match state.expanded() {
            ExpandedState::All => self.get_row_model().rows_by_id.keys().map(depth).max().unwrap_or(0),
            ExpandedState::Rows(rows) => rows.keys().map(depth).max().unwrap_or(0),
        }
    }

    pub fn get_pre_expanded_row_model(&self) -> Rc<RowModel<T>> {
        self.get_grouped_row_model()
    }

    pub fn get_expanded_row_model(&self) -> Rc<RowModel<T>> {
        self.run_stage(
            "expanded",
            FeatureKind::RowExpanding,
            self.config().manual_expanding,
            |options| options.get_expanded_row_model.clone(),
            || self.get_pre_expanded_row_model(),
        )
    }
}
