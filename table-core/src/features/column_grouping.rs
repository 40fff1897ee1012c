//! Column grouping

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::ColumnDef;
use crate::core::GroupedColumnMode;
use crate::core::Row;
use crate::core::RowGrouping;
use crate::core::RowModel;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::core::Updater;
use crate::fns::AggregationFn;
use crate::fns::StrategyRef;
use crate::fns::builtin_aggregation_fn;
use crate::fns::infer_aggregation_fn_name;
use crate::model::RowData;

/// Groups rows by the values of one or more columns.
pub struct ColumnGrouping;

impl<T: RowData> TableFeature<T> for ColumnGrouping {
    fn name(&self) -> &'static str {
        "ColumnGrouping"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnGrouping)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            grouping: Some(Vec::new()),
            ..TableState::default()
        }
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::new().with_grouped_column_mode(GroupedColumnMode::Reorder)
    }

    fn get_default_column_def(&self) -> ColumnDef<T> {
        ColumnDef {
            aggregation_fn: Some(StrategyRef::Auto),
            ..ColumnDef::default()
        }
    }

    fn create_row(&self, row: &mut Row<T>, _table: &Table<T>) {
        row.grouping = Some(RowGrouping::default());
    }
}

impl<T: RowData> Column<T> {
    /// Adds this column to the end of the grouping, or removes it.
    pub fn toggle_grouping(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_grouping(Updater::with(move |old: &Vec<String>| {
            if old.contains(&id) {
                old.iter().filter(|grouped| **grouped != id).cloned().collect()
            } else {
                let mut next = old.clone();
                next.push(id);
                next
            }
        }));
    }

    pub fn get_can_group(&self, table: &Table<T>) -> bool {
        self.column_def.enable_grouping.unwrap_or(true)
            && table.config().enable_grouping.unwrap_or(true)
            && (self.accessor_fn.is_some() || self.column_def.get_grouping_value.is_some())
    }

    pub fn get_is_grouped(&self, table: &Table<T>) -> bool {
        table.get_state().grouping().contains(&self.id)
    }

    pub fn get_grouped_index(&self, table: &Table<T>) -> Option<usize> {
        table.get_state().grouping().iter().position(|id| *id == self.id)
    }

    /// Aggregation inferred from the first core row: `sum` for numbers,
    /// `extent` for date-times, none otherwise.
    pub fn get_auto_aggregation_fn(&self, table: &Table<T>) -> Option<AggregationFn<T>> {
        let value = table
            .get_core_row_model()
            .flat_rows
            .first()
            .map(|row| row.get_value(&self.id))
            .unwrap_or_default();
        infer_aggregation_fn_name(value.kind()).and_then(builtin_aggregation_fn)
    }

    pub fn get_aggregation_fn(&self, table: &Table<T>) -> Option<AggregationFn<T>> {
        let strategy = self.column_def.aggregation_fn.clone().unwrap_or_default();
        strategy.resolve(
            || self.get_auto_aggregation_fn(table),
            |name| table.lookup_aggregation_fn(name),
        )
    }
}

impl<T: RowData> Table<T> {
    pub(crate) fn lookup_aggregation_fn(&self, name: &str) -> Option<AggregationFn<T>> {
        self.options()
            .aggregation_fns
            .get(name)
            .cloned()
            .or_else(|| builtin_aggregation_fn(name))
    }

    /// Replaces the grouping; resets the page index and expansion.
    pub fn set_grouping(&self, updater: impl Into<Updater<Vec<String>>>) {
        let next = updater.into().apply(&self.get_state().grouping().to_vec());
        self.commit_slice(
            FeatureKind::ColumnGrouping,
            "grouping",
            next,
            |options| options.on_grouping_change.clone(),
            |state, next| state.grouping = Some(next),
        );
        self.auto_reset_page_index();
        self.auto_reset_expanded();
    }

    pub fn reset_grouping(&self, default_state: bool) {
        let next = if default_state {
            Vec::new()
        } else {
            self.initial_state().grouping().to_vec()
        };
        self.set_grouping(next);
    }

    pub fn get_pre_grouped_row_model(&self) -> Rc<RowModel<T>> {
        self.get_sorted_row_model()
    }

    pub fn get_grouped_row_model(&self) -> Rc<RowModel<T>> {
        self.run_stage(
            "grouped",
            FeatureKind::ColumnGrouping,
            self.config().manual_grouping,
            |options| options.get_grouped_row_model.clone(),
            || self.get_pre_grouped_row_model(),
        )
    }
}
