//! Global filtering

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::fns::FilterFn;
use crate::fns::includes_string;
use crate::model::RowData;
use crate::model::Value;

/// Filter id under which rows record the global filter outcome.
pub const GLOBAL_FILTER_ID: &str = "__global__";

/// One filter value matched against every globally filterable column.
pub struct GlobalFiltering;

impl<T: RowData> TableFeature<T> for GlobalFiltering {
    fn name(&self) -> &'static str {
        "GlobalFiltering"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::GlobalFiltering)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            global_filter: Some(Value::Null),
            ..TableState::default()
        }
    }
}

impl<T: RowData> Column<T> {
    /// A column takes part in the global filter when enabled, bound to data
    /// and accepted by the table's predicate (by default: the first core
    /// row holds a string or a number).
    pub fn get_can_global_filter(&self, table: &Table<T>) -> bool {
        let config = table.config();
        let accepted = match table.options().get_column_can_global_filter.clone() {
            Some(predicate) => predicate(self, table),
            None => {
                let value = table
                    .get_core_row_model()
                    .flat_rows
                    .first()
                    .map(|row| row.get_value(&self.id))
                    .unwrap_or_default();
                matches!(value, Value::String(_)) || value.is_number()
            }
        };
        self.column_def.enable_global_filter.unwrap_or(true)
            && config.enable_global_filter.unwrap_or(true)
            && config.enable_filters.unwrap_or(true)
            && accepted
            && self.accessor_fn.is_some()
    }
}

impl<T: RowData> Table<T> {
    pub fn get_global_auto_filter_fn(&self) -> FilterFn<T> {
        includes_string()
    }

    /// Resolved global filter function. An unknown name is logged and
    /// disables the global filter.
    pub fn get_global_filter_fn(&self) -> Option<FilterFn<T>> {
        let strategy = self.options().global_filter_fn.clone();
        let filter_fn = strategy.resolve(|| Some(self.get_global_auto_filter_fn()), |name| self.lookup_filter_fn(name));
        if filter_fn.is_none() {
            log::warn!("unknown global filter function {:?}; global filter skipped", strategy);
        }
        filter_fn
    }

    pub fn set_global_filter(&self, updater: impl Into<Updater<Value>>) {
        let next = updater.into().apply(self.get_state().global_filter());
        self.commit_slice(
            FeatureKind::GlobalFiltering,
            "globalFilter",
            next,
            |options| options.on_global_filter_change.clone(),
            |state, next| state.global_filter = Some(next),
        );
        self.auto_reset_page_index();
    }

    /// Restores the initial global filter, or clears it with `default_state`.
    pub fn reset_global_filter(&self, default_state: bool) {
        let next = if default_state {
            Value::Null
        } else {
            self.initial_state().global_filter().clone()
        };
        self.set_global_filter(next);
    }
}
