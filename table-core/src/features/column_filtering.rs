//! Column filtering

use std::collections::HashMap;
use std::rc::Rc;

use super::FeatureKind;
use super::GLOBAL_FILTER_ID;
use super::TableFeature;
use crate::core::Column;
use crate::core::ColumnDef;
use crate::core::ColumnFilter;
use crate::core::DebugFlag;
use crate::core::Row;
use crate::core::RowFiltering;
use crate::core::RowModel;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::core::Updater;
use crate::fns::FilterFn;
use crate::fns::StrategyRef;
use crate::fns::builtin_filter_fn;
use crate::fns::infer_filter_fn_name;
use crate::fns::is_falsey;
use crate::memo::ById;
use crate::model::RowData;
use crate::model::Value;

/// Per-column filters.
pub struct ColumnFiltering;

impl<T: RowData> TableFeature<T> for ColumnFiltering {
    fn name(&self) -> &'static str {
        "ColumnFiltering"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnFiltering)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            column_filters: Some(Vec::new()),
            ..TableState::default()
        }
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::new()
            .with_filter_from_leaf_rows(false)
            .with_max_leaf_row_filter_depth(100)
    }

    fn get_default_column_def(&self) -> ColumnDef<T> {
        ColumnDef {
            filter_fn: Some(StrategyRef::Auto),
            ..ColumnDef::default()
        }
    }

    fn create_row(&self, row: &mut Row<T>, _table: &Table<T>) {
        row.filtering = Some(RowFiltering::default());
    }
}

/// Filter outcome of every pre-filtered row.
pub(crate) struct RowFilterResults {
    pub(crate) by_row: HashMap<String, RowFiltering>,
    /// Filter ids a row must not fail: active column filters, then the
    /// global filter id when it applies.
    pub(crate) filterable_ids: Vec<String>,
}

impl RowFilterResults {
    pub(crate) fn is_empty(&self) -> bool {
        self.filterable_ids.is_empty()
    }

    /// Returns `false` when the row failed any of `ids`.
    pub(crate) fn passes(&self, row_id: &str, ids: &[String]) -> bool {
        self.by_row.get(row_id).is_none_or(|filtering| filtering.passes(ids))
    }
}

/// JavaScript-style truthiness, used for the global filter value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0 && !f.is_nan(),
        other => !is_falsey(other),
    }
}

impl<T: RowData> Column<T> {
    /// Filter function inferred from the first core row's value.
    pub fn get_auto_filter_fn(&self, table: &Table<T>) -> Option<FilterFn<T>> {
        let value = table
            .get_core_row_model()
            .flat_rows
            .first()
            .map(|row| row.get_value(&self.id))
            .unwrap_or_default();
        builtin_filter_fn(infer_filter_fn_name(value.kind()))
    }

    /// Resolved filter function; `None` when a named function is unknown.
    pub fn get_filter_fn(&self, table: &Table<T>) -> Option<FilterFn<T>> {
        let strategy = self.column_def.filter_fn.clone().unwrap_or_default();
        strategy.resolve(|| self.get_auto_filter_fn(table), |name| table.lookup_filter_fn(name))
    }

    pub fn get_can_filter(&self, table: &Table<T>) -> bool {
        let config = table.config();
        self.column_def.enable_column_filter.unwrap_or(true)
            && config.enable_column_filters.unwrap_or(true)
            && config.enable_filters.unwrap_or(true)
            && self.accessor_fn.is_some()
    }

    pub fn get_is_filtered(&self, table: &Table<T>) -> bool {
        self.get_filter_index(table).is_some()
    }

    /// Active filter value of this column.
    pub fn get_filter_value(&self, table: &Table<T>) -> Option<Value> {
        table
            .get_state()
            .column_filters()
            .iter()
            .find(|filter| filter.id == self.id)
            .map(|filter| filter.value.clone())
    }

    /// Position of this column's filter in the filter list.
    pub fn get_filter_index(&self, table: &Table<T>) -> Option<usize> {
        table
            .get_state()
            .column_filters()
            .iter()
            .position(|filter| filter.id == self.id)
    }

    /// Sets, replaces or (for auto-removable values) removes this column's
    /// filter. A function updater receives the current value, or null.
    pub fn set_filter_value(&self, table: &Table<T>, value: impl Into<Updater<Value>>) {
        let filter_fn = self.get_filter_fn(table);
        let current = table.get_state().column_filters().to_vec();
        let previous = current.iter().find(|filter| filter.id == self.id);
        let next_value = value
            .into()
            .apply(previous.map(|filter| &filter.value).unwrap_or(&Value::Null));

        let next = if should_auto_remove(filter_fn.as_ref(), &next_value) {
            current.into_iter().filter(|filter| filter.id != self.id).collect()
        } else if previous.is_some() {
            current
                .into_iter()
                .map(|filter| {
                    if filter.id == self.id {
                        ColumnFilter::new(self.id.clone(), next_value.clone())
                    } else {
                        filter
                    }
                })
                .collect()
        } else {
            let mut next = current;
            next.push(ColumnFilter::new(self.id.clone(), next_value));
            next
        };
        table.set_column_filters(next);
    }
}

fn should_auto_remove<T: RowData>(filter_fn: Option<&FilterFn<T>>, value: &Value) -> bool {
    match filter_fn {
        Some(filter_fn) => filter_fn.should_auto_remove(value),
        None => is_falsey(value),
    }
}

impl<T: RowData> Table<T> {
    /// Looks a filter function up in the table registry, then the built-ins.
    pub(crate) fn lookup_filter_fn(&self, name: &str) -> Option<FilterFn<T>> {
        self.options()
            .filter_fns
            .get(name)
            .cloned()
            .or_else(|| builtin_filter_fn(name))
    }

    /// Replaces the column filters. Filters whose value their column's
    /// filter function would auto-remove are dropped.
    pub fn set_column_filters(&self, updater: impl Into<Updater<Vec<ColumnFilter>>>) {
        let current = self.get_state().column_filters().to_vec();
        let leaf_columns = self.get_all_leaf_columns();
        let next: Vec<ColumnFilter> = updater
            .into()
            .apply(&current)
            .into_iter()
            .filter(|filter| match leaf_columns.iter().find(|column| column.id == filter.id) {
                Some(column) => !should_auto_remove(column.get_filter_fn(self).as_ref(), &filter.value),
                None => true,
            })
            .collect();
        self.commit_slice(
            FeatureKind::ColumnFiltering,
            "columnFilters",
            next,
            |options| options.on_column_filters_change.clone(),
            |state, next| state.column_filters = Some(next),
        );
        self.auto_reset_page_index();
    }

    /// Restores the initial filters, or clears them with `default_state`.
    pub fn reset_column_filters(&self, default_state: bool) {
        let next = if default_state {
            Vec::new()
        } else {
            self.initial_state().column_filters().to_vec()
        };
        self.set_column_filters(next);
    }

    pub fn get_pre_filtered_row_model(&self) -> Rc<RowModel<T>> {
        self.get_core_row_model()
    }

    pub fn get_filtered_row_model(&self) -> Rc<RowModel<T>> {
        self.run_stage(
            "filtered",
            FeatureKind::ColumnFiltering,
            self.config().manual_filtering,
            |options| options.get_filtered_row_model.clone(),
            || self.get_pre_filtered_row_model(),
        )
    }

    /// Runs every active column filter and the global filter over the
    /// pre-filtered rows.
    ///
    /// # Panics
    ///
    /// Panics when an active filter names a function missing from both the
    /// table registry and the built-ins.
    pub(crate) fn get_row_filter_results(&self) -> Rc<RowFilterResults> {
        let state = self.get_state();
        let deps = (
            ById(self.get_pre_filtered_row_model()),
            ById(self.get_all_flat_columns()),
            state.column_filters().to_vec(),
            state.global_filter().clone(),
        );
        self.memo("getRowFilterResults", DebugFlag::Rows, deps, |(model, _, filters, global)| {
            self.compute_filter_results(&model.0, filters, global)
        })
    }

    fn compute_filter_results(&self, model: &RowModel<T>, filters: &[ColumnFilter], global: &Value) -> RowFilterResults {
        if model.is_empty() || (filters.is_empty() && !is_truthy(global)) {
            return RowFilterResults {
                by_row: HashMap::new(),
                filterable_ids: Vec::new(),
            };
        }

        let mut resolved_filters = Vec::new();
        for filter in filters {
            let Some(column) = self.get_column(&filter.id) else {
                continue;
            };
            let Some(filter_fn) = column.get_filter_fn(self) else {
                let name = column.column_def.filter_fn.as_ref().and_then(StrategyRef::name).unwrap_or_default();
                panic!("column '{}' references unknown filter function '{}'", column.id, name);
            };
            let value = filter_fn.resolve_filter_value(&filter.value);
            resolved_filters.push((filter.id.clone(), filter_fn, value));
        }
        let mut filterable_ids: Vec<String> = filters.iter().map(|filter| filter.id.clone()).collect();

        let mut global_filter = None;
        if is_truthy(global) {
            if let Some(filter_fn) = self.get_global_filter_fn() {
                let columns: Vec<String> = self
                    .get_all_leaf_columns()
                    .iter()
                    .filter(|column| column.get_can_global_filter(self))
                    .map(|column| column.id.clone())
                    .collect();
                if !columns.is_empty() {
                    filterable_ids.push(GLOBAL_FILTER_ID.to_string());
                    let value = filter_fn.resolve_filter_value(global);
                    global_filter = Some((filter_fn, value, columns));
                }
            }
        }

        let mut by_row = HashMap::with_capacity(model.flat_rows.len());
        for row in &model.flat_rows {
            let mut filtering = RowFiltering::default();
            for (id, filter_fn, value) in &resolved_filters {
                let mut meta = None;
                let pass = filter_fn.matches(row, id, value, &mut meta);
                filtering.column_filters.insert(id.clone(), pass);
                if let Some(meta) = meta {
                    filtering.column_filters_meta.insert(id.clone(), meta);
                }
            }
            if let Some((filter_fn, value, columns)) = &global_filter {
                let mut pass = false;
                for id in columns {
                    let mut meta = None;
                    let matched = filter_fn.matches(row, id, value, &mut meta);
                    if let Some(meta) = meta {
                        filtering.column_filters_meta.insert(id.clone(), meta);
                    }
                    if matched {
                        pass = true;
                        break;
                    }
                }
                filtering.column_filters.insert(GLOBAL_FILTER_ID.to_string(), pass);
            }
            by_row.insert(row.id.clone(), filtering);
        }
        log::trace!("filtered {} rows on {:?}", by_row.len(), filterable_ids);

        RowFilterResults {
            by_row,
            filterable_ids,
        }
    }
}
