//! Row sorting

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::ColumnDef;
use crate::core::ColumnSort;
use crate::core::RowModel;
use crate::core::SortDirection;
use crate::core::SortUndefined;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::fns::SortingFn;
use crate::fns::StrategyRef;
use crate::fns::builtin_sorting_fn;
use crate::fns::infer_sorting_fn_name;
use crate::model::RowData;
use crate::model::Value;

/// Rows inspected when inferring a sorting function.
const AUTO_SORT_SAMPLE: usize = 10;

/// Multi-key row sorting.
pub struct RowSorting;

impl<T: RowData> TableFeature<T> for RowSorting {
    fn name(&self) -> &'static str {
        "RowSorting"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::RowSorting)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            sorting: Some(Vec::new()),
            ..TableState::default()
        }
    }

    fn get_default_column_def(&self) -> ColumnDef<T> {
        ColumnDef {
            sorting_fn: Some(StrategyRef::Auto),
            sort_undefined: Some(SortUndefined::Greater),
            ..ColumnDef::default()
        }
    }
}

impl<T: RowData> Column<T> {
    /// Sorting function inferred from the first filtered rows.
    pub fn get_auto_sorting_fn(&self, table: &Table<T>) -> Option<SortingFn<T>> {
        let model = table.get_filtered_row_model();
        let values: Vec<Value> = model
            .flat_rows
            .iter()
            .take(AUTO_SORT_SAMPLE)
            .map(|row| row.get_value(&self.id))
            .collect();
        builtin_sorting_fn(infer_sorting_fn_name(&values))
    }

    /// Resolved sorting function; `None` when a named function is unknown.
    pub fn get_sorting_fn(&self, table: &Table<T>) -> Option<SortingFn<T>> {
        let strategy = self.column_def.sorting_fn.clone().unwrap_or_default();
        strategy.resolve(|| self.get_auto_sorting_fn(table), |name| table.lookup_sorting_fn(name))
    }

    /// Ascending for text columns, descending otherwise.
    pub fn get_auto_sort_dir(&self, table: &Table<T>) -> SortDirection {
        let model = table.get_filtered_row_model();
        match model.flat_rows.first().map(|row| row.get_value(&self.id)) {
            Some(Value::String(_)) => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    /// Direction of the first toggle.
    pub fn get_first_sort_dir(&self, table: &Table<T>) -> SortDirection {
        let desc_first = self
            .column_def
            .sort_desc_first
            .or(table.config().sort_desc_first)
            .unwrap_or_else(|| self.get_auto_sort_dir(table) == SortDirection::Desc);
        if desc_first {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// Direction the next toggle applies; `None` when it removes the sort.
    pub fn get_next_sorting_order(&self, table: &Table<T>, multi: bool) -> Option<SortDirection> {
        let first = self.get_first_sort_dir(table);
        let Some(current) = self.get_is_sorted(table) else {
            return Some(first);
        };
        let config = table.config();
        let removal = config.enable_sorting_removal.unwrap_or(true)
            && (!multi || config.enable_multi_remove.unwrap_or(true));
        if current != first && removal {
            return None;
        }
        match current {
            SortDirection::Desc => Some(SortDirection::Asc),
            SortDirection::Asc => Some(SortDirection::Desc),
        }
    }

    pub fn get_can_sort(&self, table: &Table<T>) -> bool {
        self.column_def.enable_sorting.unwrap_or(true)
            && table.config().enable_sorting.unwrap_or(true)
            && self.accessor_fn.is_some()
    }

    pub fn get_can_multi_sort(&self, table: &Table<T>) -> bool {
        self.column_def
            .enable_multi_sort
            .or(table.config().enable_multi_sort)
            .unwrap_or(self.accessor_fn.is_some())
    }

    pub fn get_is_sorted(&self, table: &Table<T>) -> Option<SortDirection> {
        table
            .get_state()
            .sorting()
            .iter()
            .find(|sort| sort.id == self.id)
            .map(|sort| if sort.desc { SortDirection::Desc } else { SortDirection::Asc })
    }

    pub fn get_sort_index(&self, table: &Table<T>) -> Option<usize> {
        table.get_state().sorting().iter().position(|sort| sort.id == self.id)
    }

    /// Adds, flips, removes or replaces this column's sort.
    ///
    /// `desc` forces a direction. With `multi` (and multi-sort allowed) the
    /// column is added to or toggled within the existing sort list; without
    /// it the column becomes the only sort key unless it already is the last.
    pub fn toggle_sorting(&self, table: &Table<T>, desc: Option<bool>, multi: bool) {
        enum Action {
            Add,
            Toggle,
            Remove,
            Replace,
        }

        let next_order = self.get_next_sorting_order(table, multi);
        let old = table.get_state().sorting().to_vec();
        let existing = old.iter().position(|sort| sort.id == self.id);
        let next_desc = desc.unwrap_or(next_order == Some(SortDirection::Desc));

        let mut action = if !old.is_empty() && self.get_can_multi_sort(table) && multi {
            if existing.is_some() { Action::Toggle } else { Action::Add }
        } else if !old.is_empty() && existing.is_some_and(|index| index != old.len() - 1) {
            Action::Replace
        } else if existing.is_some() {
            Action::Toggle
        } else {
            Action::Replace
        };
        if matches!(action, Action::Toggle) && desc.is_none() && next_order.is_none() {
            action = Action::Remove;
        }

        let next = match action {
            Action::Add => {
                let mut next = old;
                next.push(ColumnSort {
                    id: self.id.clone(),
                    desc: next_desc,
                });
                let max = table.config().max_multi_sort_col_count.unwrap_or(usize::MAX);
                let excess = next.len().saturating_sub(max);
                next.drain(..excess);
                next
            }
            Action::Toggle => old
                .into_iter()
                .map(|sort| {
                    if sort.id == self.id {
                        ColumnSort {
                            id: sort.id,
                            desc: next_desc,
                        }
                    } else {
                        sort
                    }
                })
                .collect(),
            Action::Remove => old.into_iter().filter(|sort| sort.id != self.id).collect(),
            Action::Replace => vec![ColumnSort {
                id: self.id.clone(),
                desc: next_desc,
            }],
        };
        table.set_sorting(next);
    }

    /// Removes this column from the sort list.
    pub fn clear_sorting(&self, table: &Table<T>) {
        let id = self.id.clone();
        table.set_sorting(Updater::with(move |old: &Vec<ColumnSort>| {
            old.iter().filter(|sort| sort.id != id).cloned().collect()
        }));
    }
}

impl<T: RowData> Table<T> {
    pub(crate) fn lookup_sorting_fn(&self, name: &str) -> Option<SortingFn<T>> {
        self.options()
            .sorting_fns
            .get(name)
            .cloned()
            .or_else(|| builtin_sorting_fn(name))
    }

    pub fn set_sorting(&self, updater: impl Into<Updater<Vec<ColumnSort>>>) {
        let next = updater.into().apply(&self.get_state().sorting().to_vec());
        self.commit_slice(
            FeatureKind::RowSorting,
            "sorting",
            next,
            |options| options.on_sorting_change.clone(),
            |state, next| state.sorting = Some(next),
        );
        self.auto_reset_page_index();
    }

    /// Restores the initial sorting, or clears it with `default_state`.
    pub fn reset_sorting(&self, default_state: bool) {
        let next = if default_state {
            Vec::new()
        } else {
            self.initial_state().sorting().to_vec()
        };
        self.set_sorting(next);
    }

    pub fn get_pre_sorted_row_model(&self) -> Rc<RowModel<T>> {
        self.get_filtered_row_model()
    }

    pub fn get_sorted_row_model(&self) -> Rc<RowModel<T>> {
        self.run_stage(
            "sorted",
            FeatureKind::RowSorting,
            self.config().manual_sorting,
            |options| options.get_sorted_row_model.clone(),
            || self.get_pre_sorted_row_model(),
        )
    }
}
