//! Row selection

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::DebugFlag;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::core::Updater;
use crate::memo::ById;
use crate::model::RowData;

type Selection = BTreeMap<String, bool>;

/// Select rows, with optional propagation to sub rows.
pub struct RowSelection;

impl<T: RowData> TableFeature<T> for RowSelection {
    fn name(&self) -> &'static str {
        "RowSelection"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::RowSelection)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            row_selection: Some(BTreeMap::new()),
            ..TableState::default()
        }
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::new()
            .with_enable_row_selection(true)
            .with_enable_multi_row_selection(true)
            .with_enable_sub_row_selection(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubRowSelection {
    None,
    Some,
    All,
}

fn is_row_selected<T>(row: &Row<T>, selection: &Selection) -> bool {
    selection.get(&row.id).copied().unwrap_or(false)
}

/// How many selectable descendants of `row` are selected.
fn sub_row_selection<T: RowData>(row: &Row<T>, selection: &Selection, table: &Table<T>) -> SubRowSelection {
    if row.sub_rows.is_empty() {
        return SubRowSelection::None;
    }
    let mut all_selected = true;
    let mut some_selected = false;
    for sub_row in &row.sub_rows {
        if some_selected && !all_selected {
            break;
        }
        if sub_row.get_can_select(table) {
            if is_row_selected(sub_row, selection) {
                some_selected = true;
            } else {
                all_selected = false;
            }
        }
        if !sub_row.sub_rows.is_empty() {
            match sub_row_selection(sub_row, selection, table) {
                SubRowSelection::All => some_selected = true,
                SubRowSelection::Some => {
                    some_selected = true;
                    all_selected = false;
                }
                SubRowSelection::None => all_selected = false,
            }
        }
    }
    if all_selected {
        SubRowSelection::All
    } else if some_selected {
        SubRowSelection::Some
    } else {
        SubRowSelection::None
    }
}

/// Selects or deselects `row` in `selection`, then its sub rows when
/// `include_children` holds and the row allows it. Selecting a row that
/// cannot multi-select clears the rest of the selection first.
fn mutate_row_is_selected<T: RowData>(
    selection: &mut Selection,
    row: &Row<T>,
    value: bool,
    include_children: bool,
    table: &Table<T>,
) {
    if value {
        if !row.get_can_multi_select(table) {
            selection.clear();
        }
        if row.get_can_select(table) {
            selection.insert(row.id.clone(), true);
        }
    } else {
        selection.remove(&row.id);
    }
    if include_children && !row.sub_rows.is_empty() && row.get_can_select_sub_rows(table) {
        for sub_row in &row.sub_rows {
            mutate_row_is_selected(selection, sub_row, value, include_children, table);
        }
    }
}

/// Keeps the selected rows of `model`. Top-level rows keep only their
/// selected sub rows; `flat_rows` lists every selected row.
fn select_rows<T: RowData>(table: &Table<T>, model: &RowModel<T>, selection: &Selection) -> RowModel<T> {
    fn recurse<T: RowData>(
        table: &Table<T>,
        rows: &[Rc<Row<T>>],
        selection: &Selection,
        flat_rows: &mut Vec<Rc<Row<T>>>,
        rows_by_id: &mut HashMap<String, Rc<Row<T>>>,
    ) -> Vec<Rc<Row<T>>> {
        let mut kept = Vec::new();
        for row in rows {
            let selected = is_row_selected(row, selection);
            if selected {
                flat_rows.push(row.clone());
                rows_by_id.insert(row.id.clone(), row.clone());
            }
            let row = if row.sub_rows.is_empty() {
                row.clone()
            } else {
                let sub_rows = recurse(table, &row.sub_rows, selection, flat_rows, rows_by_id);
                Rc::new(row.derive(table, row.depth, row.parent_id.clone(), sub_rows))
            };
            if selected {
                kept.push(row);
            }
        }
        kept
    }

    let mut flat_rows = Vec::new();
    let mut rows_by_id = HashMap::new();
    let rows = recurse(table, &model.rows, selection, &mut flat_rows, &mut rows_by_id);
    RowModel {
        rows,
        flat_rows,
        rows_by_id,
    }
}

impl<T: RowData> Row<T> {
    /// Selects or deselects this row; `None` flips it. With
    /// `select_children` the change also applies to the sub rows.
    pub fn toggle_selected(&self, table: &Table<T>, value: Option<bool>, select_children: bool) {
        let is_selected = self.get_is_selected(table);
        let value = value.unwrap_or(!is_selected);
        if self.get_can_select(table) && is_selected == value {
            return;
        }
        let mut selection = table.get_state().row_selection().clone();
        mutate_row_is_selected(&mut selection, self, value, select_children, table);
        table.set_row_selection(selection);
    }

    pub fn get_is_selected(&self, table: &Table<T>) -> bool {
        is_row_selected(self, table.get_state().row_selection())
    }

    /// Some but not all selectable descendants are selected.
    pub fn get_is_some_selected(&self, table: &Table<T>) -> bool {
        let state = table.get_state();
        sub_row_selection(self, state.row_selection(), table) == SubRowSelection::Some
    }

    pub fn get_is_all_sub_rows_selected(&self, table: &Table<T>) -> bool {
        let state = table.get_state();
        sub_row_selection(self, state.row_selection(), table) == SubRowSelection::All
    }

    pub fn get_can_select(&self, table: &Table<T>) -> bool {
        match table.options().can_select_row.clone() {
            Some(predicate) => predicate(self),
            None => table.config().enable_row_selection.unwrap_or(true),
        }
    }

    pub fn get_can_select_sub_rows(&self, table: &Table<T>) -> bool {
        match table.options().can_select_sub_rows.clone() {
            Some(predicate) => predicate(self),
            None => table.config().enable_sub_row_selection.unwrap_or(true),
        }
    }

    pub fn get_can_multi_select(&self, table: &Table<T>) -> bool {
        match table.options().can_multi_select_row.clone() {
            Some(predicate) => predicate(self),
            None => table.config().enable_multi_row_selection.unwrap_or(true),
        }
    }
}

impl<T: RowData> Table<T> {
    pub fn set_row_selection(&self, updater: impl Into<Updater<Selection>>) {
        let next = updater.into().apply(self.get_state().row_selection());
        self.commit_slice(
            FeatureKind::RowSelection,
            "rowSelection",
            next,
            |options| options.on_row_selection_change.clone(),
            |state, next| state.row_selection = Some(next),
        );
    }

    pub fn reset_row_selection(&self, default_state: bool) {
        let next = if default_state {
            BTreeMap::new()
        } else {
            self.initial_state().row_selection().clone()
        };
        self.set_row_selection(next);
    }

    /// Selects every selectable row before grouping, or deselects every
    /// row; `None` flips between the two.
    pub fn toggle_all_rows_selected(&self, value: Option<bool>) {
        let value = value.unwrap_or_else(|| !self.get_is_all_rows_selected());
        let mut selection = self.get_state().row_selection().clone();
        for row in &self.get_pre_grouped_row_model().flat_rows {
            if !value {
                selection.remove(&row.id);
            } else if row.get_can_select(self) {
                selection.insert(row.id.clone(), true);
            }
        }
        self.set_row_selection(selection);
    }

    /// Selects or deselects the displayed rows and their sub rows.
    pub fn toggle_all_page_rows_selected(&self, value: Option<bool>) {
        let value = value.unwrap_or_else(|| !self.get_is_all_page_rows_selected());
        let mut selection = self.get_state().row_selection().clone();
        for row in &self.get_row_model().rows {
            mutate_row_is_selected(&mut selection, row, value, true, self);
        }
        self.set_row_selection(selection);
    }

    pub fn get_pre_selected_row_model(&self) -> Rc<RowModel<T>> {
        self.get_core_row_model()
    }

    fn selected_rows_of(&self, key: &'static str, model: Rc<RowModel<T>>) -> Rc<RowModel<T>> {
        let state = self.get_state();
        let deps = (state.row_selection().clone(), ById(model));
        self.memo(key, DebugFlag::Table, deps, |(selection, model)| {
            if selection.is_empty() {
                return RowModel::default();
            }
            select_rows(self, &model.0, selection)
        })
    }

    /// Selected core rows.
    pub fn get_selected_row_model(&self) -> Rc<RowModel<T>> {
        self.selected_rows_of("getSelectedRowModel", self.get_core_row_model())
    }

    /// Selected rows that pass the filters.
    pub fn get_filtered_selected_row_model(&self) -> Rc<RowModel<T>> {
        self.selected_rows_of("getFilteredSelectedRowModel", self.get_filtered_row_model())
    }

    /// Selected rows of the sorted, pre-grouping stage.
    pub fn get_grouped_selected_row_model(&self) -> Rc<RowModel<T>> {
        self.selected_rows_of("getGroupedSelectedRowModel", self.get_sorted_row_model())
    }

    /// Every selectable filtered row is selected.
    pub fn get_is_all_rows_selected(&self) -> bool {
        let state = self.get_state();
        let selection = state.row_selection();
        let model = self.get_filtered_row_model();
        if model.flat_rows.is_empty() || selection.is_empty() {
            return false;
        }
        !model
            .flat_rows
            .iter()
            .any(|row| row.get_can_select(self) && !is_row_selected(row, selection))
    }

    /// Every selectable displayed row is selected.
    pub fn get_is_all_page_rows_selected(&self) -> bool {
        let state = self.get_state();
        let selection = state.row_selection();
        let model = self.get_pagination_row_model();
        let mut selectable = model.flat_rows.iter().filter(|row| row.get_can_select(self)).peekable();
        if selectable.peek().is_none() {
            return false;
        }
        selectable.all(|row| is_row_selected(row, selection))
    }

    /// Some, but not all, filtered rows are selected.
    pub fn get_is_some_rows_selected(&self) -> bool {
        let total = self.get_state().row_selection().len();
        total > 0 && total < self.get_filtered_row_model().flat_rows.len()
    }

    pub fn get_is_some_page_rows_selected(&self) -> bool {
        if self.get_is_all_page_rows_selected() {
            return false;
        }
        self.get_pagination_row_model()
            .flat_rows
            .iter()
            .filter(|row| row.get_can_select(self))
            .any(|row| row.get_is_selected(self) || row.get_is_some_selected(self))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::ColumnDef;
    use crate::core::TableOptions;
    use crate::Table;

    fn tree_table() -> Table<serde_json::Value> {
        let data = vec![
            json!({"id": "a", "children": [{"id": "a1"}, {"id": "a2"}]}),
            json!({"id": "b"}),
        ];
        let options = TableOptions::new(data, vec![ColumnDef::accessor("id")])
            .with_row_id(|row: &serde_json::Value, _, _| row["id"].as_str().unwrap_or_default().to_string())
            .with_sub_rows(|row: &serde_json::Value, _| row["children"].as_array().cloned());
        Table::new(options).unwrap()
    }

    #[test]
    fn test_selecting_parent_selects_children() {
        let table = tree_table();
        let parent = table.get_row("a", true).unwrap();
        parent.toggle_selected(&table, Some(true), true);
        let selection = table.get_state().row_selection().clone();
        assert_eq!(selection.keys().collect::<Vec<_>>(), vec!["a", "a1", "a2"]);
        assert!(parent.get_is_all_sub_rows_selected(&table));
    }

    #[test]
    fn test_partial_children_report_some_selected() {
        let table = tree_table();
        table.get_row("a1", true).unwrap().toggle_selected(&table, Some(true), true);
        let parent = table.get_row("a", true).unwrap();
        assert!(parent.get_is_some_selected(&table));
        assert!(!parent.get_is_selected(&table));
        assert!(table.get_is_some_rows_selected());
    }

    #[test]
    fn test_single_select_clears_previous() {
        let data = vec![json!({"id": "x"}), json!({"id": "y"})];
        let options = TableOptions::new(data, vec![ColumnDef::accessor("id")])
            .with_row_id(|row: &serde_json::Value, _, _| row["id"].as_str().unwrap_or_default().to_string())
            .with_config(crate::TableConfig::new().with_enable_multi_row_selection(false));
        let table = Table::new(options).unwrap();
        table.get_row("x", true).unwrap().toggle_selected(&table, Some(true), true);
        table.get_row("y", true).unwrap().toggle_selected(&table, Some(true), true);
        let selection = table.get_state().row_selection().clone();
        assert_eq!(selection.keys().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_selected_row_model_keeps_selected_sub_rows() {
        let table = tree_table();
        table.toggle_all_rows_selected(Some(true));
        table.get_row("a2", true).unwrap().toggle_selected(&table, Some(false), true);
        let selected = table.get_selected_row_model();
        assert_eq!(selected.row_ids(), vec!["a", "b"]);
        assert_eq!(selected.rows[0].sub_rows().len(), 1);
        assert_eq!(selected.flat_rows.len(), 3);
    }
}
