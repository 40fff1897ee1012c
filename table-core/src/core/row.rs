//! Row entity

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::Cell;
use super::Column;
use super::ColumnAccessors;
use super::Table;
use crate::features::FeatureKind;
use crate::features::FeatureSet;
use crate::fns::AggregationFn;
use crate::memo::ById;
use crate::memo::Memo;
use crate::memo::MemoOptions;
use crate::model::RowData;
use crate::model::Value;

type CellsMemo<T> = Memo<ById<Rc<Vec<Rc<Column<T>>>>>, Vec<Rc<Cell<T>>>>;

/// Per-row filter outcome, filled by the filtered stage.
#[derive(Debug, Clone, Default)]
pub struct RowFiltering {
    /// Column id (or the global filter id) to pass/fail.
    pub column_filters: HashMap<String, bool>,
    /// Meta values recorded by filter functions, such as fuzzy scores.
    pub column_filters_meta: HashMap<String, Value>,
}

impl RowFiltering {
    /// Returns `false` when any of `ids` failed on this row.
    pub fn passes(&self, ids: &[String]) -> bool {
        ids.iter().all(|id| self.column_filters.get(id) != Some(&false))
    }
}

/// Synthetic group-row data.
#[derive(Clone)]
pub struct GroupInfo<T> {
    pub grouping_column_id: String,
    pub grouping_value: Value,
    /// Every data row below the group, at any depth.
    pub leaf_rows: Vec<Rc<Row<T>>>,
    /// Direct children: the next level of groups, or the data rows below
    /// the last grouped column.
    pub grouped_rows: Vec<Rc<Row<T>>>,
    pub(crate) grouped_columns: Rc<Vec<String>>,
    pub(crate) aggregators: Rc<HashMap<String, AggregationFn<T>>>,
}

impl<T: RowData> GroupInfo<T> {
    fn value(&self, column_id: &str) -> Value {
        if self.grouped_columns.iter().any(|id| id == column_id) {
            return self
                .grouped_rows
                .first()
                .map(|row| row.get_value(column_id))
                .unwrap_or_default();
        }
        match self.aggregators.get(column_id) {
            Some(aggregate) => aggregate(column_id, &self.leaf_rows, &self.grouped_rows),
            None => Value::Null,
        }
    }
}

/// Grouping capability of a row.
#[derive(Clone)]
pub struct RowGrouping<T> {
    values_cache: RefCell<HashMap<String, Value>>,
    pub(crate) group: Option<GroupInfo<T>>,
}

impl<T> Default for RowGrouping<T> {
    fn default() -> Self {
        Self {
            values_cache: RefCell::new(HashMap::new()),
            group: None,
        }
    }
}

/// One data record (or synthesized group) at one pipeline stage.
///
/// Rows are immutable once built. A stage that changes membership or
/// hierarchy derives new rows sharing the same id and original record.
pub struct Row<T> {
    pub(crate) id: String,
    pub(crate) index: usize,
    pub(crate) depth: usize,
    pub(crate) original: Rc<T>,
    pub(crate) original_sub_rows: Option<Vec<Rc<T>>>,
    pub(crate) parent_id: Option<String>,
    pub(crate) sub_rows: Vec<Rc<Row<T>>>,
    pub(crate) features: FeatureSet,
    pub(crate) filtering: Option<RowFiltering>,
    pub(crate) grouping: Option<RowGrouping<T>>,
    accessors: Rc<ColumnAccessors<T>>,
    values_cache: RefCell<HashMap<String, Value>>,
    unique_values_cache: RefCell<HashMap<String, Vec<Value>>>,
    cells: CellsMemo<T>,
}

impl<T> fmt::Debug for Row<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("depth", &self.depth)
            .field("parent_id", &self.parent_id)
            .field("sub_rows", &self.sub_rows.len())
            .finish()
    }
}

impl<T: RowData> Row<T> {
    pub(crate) fn new(
        id: String,
        original: Rc<T>,
        index: usize,
        depth: usize,
        parent_id: Option<String>,
        accessors: Rc<ColumnAccessors<T>>,
        cells_memo: MemoOptions,
    ) -> Self {
        Self {
            id,
            index,
            depth,
            original,
            original_sub_rows: None,
            parent_id,
            sub_rows: Vec::new(),
            features: FeatureSet::default(),
            filtering: None,
            grouping: None,
            accessors,
            values_cache: RefCell::new(HashMap::new()),
            unique_values_cache: RefCell::new(HashMap::new()),
            cells: Memo::new(cells_memo),
        }
    }

    /// Copy of this row for a later stage, with new position and sub rows.
    ///
    /// Feature hooks run again; filter flags, grouping data and cached values
    /// carry over.
    pub(crate) fn derive(
        &self,
        table: &Table<T>,
        depth: usize,
        parent_id: Option<String>,
        sub_rows: Vec<Rc<Row<T>>>,
    ) -> Row<T> {
        let mut row = table.create_row(self.id.clone(), self.original.clone(), self.index, depth, parent_id);
        row.original_sub_rows = self.original_sub_rows.clone();
        row.sub_rows = sub_rows;
        if row.filtering.is_some() {
            row.filtering = self.filtering.clone();
        }
        if row.grouping.is_some() {
            row.grouping = self.grouping.clone();
        }
        *row.values_cache.borrow_mut() = self.values_cache.borrow().clone();
        row
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position among its siblings in the source data.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn original(&self) -> &T {
        &self.original
    }

    /// Records returned by the sub-row accessor, if any.
    pub fn original_sub_rows(&self) -> Option<&[Rc<T>]> {
        self.original_sub_rows.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn sub_rows(&self) -> &[Rc<Row<T>>] {
        &self.sub_rows
    }

    /// Returns `true` when `kind` augmented this row.
    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.contains(kind)
    }

    /// Value of a column for this row; null for unknown or unbound columns.
    ///
    /// Group rows report the shared value for grouped columns and the
    /// aggregate for the others.
    pub fn get_value(&self, column_id: &str) -> Value {
        let cached = self.values_cache.borrow().get(column_id).cloned();
        if let Some(value) = cached {
            return value;
        }
        let value = match self.group() {
            Some(group) => group.value(column_id),
            None => match self.accessors.accessor(column_id) {
                Some(accessor) => accessor(&self.original, self.index),
                None => return Value::Null,
            },
        };
        self.values_cache.borrow_mut().insert(column_id.to_string(), value.clone());
        value
    }

    /// Facet values of a column for this row: the column's unique-values
    /// function, else the single cell value. Empty for unbound columns.
    pub fn get_unique_values(&self, column_id: &str) -> Vec<Value> {
        let cached = self.unique_values_cache.borrow().get(column_id).cloned();
        if let Some(values) = cached {
            return values;
        }
        if !self.accessors.is_bound(column_id) {
            return Vec::new();
        }
        let values = match self.accessors.unique_values(column_id) {
            Some(unique_values) => unique_values(&self.original, self.index),
            None => vec![self.get_value(column_id)],
        };
        self.unique_values_cache
            .borrow_mut()
            .insert(column_id.to_string(), values.clone());
        values
    }

    /// Cell value, or the table's fallback value when it is null.
    pub fn render_value(&self, table: &Table<T>, column_id: &str) -> Value {
        let value = self.get_value(column_id);
        if value.is_null() {
            return table.config().render_fallback_value.clone().unwrap_or_default();
        }
        value
    }

    /// One cell per leaf column, in leaf column order.
    pub fn get_all_cells(self: &Rc<Self>, table: &Table<T>) -> Rc<Vec<Rc<Cell<T>>>> {
        let columns = table.get_all_leaf_columns();
        self.cells.get(ById(columns), |columns| {
            columns
                .0
                .iter()
                .map(|column| Rc::new(table.create_cell(self, column.clone())))
                .collect()
        })
    }

    pub fn get_all_cells_by_column_id(self: &Rc<Self>, table: &Table<T>) -> HashMap<String, Rc<Cell<T>>> {
        self.get_all_cells(table)
            .iter()
            .map(|cell| (cell.column().id().to_string(), cell.clone()))
            .collect()
    }

    /// Every descendant row, depth first.
    pub fn get_leaf_rows(&self) -> Vec<Rc<Row<T>>> {
        let mut leaf_rows = Vec::new();
        collect_descendants(&self.sub_rows, &mut leaf_rows);
        leaf_rows
    }

    pub fn get_parent_row(&self, table: &Table<T>) -> Option<Rc<Row<T>>> {
        let parent_id = self.parent_id.as_deref()?;
        table.get_row(parent_id, true).ok()
    }

    /// Ancestors from the root down to the direct parent.
    pub fn get_parent_rows(&self, table: &Table<T>) -> Vec<Rc<Row<T>>> {
        let mut parents = Vec::new();
        let mut current = self.get_parent_row(table);
        while let Some(parent) = current {
            current = parent.get_parent_row(table);
            parents.push(parent);
        }
        parents.reverse();
        parents
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Pass/fail per filter id, set by the filtered stage.
    pub fn column_filters(&self) -> Option<&HashMap<String, bool>> {
        self.filtering.as_ref().map(|filtering| &filtering.column_filters)
    }

    /// Meta values recorded by filter functions.
    pub fn column_filters_meta(&self) -> Option<&HashMap<String, Value>> {
        self.filtering.as_ref().map(|filtering| &filtering.column_filters_meta)
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    pub(crate) fn group(&self) -> Option<&GroupInfo<T>> {
        self.grouping.as_ref().and_then(|grouping| grouping.group.as_ref())
    }

    pub(crate) fn set_group(&mut self, group: GroupInfo<T>) {
        self.grouping.get_or_insert_with(RowGrouping::default).group = Some(group);
    }

    /// Returns `true` for synthesized group rows.
    pub fn get_is_grouped(&self) -> bool {
        self.group().is_some()
    }

    pub fn grouping_column_id(&self) -> Option<&str> {
        self.group().map(|group| group.grouping_column_id.as_str())
    }

    pub fn grouping_value(&self) -> Option<&Value> {
        self.group().map(|group| &group.grouping_value)
    }

    /// Leaf rows of a group row; empty for data rows.
    pub fn leaf_rows(&self) -> &[Rc<Row<T>>] {
        self.group().map(|group| group.leaf_rows.as_slice()).unwrap_or(&[])
    }

    /// Value this row is grouped by for a column: the column's grouping
    /// function, else the cell value.
    pub fn get_grouping_value(&self, column_id: &str) -> Value {
        if let Some(grouping) = &self.grouping {
            let cached = grouping.values_cache.borrow().get(column_id).cloned();
            if let Some(value) = cached {
                return value;
            }
        }
        let value = match self.accessors.grouping_value(column_id) {
            Some(grouping_value) => grouping_value(&self.original),
            None => self.get_value(column_id),
        };
        if let Some(grouping) = &self.grouping {
            grouping
                .values_cache
                .borrow_mut()
                .insert(column_id.to_string(), value.clone());
        }
        value
    }
}

fn collect_descendants<T>(rows: &[Rc<Row<T>>], out: &mut Vec<Rc<Row<T>>>) {
    for row in rows {
        out.push(row.clone());
        collect_descendants(&row.sub_rows, out);
    }
}
