//! Column entity and the column tree

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::AccessorFn;
use super::ColumnDef;
use super::GroupingValueFn;
use super::Table;
use super::UniqueValuesFn;
use crate::features::FacetSlots;
use crate::features::FeatureKind;
use crate::features::FeatureSet;
use crate::model::RowData;

struct ColumnAccess<T> {
    accessor: Option<AccessorFn<T>>,
    unique_values: Option<UniqueValuesFn<T>>,
    grouping_value: Option<GroupingValueFn<T>>,
}

/// Value accessors of every column, keyed by column id.
///
/// Rows hold this map instead of a reference to the table.
pub struct ColumnAccessors<T> {
    by_id: HashMap<String, ColumnAccess<T>>,
}

impl<T> Default for ColumnAccessors<T> {
    fn default() -> Self {
        Self { by_id: HashMap::new() }
    }
}

impl<T> ColumnAccessors<T> {
    pub(crate) fn insert(&mut self, id: String, column_def: &ColumnDef<T>, accessor: Option<AccessorFn<T>>) {
        self.by_id.insert(
            id,
            ColumnAccess {
                accessor,
                unique_values: column_def.get_unique_values.clone(),
                grouping_value: column_def.get_grouping_value.clone(),
            },
        );
    }

    pub(crate) fn accessor(&self, id: &str) -> Option<&AccessorFn<T>> {
        self.by_id.get(id).and_then(|access| access.accessor.as_ref())
    }

    pub(crate) fn is_bound(&self, id: &str) -> bool {
        self.accessor(id).is_some()
    }

    pub(crate) fn unique_values(&self, id: &str) -> Option<&UniqueValuesFn<T>> {
        self.by_id.get(id).and_then(|access| access.unique_values.as_ref())
    }

    pub(crate) fn grouping_value(&self, id: &str) -> Option<&GroupingValueFn<T>> {
        self.by_id.get(id).and_then(|access| access.grouping_value.as_ref())
    }
}

/// Columns built from the definitions, in every shape the table needs.
pub struct ColumnTree<T> {
    /// Top-level columns.
    pub(crate) all: Rc<Vec<Rc<Column<T>>>>,
    /// Every column, parents before children.
    pub(crate) flat: Rc<Vec<Rc<Column<T>>>>,
    /// Leaf columns in definition order (before column ordering).
    pub(crate) leaf: Rc<Vec<Rc<Column<T>>>>,
    pub(crate) by_id: HashMap<String, Rc<Column<T>>>,
    pub(crate) accessors: Rc<ColumnAccessors<T>>,
}

impl<T> Default for ColumnTree<T> {
    fn default() -> Self {
        Self {
            all: Rc::new(Vec::new()),
            flat: Rc::new(Vec::new()),
            leaf: Rc::new(Vec::new()),
            by_id: HashMap::new(),
            accessors: Rc::new(ColumnAccessors::default()),
        }
    }
}

impl<T> ColumnTree<T> {
    pub(crate) fn new(all: Vec<Rc<Column<T>>>, accessors: ColumnAccessors<T>) -> Self {
        let mut flat = Vec::new();
        let mut leaf = Vec::new();
        collect_columns(&all, &mut flat, &mut leaf);
        let by_id = flat.iter().map(|column| (column.id.clone(), column.clone())).collect();
        Self {
            all: Rc::new(all),
            flat: Rc::new(flat),
            leaf: Rc::new(leaf),
            by_id,
            accessors: Rc::new(accessors),
        }
    }
}

fn collect_columns<T>(columns: &[Rc<Column<T>>], flat: &mut Vec<Rc<Column<T>>>, leaf: &mut Vec<Rc<Column<T>>>) {
    for column in columns {
        flat.push(column.clone());
        if column.columns.is_empty() {
            leaf.push(column.clone());
        } else {
            collect_columns(&column.columns, flat, leaf);
        }
    }
}

/// A column built from a resolved definition.
pub struct Column<T> {
    pub(crate) id: String,
    pub(crate) depth: usize,
    pub(crate) column_def: ColumnDef<T>,
    pub(crate) accessor_fn: Option<AccessorFn<T>>,
    pub(crate) columns: Vec<Rc<Column<T>>>,
    pub(crate) parent_id: Option<String>,
    pub(crate) features: FeatureSet,
    pub(crate) faceting: Option<FacetSlots<T>>,
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("parent_id", &self.parent_id)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<T: RowData> Column<T> {
    pub(crate) fn new(
        id: String,
        depth: usize,
        column_def: ColumnDef<T>,
        columns: Vec<Rc<Column<T>>>,
        parent_id: Option<String>,
    ) -> Self {
        let accessor_fn = column_def.accessor.to_fn();
        Self {
            id,
            depth,
            column_def,
            accessor_fn,
            columns,
            parent_id,
            features: FeatureSet::default(),
            faceting: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nesting level; top-level columns are at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Definition merged over the feature and table defaults.
    pub fn column_def(&self) -> &ColumnDef<T> {
        &self.column_def
    }

    pub fn accessor_fn(&self) -> Option<&AccessorFn<T>> {
        self.accessor_fn.as_ref()
    }

    /// Direct child columns.
    pub fn columns(&self) -> &[Rc<Column<T>>] {
        &self.columns
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.contains(kind)
    }

    /// This column followed by all of its descendants.
    pub fn get_flat_columns(self: &Rc<Self>) -> Vec<Rc<Column<T>>> {
        let mut flat = Vec::new();
        collect_columns(std::slice::from_ref(self), &mut flat, &mut Vec::new());
        flat
    }

    /// Leaf columns below this column (itself for a leaf), in table order.
    pub fn get_leaf_columns(self: &Rc<Self>, table: &Table<T>) -> Vec<Rc<Column<T>>> {
        if self.columns.is_empty() {
            return vec![self.clone()];
        }
        let mut leaf = Vec::new();
        collect_columns(&self.columns, &mut Vec::new(), &mut leaf);
        table.order_columns(leaf)
    }
}
