//! Table state slices and the updater type

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::model::Value;

static EMPTY_FLAGS: BTreeMap<String, bool> = BTreeMap::new();
static EMPTY_SIZES: BTreeMap<String, f64> = BTreeMap::new();
static EMPTY_EXPANDED: ExpandedState = ExpandedState::Rows(BTreeMap::new());
static EMPTY_COLUMN_PINNING: ColumnPinningState = ColumnPinningState {
    left: Vec::new(),
    right: Vec::new(),
};
static EMPTY_ROW_PINNING: RowPinningState = RowPinningState {
    top: Vec::new(),
    bottom: Vec::new(),
};
static NO_GLOBAL_FILTER: Value = Value::Null;

/// An active filter on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: Value,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// One entry of the sort list; the first entry is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    /// Ascending sort on `id`.
    pub fn asc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: false }
    }

    /// Descending sort on `id`.
    pub fn desc(id: impl Into<String>) -> Self {
        Self { id: id.into(), desc: true }
    }
}

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Expansion state: every row, or an explicit set of row ids.
///
/// Serializes as `true` for [`ExpandedState::All`] and as an id map otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandedState {
    All,
    Rows(BTreeMap<String, bool>),
}

impl Default for ExpandedState {
    fn default() -> Self {
        Self::Rows(BTreeMap::new())
    }
}

impl ExpandedState {
    /// Returns `true` when the state expands `row_id`.
    pub fn is_expanded(&self, row_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Rows(rows) => rows.get(row_id).copied().unwrap_or(false),
        }
    }

    /// Returns `true` for an empty id map.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::All => false,
            Self::Rows(rows) => rows.is_empty(),
        }
    }
}

impl Serialize for ExpandedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_bool(true),
            Self::Rows(rows) => rows.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ExpandedState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(true) => Ok(Self::All),
            serde_json::Value::Bool(false) | serde_json::Value::Null => Ok(Self::default()),
            other => serde_json::from_value(other)
                .map(Self::Rows)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Current page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
        }
    }
}

/// Column ids pinned to either side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPinningState {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Row ids pinned to the top or bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowPinningState {
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPinningPosition {
    Left,
    Right,
}

/// Region of the column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnPosition {
    Left,
    Center,
    Right,
}

/// Side a row is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPinningPosition {
    Top,
    Bottom,
}

/// How grouped columns are placed among the leaf columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupedColumnMode {
    /// Move grouped columns to the front.
    #[default]
    Reorder,
    /// Hide grouped columns.
    Remove,
    /// Leave the column order alone.
    Off,
}

/// Complete table state.
///
/// Every slice is optional: a slice is present only when a registered feature
/// contributes it, or when the caller supplies it. Reading an absent slice
/// through the accessor methods yields its empty default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_filters: Option<Vec<ColumnFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Vec<ColumnSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouping: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<ExpandedState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_visibility: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_pinning: Option<ColumnPinningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_pinning: Option<RowPinningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_selection: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_sizing: Option<BTreeMap<String, f64>>,
}

impl TableState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays `over` on this state: every slice present in `over` wins.
    pub fn merge(mut self, over: &TableState) -> Self {
        if over.column_filters.is_some() {
            self.column_filters = over.column_filters.clone();
        }
        if over.global_filter.is_some() {
            self.global_filter = over.global_filter.clone();
        }
        if over.sorting.is_some() {
            self.sorting = over.sorting.clone();
        }
        if over.grouping.is_some() {
            self.grouping = over.grouping.clone();
        }
        if over.expanded.is_some() {
            self.expanded = over.expanded.clone();
        }
        if over.pagination.is_some() {
            self.pagination = over.pagination;
        }
        if over.column_visibility.is_some() {
            self.column_visibility = over.column_visibility.clone();
        }
        if over.column_order.is_some() {
            self.column_order = over.column_order.clone();
        }
        if over.column_pinning.is_some() {
            self.column_pinning = over.column_pinning.clone();
        }
        if over.row_pinning.is_some() {
            self.row_pinning = over.row_pinning.clone();
        }
        if over.row_selection.is_some() {
            self.row_selection = over.row_selection.clone();
        }
        if over.column_sizing.is_some() {
            self.column_sizing = over.column_sizing.clone();
        }
        self
    }

    pub fn column_filters(&self) -> &[ColumnFilter] {
        self.column_filters.as_deref().unwrap_or(&[])
    }

    pub fn global_filter(&self) -> &Value {
        self.global_filter.as_ref().unwrap_or(&NO_GLOBAL_FILTER)
    }

    pub fn sorting(&self) -> &[ColumnSort] {
        self.sorting.as_deref().unwrap_or(&[])
    }

    pub fn grouping(&self) -> &[String] {
        self.grouping.as_deref().unwrap_or(&[])
    }

    pub fn expanded(&self) -> &ExpandedState {
        self.expanded.as_ref().unwrap_or(&EMPTY_EXPANDED)
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination.unwrap_or_default()
    }

    pub fn column_visibility(&self) -> &BTreeMap<String, bool> {
        self.column_visibility.as_ref().unwrap_or(&EMPTY_FLAGS)
    }

    pub fn column_order(&self) -> &[String] {
        self.column_order.as_deref().unwrap_or(&[])
    }

    pub fn column_pinning(&self) -> &ColumnPinningState {
        self.column_pinning.as_ref().unwrap_or(&EMPTY_COLUMN_PINNING)
    }

    pub fn row_pinning(&self) -> &RowPinningState {
        self.row_pinning.as_ref().unwrap_or(&EMPTY_ROW_PINNING)
    }

    pub fn row_selection(&self) -> &BTreeMap<String, bool> {
        self.row_selection.as_ref().unwrap_or(&EMPTY_FLAGS)
    }

    pub fn column_sizing(&self) -> &BTreeMap<String, f64> {
        self.column_sizing.as_ref().unwrap_or(&EMPTY_SIZES)
    }
}

/// A new value for a state slice, or a function of the current value.
///
/// # Example
///
/// ```
/// use table_core::core::Updater;
///
/// assert_eq!(Updater::value(3).apply(&1), 3);
/// assert_eq!(Updater::with(|page: &usize| page + 1).apply(&1), 2);
/// ```
pub enum Updater<S> {
    Value(S),
    Fn(Box<dyn FnOnce(&S) -> S>),
}

impl<S> Updater<S> {
    /// Replaces the slice with `value`.
    pub fn value(value: S) -> Self {
        Self::Value(value)
    }

    /// Derives the next slice from the current one.
    pub fn with(f: impl FnOnce(&S) -> S + 'static) -> Self {
        Self::Fn(Box::new(f))
    }

    /// Resolves the update against `current`.
    pub fn apply(self, current: &S) -> S {
        match self {
            Self::Value(value) => value,
            Self::Fn(f) => f(current),
        }
    }
}

impl<S> From<S> for Updater<S> {
    fn from(value: S) -> Self {
        Self::Value(value)
    }
}

impl<S: fmt::Debug> fmt::Debug for Updater<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Callback receiving the next value of a state slice.
pub type OnChangeFn<S> = Rc<dyn Fn(S)>;
