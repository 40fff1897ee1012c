//! Column definitions

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::fns::AggregationFn;
use crate::fns::FilterFn;
use crate::fns::SortingFn;
use crate::fns::StrategyRef;
use crate::model::RowData;
use crate::model::Value;

/// Reads a column value from a row record and its index.
pub type AccessorFn<T> = Rc<dyn Fn(&T, usize) -> Value>;

/// Produces several facet values for one record.
pub type UniqueValuesFn<T> = Rc<dyn Fn(&T, usize) -> Vec<Value>>;

/// Produces the value rows are grouped by.
pub type GroupingValueFn<T> = Rc<dyn Fn(&T) -> Value>;

/// How a column reads its value.
#[derive(Clone)]
pub enum ColumnAccessor<T> {
    /// Display or group column; not bound to data.
    None,
    /// Top-level key, or a dotted path such as `"address.city"` or `"tags.0"`.
    Key(String),
    /// Computed value.
    Fn(AccessorFn<T>),
}

impl<T> Default for ColumnAccessor<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T: RowData> ColumnAccessor<T> {
    /// Returns the accessor as a function, `None` for unbound columns.
    pub fn to_fn(&self) -> Option<AccessorFn<T>> {
        match self {
            Self::None => None,
            Self::Key(key) => {
                let key = key.clone();
                let accessor: AccessorFn<T> = if key.contains('.') {
                    Rc::new(move |row: &T, _index: usize| row.path(&key).unwrap_or_default())
                } else {
                    Rc::new(move |row: &T, _index: usize| row.field(&key).unwrap_or_default())
                };
                Some(accessor)
            }
            Self::Fn(f) => Some(f.clone()),
        }
    }
}

impl<T> fmt::Debug for ColumnAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Key(key) => write!(f, "Key({:?})", key),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// Render template reference.
///
/// The table never interprets templates; it hands them to the renderer
/// together with the entity context.
#[derive(Clone)]
pub enum Template {
    Text(String),
    Opaque(Rc<dyn Any>),
}

impl Template {
    /// Returns the text of a text template.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Opaque(_) => None,
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text({:?})", text),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// Where null values sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortUndefined {
    /// Always first, regardless of direction.
    First,
    /// Always last, regardless of direction.
    Last,
    /// Ranked above every value; flips with the direction.
    Greater,
    /// Ranked below every value; flips with the direction.
    Less,
    /// Handled by the sorting function like any other value.
    Ignore,
}

/// Declarative column specification.
///
/// A definition is one of: an accessor-key column, an accessor-function
/// column, a display column (no accessor) or a group column (child
/// definitions, no accessor). Feature options left unset fall back to the
/// table's default column definition.
///
/// # Example
///
/// ```
/// use table_core::core::ColumnDef;
///
/// let columns: Vec<ColumnDef<serde_json::Value>> = vec![
///     ColumnDef::group("Name", vec![
///         ColumnDef::accessor("first"),
///         ColumnDef::accessor("last"),
///     ]),
///     ColumnDef::accessor("age").with_filter_fn("inNumberRange"),
///     ColumnDef::accessor("address.city"),
/// ];
/// assert_eq!(columns[0].columns.len(), 2);
/// ```
#[derive(Clone)]
pub struct ColumnDef<T> {
    pub id: Option<String>,
    pub accessor: ColumnAccessor<T>,
    pub header: Option<Template>,
    pub footer: Option<Template>,
    pub cell: Option<Template>,
    pub aggregated_cell: Option<Template>,
    pub columns: Vec<ColumnDef<T>>,
    pub meta: Option<Value>,

    // Filtering
    pub filter_fn: Option<StrategyRef<FilterFn<T>>>,
    pub enable_column_filter: Option<bool>,
    pub enable_global_filter: Option<bool>,

    // Sorting
    pub sorting_fn: Option<StrategyRef<SortingFn<T>>>,
    pub enable_sorting: Option<bool>,
    pub enable_multi_sort: Option<bool>,
    pub invert_sorting: Option<bool>,
    pub sort_desc_first: Option<bool>,
    pub sort_undefined: Option<SortUndefined>,

    // Grouping
    pub aggregation_fn: Option<StrategyRef<AggregationFn<T>>>,
    pub enable_grouping: Option<bool>,
    pub get_grouping_value: Option<GroupingValueFn<T>>,
    pub get_unique_values: Option<UniqueValuesFn<T>>,

    // Visibility and pinning
    pub enable_hiding: Option<bool>,
    pub enable_pinning: Option<bool>,

    // Sizing
    pub size: Option<f64>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub enable_resizing: Option<bool>,
}

impl<T> Default for ColumnDef<T> {
    fn default() -> Self {
        Self {
            id: None,
            accessor: ColumnAccessor::None,
            header: None,
            footer: None,
            cell: None,
            aggregated_cell: None,
            columns: Vec::new(),
            meta: None,
            filter_fn: None,
            enable_column_filter: None,
            enable_global_filter: None,
            sorting_fn: None,
            enable_sorting: None,
            enable_multi_sort: None,
            invert_sorting: None,
            sort_desc_first: None,
            sort_undefined: None,
            aggregation_fn: None,
            enable_grouping: None,
            get_grouping_value: None,
            get_unique_values: None,
            enable_hiding: None,
            enable_pinning: None,
            size: None,
            min_size: None,
            max_size: None,
            enable_resizing: None,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("accessor", &self.accessor)
            .field("header", &self.header)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<T: Clone> ColumnDef<T> {
    /// Empty definition, used for default-column fragments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Column reading `key` (a top-level key or dotted path) from each record.
    pub fn accessor(key: impl Into<String>) -> Self {
        Self {
            accessor: ColumnAccessor::Key(key.into()),
            ..Self::default()
        }
    }

    /// Column computing its value with `f`.
    pub fn accessor_fn(id: impl Into<String>, f: impl Fn(&T, usize) -> Value + 'static) -> Self {
        Self {
            id: Some(id.into()),
            accessor: ColumnAccessor::Fn(Rc::new(f)),
            ..Self::default()
        }
    }

    /// Column without a data binding.
    pub fn display(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Header-only column grouping `columns`; its id defaults to the header text.
    pub fn group(header: impl Into<Template>, columns: Vec<ColumnDef<T>>) -> Self {
        Self {
            header: Some(header.into()),
            columns,
            ..Self::default()
        }
    }

    /// Id resolution: explicit id, then accessor key (dots become
    /// underscores), then a text header.
    pub fn resolve_id(&self) -> Option<String> {
        if let Some(id) = &self.id {
            return Some(id.clone());
        }
        if let ColumnAccessor::Key(key) = &self.accessor {
            return Some(key.replace('.', "_"));
        }
        self.header.as_ref().and_then(Template::as_text).map(str::to_string)
    }

    /// Fills every option unset on `self` from `base`.
    ///
    /// Identity and structure (`id`, `accessor`, `columns`) are never inherited.
    pub fn merged_over(&self, base: &ColumnDef<T>) -> Self {
        Self {
            id: self.id.clone(),
            accessor: self.accessor.clone(),
            header: self.header.clone().or_else(|| base.header.clone()),
            footer: self.footer.clone().or_else(|| base.footer.clone()),
            cell: self.cell.clone().or_else(|| base.cell.clone()),
            aggregated_cell: self.aggregated_cell.clone().or_else(|| base.aggregated_cell.clone()),
            columns: self.columns.clone(),
            meta: self.meta.clone().or_else(|| base.meta.clone()),
            filter_fn: self.filter_fn.clone().or_else(|| base.filter_fn.clone()),
            enable_column_filter: self.enable_column_filter.or(base.enable_column_filter),
            enable_global_filter: self.enable_global_filter.or(base.enable_global_filter),
            sorting_fn: self.sorting_fn.clone().or_else(|| base.sorting_fn.clone()),
            enable_sorting: self.enable_sorting.or(base.enable_sorting),
            enable_multi_sort: self.enable_multi_sort.or(base.enable_multi_sort),
            invert_sorting: self.invert_sorting.or(base.invert_sorting),
            sort_desc_first: self.sort_desc_first.or(base.sort_desc_first),
            sort_undefined: self.sort_undefined.or(base.sort_undefined),
            aggregation_fn: self.aggregation_fn.clone().or_else(|| base.aggregation_fn.clone()),
            enable_grouping: self.enable_grouping.or(base.enable_grouping),
            get_grouping_value: self.get_grouping_value.clone().or_else(|| base.get_grouping_value.clone()),
            get_unique_values: self.get_unique_values.clone().or_else(|| base.get_unique_values.clone()),
            enable_hiding: self.enable_hiding.or(base.enable_hiding),
            enable_pinning: self.enable_pinning.or(base.enable_pinning),
            size: self.size.or(base.size),
            min_size: self.min_size.or(base.min_size),
            max_size: self.max_size.or(base.max_size),
            enable_resizing: self.enable_resizing.or(base.enable_resizing),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_header(mut self, header: impl Into<Template>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_footer(mut self, footer: impl Into<Template>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_cell(mut self, cell: impl Into<Template>) -> Self {
        self.cell = Some(cell.into());
        self
    }

    pub fn with_meta(mut self, meta: impl Into<Value>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Filter strategy by key (`"auto"` infers it from the data).
    pub fn with_filter_fn(mut self, name: &str) -> Self {
        self.filter_fn = Some(StrategyRef::from(name));
        self
    }

    pub fn with_custom_filter_fn(mut self, filter_fn: FilterFn<T>) -> Self {
        self.filter_fn = Some(StrategyRef::Custom(filter_fn));
        self
    }

    pub fn with_enable_column_filter(mut self, enable: bool) -> Self {
        self.enable_column_filter = Some(enable);
        self
    }

    pub fn with_enable_global_filter(mut self, enable: bool) -> Self {
        self.enable_global_filter = Some(enable);
        self
    }

    /// Sorting strategy by key (`"auto"` infers it from the data).
    pub fn with_sorting_fn(mut self, name: &str) -> Self {
        self.sorting_fn = Some(StrategyRef::from(name));
        self
    }

    pub fn with_custom_sorting_fn(mut self, sorting_fn: SortingFn<T>) -> Self {
        self.sorting_fn = Some(StrategyRef::Custom(sorting_fn));
        self
    }

    pub fn with_enable_sorting(mut self, enable: bool) -> Self {
        self.enable_sorting = Some(enable);
        self
    }

    pub fn with_enable_multi_sort(mut self, enable: bool) -> Self {
        self.enable_multi_sort = Some(enable);
        self
    }

    pub fn with_invert_sorting(mut self, invert: bool) -> Self {
        self.invert_sorting = Some(invert);
        self
    }

    pub fn with_sort_desc_first(mut self, desc_first: bool) -> Self {
        self.sort_desc_first = Some(desc_first);
        self
    }

    pub fn with_sort_undefined(mut self, placement: SortUndefined) -> Self {
        self.sort_undefined = Some(placement);
        self
    }

    /// Aggregation strategy by key (`"auto"` infers it from the data).
    pub fn with_aggregation_fn(mut self, name: &str) -> Self {
        self.aggregation_fn = Some(StrategyRef::from(name));
        self
    }

    pub fn with_custom_aggregation_fn(mut self, aggregation_fn: AggregationFn<T>) -> Self {
        self.aggregation_fn = Some(StrategyRef::Custom(aggregation_fn));
        self
    }

    pub fn with_enable_grouping(mut self, enable: bool) -> Self {
        self.enable_grouping = Some(enable);
        self
    }

    pub fn with_grouping_value(mut self, f: impl Fn(&T) -> Value + 'static) -> Self {
        self.get_grouping_value = Some(Rc::new(f));
        self
    }

    pub fn with_unique_values(mut self, f: impl Fn(&T, usize) -> Vec<Value> + 'static) -> Self {
        self.get_unique_values = Some(Rc::new(f));
        self
    }

    pub fn with_enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = Some(enable);
        self
    }

    pub fn with_enable_pinning(mut self, enable: bool) -> Self {
        self.enable_pinning = Some(enable);
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_min_size(mut self, size: f64) -> Self {
        self.min_size = Some(size);
        self
    }

    pub fn with_max_size(mut self, size: f64) -> Self {
        self.max_size = Some(size);
        self
    }

    pub fn with_enable_resizing(mut self, enable: bool) -> Self {
        self.enable_resizing = Some(enable);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    type Def = ColumnDef<serde_json::Value>;

    #[test]
    fn test_id_resolution_order() {
        assert_eq!(Def::accessor("age").with_id("years").resolve_id().as_deref(), Some("years"));
        assert_eq!(Def::accessor("address.city").resolve_id().as_deref(), Some("address_city"));
        assert_eq!(Def::group("Name", vec![]).resolve_id().as_deref(), Some("Name"));
        assert_eq!(Def::new().resolve_id(), None);
    }

    #[test]
    fn test_merge_keeps_own_values() {
        let base = Def::new().with_size(150.0).with_sort_undefined(SortUndefined::Greater);
        let merged = Def::accessor("a").with_size(80.0).merged_over(&base);
        assert_eq!(merged.size, Some(80.0));
        assert_eq!(merged.sort_undefined, Some(SortUndefined::Greater));
        assert!(matches!(merged.accessor, ColumnAccessor::Key(ref k) if k == "a"));
    }

    #[test]
    fn test_key_accessor_walks_paths() {
        let row = json!({"address": {"city": "Oslo"}, "age": 3});
        let city = ColumnAccessor::Key("address.city".to_string()).to_fn().unwrap();
        assert_eq!(city(&row, 0), Value::from("Oslo"));
        let missing = ColumnAccessor::Key("nope".to_string()).to_fn().unwrap();
        assert!(missing(&row, 0).is_null());
        assert!(ColumnAccessor::<serde_json::Value>::None.to_fn().is_none());
    }
}
