//! Table options

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::Column;
use super::ColumnDef;
use super::ColumnFilter;
use super::ColumnPinningState;
use super::ColumnSort;
use super::ExpandedState;
use super::FacetedMinMaxFactory;
use super::FacetedRowModelFactory;
use super::FacetedUniqueValuesFactory;
use super::OnChangeFn;
use super::PaginationState;
use super::Row;
use super::RowModelFactory;
use super::RowPinningState;
use super::Table;
use super::TableConfig;
use super::TableState;
use crate::features::TableFeature;
use crate::features::stock_features;
use crate::fns::AggregationFn;
use crate::fns::FilterFn;
use crate::fns::SortingFn;
use crate::fns::StrategyRef;
use crate::memo::MemoHooks;
use crate::model::RowData;
use crate::model::Value;
use crate::row_models;

/// Produces a row id from the record, its index among its siblings and the
/// parent row id.
pub type RowIdFn<T> = Rc<dyn Fn(&T, usize, Option<&str>) -> String>;

/// Returns the child records of a record, if it has any.
pub type SubRowsFn<T> = Rc<dyn Fn(&T, usize) -> Option<Vec<T>>>;

/// Per-row capability check.
pub type RowPredicate<T> = Rc<dyn Fn(&Row<T>) -> bool>;

/// Per-column capability check.
pub type ColumnPredicate<T> = Rc<dyn Fn(&Column<T>, &Table<T>) -> bool>;

/// Everything a table is built from.
///
/// Scalar options live in [`TableConfig`]; this struct adds the data, the
/// column definitions and every callback.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use table_core::core::ColumnDef;
/// use table_core::core::TableOptions;
///
/// let options = TableOptions::new(
///     vec![json!({"id": "a", "age": 3})],
///     vec![ColumnDef::accessor("age")],
/// )
/// .with_row_id(|row: &serde_json::Value, _, _| row["id"].as_str().unwrap_or_default().to_string())
/// .with_all_row_models();
/// assert!(options.get_filtered_row_model.is_some());
/// ```
pub struct TableOptions<T> {
    pub data: Rc<Vec<Rc<T>>>,
    pub columns: Rc<Vec<ColumnDef<T>>>,
    /// Merged under every column definition.
    pub default_column: Option<Rc<ColumnDef<T>>>,
    /// Features in registration order.
    pub features: Vec<Rc<dyn TableFeature<T>>>,
    pub config: TableConfig,
    /// Merged over the features' initial state.
    pub initial_state: TableState,
    /// Controlled slices; they win over the internal state.
    pub state: Option<Rc<TableState>>,

    pub get_row_id: Option<RowIdFn<T>>,
    pub get_sub_rows: Option<SubRowsFn<T>>,

    // Row models
    pub get_core_row_model: Option<RowModelFactory<T>>,
    pub get_filtered_row_model: Option<RowModelFactory<T>>,
    pub get_sorted_row_model: Option<RowModelFactory<T>>,
    pub get_grouped_row_model: Option<RowModelFactory<T>>,
    pub get_expanded_row_model: Option<RowModelFactory<T>>,
    pub get_pagination_row_model: Option<RowModelFactory<T>>,
    pub get_faceted_row_model: Option<FacetedRowModelFactory<T>>,
    pub get_faceted_unique_values: Option<FacetedUniqueValuesFactory<T>>,
    pub get_faceted_min_max_values: Option<FacetedMinMaxFactory<T>>,

    // Strategy registries
    pub filter_fns: HashMap<String, FilterFn<T>>,
    pub sorting_fns: HashMap<String, SortingFn<T>>,
    pub aggregation_fns: HashMap<String, AggregationFn<T>>,
    pub global_filter_fn: StrategyRef<FilterFn<T>>,
    pub get_column_can_global_filter: Option<ColumnPredicate<T>>,

    // Per-row capabilities
    pub get_is_row_expanded: Option<RowPredicate<T>>,
    pub get_row_can_expand: Option<RowPredicate<T>>,
    pub can_select_row: Option<RowPredicate<T>>,
    pub can_multi_select_row: Option<RowPredicate<T>>,
    pub can_select_sub_rows: Option<RowPredicate<T>>,
    pub can_pin_row: Option<RowPredicate<T>>,

    // State change callbacks; a present callback replaces the internal update.
    pub on_column_filters_change: Option<OnChangeFn<Vec<ColumnFilter>>>,
    pub on_global_filter_change: Option<OnChangeFn<Value>>,
    pub on_sorting_change: Option<OnChangeFn<Vec<ColumnSort>>>,
    pub on_grouping_change: Option<OnChangeFn<Vec<String>>>,
    pub on_expanded_change: Option<OnChangeFn<ExpandedState>>,
    pub on_pagination_change: Option<OnChangeFn<PaginationState>>,
    pub on_column_visibility_change: Option<OnChangeFn<BTreeMap<String, bool>>>,
    pub on_column_order_change: Option<OnChangeFn<Vec<String>>>,
    pub on_column_pinning_change: Option<OnChangeFn<ColumnPinningState>>,
    pub on_row_pinning_change: Option<OnChangeFn<RowPinningState>>,
    pub on_row_selection_change: Option<OnChangeFn<BTreeMap<String, bool>>>,
    pub on_column_sizing_change: Option<OnChangeFn<BTreeMap<String, f64>>>,
    /// Observes every internal state update.
    pub on_state_change: Option<Rc<dyn Fn(&TableState)>>,

    pub memo_hooks: Option<MemoHooks>,
}

impl<T> Clone for TableOptions<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            columns: self.columns.clone(),
            default_column: self.default_column.clone(),
            features: self.features.clone(),
            config: self.config.clone(),
            initial_state: self.initial_state.clone(),
            state: self.state.clone(),
            get_row_id: self.get_row_id.clone(),
            get_sub_rows: self.get_sub_rows.clone(),
            get_core_row_model: self.get_core_row_model.clone(),
            get_filtered_row_model: self.get_filtered_row_model.clone(),
            get_sorted_row_model: self.get_sorted_row_model.clone(),
            get_grouped_row_model: self.get_grouped_row_model.clone(),
            get_expanded_row_model: self.get_expanded_row_model.clone(),
            get_pagination_row_model: self.get_pagination_row_model.clone(),
            get_faceted_row_model: self.get_faceted_row_model.clone(),
            get_faceted_unique_values: self.get_faceted_unique_values.clone(),
            get_faceted_min_max_values: self.get_faceted_min_max_values.clone(),
            filter_fns: self.filter_fns.clone(),
            sorting_fns: self.sorting_fns.clone(),
            aggregation_fns: self.aggregation_fns.clone(),
            global_filter_fn: self.global_filter_fn.clone(),
            get_column_can_global_filter: self.get_column_can_global_filter.clone(),
            get_is_row_expanded: self.get_is_row_expanded.clone(),
            get_row_can_expand: self.get_row_can_expand.clone(),
            can_select_row: self.can_select_row.clone(),
            can_multi_select_row: self.can_multi_select_row.clone(),
            can_select_sub_rows: self.can_select_sub_rows.clone(),
            can_pin_row: self.can_pin_row.clone(),
            on_column_filters_change: self.on_column_filters_change.clone(),
            on_global_filter_change: self.on_global_filter_change.clone(),
            on_sorting_change: self.on_sorting_change.clone(),
            on_grouping_change: self.on_grouping_change.clone(),
            on_expanded_change: self.on_expanded_change.clone(),
            on_pagination_change: self.on_pagination_change.clone(),
            on_column_visibility_change: self.on_column_visibility_change.clone(),
            on_column_order_change: self.on_column_order_change.clone(),
            on_column_pinning_change: self.on_column_pinning_change.clone(),
            on_row_pinning_change: self.on_row_pinning_change.clone(),
            on_row_selection_change: self.on_row_selection_change.clone(),
            on_column_sizing_change: self.on_column_sizing_change.clone(),
            on_state_change: self.on_state_change.clone(),
            memo_hooks: self.memo_hooks.clone(),
        }
    }
}

impl<T> fmt::Debug for TableOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("data", &self.data.len())
            .field("columns", &self.columns)
            .field("features", &self.features.len())
            .field("config", &self.config)
            .field("initial_state", &self.initial_state)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: RowData> TableOptions<T> {
    /// Options with the stock features and the core row model only.
    pub fn new(data: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        Self {
            data: Rc::new(data.into_iter().map(Rc::new).collect()),
            columns: Rc::new(columns),
            default_column: None,
            features: stock_features(),
            config: TableConfig::default(),
            initial_state: TableState::default(),
            state: None,
            get_row_id: None,
            get_sub_rows: None,
            get_core_row_model: Some(row_models::core_row_model()),
            get_filtered_row_model: None,
            get_sorted_row_model: None,
            get_grouped_row_model: None,
            get_expanded_row_model: None,
            get_pagination_row_model: None,
            get_faceted_row_model: None,
            get_faceted_unique_values: None,
            get_faceted_min_max_values: None,
            filter_fns: HashMap::new(),
            sorting_fns: HashMap::new(),
            aggregation_fns: HashMap::new(),
            global_filter_fn: StrategyRef::Auto,
            get_column_can_global_filter: None,
            get_is_row_expanded: None,
            get_row_can_expand: None,
            can_select_row: None,
            can_multi_select_row: None,
            can_select_sub_rows: None,
            can_pin_row: None,
            on_column_filters_change: None,
            on_global_filter_change: None,
            on_sorting_change: None,
            on_grouping_change: None,
            on_expanded_change: None,
            on_pagination_change: None,
            on_column_visibility_change: None,
            on_column_order_change: None,
            on_column_pinning_change: None,
            on_row_pinning_change: None,
            on_row_selection_change: None,
            on_column_sizing_change: None,
            on_state_change: None,
            memo_hooks: None,
        }
    }

    /// Installs every built-in row model: filtered, sorted, grouped,
    /// expanded, paginated and the faceting builders.
    pub fn with_all_row_models(mut self) -> Self {
        self.get_filtered_row_model = Some(row_models::filtered_row_model());
        self.get_sorted_row_model = Some(row_models::sorted_row_model());
        self.get_grouped_row_model = Some(row_models::grouped_row_model());
        self.get_expanded_row_model = Some(row_models::expanded_row_model());
        self.get_pagination_row_model = Some(row_models::pagination_row_model());
        self.get_faceted_row_model = Some(row_models::faceted_row_model());
        self.get_faceted_unique_values = Some(row_models::faceted_unique_values());
        self.get_faceted_min_max_values = Some(row_models::faceted_min_max_values());
        self
    }

    pub fn with_features(mut self, features: Vec<Rc<dyn TableFeature<T>>>) -> Self {
        self.features = features;
        self
    }

    pub fn with_default_column(mut self, column: ColumnDef<T>) -> Self {
        self.default_column = Some(Rc::new(column));
        self
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_initial_state(mut self, state: TableState) -> Self {
        self.initial_state = state;
        self
    }

    /// Controls the slices present in `state` from outside the table.
    pub fn with_state(mut self, state: TableState) -> Self {
        self.state = Some(Rc::new(state));
        self
    }

    pub fn with_row_id(mut self, f: impl Fn(&T, usize, Option<&str>) -> String + 'static) -> Self {
        self.get_row_id = Some(Rc::new(f));
        self
    }

    pub fn with_sub_rows(mut self, f: impl Fn(&T, usize) -> Option<Vec<T>> + 'static) -> Self {
        self.get_sub_rows = Some(Rc::new(f));
        self
    }

    pub fn with_core_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_core_row_model = Some(factory);
        self
    }

    pub fn with_filtered_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_filtered_row_model = Some(factory);
        self
    }

    pub fn with_sorted_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_sorted_row_model = Some(factory);
        self
    }

    pub fn with_grouped_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_grouped_row_model = Some(factory);
        self
    }

    pub fn with_expanded_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_expanded_row_model = Some(factory);
        self
    }

    pub fn with_pagination_row_model(mut self, factory: RowModelFactory<T>) -> Self {
        self.get_pagination_row_model = Some(factory);
        self
    }

    pub fn with_faceted_row_model(mut self, factory: FacetedRowModelFactory<T>) -> Self {
        self.get_faceted_row_model = Some(factory);
        self
    }

    pub fn with_faceted_unique_values(mut self, factory: FacetedUniqueValuesFactory<T>) -> Self {
        self.get_faceted_unique_values = Some(factory);
        self
    }

    pub fn with_faceted_min_max_values(mut self, factory: FacetedMinMaxFactory<T>) -> Self {
        self.get_faceted_min_max_values = Some(factory);
        self
    }

    /// Registers a filter function under `name`, shadowing a built-in.
    pub fn with_filter_fn(mut self, name: impl Into<String>, filter_fn: FilterFn<T>) -> Self {
        self.filter_fns.insert(name.into(), filter_fn);
        self
    }

    pub fn with_sorting_fn(mut self, name: impl Into<String>, sorting_fn: SortingFn<T>) -> Self {
        self.sorting_fns.insert(name.into(), sorting_fn);
        self
    }

    pub fn with_aggregation_fn(mut self, name: impl Into<String>, aggregation_fn: AggregationFn<T>) -> Self {
        self.aggregation_fns.insert(name.into(), aggregation_fn);
        self
    }

    /// Global filter strategy by key (`"auto"` uses `includesString`).
    pub fn with_global_filter_fn(mut self, name: &str) -> Self {
        self.global_filter_fn = StrategyRef::from(name);
        self
    }

    pub fn with_column_can_global_filter(mut self, f: impl Fn(&Column<T>, &Table<T>) -> bool + 'static) -> Self {
        self.get_column_can_global_filter = Some(Rc::new(f));
        self
    }

    pub fn with_is_row_expanded(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.get_is_row_expanded = Some(Rc::new(f));
        self
    }

    pub fn with_row_can_expand(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.get_row_can_expand = Some(Rc::new(f));
        self
    }

    pub fn with_can_select_row(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.can_select_row = Some(Rc::new(f));
        self
    }

    pub fn with_can_multi_select_row(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.can_multi_select_row = Some(Rc::new(f));
        self
    }

    pub fn with_can_select_sub_rows(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.can_select_sub_rows = Some(Rc::new(f));
        self
    }

    pub fn with_can_pin_row(mut self, f: impl Fn(&Row<T>) -> bool + 'static) -> Self {
        self.can_pin_row = Some(Rc::new(f));
        self
    }

    pub fn on_column_filters_change(mut self, f: impl Fn(Vec<ColumnFilter>) + 'static) -> Self {
        self.on_column_filters_change = Some(Rc::new(f));
        self
    }

    pub fn on_global_filter_change(mut self, f: impl Fn(Value) + 'static) -> Self {
        self.on_global_filter_change = Some(Rc::new(f));
        self
    }

    pub fn on_sorting_change(mut self, f: impl Fn(Vec<ColumnSort>) + 'static) -> Self {
        self.on_sorting_change = Some(Rc::new(f));
        self
    }

    pub fn on_grouping_change(mut self, f: impl Fn(Vec<String>) + 'static) -> Self {
        self.on_grouping_change = Some(Rc::new(f));
        self
    }

    pub fn on_expanded_change(mut self, f: impl Fn(ExpandedState) + 'static) -> Self {
        self.on_expanded_change = Some(Rc::new(f));
        self
    }

    pub fn on_pagination_change(mut self, f: impl Fn(PaginationState) + 'static) -> Self {
        self.on_pagination_change = Some(Rc::new(f));
        self
    }

    pub fn on_column_visibility_change(mut self, f: impl Fn(BTreeMap<String, bool>) + 'static) -> Self {
        self.on_column_visibility_change = Some(Rc::new(f));
        self
    }

    pub fn on_column_order_change(mut self, f: impl Fn(Vec<String>) + 'static) -> Self {
        self.on_column_order_change = Some(Rc::new(f));
        self
    }

    pub fn on_column_pinning_change(mut self, f: impl Fn(ColumnPinningState) + 'static) -> Self {
        self.on_column_pinning_change = Some(Rc::new(f));
        self
    }

    pub fn on_row_pinning_change(mut self, f: impl Fn(RowPinningState) + 'static) -> Self {
        self.on_row_pinning_change = Some(Rc::new(f));
        self
    }

    pub fn on_row_selection_change(mut self, f: impl Fn(BTreeMap<String, bool>) + 'static) -> Self {
        self.on_row_selection_change = Some(Rc::new(f));
        self
    }

    pub fn on_column_sizing_change(mut self, f: impl Fn(BTreeMap<String, f64>) + 'static) -> Self {
        self.on_column_sizing_change = Some(Rc::new(f));
        self
    }

    /// Observes every internal state update.
    pub fn on_state_change(mut self, f: impl Fn(&TableState) + 'static) -> Self {
        self.on_state_change = Some(Rc::new(f));
        self
    }

    pub fn with_memo_hooks(mut self, hooks: MemoHooks) -> Self {
        self.memo_hooks = Some(hooks);
        self
    }
}
