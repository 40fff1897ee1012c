//! Table orchestrator
//!
//! The table owns the options, the state, the column tree and every memo.
//! Features plug into it through [`TableFeature`] hooks; their getters and
//! setters live in `impl Table` blocks inside each feature module.

use std::cell::Cell as StdCell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use super::Cell;
use super::Column;
use super::ColumnAccessors;
use super::ColumnDef;
use super::ColumnTree;
use super::Header;
use super::OnChangeFn;
use super::Row;
use super::RowModel;
use super::RowModelFactory;
use super::RowModelFn;
use super::TableConfig;
use super::TableOptions;
use super::TableState;
use super::Updater;
use crate::error::Result;
use crate::error::TableError;
use crate::features::FacetSlots;
use crate::features::FeatureKind;
use crate::features::FeatureSet;
use crate::features::GLOBAL_FILTER_ID;
use crate::features::TableFeature;
use crate::features::order_leaf_columns;
use crate::fns::StrategyRef;
use crate::fns::builtin_aggregation_fn;
use crate::fns::builtin_filter_fn;
use crate::fns::builtin_sorting_fn;
use crate::memo::ById;
use crate::memo::MemoCache;
use crate::memo::MemoOptions;
use crate::model::RowData;

/// Which `debug_*` config flag turns on timing logs for a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFlag {
    Table,
    Columns,
    Rows,
    Cells,
    Headers,
}

/// A headless table instance.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use table_core::core::ColumnDef;
/// use table_core::core::Table;
/// use table_core::core::TableOptions;
///
/// let data = vec![json!({"name": "ada", "age": 36}), json!({"name": "alan", "age": 41})];
/// let columns = vec![ColumnDef::accessor("name"), ColumnDef::accessor("age")];
/// let table = Table::new(
///     TableOptions::new(data, columns)
///         .with_row_id(|row: &serde_json::Value, _, _| row["name"].as_str().unwrap_or_default().to_string()),
/// )
/// .unwrap();
///
/// let rows = table.get_row_model();
/// assert_eq!(rows.row_ids(), vec!["ada", "alan"]);
/// assert_eq!(rows.rows[1].get_value("age"), 41.into());
/// ```
pub struct Table<T> {
    options: RefCell<Rc<TableOptions<T>>>,
    feature_config: TableConfig,
    config: RefCell<Rc<TableConfig>>,
    initial_state: Rc<TableState>,
    state: RefCell<Rc<TableState>>,
    features: Rc<Vec<Rc<dyn TableFeature<T>>>>,
    feature_set: FeatureSet,
    feature_column_def: ColumnDef<T>,
    default_column: RefCell<Rc<ColumnDef<T>>>,
    columns: RefCell<Rc<ColumnTree<T>>>,
    memos: MemoCache,
    row_models: RefCell<HashMap<&'static str, RowModelFn<T>>>,
    pub(crate) global_facets: Option<FacetSlots<T>>,
    warned_row_ids: StdCell<bool>,
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("features", &self.feature_set)
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<T: RowData> Table<T> {
    /// Builds a table: merges the feature defaults, runs the table hooks and
    /// builds the column tree.
    pub fn new(options: TableOptions<T>) -> Result<Self> {
        let features = Rc::new(options.features.clone());
        let mut feature_set = FeatureSet::default();
        let mut initial_state = TableState::new();
        let mut feature_config = TableConfig::new();
        let mut feature_column_def = ColumnDef::new();
        for feature in features.iter() {
            if let Some(kind) = feature.kind() {
                feature_set.insert(kind);
            }
            initial_state = initial_state.merge(&feature.get_initial_state());
            feature_config = feature_config.merge(&feature.get_default_options());
            feature_column_def = feature.get_default_column_def().merged_over(&feature_column_def);
        }
        let initial_state = initial_state.merge(&options.initial_state);
        let config = feature_config.clone().merge(&options.config);
        let default_column = resolve_default_column(&options, &feature_column_def);

        let mut table = Self {
            options: RefCell::new(Rc::new(options)),
            feature_config,
            config: RefCell::new(Rc::new(config)),
            initial_state: Rc::new(initial_state.clone()),
            state: RefCell::new(Rc::new(initial_state)),
            features: features.clone(),
            feature_set,
            feature_column_def,
            default_column: RefCell::new(Rc::new(default_column)),
            columns: RefCell::new(Rc::new(ColumnTree::default())),
            memos: MemoCache::new(),
            row_models: RefCell::new(HashMap::new()),
            global_facets: None,
            warned_row_ids: StdCell::new(false),
        };
        for feature in features.iter() {
            feature.create_table(&mut table);
        }

        let options = table.options();
        let tree = table.build_columns(&options.columns, &table.default_column.borrow().clone())?;
        *table.columns.borrow_mut() = Rc::new(tree);
        log::debug!(
            "table created with {} features and {} columns",
            table.features.len(),
            table.columns.borrow().flat.len()
        );
        Ok(table)
    }

    /// Current options.
    pub fn options(&self) -> Rc<TableOptions<T>> {
        self.options.borrow().clone()
    }

    /// Feature defaults with the caller's config merged over them.
    pub fn config(&self) -> Rc<TableConfig> {
        self.config.borrow().clone()
    }

    /// Replaces the options through `update`.
    ///
    /// The column tree is rebuilt when the column definitions or the default
    /// column change; a build error leaves the table untouched. New data
    /// triggers the page index and expansion auto-resets.
    pub fn set_options(&self, update: impl FnOnce(&mut TableOptions<T>)) -> Result<()> {
        let previous = self.options();
        let mut next = (*previous).clone();
        update(&mut next);

        let default_column_changed = match (&previous.default_column, &next.default_column) {
            (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        let columns_changed = !Rc::ptr_eq(&previous.columns, &next.columns) || default_column_changed;
        let data_changed = !Rc::ptr_eq(&previous.data, &next.data);

        let default_column = Rc::new(resolve_default_column(&next, &self.feature_column_def));
        let tree = if columns_changed {
            Some(self.build_columns(&next.columns, &default_column)?)
        } else {
            None
        };

        let config = self.feature_config.clone().merge(&next.config);
        *self.config.borrow_mut() = Rc::new(config);
        *self.options.borrow_mut() = Rc::new(next);
        if let Some(tree) = tree {
            *self.default_column.borrow_mut() = default_column;
            *self.columns.borrow_mut() = Rc::new(tree);
            log::debug!("columns rebuilt");
        }
        if data_changed {
            self.auto_reset_page_index();
            self.auto_reset_expanded();
        }
        Ok(())
    }

    /// Replaces the row data.
    pub fn set_data(&self, data: Vec<T>) -> Result<()> {
        let data = Rc::new(data.into_iter().map(Rc::new).collect());
        self.set_options(|options| options.data = data)
    }

    /// Replaces the column definitions and rebuilds the column tree.
    pub fn set_columns(&self, columns: Vec<ColumnDef<T>>) -> Result<()> {
        let columns = Rc::new(columns);
        self.set_options(|options| options.columns = columns)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The effective state: internal state with the controlled slices
    /// merged over it.
    pub fn get_state(&self) -> Rc<TableState> {
        let internal = self.state.borrow().clone();
        let Some(controlled) = self.options().state.clone() else {
            return internal;
        };
        self.memo(
            "getState",
            DebugFlag::Table,
            (ById(internal), ById(controlled)),
            |(internal, controlled)| (*internal.0).clone().merge(&controlled.0),
        )
    }

    /// Replaces the internal state.
    pub fn set_state(&self, updater: impl Into<Updater<TableState>>) {
        let current = self.state.borrow().clone();
        let next = Rc::new(updater.into().apply(&current));
        log::trace!("state replaced");
        self.store_state(next);
    }

    /// Restores the initial state.
    pub fn reset(&self) {
        self.set_state((*self.initial_state).clone());
    }

    /// Feature initial state with the caller's initial state merged over it.
    pub fn initial_state(&self) -> Rc<TableState> {
        self.initial_state.clone()
    }

    fn store_state(&self, next: Rc<TableState>) {
        *self.state.borrow_mut() = next.clone();
        if let Some(observer) = self.options().on_state_change.clone() {
            observer(&next);
        }
    }

    /// Applies `write` to a copy of the internal state and stores it.
    pub(crate) fn update_state(&self, slice: &'static str, write: impl FnOnce(&mut TableState)) {
        let mut next = (**self.state.borrow()).clone();
        write(&mut next);
        log::trace!("state update: {}", slice);
        self.store_state(Rc::new(next));
    }

    /// Funnels the next value of a slice either to its change callback or
    /// into the internal state. Does nothing when `kind` is not registered.
    pub(crate) fn commit_slice<S>(
        &self,
        kind: FeatureKind,
        slice: &'static str,
        next: S,
        on_change: impl FnOnce(&TableOptions<T>) -> Option<OnChangeFn<S>>,
        write: impl FnOnce(&mut TableState, S),
    ) {
        if !self.has_feature(kind) {
            log::debug!("ignoring {} update; feature not registered", slice);
            return;
        }
        let callback = on_change(&self.options());
        match callback {
            Some(callback) => {
                log::trace!("state change forwarded: {}", slice);
                callback(next);
            }
            None => self.update_state(slice, |state| write(state, next)),
        }
    }

    // =========================================================================
    // Memoization
    // =========================================================================

    /// Memo settings for `key`, honoring the debug flags and memo hooks.
    pub fn memo_options(&self, key: &str, flag: DebugFlag) -> MemoOptions {
        let config = self.config();
        let flag_on = match flag {
            DebugFlag::Table => config.debug_table,
            DebugFlag::Columns => config.debug_columns,
            DebugFlag::Rows => config.debug_rows,
            DebugFlag::Cells => config.debug_cells,
            DebugFlag::Headers => config.debug_headers,
        };
        let debug = config.debug_all.unwrap_or(false) || flag_on.unwrap_or(false);
        let hooks = self.options().memo_hooks.clone().unwrap_or_default();
        MemoOptions::new(key).with_debug(debug).with_hooks(hooks)
    }

    pub(crate) fn memo<D, R>(&self, key: &'static str, flag: DebugFlag, deps: D, compute: impl FnOnce(&D) -> R) -> Rc<R>
    where
        D: PartialEq + 'static,
        R: 'static,
    {
        self.memos.get(key, || self.memo_options(key, flag), deps, compute)
    }

    // =========================================================================
    // Row model stages
    // =========================================================================

    /// The per-table getter of a stage, created from its factory on first use.
    fn row_model_fn(
        &self,
        stage: &'static str,
        factory: impl FnOnce(&TableOptions<T>) -> Option<RowModelFactory<T>>,
    ) -> Option<RowModelFn<T>> {
        let existing = self.row_models.borrow().get(stage).cloned();
        if existing.is_some() {
            return existing;
        }
        let factory = factory(&self.options())?;
        let getter = factory(self);
        self.row_models.borrow_mut().insert(stage, getter.clone());
        Some(getter)
    }

    /// Runs a stage, or passes `upstream` through when the stage is manual,
    /// its feature is missing or no factory is configured.
    pub(crate) fn run_stage(
        &self,
        stage: &'static str,
        kind: FeatureKind,
        manual: Option<bool>,
        factory: impl FnOnce(&TableOptions<T>) -> Option<RowModelFactory<T>>,
        upstream: impl FnOnce() -> Rc<RowModel<T>>,
    ) -> Rc<RowModel<T>> {
        if !self.has_feature(kind) || manual.unwrap_or(false) {
            return upstream();
        }
        match self.row_model_fn(stage, factory) {
            Some(getter) => getter(self),
            None => upstream(),
        }
    }

    /// Rows built from the data, before any feature stage.
    pub fn get_core_row_model(&self) -> Rc<RowModel<T>> {
        match self.row_model_fn("core", |options| options.get_core_row_model.clone()) {
            Some(getter) => getter(self),
            None => self.memo("emptyRowModel", DebugFlag::Rows, (), |_| RowModel::default()),
        }
    }

    /// The final row model, as displayed.
    pub fn get_row_model(&self) -> Rc<RowModel<T>> {
        self.get_pagination_row_model()
    }

    /// Looks a row up by id in the displayed rows (or every pre-pagination
    /// row with `search_all`), then in the core rows.
    pub fn get_row(&self, id: &str, search_all: bool) -> Result<Rc<Row<T>>> {
        let model = if search_all {
            self.get_pre_pagination_row_model()
        } else {
            self.get_row_model()
        };
        if let Some(row) = model.row(id) {
            return Ok(row.clone());
        }
        self.get_core_row_model()
            .row(id)
            .cloned()
            .ok_or_else(|| TableError::row_not_found(id))
    }

    pub(crate) fn warn_positional_row_ids(&self) {
        if !self.warned_row_ids.replace(true) {
            log::warn!("no get_row_id configured; row ids are positional and change when rows are inserted or removed");
        }
    }

    // =========================================================================
    // Entity construction
    // =========================================================================

    /// Builds a row and runs every feature's row hook.
    pub(crate) fn create_row(
        &self,
        id: String,
        original: Rc<T>,
        index: usize,
        depth: usize,
        parent_id: Option<String>,
    ) -> Row<T> {
        let accessors = self.column_accessors();
        let cells_memo = self.memo_options("row.getAllCells", DebugFlag::Rows);
        let mut row = Row::new(id, original, index, depth, parent_id, accessors, cells_memo);
        row.features = self.feature_set;
        for feature in self.features.iter() {
            feature.create_row(&mut row, self);
        }
        row
    }

    /// Value accessors of the current column tree; replaced whenever the
    /// columns are rebuilt.
    pub(crate) fn column_accessors(&self) -> Rc<ColumnAccessors<T>> {
        self.columns.borrow().accessors.clone()
    }

    pub(crate) fn create_cell(&self, row: &Rc<Row<T>>, column: Rc<Column<T>>) -> Cell<T> {
        let mut cell = Cell::new(row, column);
        cell.features = self.feature_set;
        for feature in self.features.iter() {
            feature.create_cell(&mut cell, self);
        }
        cell
    }

    pub(crate) fn augment_header(&self, header: &mut Header<T>) {
        header.features = self.feature_set;
        for feature in self.features.iter() {
            feature.create_header(header, self);
        }
    }

    fn build_columns(&self, defs: &[ColumnDef<T>], default_column: &ColumnDef<T>) -> Result<ColumnTree<T>> {
        let mut accessors = ColumnAccessors::default();
        let mut seen = HashSet::new();
        let all = self.build_column_level(defs, default_column, 0, None, &mut accessors, &mut seen)?;
        Ok(ColumnTree::new(all, accessors))
    }

    fn build_column_level(
        &self,
        defs: &[ColumnDef<T>],
        default_column: &ColumnDef<T>,
        depth: usize,
        parent_id: Option<&str>,
        accessors: &mut ColumnAccessors<T>,
        seen: &mut HashSet<String>,
    ) -> Result<Vec<Rc<Column<T>>>> {
        let mut columns = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let resolved = def.merged_over(default_column);
            let id = resolved.resolve_id().ok_or(TableError::MissingColumnId { index })?;
            if !seen.insert(id.clone()) {
                return Err(TableError::duplicate_column_id(id));
            }
            let children = self.build_column_level(&def.columns, default_column, depth + 1, Some(&id), accessors, seen)?;
            let mut column = Column::new(id.clone(), depth, resolved, children, parent_id.map(str::to_string));
            accessors.insert(id, &column.column_def, column.accessor_fn.clone());
            column.features = self.feature_set;
            for feature in self.features.iter() {
                feature.create_column(&mut column, self);
            }
            columns.push(Rc::new(column));
        }
        Ok(columns)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Top-level columns.
    pub fn get_all_columns(&self) -> Rc<Vec<Rc<Column<T>>>> {
        self.columns.borrow().all.clone()
    }

    /// Every column, parents before children.
    pub fn get_all_flat_columns(&self) -> Rc<Vec<Rc<Column<T>>>> {
        self.columns.borrow().flat.clone()
    }

    /// Leaf columns in display order: explicit column order first, then the
    /// grouped-column mode.
    pub fn get_all_leaf_columns(&self) -> Rc<Vec<Rc<Column<T>>>> {
        let leaf = self.columns.borrow().leaf.clone();
        let state = self.get_state();
        let deps = (
            ById(leaf),
            state.column_order().to_vec(),
            state.grouping().to_vec(),
            self.config().grouped_column_mode,
        );
        self.memo("getAllLeafColumns", DebugFlag::Columns, deps, |(leaf, order, grouping, mode)| {
            order_leaf_columns(leaf.0.to_vec(), order, grouping, *mode)
        })
    }

    /// Orders leaf columns the way the table displays them.
    pub(crate) fn order_columns(&self, columns: Vec<Rc<Column<T>>>) -> Vec<Rc<Column<T>>> {
        let state = self.get_state();
        order_leaf_columns(
            columns,
            state.column_order(),
            state.grouping(),
            self.config().grouped_column_mode,
        )
    }

    pub fn get_column(&self, id: &str) -> Option<Rc<Column<T>>> {
        let column = self.columns.borrow().by_id.get(id).cloned();
        if column.is_none() {
            log::debug!("column '{}' not found", id);
        }
        column
    }

    /// Like [`Table::get_column`], failing for unknown ids.
    pub fn column(&self, id: &str) -> Result<Rc<Column<T>>> {
        self.get_column(id).ok_or_else(|| TableError::column_not_found(id))
    }

    // =========================================================================
    // Features
    // =========================================================================

    /// Returns `true` when `kind` is registered.
    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.feature_set.contains(kind)
    }

    /// Features in registration order.
    pub fn features(&self) -> &[Rc<dyn TableFeature<T>>] {
        &self.features
    }

    /// Checks that every named filter, sorting and aggregation function
    /// referenced by a column (and the global filter) resolves.
    pub fn validate_fns(&self) -> Result<()> {
        let options = self.options();
        for column in self.get_all_flat_columns().iter() {
            let def = column.column_def();
            if let Some(name) = unknown_name(def.filter_fn.as_ref(), |name| {
                options.filter_fns.contains_key(name) || builtin_filter_fn::<T>(name).is_some()
            }) {
                return Err(TableError::UnknownFilterFn {
                    column: column.id.clone(),
                    name,
                });
            }
            if let Some(name) = unknown_name(def.sorting_fn.as_ref(), |name| {
                options.sorting_fns.contains_key(name) || builtin_sorting_fn::<T>(name).is_some()
            }) {
                return Err(TableError::UnknownSortingFn {
                    column: column.id.clone(),
                    name,
                });
            }
            if let Some(name) = unknown_name(def.aggregation_fn.as_ref(), |name| {
                options.aggregation_fns.contains_key(name) || builtin_aggregation_fn::<T>(name).is_some()
            }) {
                return Err(TableError::UnknownAggregationFn {
                    column: column.id.clone(),
                    name,
                });
            }
        }
        if let Some(name) = unknown_name(Some(&options.global_filter_fn), |name| {
            options.filter_fns.contains_key(name) || builtin_filter_fn::<T>(name).is_some()
        }) {
            return Err(TableError::UnknownFilterFn {
                column: GLOBAL_FILTER_ID.to_string(),
                name,
            });
        }
        Ok(())
    }
}

/// The key of a named strategy that `known` does not recognize.
fn unknown_name<F>(strategy: Option<&StrategyRef<F>>, known: impl Fn(&str) -> bool) -> Option<String> {
    let name = strategy?.name()?;
    (!known(name)).then(|| name.to_string())
}

fn resolve_default_column<T: RowData>(options: &TableOptions<T>, feature_column_def: &ColumnDef<T>) -> ColumnDef<T> {
    match &options.default_column {
        Some(default_column) => default_column.merged_over(feature_column_def),
        None => feature_column_def.clone(),
    }
}
