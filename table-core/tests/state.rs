use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TestLogger;
use table_core::core::ColumnDef;
use table_core::core::ColumnFilter;
use table_core::core::ColumnSort;
use table_core::core::DebugFlag;
use table_core::core::PaginationState;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;
use table_core::core::TableState;
use table_core::core::Updater;
use table_core::memo::MemoHooks;
use table_core::TableError;

type Json = serde_json::Value;

fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

fn people() -> Vec<Json> {
    vec![
        json!({"id": "1", "name": "Ada", "age": 36, "dept": "eng"}),
        json!({"id": "2", "name": "Alan", "age": 41, "dept": "eng"}),
        json!({"id": "3", "name": "Grace", "age": 85, "dept": "ops"}),
        json!({"id": "4", "name": "Linus", "age": 28, "dept": "ops"}),
        json!({"id": "5", "name": "Barbara", "age": 50, "dept": "eng"}),
        json!({"id": "6", "name": "Edsger", "age": 72, "dept": "research"}),
    ]
}

fn by_id(row: &Json, _: usize, _: Option<&str>) -> String {
    row["id"].as_str().unwrap_or_default().to_string()
}

fn options() -> TableOptions<Json> {
    let columns = vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("age"),
        ColumnDef::accessor("dept"),
    ];
    TableOptions::new(people(), columns).with_all_row_models().with_row_id(by_id)
}

fn tree_table(config: TableConfig) -> Table<Json> {
    let data = vec![
        json!({"id": "a", "name": "fruit", "children": [{"id": "a1", "name": "apple"}, {"id": "a2", "name": "pear"}]}),
        json!({"id": "b", "name": "veg", "children": [{"id": "b1", "name": "leek"}]}),
    ];
    let options = TableOptions::new(data, vec![ColumnDef::accessor("name")])
        .with_all_row_models()
        .with_row_id(by_id)
        .with_sub_rows(|row: &Json, _| row["children"].as_array().cloned())
        .with_config(config);
    Table::new(options).unwrap()
}

fn row_ids(table: &Table<Json>) -> Vec<String> {
    table.get_row_model().rows.iter().map(|row| row.id().to_string()).collect()
}

fn sorting(sorts: Vec<ColumnSort>) -> TableState {
    TableState {
        sorting: Some(sorts),
        ..TableState::default()
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_duplicate_column_ids_fail() {
    let columns: Vec<ColumnDef<Json>> = vec![ColumnDef::accessor("name"), ColumnDef::accessor("name")];
    let err = Table::new(TableOptions::new(people(), columns)).unwrap_err();
    assert_eq!(err, TableError::duplicate_column_id("name"));
    assert!(err.is_configuration());
}

#[test]
fn test_columns_need_an_id() {
    let columns: Vec<ColumnDef<Json>> = vec![ColumnDef::new()];
    let err = Table::new(TableOptions::new(people(), columns)).unwrap_err();
    assert!(matches!(err, TableError::MissingColumnId { index: 0 }));
}

#[test]
fn test_failed_column_rebuild_keeps_the_old_tree() {
    let table = Table::new(options()).unwrap();
    let result = table.set_columns(vec![ColumnDef::accessor("age"), ColumnDef::accessor("age")]);
    assert!(result.is_err());
    assert_eq!(table.get_all_leaf_columns().len(), 3);
}

#[test]
fn test_feature_initial_state() {
    let table = Table::new(options()).unwrap();
    let state = table.get_state();
    assert_eq!(state.pagination(), PaginationState::default());
    assert!(state.sorting().is_empty());
    assert!(state.global_filter().is_null());
    assert_eq!(*state, *table.initial_state());
}

#[test]
fn test_without_features_updates_are_ignored() {
    let table = Table::new(options().with_features(Vec::new())).unwrap();
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert!(table.get_state().sorting.is_none());
    assert_eq!(row_ids(&table), vec!["1", "2", "3", "4", "5", "6"]);
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_functional_updaters_see_the_current_value() {
    let table = Table::new(options()).unwrap();
    table.set_page_size(2_usize);
    table.set_page_index(Updater::with(|index: &usize| index + 2));
    assert_eq!(table.get_state().pagination().page_index, 2);
    assert_eq!(row_ids(&table), vec!["5", "6"]);
}

#[test]
fn test_set_state_replaces_the_internal_state() {
    let table = Table::new(options()).unwrap();
    table.set_state(Updater::with(|state: &TableState| TableState {
        sorting: Some(vec![ColumnSort::asc("age")]),
        ..state.clone()
    }));
    assert_eq!(row_ids(&table), vec!["4", "1", "2", "5", "6", "3"]);
}

#[test]
fn test_reset_restores_the_initial_state() {
    let initial = TableState {
        pagination: Some(PaginationState {
            page_index: 0,
            page_size: 2,
        }),
        ..TableState::default()
    };
    let table = Table::new(options().with_initial_state(initial)).unwrap();
    assert_eq!(row_ids(&table), vec!["1", "2"]);

    table.set_sorting(vec![ColumnSort::desc("age")]);
    table.set_page_size(4_usize);
    table.reset();
    assert_eq!(*table.get_state(), *table.initial_state());
    assert_eq!(row_ids(&table), vec!["1", "2"]);

    table.reset_page_size(true);
    assert_eq!(table.get_state().pagination().page_size, 10);
    table.reset_page_size(false);
    assert_eq!(table.get_state().pagination().page_size, 2);
}

#[test]
fn test_change_callbacks_take_over_the_slice() {
    let seen: Rc<RefCell<Vec<Vec<ColumnSort>>>> = Rc::default();
    let sink = seen.clone();
    let table = Table::new(options().on_sorting_change(move |next| sink.borrow_mut().push(next))).unwrap();

    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(*seen.borrow(), vec![vec![ColumnSort::desc("age")]]);
    assert!(table.get_state().sorting().is_empty());
    assert_eq!(row_ids(&table), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_controlled_slices_win() {
    let table = Table::new(options().with_state(sorting(vec![ColumnSort::desc("age")]))).unwrap();
    assert_eq!(row_ids(&table), vec!["3", "6", "5", "2", "1", "4"]);

    table.set_sorting(vec![ColumnSort::asc("age")]);
    assert_eq!(table.get_state().sorting(), &[ColumnSort::desc("age")]);

    table
        .set_options(|options| options.state = Some(Rc::new(sorting(vec![ColumnSort::asc("age")]))))
        .unwrap();
    assert_eq!(row_ids(&table), vec!["4", "1", "2", "5", "6", "3"]);
}

#[test]
fn test_controlled_loop_through_callback() {
    let table = Rc::new(RefCell::new(None::<Rc<Table<Json>>>));
    let handle = table.clone();
    let built = Rc::new(
        Table::new(options().with_state(sorting(Vec::new())).on_sorting_change(move |next| {
            if let Some(table) = handle.borrow().as_ref() {
                table
                    .set_options(|options| options.state = Some(Rc::new(sorting(next))))
                    .unwrap();
            }
        }))
        .unwrap(),
    );
    *table.borrow_mut() = Some(built.clone());

    built.column("name").unwrap().toggle_sorting(&built, None, false);
    assert_eq!(built.get_state().sorting(), &[ColumnSort::asc("name")]);
    assert_eq!(row_ids(&built), vec!["1", "2", "5", "6", "3", "4"]);
    table.borrow_mut().take();
}

#[test]
fn test_state_observer_sees_every_commit() {
    let commits = Rc::new(RefCell::new(Vec::new()));
    let sink = commits.clone();
    let table = Table::new(options().on_state_change(move |state: &TableState| {
        sink.borrow_mut().push(state.sorting().to_vec());
    }))
    .unwrap();

    table.set_sorting(vec![ColumnSort::desc("age")]);
    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);
    assert_eq!(commits.borrow().len(), 2);
    assert_eq!(commits.borrow()[0], vec![ColumnSort::desc("age")]);
    assert_eq!(table.get_state().sorting(), &[ColumnSort::desc("age")]);
}

#[test]
fn test_new_data_resets_the_page() {
    let table = Table::new(options()).unwrap();
    table.set_page_size(2_usize);
    table.set_page_index(2_usize);
    table.set_data(people()).unwrap();
    assert_eq!(table.get_state().pagination().page_index, 0);
}

#[test]
fn test_auto_reset_can_be_disabled() {
    let table = Table::new(options().with_config(TableConfig::new().with_auto_reset_page_index(false))).unwrap();
    table.set_page_size(2_usize);
    table.next_page();
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(table.get_state().pagination().page_index, 1);
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_memo_hooks_observe_recomputes() {
    let keys = Rc::new(RefCell::new(Vec::new()));
    let sink = keys.clone();
    let hooks = MemoHooks::new().with_before(move |key| sink.borrow_mut().push(key.to_string()));
    let table = Table::new(options().with_memo_hooks(hooks)).unwrap();

    table.set_sorting(vec![ColumnSort::desc("age")]);
    table.get_row_model();
    assert!(keys.borrow().iter().any(|key| key == "getSortedRowModel"));

    let before = keys.borrow().len();
    table.get_row_model();
    let sorted_again = keys.borrow()[before..].iter().any(|key| key == "getSortedRowModel");
    assert!(!sorted_again);
}

#[test]
fn test_debug_flags_log_recomputes() {
    init_logging();
    let table = Table::new(options().with_config(TableConfig::new().with_debug_all(true))).unwrap();
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert!(table.memo_options("getSortedRowModel", DebugFlag::Rows).debug);
    assert_eq!(row_ids(&table)[0], "3");
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selecting_a_parent_selects_its_children() {
    let table = tree_table(TableConfig::new());
    let fruit = table.get_row("a", true).unwrap();
    fruit.toggle_selected(&table, Some(true), true);

    assert!(fruit.get_is_selected(&table));
    assert!(fruit.get_is_all_sub_rows_selected(&table));
    let selected = table.get_selected_row_model();
    assert_eq!(selected.flat_rows.len(), 3);
    assert_eq!(selected.rows.len(), 1);
    assert_eq!(selected.rows[0].sub_rows().len(), 2);

    table.get_row("a1", true).unwrap().toggle_selected(&table, Some(false), true);
    assert!(fruit.get_is_some_selected(&table));
}

#[test]
fn test_toggle_all_rows() {
    let table = tree_table(TableConfig::new());
    table.toggle_all_rows_selected(Some(true));
    assert_eq!(table.get_state().row_selection().len(), 5);
    assert!(table.get_is_all_rows_selected());
    assert!(!table.get_is_some_rows_selected());

    table.toggle_all_rows_selected(None);
    assert!(table.get_state().row_selection().is_empty());
    assert!(table.get_selected_row_model().rows.is_empty());
}

#[test]
fn test_single_selection_replaces_the_previous_row() {
    let table = Table::new(options().with_config(TableConfig::new().with_enable_multi_row_selection(false))).unwrap();
    table.get_row("1", true).unwrap().toggle_selected(&table, Some(true), false);
    table.get_row("2", true).unwrap().toggle_selected(&table, Some(true), false);

    let selection = table.get_state().row_selection().clone();
    assert_eq!(selection.keys().collect::<Vec<_>>(), vec!["2"]);
}

#[test]
fn test_filtered_selection_and_page_selection() {
    let table = Table::new(options()).unwrap();
    table.toggle_all_rows_selected(Some(true));
    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);
    assert_eq!(table.get_filtered_selected_row_model().rows.len(), 4);
    assert_eq!(table.get_selected_row_model().rows.len(), 6);

    table.reset_row_selection(true);
    table.set_page_size(2_usize);
    table.toggle_all_page_rows_selected(Some(true));
    assert!(table.get_is_all_page_rows_selected());
    assert!(table.get_is_some_rows_selected());
    assert_eq!(table.get_state().row_selection().len(), 2);
}

#[test]
fn test_rows_can_opt_out_of_selection() {
    let table = Table::new(options().with_can_select_row(|row| row.id() != "3")).unwrap();
    table.toggle_all_rows_selected(Some(true));
    assert_eq!(table.get_state().row_selection().len(), 5);
    assert!(table.get_is_all_rows_selected());
    assert!(!table.get_row("3", true).unwrap().get_can_select(&table));
}
