use std::rc::Rc;

use serde_json::json;
use table_core::core::ColumnDef;
use table_core::core::ColumnSort;
use table_core::core::ExpandedState;
use table_core::core::RowModel;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;
use table_core::Value;

type Json = serde_json::Value;

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

fn tree() -> Vec<Json> {
    vec![
        json!({"id": "a", "name": "fruit", "children": [{"id": "a1", "name": "apple"}, {"id": "a2", "name": "pear"}]}),
        json!({"id": "b", "name": "veg", "children": [{"id": "b1", "name": "leek"}]}),
    ]
}

fn by_id(row: &Json, _: usize, _: Option<&str>) -> String {
    row["id"].as_str().unwrap_or_default().to_string()
}

fn children(row: &Json, _: usize) -> Option<Vec<Json>> {
    row["children"].as_array().cloned()
}

fn columns() -> Vec<ColumnDef<Json>> {
    vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("age"),
        ColumnDef::accessor("dept"),
    ]
}

fn people_table(config: TableConfig) -> Table<Json> {
    let options = TableOptions::new(people(), columns())
        .with_all_row_models()
        .with_row_id(by_id)
        .with_config(config);
    Table::new(options).unwrap()
}

fn tree_table(config: TableConfig) -> Table<Json> {
    let options = TableOptions::new(tree(), vec![ColumnDef::accessor("name")])
        .with_all_row_models()
        .with_row_id(by_id)
        .with_sub_rows(children)
        .with_config(config);
    Table::new(options).unwrap()
}

fn ids(model: &RowModel<Json>) -> Vec<String> {
    model.rows.iter().map(|row| row.id().to_string()).collect()
}

// ============================================================================
// Core Rows
// ============================================================================

#[test]
fn test_positional_ids_without_row_id_fn() {
    let options = TableOptions::new(tree(), vec![ColumnDef::accessor("name")]).with_sub_rows(children);
    let table = Table::new(options).unwrap();
    let core = table.get_core_row_model();

    assert_eq!(core.row_ids(), vec!["0", "1"]);
    assert_eq!(core.flat_rows.len(), 5);
    let nested = core.row("0.1").unwrap();
    assert_eq!(nested.depth(), 1);
    assert_eq!(nested.parent_id(), Some("0"));
    assert_eq!(nested.get_value("name"), Value::from("pear"));
}

#[test]
fn test_core_rows_keep_sub_rows_and_originals() {
    let table = tree_table(TableConfig::new());
    let core = table.get_core_row_model();

    let fruit = core.row("a").unwrap();
    assert_eq!(fruit.sub_rows().len(), 2);
    assert_eq!(fruit.original_sub_rows().map(|rows| rows.len()), Some(2));
    assert_eq!(fruit.original()["name"], json!("fruit"));
    assert!(core.rows_by_id.contains_key("b1"));
}

#[test]
fn test_row_model_is_memoized_until_inputs_change() {
    let table = people_table(TableConfig::new());
    let first = table.get_row_model();
    let second = table.get_row_model();
    assert!(Rc::ptr_eq(&first, &second));

    table.set_sorting(vec![ColumnSort::desc("age")]);
    let sorted = table.get_row_model();
    assert!(!Rc::ptr_eq(&first, &sorted));
    assert!(Rc::ptr_eq(&sorted, &table.get_row_model()));
}

#[test]
fn test_idle_stages_pass_the_upstream_model_through() {
    let table = people_table(TableConfig::new());
    let core = table.get_core_row_model();
    assert!(Rc::ptr_eq(&core, &table.get_filtered_row_model()));
    assert!(Rc::ptr_eq(&core, &table.get_sorted_row_model()));
    assert!(Rc::ptr_eq(&core, &table.get_grouped_row_model()));
    assert!(Rc::ptr_eq(&core, &table.get_expanded_row_model()));
}

#[test]
fn test_set_data_rebuilds_rows() {
    let table = people_table(TableConfig::new());
    assert_eq!(table.get_row_model().rows.len(), 6);

    table
        .set_data(vec![json!({"id": "9", "name": "Ken", "age": 80, "dept": "eng"})])
        .unwrap();
    let model = table.get_row_model();
    assert_eq!(ids(&model), vec!["9"]);
    assert_eq!(model.rows[0].get_value("age"), Value::from(80));
}

#[test]
fn test_get_row_searches_core_rows() {
    let table = people_table(TableConfig::new());
    table.set_page_size(2_usize);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2"]);
    assert_eq!(table.get_row("5", false).unwrap().id(), "5");
    assert!(table.get_row("nope", true).is_err());
}

// ============================================================================
// Expanding
// ============================================================================

#[test]
fn test_expanded_rows_follow_their_parent() {
    let table = tree_table(TableConfig::new());
    assert_eq!(ids(&table.get_row_model()), vec!["a", "b"]);

    let fruit = table.get_row("a", true).unwrap();
    assert!(fruit.get_can_expand(&table));
    fruit.toggle_expanded(&table, Some(true));
    assert_eq!(ids(&table.get_row_model()), vec!["a", "a1", "a2", "b"]);
    assert!(table.get_is_some_rows_expanded());
    assert!(!table.get_is_all_rows_expanded());

    table.toggle_all_rows_expanded(Some(true));
    assert_eq!(*table.get_state().expanded(), ExpandedState::All);
    assert_eq!(ids(&table.get_row_model()), vec!["a", "a1", "a2", "b", "b1"]);
    assert_eq!(table.get_expanded_depth(), 1);
}

#[test]
fn test_collapsing_restores_top_level_rows() {
    let table = tree_table(TableConfig::new());
    table.toggle_all_rows_expanded(Some(true));
    table.toggle_all_rows_expanded(Some(false));
    assert_eq!(ids(&table.get_row_model()), vec!["a", "b"]);
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_pages_slice_top_level_rows() {
    let table = people_table(TableConfig::new());
    table.set_page_size(4_usize);

    assert_eq!(table.get_page_count(), 2);
    assert_eq!(*table.get_page_options(), vec![0, 1]);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "3", "4"]);
    assert!(table.get_can_next_page());
    assert!(!table.get_can_previous_page());

    table.next_page();
    assert_eq!(ids(&table.get_row_model()), vec!["5", "6"]);
    assert!(!table.get_can_next_page());
    assert!(table.get_can_previous_page());
    assert_eq!(table.get_row_count(), 6);

    table.first_page();
    assert_eq!(table.get_state().pagination().page_index, 0);
}

#[test]
fn test_pages_cover_every_row_once_with_a_short_last_page() {
    let data: Vec<Json> = people().into_iter().take(5).collect();
    let options = TableOptions::new(data, columns())
        .with_all_row_models()
        .with_row_id(by_id);
    let table = Table::new(options).unwrap();
    table.set_page_size(2_usize);
    assert_eq!(table.get_page_count(), 3);

    table.first_page();
    let mut pages = vec![ids(&table.get_row_model())];
    while table.get_can_next_page() {
        table.next_page();
        pages.push(ids(&table.get_row_model()));
    }
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[2], vec!["5"]);
    let joined: Vec<String> = pages.concat();
    assert_eq!(joined, ids(&table.get_pre_pagination_row_model()));
}

#[test]
fn test_page_size_change_keeps_top_row() {
    let table = people_table(TableConfig::new());
    table.set_page_size(2_usize);
    table.set_page_index(2_usize);
    assert_eq!(ids(&table.get_row_model()), vec!["5", "6"]);

    table.set_page_size(3_usize);
    let pagination = table.get_state().pagination();
    assert_eq!(pagination.page_index, 1);
    assert_eq!(ids(&table.get_row_model()), vec!["4", "5", "6"]);
}

#[test]
fn test_page_index_clamps_to_configured_page_count() {
    let table = people_table(TableConfig::new().with_page_count(3));
    table.set_page_index(10_usize);
    assert_eq!(table.get_state().pagination().page_index, 2);
}

#[test]
fn test_expanded_rows_count_toward_the_page() {
    let table = tree_table(TableConfig::new());
    table.toggle_all_rows_expanded(Some(true));
    table.set_page_size(2_usize);

    let page = table.get_row_model();
    assert_eq!(ids(&page), vec!["a", "a1"]);
    assert_eq!(page.flat_rows.len(), 3);
}

#[test]
fn test_unpaginated_expansion_expands_the_page() {
    let table = tree_table(TableConfig::new().with_paginate_expanded_rows(false));
    table.toggle_all_rows_expanded(Some(true));
    table.set_page_size(1_usize);

    let page = table.get_row_model();
    assert_eq!(ids(&page), vec!["a", "a1", "a2"]);
    assert_eq!(page.flat_rows.len(), 3);
    assert!(page.rows_by_id.contains_key("b1"));
}

#[test]
fn test_manual_pagination_passes_rows_through() {
    let table = people_table(TableConfig::new().with_manual_pagination(true).with_page_count(-1));
    table.set_page_size(2_usize);
    assert_eq!(table.get_row_model().rows.len(), 6);
    assert!(table.get_can_next_page());
}
