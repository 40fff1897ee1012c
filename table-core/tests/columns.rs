use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::json;
use table_core::core::Column;
use table_core::core::ColumnDef;
use table_core::core::ColumnPinningPosition;
use table_core::core::RowPinningPosition;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;

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

fn by_id(row: &Json, _: usize, _: Option<&str>) -> String {
    row["id"].as_str().unwrap_or_default().to_string()
}

/// `Person` groups `name` and `age`; `dept` sits beside it.
fn grouped_columns() -> Vec<ColumnDef<Json>> {
    vec![
        ColumnDef::group("Person", vec![ColumnDef::accessor("name"), ColumnDef::accessor("age")]),
        ColumnDef::accessor("dept"),
    ]
}

fn table_with(columns: Vec<ColumnDef<Json>>, config: TableConfig) -> Table<Json> {
    let options = TableOptions::new(people(), columns)
        .with_all_row_models()
        .with_row_id(by_id)
        .with_config(config);
    Table::new(options).unwrap()
}

fn leaf_ids(columns: &[Rc<Column<Json>>]) -> Vec<String> {
    columns.iter().map(|column| column.id().to_string()).collect()
}

// ============================================================================
// Column Tree
// ============================================================================

#[test]
fn test_group_columns_resolve_ids_and_leaves() {
    let table = table_with(grouped_columns(), TableConfig::new());
    assert_eq!(table.get_all_columns().len(), 2);
    assert_eq!(table.get_all_flat_columns().len(), 4);
    assert_eq!(leaf_ids(&table.get_all_leaf_columns()), vec!["name", "age", "dept"]);

    let person = table.column("Person").unwrap();
    assert_eq!(leaf_ids(&person.get_leaf_columns(&table)), vec!["name", "age"]);
    assert!(table.column("missing").is_err());
}

#[test]
fn test_column_order_moves_listed_ids_first() {
    let table = table_with(grouped_columns(), TableConfig::new());
    table.set_column_order(vec!["dept".to_string(), "missing".to_string(), "age".to_string()]);
    assert_eq!(leaf_ids(&table.get_all_leaf_columns()), vec!["dept", "age", "name"]);

    let name = table.column("name").unwrap();
    assert_eq!(name.get_index(&table, None), Some(2));
    assert!(name.get_is_last_column(&table, None));

    table.reset_column_order(true);
    assert_eq!(leaf_ids(&table.get_all_leaf_columns()), vec!["name", "age", "dept"]);
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_hidden_columns_leave_visible_leaves() {
    let table = table_with(grouped_columns(), TableConfig::new());
    let age = table.column("age").unwrap();
    age.toggle_visibility(&table, Some(false));

    assert!(!age.get_is_visible(&table));
    assert_eq!(leaf_ids(&table.get_visible_leaf_columns()), vec!["name", "dept"]);
    assert!(table.column("Person").unwrap().get_is_visible(&table));
    assert!(!table.get_is_all_columns_visible());
    assert!(table.get_is_some_columns_visible());

    let row = table.get_row("1", false).unwrap();
    assert_eq!(row.get_visible_cells(&table).len(), 2);
}

#[test]
fn test_toggle_all_keeps_unhideable_columns() {
    let columns = vec![ColumnDef::accessor("name").with_enable_hiding(false), ColumnDef::accessor("age")];
    let table = table_with(columns, TableConfig::new());
    table.toggle_all_columns_visible(Some(false));
    assert_eq!(leaf_ids(&table.get_visible_leaf_columns()), vec!["name"]);

    table.column("name").unwrap().toggle_visibility(&table, Some(false));
    assert!(table.column("name").unwrap().get_is_visible(&table));

    table.toggle_all_columns_visible(None);
    assert!(table.get_is_all_columns_visible());
}

// ============================================================================
// Pinning
// ============================================================================

#[test]
fn test_column_pinning_splits_regions() {
    let table = table_with(grouped_columns(), TableConfig::new());
    let dept = table.column("dept").unwrap();
    dept.pin(&table, Some(ColumnPinningPosition::Left));

    assert_eq!(dept.get_is_pinned(&table), Some(ColumnPinningPosition::Left));
    assert_eq!(dept.get_pinned_index(&table), Some(0));
    assert_eq!(leaf_ids(&table.get_left_leaf_columns()), vec!["dept"]);
    assert_eq!(leaf_ids(&table.get_center_leaf_columns()), vec!["name", "age"]);
    assert!(table.get_is_some_columns_pinned(None));

    let person = table.column("Person").unwrap();
    person.pin(&table, Some(ColumnPinningPosition::Right));
    assert_eq!(leaf_ids(&table.get_right_leaf_columns()), vec!["name", "age"]);
    assert!(table.get_center_leaf_columns().is_empty());

    person.pin(&table, None);
    assert_eq!(person.get_is_pinned(&table), None);
    assert_eq!(table.get_state().column_pinning().left, vec!["dept".to_string()]);
}

#[test]
fn test_row_pinning_moves_rows_out_of_the_center() {
    let table = table_with(grouped_columns(), TableConfig::new());
    let grace = table.get_row("3", false).unwrap();
    grace.pin(&table, Some(RowPinningPosition::Top), false, false);

    assert_eq!(grace.get_is_pinned(&table), Some(RowPinningPosition::Top));
    let top: Vec<String> = table.get_top_rows().iter().map(|row| row.id().to_string()).collect();
    assert_eq!(top, vec!["3"]);
    let center: Vec<String> = table.get_center_rows().iter().map(|row| row.id().to_string()).collect();
    assert_eq!(center, vec!["1", "2", "4", "5", "6"]);
    assert!(table.get_bottom_rows().is_empty());
}

#[test]
fn test_pinned_rows_stay_when_paged_away() {
    let table = table_with(grouped_columns(), TableConfig::new());
    table.get_row("6", false).unwrap().pin(&table, Some(RowPinningPosition::Bottom), false, false);
    table.set_page_size(2_usize);

    let bottom: Vec<String> = table.get_bottom_rows().iter().map(|row| row.id().to_string()).collect();
    assert_eq!(bottom, vec!["6"]);
}

#[test]
fn test_pinned_rows_follow_the_page_without_keep() {
    let table = table_with(grouped_columns(), TableConfig::new().with_keep_pinned_rows(false));
    table.get_row("6", false).unwrap().pin(&table, Some(RowPinningPosition::Bottom), false, false);
    table.set_page_size(2_usize);
    assert!(table.get_bottom_rows().is_empty());
}

// ============================================================================
// Sizing
// ============================================================================

#[test]
fn test_sizes_default_and_follow_the_state() {
    let table = table_with(grouped_columns(), TableConfig::new());
    assert_eq!(table.get_total_size(), 450.0);

    let mut sizing = BTreeMap::new();
    sizing.insert("age".to_string(), 80.0);
    table.set_column_sizing(sizing);
    assert_eq!(table.get_total_size(), 380.0);

    let dept = table.column("dept").unwrap();
    assert_eq!(dept.get_start(&table, None), 230.0);
    assert_eq!(table.column("name").unwrap().get_after(&table, None), 230.0);

    table.column("age").unwrap().reset_size(&table);
    assert_eq!(table.get_total_size(), 450.0);
}

#[test]
fn test_sizes_clamp_to_bounds() {
    let columns = vec![ColumnDef::accessor("name").with_size(10.0), ColumnDef::accessor("age").with_size(500.0).with_max_size(300.0)];
    let table = table_with(columns, TableConfig::new());
    assert_eq!(table.column("name").unwrap().get_size(&table), 20.0);
    assert_eq!(table.column("age").unwrap().get_size(&table), 300.0);
}

#[test]
fn test_pinned_region_sizes() {
    let table = table_with(grouped_columns(), TableConfig::new());
    table.column("dept").unwrap().pin(&table, Some(ColumnPinningPosition::Left));
    assert_eq!(table.get_left_total_size(), 150.0);
    assert_eq!(table.get_center_total_size(), 300.0);
    assert_eq!(table.get_right_total_size(), 0.0);
}

// ============================================================================
// Headers
// ============================================================================

#[test]
fn test_header_groups_span_their_leaves() {
    let table = table_with(grouped_columns(), TableConfig::new());
    let groups = table.get_header_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].depth, 0);
    assert_eq!(groups[1].depth, 1);

    let top = &groups[0].headers;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].column().id(), "Person");
    assert_eq!(top[0].col_span(), 2);
    assert!(!top[0].is_placeholder());
    assert_eq!(top[1].column().id(), "dept");
    assert!(top[1].is_placeholder());

    let leaves: Vec<&str> = groups[1].headers.iter().map(|header| header.column().id()).collect();
    assert_eq!(leaves, vec!["name", "age", "dept"]);
    // each leaf header followed by its ancestors
    assert_eq!(table.get_leaf_headers().len(), 5);
}

#[test]
fn test_header_sizes_sum_their_leaves() {
    let table = table_with(grouped_columns(), TableConfig::new());
    let groups = table.get_header_groups();
    let person = &groups[0].headers[0];
    assert_eq!(person.get_size(&table), 300.0);
    assert_eq!(groups[0].headers[1].get_start(&table, &groups[0]), 300.0);
}

#[test]
fn test_hidden_leaf_shrinks_its_group_header() {
    let table = table_with(grouped_columns(), TableConfig::new());
    table.column("age").unwrap().toggle_visibility(&table, Some(false));
    let groups = table.get_header_groups();
    assert_eq!(groups[0].headers[0].col_span(), 1);
    assert_eq!(groups[1].headers.len(), 2);
}

#[test]
fn test_flat_columns_without_groups_have_one_header_row() {
    let columns = vec![ColumnDef::accessor("name"), ColumnDef::accessor("age")];
    let table = table_with(columns, TableConfig::new());
    let groups = table.get_header_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].headers.len(), 2);
    assert_eq!(table.get_footer_groups().len(), 1);
}
