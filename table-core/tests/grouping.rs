use std::rc::Rc;

use serde_json::json;
use table_core::core::ColumnDef;
use table_core::core::ColumnSort;
use table_core::core::GroupedColumnMode;
use table_core::core::Row;
use table_core::core::RowModel;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;
use table_core::fns::AggregationFn;
use table_core::Record;
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

fn by_id(row: &Json, _: usize, _: Option<&str>) -> String {
    row["id"].as_str().unwrap_or_default().to_string()
}

fn columns() -> Vec<ColumnDef<Json>> {
    vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("age"),
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

fn ids(model: &RowModel<Json>) -> Vec<String> {
    model.rows.iter().map(|row| row.id().to_string()).collect()
}

#[test]
fn test_groups_follow_first_appearance() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string()]);

    let model = table.get_row_model();
    assert_eq!(ids(&model), vec!["dept:eng", "dept:ops", "dept:research"]);

    let eng = &model.rows[0];
    assert!(eng.get_is_grouped());
    assert_eq!(eng.depth(), 0);
    assert_eq!(eng.grouping_column_id(), Some("dept"));
    assert_eq!(eng.grouping_value(), Some(&Value::from("eng")));
    assert_eq!(eng.leaf_rows().len(), 3);
}

#[test]
fn test_group_rows_aggregate_numbers() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string()]);

    let model = table.get_row_model();
    let eng = &model.rows[0];
    assert_eq!(eng.get_value("age"), Value::from(127));
    assert_eq!(eng.get_value("dept"), Value::from("eng"));
    assert!(eng.get_value("name").is_null());
}

#[test]
fn test_data_rows_move_below_their_group() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string()]);

    let model = table.get_grouped_row_model();
    let eng = model.row("dept:eng").unwrap();
    let members: Vec<&str> = eng.sub_rows().iter().map(|row| row.id()).collect();
    assert_eq!(members, vec!["1", "2", "5"]);

    let ada = model.row("1").unwrap();
    assert_eq!(ada.depth(), 1);
    assert_eq!(ada.parent_id(), Some("dept:eng"));
    assert_eq!(model.flat_rows.len(), 9);
}

#[test]
fn test_nested_groups() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string(), "name".to_string()]);

    let model = table.get_grouped_row_model();
    let eng = model.row("dept:eng").unwrap();
    let names: Vec<&str> = eng.sub_rows().iter().map(|row| row.id()).collect();
    assert_eq!(names, vec!["dept:eng>name:Ada", "dept:eng>name:Alan", "dept:eng>name:Barbara"]);
    assert_eq!(eng.leaf_rows().len(), 3);
    assert_eq!(eng.get_value("age"), Value::from(127));

    let ada = model.row("dept:eng>name:Ada").unwrap();
    assert_eq!(ada.depth(), 1);
    assert_eq!(ada.get_value("age"), Value::from(36));
    assert_eq!(model.row("1").map(|row| row.depth()), Some(2));
}

#[test]
fn test_grouping_sees_sorted_rows() {
    let table = table_with(columns(), TableConfig::new());
    table.set_sorting(vec![ColumnSort::desc("age")]);
    table.set_grouping(vec!["dept".to_string()]);

    let model = table.get_grouped_row_model();
    assert_eq!(ids(&model), vec!["dept:ops", "dept:research", "dept:eng"]);
    let eng: Vec<&str> = model.rows[2].sub_rows().iter().map(|row| row.id()).collect();
    assert_eq!(eng, vec!["5", "2", "1"]);
}

#[test]
fn test_unknown_grouping_ids_are_ignored() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["missing".to_string()]);
    assert!(Rc::ptr_eq(&table.get_grouped_row_model(), &table.get_sorted_row_model()));
}

#[test]
fn test_named_and_registered_aggregations() {
    let span: AggregationFn<Json> = Rc::new(|column_id: &str, leaf_rows: &[Rc<Row<Json>>], _: &[Rc<Row<Json>>]| {
        let ages: Vec<i64> = leaf_rows
            .iter()
            .filter_map(|row| match row.get_value(column_id) {
                Value::Int(age) => Some(age),
                _ => None,
            })
            .collect();
        let span = ages.iter().max().zip(ages.iter().min()).map(|(max, min)| max - min);
        span.map(Value::from).unwrap_or_default()
    });
    let columns = vec![
        ColumnDef::accessor("name").with_aggregation_fn("count"),
        ColumnDef::accessor("age").with_aggregation_fn("span"),
        ColumnDef::accessor_fn("oldest", |row: &Json, _| Value::from(&row["age"])).with_aggregation_fn("max"),
        ColumnDef::accessor("dept"),
    ];
    let options = TableOptions::new(people(), columns)
        .with_all_row_models()
        .with_row_id(by_id)
        .with_aggregation_fn("span", span);
    let table = Table::new(options).unwrap();
    table.set_grouping(vec!["dept".to_string()]);

    let eng = table.get_row("dept:eng", true).unwrap();
    assert_eq!(eng.get_value("name"), Value::from(3));
    assert_eq!(eng.get_value("age"), Value::from(14));
    assert_eq!(eng.get_value("oldest"), Value::from(50));
}

#[test]
fn test_grouping_resets_expansion_and_page() {
    let table = table_with(columns(), TableConfig::new());
    table.set_page_size(2_usize);
    table.next_page();
    table.set_grouping(vec!["dept".to_string()]);
    assert_eq!(table.get_state().pagination().page_index, 0);

    table.toggle_all_rows_expanded(Some(true));
    let expanded = ids(&table.get_pre_pagination_row_model());
    assert_eq!(expanded[..4], ["dept:eng", "1", "2", "5"]);

    table.set_grouping(vec!["name".to_string()]);
    assert!(table.get_state().expanded().is_empty());
}

// ============================================================================
// Columns and Cells
// ============================================================================

#[test]
fn test_grouped_columns_move_first() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string()]);
    let order: Vec<String> = table.get_all_leaf_columns().iter().map(|column| column.id().to_string()).collect();
    assert_eq!(order, vec!["dept", "name", "age"]);

    let column = table.column("dept").unwrap();
    assert!(column.get_is_grouped(&table));
    assert_eq!(column.get_grouped_index(&table), Some(0));
}

#[test]
fn test_grouped_columns_can_be_removed() {
    let table = table_with(columns(), TableConfig::new().with_grouped_column_mode(GroupedColumnMode::Remove));
    table.set_grouping(vec!["dept".to_string()]);
    let order: Vec<String> = table.get_all_leaf_columns().iter().map(|column| column.id().to_string()).collect();
    assert_eq!(order, vec!["name", "age"]);
}

#[test]
fn test_toggle_grouping() {
    let table = table_with(columns(), TableConfig::new());
    let dept = table.column("dept").unwrap();
    assert!(dept.get_can_group(&table));

    dept.toggle_grouping(&table);
    assert_eq!(table.get_state().grouping(), &["dept".to_string()]);
    table.column("dept").unwrap().toggle_grouping(&table);
    assert!(table.get_state().grouping().is_empty());
}

#[test]
fn test_cell_roles_in_grouped_rows() {
    let table = table_with(columns(), TableConfig::new());
    table.set_grouping(vec!["dept".to_string()]);

    let eng = table.get_row("dept:eng", true).unwrap();
    let cells = eng.get_all_cells_by_column_id(&table);
    assert!(cells["dept"].get_is_grouped(&table));
    assert!(cells["age"].get_is_aggregated(&table));

    let ada = table.get_row("1", true).unwrap();
    let cells = ada.get_all_cells_by_column_id(&table);
    assert!(cells["dept"].get_is_placeholder(&table));
    assert!(!cells["age"].get_is_aggregated(&table));
}

#[test]
fn test_integer_sum_overflow_falls_back_to_float() {
    let data = vec![
        Record::new().set("id", "1").set("team", "x").set("points", i64::MAX),
        Record::new().set("id", "2").set("team", "x").set("points", 1_i64),
        Record::new().set("id", "3").set("team", "y").set("points", 2_i64),
    ];
    let columns = vec![ColumnDef::accessor("team"), ColumnDef::accessor("points")];
    let options = TableOptions::new(data, columns)
        .with_all_row_models()
        .with_row_id(|row: &Record, _, _| row.get_str("id").unwrap_or_default().to_string());
    let table = Table::new(options).unwrap();
    table.set_grouping(vec!["team".to_string()]);

    let x = table.get_row("team:x", true).unwrap();
    assert_eq!(x.get_value("points"), Value::Float(i64::MAX as f64 + 1.0));
    let y = table.get_row("team:y", true).unwrap();
    assert_eq!(y.get_value("points"), Value::from(2_i64));
}
