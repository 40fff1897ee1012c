use std::cmp::Ordering;
use std::rc::Rc;

use serde_json::json;
use table_core::core::ColumnDef;
use table_core::core::ColumnSort;
use table_core::core::Row;
use table_core::core::RowModel;
use table_core::core::SortDirection;
use table_core::core::SortUndefined;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;
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

fn table_with(columns: Vec<ColumnDef<Json>>, data: Vec<Json>, config: TableConfig) -> Table<Json> {
    let options = TableOptions::new(data, columns)
        .with_all_row_models()
        .with_row_id(by_id)
        .with_config(config);
    Table::new(options).unwrap()
}

fn people_table() -> Table<Json> {
    let columns = vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("age"),
        ColumnDef::accessor("dept"),
    ];
    table_with(columns, people(), TableConfig::new())
}

fn ids(model: &RowModel<Json>) -> Vec<String> {
    model.rows.iter().map(|row| row.id().to_string()).collect()
}

#[test]
fn test_sort_descending_by_number() {
    let table = people_table();
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(ids(&table.get_row_model()), vec!["3", "6", "5", "2", "1", "4"]);
}

#[test]
fn test_multi_sort_breaks_ties_with_later_entries() {
    let table = people_table();
    table.set_sorting(vec![ColumnSort::asc("dept"), ColumnSort::desc("age")]);
    assert_eq!(ids(&table.get_row_model()), vec!["5", "2", "1", "3", "4", "6"]);
}

#[test]
fn test_ties_keep_upstream_order() {
    let table = people_table();
    table.set_sorting(vec![ColumnSort::asc("dept")]);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "5", "3", "4", "6"]);
}

#[test]
fn test_toggle_cycles_through_directions() {
    let table = people_table();
    let name = table.column("name").unwrap();
    assert_eq!(name.get_first_sort_dir(&table), SortDirection::Asc);

    name.toggle_sorting(&table, None, false);
    assert_eq!(name.get_is_sorted(&table), Some(SortDirection::Asc));
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "5", "6", "3", "4"]);

    name.toggle_sorting(&table, None, false);
    assert_eq!(name.get_is_sorted(&table), Some(SortDirection::Desc));

    name.toggle_sorting(&table, None, false);
    assert_eq!(name.get_is_sorted(&table), None);
    assert!(table.get_state().sorting().is_empty());
}

#[test]
fn test_numbers_sort_descending_first() {
    let table = people_table();
    let age = table.column("age").unwrap();
    age.toggle_sorting(&table, None, false);
    assert_eq!(table.get_state().sorting(), &[ColumnSort::desc("age")]);
}

#[test]
fn test_multi_toggle_appends_a_sort() {
    let table = people_table();
    table.column("dept").unwrap().toggle_sorting(&table, None, false);
    table.column("age").unwrap().toggle_sorting(&table, Some(false), true);

    let age = table.column("age").unwrap();
    assert_eq!(age.get_sort_index(&table), Some(1));
    assert_eq!(
        table.get_state().sorting(),
        &[ColumnSort::asc("dept"), ColumnSort::asc("age")]
    );
}

#[test]
fn test_invert_sorting_flips_the_order() {
    let columns = vec![ColumnDef::accessor("name"), ColumnDef::accessor("age").with_invert_sorting(true)];
    let table = table_with(columns, people(), TableConfig::new());
    table.set_sorting(vec![ColumnSort::asc("age")]);
    assert_eq!(ids(&table.get_row_model()), vec!["3", "6", "5", "2", "1", "4"]);
}

#[test]
fn test_disabled_columns_are_skipped() {
    let columns = vec![ColumnDef::accessor("name"), ColumnDef::accessor("age").with_enable_sorting(false)];
    let table = table_with(columns, people(), TableConfig::new());
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_manual_sorting_passes_rows_through() {
    let columns = vec![ColumnDef::accessor("age")];
    let table = table_with(columns, people(), TableConfig::new().with_manual_sorting(true));
    table.set_sorting(vec![ColumnSort::desc("age")]);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn test_custom_sorting_fn() {
    let by_length: Rc<dyn Fn(&Row<Json>, &Row<Json>, &str) -> Ordering> = Rc::new(|a: &Row<Json>, b: &Row<Json>, column_id: &str| {
        let len = |row: &Row<Json>| row.get_value(column_id).to_string().len();
        len(a).cmp(&len(b))
    });
    let columns = vec![ColumnDef::accessor("name").with_custom_sorting_fn(by_length)];
    let table = table_with(columns, people(), TableConfig::new());
    table.set_sorting(vec![ColumnSort::asc("name")]);
    assert_eq!(ids(&table.get_row_model()), vec!["1", "2", "3", "4", "6", "5"]);
}

// ============================================================================
// Null Placement
// ============================================================================

fn scores() -> Vec<Json> {
    vec![
        json!({"id": "a", "score": 3}),
        json!({"id": "b", "score": null}),
        json!({"id": "c", "score": 1}),
    ]
}

#[test]
fn test_nulls_last_in_both_directions() {
    let columns = vec![ColumnDef::accessor("score").with_sort_undefined(SortUndefined::Last)];
    let table = table_with(columns, scores(), TableConfig::new());

    table.set_sorting(vec![ColumnSort::asc("score")]);
    assert_eq!(ids(&table.get_row_model()), vec!["c", "a", "b"]);
    table.set_sorting(vec![ColumnSort::desc("score")]);
    assert_eq!(ids(&table.get_row_model()), vec!["a", "c", "b"]);
}

#[test]
fn test_nulls_first() {
    let columns = vec![ColumnDef::accessor("score").with_sort_undefined(SortUndefined::First)];
    let table = table_with(columns, scores(), TableConfig::new());
    table.set_sorting(vec![ColumnSort::desc("score")]);
    assert_eq!(ids(&table.get_row_model()), vec!["b", "a", "c"]);
}

#[test]
fn test_nulls_greater_flip_with_direction() {
    let columns = vec![ColumnDef::accessor("score").with_sort_undefined(SortUndefined::Greater)];
    let table = table_with(columns, scores(), TableConfig::new());

    table.set_sorting(vec![ColumnSort::asc("score")]);
    assert_eq!(ids(&table.get_row_model()), vec!["c", "a", "b"]);
    table.set_sorting(vec![ColumnSort::desc("score")]);
    assert_eq!(ids(&table.get_row_model()), vec!["b", "a", "c"]);
}

// ============================================================================
// Nested Rows
// ============================================================================

#[test]
fn test_sub_rows_sort_within_their_parent() {
    let data = vec![
        json!({"id": "a", "name": "fruit", "children": [{"id": "a1", "name": "apple"}, {"id": "a2", "name": "pear"}]}),
        json!({"id": "b", "name": "veg", "children": [{"id": "b1", "name": "leek"}]}),
    ];
    let options = TableOptions::new(data, vec![ColumnDef::accessor("name")])
        .with_all_row_models()
        .with_row_id(by_id)
        .with_sub_rows(|row: &Json, _| row["children"].as_array().cloned());
    let table = Table::new(options).unwrap();
    table.set_sorting(vec![ColumnSort::desc("name")]);

    let model = table.get_sorted_row_model();
    assert_eq!(ids(&model), vec!["b", "a"]);
    let fruit: Vec<&str> = model.rows[1].sub_rows().iter().map(|row| row.id()).collect();
    assert_eq!(fruit, vec!["a2", "a1"]);
    assert_eq!(model.row("a2").map(|row| row.depth()), Some(1));
}

// ============================================================================
// Not-a-Number
// ============================================================================

fn measurements(values: &[f64]) -> Table<Record> {
    let data: Vec<Record> = values
        .iter()
        .enumerate()
        .map(|(i, x)| Record::new().set("id", i.to_string()).set("x", *x))
        .collect();
    let options = TableOptions::new(data, vec![ColumnDef::accessor("x")])
        .with_all_row_models()
        .with_row_id(|row: &Record, _, _| row.get_str("id").unwrap_or_default().to_string());
    Table::new(options).unwrap()
}

#[test]
fn test_nan_sorts_after_every_number() {
    let table = measurements(&[3.0, f64::NAN, 1.0, f64::NAN, 2.0]);
    table.set_sorting(vec![ColumnSort::asc("x")]);
    let ids: Vec<String> = table.get_row_model().rows.iter().map(|row| row.id().to_string()).collect();
    assert_eq!(ids, vec!["2", "4", "0", "1", "3"]);

    table.set_sorting(vec![ColumnSort::desc("x")]);
    let ids: Vec<String> = table.get_row_model().rows.iter().map(|row| row.id().to_string()).collect();
    assert_eq!(ids, vec!["1", "3", "0", "4", "2"]);
}

#[test]
fn test_many_nan_values_sort_without_panicking() {
    let values: Vec<f64> = (0..64)
        .map(|i| if i % 4 == 1 { f64::NAN } else { ((i * 37) % 64) as f64 - 20.0 })
        .collect();
    let table = measurements(&values);
    table.set_sorting(vec![ColumnSort::asc("x")]);

    let sorted: Vec<f64> = table
        .get_sorted_row_model()
        .rows
        .iter()
        .map(|row| row.get_value("x").as_f64().unwrap_or_default())
        .collect();
    assert_eq!(sorted.len(), 64);
    let numbers = &sorted[..48];
    assert!(numbers.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(sorted[48..].iter().all(|x| x.is_nan()));
    assert!(matches!(table.get_sorted_row_model().rows[63].get_value("x"), Value::Float(x) if x.is_nan()));
}
