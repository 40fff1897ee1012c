use serde_json::json;
use table_core::core::ColumnDef;
use table_core::core::ColumnFilter;
use table_core::core::Table;
use table_core::core::TableConfig;
use table_core::core::TableOptions;
use table_core::Value;

type Json = serde_json::Value;

fn people() -> Vec<Json> {
    vec![
        json!({"id": "1", "name": "Ada", "age": 36, "dept": "eng", "scores": [7, 9]}),
        json!({"id": "2", "name": "Alan", "age": 41, "dept": "eng", "scores": [3]}),
        json!({"id": "3", "name": "Grace", "age": 85, "dept": "ops", "scores": [10, 2]}),
        json!({"id": "4", "name": "Linus", "age": 28, "dept": "ops", "scores": []}),
        json!({"id": "5", "name": "Barbara", "age": 50, "dept": "eng", "scores": [5]}),
        json!({"id": "6", "name": "Edsger", "age": 72, "dept": "research", "scores": [1]}),
    ]
}

fn people_table(config: TableConfig) -> Table<Json> {
    let columns = vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("age"),
        ColumnDef::accessor("dept"),
        ColumnDef::accessor("scores"),
    ];
    let options = TableOptions::new(people(), columns)
        .with_all_row_models()
        .with_row_id(|row: &Json, _, _| row["id"].as_str().unwrap_or_default().to_string())
        .with_config(config);
    Table::new(options).unwrap()
}

#[test]
fn test_unique_values_respect_other_filters() {
    let table = people_table(TableConfig::new());
    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);

    let dept = table.column("dept").unwrap();
    let counts = dept.get_faceted_unique_values(&table);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get(&Value::from("eng")), Some(&3));
    assert_eq!(counts.get(&Value::from("ops")), Some(&1));
}

#[test]
fn test_unique_value_counts_add_up_to_the_faceted_rows() {
    let table = people_table(TableConfig::new());
    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);

    for id in ["name", "age", "dept"] {
        let column = table.column(id).unwrap();
        let total: usize = column.get_faceted_unique_values(&table).values().sum();
        assert_eq!(total, column.get_faceted_row_model(&table).flat_rows.len(), "{id}");
    }
}

#[test]
fn test_own_filter_is_ignored() {
    let table = people_table(TableConfig::new());
    table.set_column_filters(vec![ColumnFilter::new("name", "grace")]);

    let name = table.column("name").unwrap();
    assert_eq!(name.get_faceted_row_model(&table).rows.len(), 6);
    assert_eq!(name.get_faceted_unique_values(&table).len(), 6);
    assert_eq!(table.column("dept").unwrap().get_faceted_row_model(&table).rows.len(), 1);
}

#[test]
fn test_min_max_values() {
    let table = people_table(TableConfig::new());
    let age = table.column("age").unwrap();
    assert_eq!(age.get_faceted_min_max_values(&table), Some((28.0, 85.0)));

    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);
    assert_eq!(age.get_faceted_min_max_values(&table), Some((36.0, 85.0)));
}

#[test]
fn test_min_max_flattens_arrays() {
    let table = people_table(TableConfig::new());
    let scores = table.column("scores").unwrap();
    assert_eq!(scores.get_faceted_min_max_values(&table), Some((1.0, 10.0)));
    assert_eq!(table.column("name").unwrap().get_faceted_min_max_values(&table), None);
}

#[test]
fn test_custom_unique_values_count_each_member() {
    let columns = vec![
        ColumnDef::accessor("name"),
        ColumnDef::accessor("scores").with_unique_values(|row: &Json, _| {
            row["scores"].as_array().map(|scores| scores.iter().map(Value::from).collect()).unwrap_or_default()
        }),
    ];
    let data = vec![json!({"name": "a", "scores": [1, 2]}), json!({"name": "b", "scores": [2]})];
    let options = TableOptions::new(data, columns).with_all_row_models();
    let table = Table::new(options).unwrap();

    let counts = table.column("scores").unwrap().get_faceted_unique_values(&table);
    assert_eq!(counts.get(&Value::from(1)), Some(&1));
    assert_eq!(counts.get(&Value::from(2)), Some(&2));
}

#[test]
fn test_facets_are_memoized() {
    let table = people_table(TableConfig::new());
    let dept = table.column("dept").unwrap();
    let first = dept.get_faceted_unique_values(&table);
    assert!(std::rc::Rc::ptr_eq(&first, &dept.get_faceted_unique_values(&table)));

    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);
    assert!(!std::rc::Rc::ptr_eq(&first, &dept.get_faceted_unique_values(&table)));
}

// ============================================================================
// Global Facets
// ============================================================================

#[test]
fn test_global_facets_skip_the_global_filter() {
    let table = people_table(TableConfig::new());
    table.set_global_filter(Value::from("eng"));
    table.set_column_filters(vec![ColumnFilter::new("name", "a")]);

    assert_eq!(table.get_row_model().rows.len(), 3);
    assert_eq!(table.get_global_faceted_row_model().rows.len(), 4);

    let counts = table.get_global_faceted_unique_values();
    assert_eq!(counts.get(&Value::from("eng")), Some(&3));
    assert_eq!(counts.get(&Value::from("Grace")), Some(&1));
    assert_eq!(table.get_global_faceted_min_max_values(), Some((36.0, 85.0)));

    let dept = table.column("dept").unwrap().get_faceted_unique_values(&table);
    assert_eq!(dept.len(), 1);
}

#[test]
fn test_global_facets_under_manual_filtering() {
    let table = people_table(TableConfig::new().with_manual_filtering(true));
    table.set_global_filter(Value::from("eng"));
    assert_eq!(table.get_global_faceted_row_model().rows.len(), 6);
}
