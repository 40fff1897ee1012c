//! Aggregation functions

use std::collections::HashSet;
use std::rc::Rc;

use crate::core::Row;
use crate::model::RowData;
use crate::model::Value;
use crate::model::ValueKind;

/// Keys of the built-in aggregation functions.
pub const BUILTIN_AGGREGATION_FNS: &[&str] = &[
    "sum",
    "min",
    "max",
    "extent",
    "mean",
    "median",
    "unique",
    "uniqueCount",
    "count",
];

/// Aggregates a column over a group.
///
/// Receives the column id, the group's leaf rows and its direct child rows
/// (which are themselves group rows when groups nest).
pub type AggregationFn<T> = Rc<dyn Fn(&str, &[Rc<Row<T>>], &[Rc<Row<T>>]) -> Value>;

fn bounds<T: RowData>(column_id: &str, rows: &[Rc<Row<T>>]) -> Option<(Value, Value)> {
    let mut bounds: Option<(Value, Value)> = None;
    for row in rows {
        let value = row.get_value(column_id);
        if value.is_null() || value.as_f64().is_some_and(f64::is_nan) {
            continue;
        }
        bounds = Some(match bounds {
            None => (value.clone(), value),
            Some((min, max)) => {
                let min = if value.compare(&min).is_lt() { value.clone() } else { min };
                let max = if value.compare(&max).is_gt() { value } else { max };
                (min, max)
            }
        });
    }
    bounds
}

/// Sum of the numeric child values; integers stay integers.
pub fn sum<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, _leaf_rows: &[Rc<Row<T>>], child_rows: &[Rc<Row<T>>]| {
        let mut int_sum: i64 = 0;
        let mut float_sum = 0.0;
        let mut all_ints = true;
        for row in child_rows {
            match row.get_value(column_id) {
                Value::Int(i) => {
                    match int_sum.checked_add(i) {
                        Some(next) => int_sum = next,
                        None => all_ints = false,
                    }
                    float_sum += i as f64;
                }
                value if value.is_number() => {
                    all_ints = false;
                    float_sum += value.as_f64().unwrap_or(0.0);
                }
                _ => {}
            }
        }
        if all_ints { Value::Int(int_sum) } else { Value::Float(float_sum) }
    })
}

/// Smallest child value.
pub fn min<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, _leaf_rows: &[Rc<Row<T>>], child_rows: &[Rc<Row<T>>]| {
        bounds(column_id, child_rows).map(|(min, _)| min).unwrap_or_default()
    })
}

/// Largest child value.
pub fn max<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, _leaf_rows: &[Rc<Row<T>>], child_rows: &[Rc<Row<T>>]| {
        bounds(column_id, child_rows).map(|(_, max)| max).unwrap_or_default()
    })
}

/// `[min, max]` of the child values.
pub fn extent<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, _leaf_rows: &[Rc<Row<T>>], child_rows: &[Rc<Row<T>>]| {
        match bounds(column_id, child_rows) {
            Some((min, max)) => Value::Array(vec![min, max]),
            None => Value::Array(vec![Value::Null, Value::Null]),
        }
    })
}

/// Arithmetic mean of the numeric leaf values.
pub fn mean<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, leaf_rows: &[Rc<Row<T>>], _child_rows: &[Rc<Row<T>>]| {
        let numbers: Vec<f64> = leaf_rows
            .iter()
            .filter_map(|row| row.get_value(column_id).as_f64())
            .filter(|n| !n.is_nan())
            .collect();
        if numbers.is_empty() {
            return Value::Null;
        }
        Value::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)
    })
}

/// Median of the leaf values; null unless every value is a number.
pub fn median<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, leaf_rows: &[Rc<Row<T>>], _child_rows: &[Rc<Row<T>>]| {
        let values: Vec<Value> = leaf_rows.iter().map(|row| row.get_value(column_id)).collect();
        if values.is_empty() || !values.iter().all(Value::is_number) {
            return Value::Null;
        }
        if values.len() == 1 {
            return values[0].clone();
        }
        let mut sorted = values;
        sorted.sort_by(|a, b| a.compare(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 != 0 {
            return sorted[mid].clone();
        }
        let lower = sorted[mid - 1].as_f64().unwrap_or(0.0);
        let upper = sorted[mid].as_f64().unwrap_or(0.0);
        Value::Float((lower + upper) / 2.0)
    })
}

/// Distinct leaf values in first-seen order.
pub fn unique<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, leaf_rows: &[Rc<Row<T>>], _child_rows: &[Rc<Row<T>>]| {
        let mut seen = HashSet::new();
        let values = leaf_rows
            .iter()
            .map(|row| row.get_value(column_id))
            .filter(|value| seen.insert(value.clone()))
            .collect();
        Value::Array(values)
    })
}

/// Number of distinct leaf values.
pub fn unique_count<T: RowData>() -> AggregationFn<T> {
    Rc::new(|column_id: &str, leaf_rows: &[Rc<Row<T>>], _child_rows: &[Rc<Row<T>>]| {
        let distinct: HashSet<Value> = leaf_rows.iter().map(|row| row.get_value(column_id)).collect();
        Value::from(distinct.len())
    })
}

/// Number of leaf rows.
pub fn count<T: RowData>() -> AggregationFn<T> {
    Rc::new(|_column_id: &str, leaf_rows: &[Rc<Row<T>>], _child_rows: &[Rc<Row<T>>]| {
        Value::from(leaf_rows.len())
    })
}

/// Looks up a built-in aggregation function by key.
pub fn builtin_aggregation_fn<T: RowData>(name: &str) -> Option<AggregationFn<T>> {
    let aggregation_fn = match name {
        "sum" => sum(),
        "min" => min(),
        "max" => max(),
        "extent" => extent(),
        "mean" => mean(),
        "median" => median(),
        "unique" => unique(),
        "uniqueCount" => unique_count(),
        "count" => count(),
        _ => return None,
    };
    Some(aggregation_fn)
}

/// Built-in key chosen for "auto" aggregation, if any.
pub fn infer_aggregation_fn_name(kind: ValueKind) -> Option<&'static str> {
    match kind {
        ValueKind::Number => Some("sum"),
        ValueKind::DateTime => Some("extent"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_inference() {
        assert_eq!(infer_aggregation_fn_name(ValueKind::Number), Some("sum"));
        assert_eq!(infer_aggregation_fn_name(ValueKind::DateTime), Some("extent"));
        assert_eq!(infer_aggregation_fn_name(ValueKind::String), None);
    }

    #[test]
    fn test_builtin_lookup_covers_every_key() {
        for name in BUILTIN_AGGREGATION_FNS {
            assert!(builtin_aggregation_fn::<serde_json::Value>(name).is_some(), "{name}");
        }
    }
}
