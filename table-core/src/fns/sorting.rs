//! Sorting functions

use std::cmp::Ordering;
use std::rc::Rc;

use crate::core::Row;
use crate::model::RowData;
use crate::model::Value;

/// Keys of the built-in sorting functions.
pub const BUILTIN_SORTING_FNS: &[&str] = &[
    "alphanumeric",
    "alphanumericCaseSensitive",
    "text",
    "textCaseSensitive",
    "datetime",
    "basic",
];

/// Compares two rows by the value of one column (ascending order).
pub type SortingFn<T> = Rc<dyn Fn(&Row<T>, &Row<T>, &str) -> Ordering>;

/// Text form used by the text-based comparators: numbers and strings only.
fn sort_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Float(f) if !f.is_finite() => String::new(),
        v if v.is_number() => v.to_string(),
        _ => String::new(),
    }
}

fn split_alphanumeric(s: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if in_digits.is_some_and(|d| d != digit) {
            chunks.push(&s[start..i]);
            start = i;
        }
        in_digits = Some(digit);
    }
    if start < s.len() {
        chunks.push(&s[start..]);
    }
    chunks
}

/// Returns `true` when the string contains a run of digits.
pub fn has_digit_run(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Natural ordering: digit runs compare numerically, other runs as text.
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let a_chunks = split_alphanumeric(a);
    let b_chunks = split_alphanumeric(b);

    for (aa, bb) in a_chunks.iter().zip(b_chunks.iter()) {
        let an = aa.parse::<f64>().ok().filter(|_| has_digit_run(aa));
        let bn = bb.parse::<f64>().ok().filter(|_| has_digit_run(bb));
        match (an, bn) {
            (None, None) => match aa.cmp(bb) {
                Ordering::Equal => continue,
                ord => return ord,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if let Some(ord) = x.partial_cmp(&y).filter(|ord| *ord != Ordering::Equal) {
                    return ord;
                }
            }
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

/// Case-insensitive natural ordering.
pub fn alphanumeric<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| {
        compare_alphanumeric(
            &sort_text(&a.get_value(column_id)).to_lowercase(),
            &sort_text(&b.get_value(column_id)).to_lowercase(),
        )
    })
}

/// Case-sensitive natural ordering.
pub fn alphanumeric_case_sensitive<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| {
        compare_alphanumeric(&sort_text(&a.get_value(column_id)), &sort_text(&b.get_value(column_id)))
    })
}

/// Case-insensitive text ordering.
pub fn text<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| {
        sort_text(&a.get_value(column_id))
            .to_lowercase()
            .cmp(&sort_text(&b.get_value(column_id)).to_lowercase())
    })
}

/// Case-sensitive text ordering.
pub fn text_case_sensitive<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| sort_text(&a.get_value(column_id)).cmp(&sort_text(&b.get_value(column_id))))
}

/// Chronological ordering.
pub fn datetime<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| match (a.get_value(column_id), b.get_value(column_id)) {
        (Value::DateTime(x), Value::DateTime(y)) => x.cmp(&y),
        (x, y) => x.compare(&y),
    })
}

/// Natural ordering of the raw values.
pub fn basic<T: RowData>() -> SortingFn<T> {
    Rc::new(|a: &Row<T>, b: &Row<T>, column_id: &str| a.get_value(column_id).compare(&b.get_value(column_id)))
}

/// Looks up a built-in sorting function by key.
pub fn builtin_sorting_fn<T: RowData>(name: &str) -> Option<SortingFn<T>> {
    let sorting_fn = match name {
        "alphanumeric" => alphanumeric(),
        "alphanumericCaseSensitive" => alphanumeric_case_sensitive(),
        "text" => text(),
        "textCaseSensitive" => text_case_sensitive(),
        "datetime" => datetime(),
        "basic" => basic(),
        _ => return None,
    };
    Some(sorting_fn)
}

/// Built-in key chosen for "auto" sorting from a sample of values.
pub fn infer_sorting_fn_name<'a>(values: impl IntoIterator<Item = &'a Value>) -> &'static str {
    let mut is_string = false;
    for value in values {
        match value {
            Value::DateTime(_) => return "datetime",
            Value::String(s) => {
                is_string = true;
                if has_digit_run(s) {
                    return "alphanumeric";
                }
            }
            _ => {}
        }
    }
    if is_string { "text" } else { "basic" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_alphanumeric() {
        assert_eq!(split_alphanumeric("item10b2"), vec!["item", "10", "b", "2"]);
        assert_eq!(split_alphanumeric("42"), vec!["42"]);
        assert!(split_alphanumeric("").is_empty());
    }

    #[test]
    fn test_alphanumeric_orders_digit_runs_numerically() {
        assert_eq!(compare_alphanumeric("item2", "item10"), Ordering::Less);
        assert_eq!(compare_alphanumeric("item10", "item10"), Ordering::Equal);
        assert_eq!(compare_alphanumeric("a", "1"), Ordering::Less);
        assert_eq!(compare_alphanumeric("item", "item1"), Ordering::Less);
    }

    #[test]
    fn test_sort_text_drops_non_scalars() {
        assert_eq!(sort_text(&Value::from(1.5)), "1.5");
        assert_eq!(sort_text(&Value::from(f64::NAN)), "");
        assert_eq!(sort_text(&Value::from(true)), "");
    }

    #[test]
    fn test_auto_inference() {
        let strings = [Value::from("b"), Value::from("a")];
        assert_eq!(infer_sorting_fn_name(&strings), "text");
        let mixed = [Value::from("row 1")];
        assert_eq!(infer_sorting_fn_name(&mixed), "alphanumeric");
        let numbers = [Value::from(1), Value::from(2)];
        assert_eq!(infer_sorting_fn_name(&numbers), "basic");
    }
}
