//! Filter functions

use std::fmt;
use std::rc::Rc;

use nucleo_matcher::Config;
use nucleo_matcher::Matcher;
use nucleo_matcher::Utf32Str;
use nucleo_matcher::pattern::AtomKind;
use nucleo_matcher::pattern::CaseMatching;
use nucleo_matcher::pattern::Normalization;
use nucleo_matcher::pattern::Pattern;

use crate::core::Row;
use crate::model::RowData;
use crate::model::Value;
use crate::model::ValueKind;

/// Keys of the built-in filter functions.
pub const BUILTIN_FILTER_FNS: &[&str] = &[
    "includesString",
    "includesStringSensitive",
    "equalsString",
    "arrIncludes",
    "arrIncludesAll",
    "arrIncludesSome",
    "equals",
    "weakEquals",
    "inNumberRange",
    "fuzzy",
];

type Predicate<T> = Rc<dyn Fn(&Row<T>, &str, &Value, &mut Option<Value>) -> bool>;

/// A row predicate for one column and one filter value.
///
/// The predicate receives the row, the column id, the (resolved) filter value
/// and a meta slot it may fill, e.g. with a ranking score.
pub struct FilterFn<T> {
    predicate: Predicate<T>,
    resolve_filter_value: Option<Rc<dyn Fn(&Value) -> Value>>,
    auto_remove: Option<Rc<dyn Fn(&Value) -> bool>>,
}

impl<T> Clone for FilterFn<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            resolve_filter_value: self.resolve_filter_value.clone(),
            auto_remove: self.auto_remove.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFn")
            .field("resolve_filter_value", &self.resolve_filter_value.is_some())
            .field("auto_remove", &self.auto_remove.is_some())
            .finish()
    }
}

impl<T: RowData> FilterFn<T> {
    /// Wraps a predicate.
    pub fn new(predicate: impl Fn(&Row<T>, &str, &Value, &mut Option<Value>) -> bool + 'static) -> Self {
        Self {
            predicate: Rc::new(predicate),
            resolve_filter_value: None,
            auto_remove: None,
        }
    }

    /// Sets a transform applied once to the filter value before filtering.
    pub fn with_resolve_filter_value(mut self, resolve: impl Fn(&Value) -> Value + 'static) -> Self {
        self.resolve_filter_value = Some(Rc::new(resolve));
        self
    }

    /// Sets the test deciding when a filter value should drop the filter.
    pub fn with_auto_remove(mut self, auto_remove: impl Fn(&Value) -> bool + 'static) -> Self {
        self.auto_remove = Some(Rc::new(auto_remove));
        self
    }

    /// Runs the predicate.
    pub fn matches(&self, row: &Row<T>, column_id: &str, filter_value: &Value, meta: &mut Option<Value>) -> bool {
        (self.predicate)(row, column_id, filter_value, meta)
    }

    /// Applies the filter value transform, if any.
    pub fn resolve_filter_value(&self, value: &Value) -> Value {
        match &self.resolve_filter_value {
            Some(resolve) => resolve(value),
            None => value.clone(),
        }
    }

    /// Returns `true` when `value` should remove the filter instead of applying it.
    ///
    /// Null and empty-string values always remove the filter.
    pub fn should_auto_remove(&self, value: &Value) -> bool {
        self.auto_remove.as_ref().is_some_and(|remove| remove(value)) || is_falsey(value)
    }
}

/// Null or empty string.
pub fn is_falsey(value: &Value) -> bool {
    value.is_null() || value.as_str() == Some("")
}

fn is_falsey_or_empty(value: &Value) -> bool {
    is_falsey(value) || value.is_empty()
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|item| item.loose_eq(needle)),
        Value::String(s) => needle.to_text().is_some_and(|n| s.contains(&n)),
        _ => false,
    }
}

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Case-insensitive substring match.
pub fn includes_string<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let search = filter_value.to_text().unwrap_or_default().to_lowercase();
        row.get_value(column_id)
            .to_text()
            .is_some_and(|text| text.to_lowercase().contains(&search))
    })
    .with_auto_remove(is_falsey)
}

/// Case-sensitive substring match.
pub fn includes_string_sensitive<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let search = filter_value.to_text().unwrap_or_default();
        row.get_value(column_id).to_text().is_some_and(|text| text.contains(&search))
    })
    .with_auto_remove(is_falsey)
}

/// Case-insensitive full string match.
pub fn equals_string<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        match (row.get_value(column_id).to_text(), filter_value.to_text()) {
            (Some(text), Some(search)) => text.to_lowercase() == search.to_lowercase(),
            _ => false,
        }
    })
    .with_auto_remove(is_falsey)
}

/// The row value (array or string) contains the filter value.
pub fn arr_includes<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| contains(&row.get_value(column_id), filter_value))
        .with_auto_remove(is_falsey_or_empty)
}

/// The row value contains every element of the filter value.
pub fn arr_includes_all<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let value = row.get_value(column_id);
        as_list(filter_value).iter().all(|needle| contains(&value, needle))
    })
    .with_auto_remove(is_falsey_or_empty)
}

/// The row value contains at least one element of the filter value.
pub fn arr_includes_some<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let value = row.get_value(column_id);
        as_list(filter_value).iter().any(|needle| contains(&value, needle))
    })
    .with_auto_remove(is_falsey_or_empty)
}

/// Strict equality, numbers compared across numeric variants.
pub fn equals<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| row.get_value(column_id).loose_eq(filter_value))
        .with_auto_remove(is_falsey)
}

/// Equality after coercing numeric strings and comparing text forms.
pub fn weak_equals<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let value = row.get_value(column_id);
        if value.loose_eq(filter_value) {
            return true;
        }
        if value.is_number() || filter_value.is_number() {
            return matches!((value.as_f64(), filter_value.as_f64()), (Some(a), Some(b)) if a == b);
        }
        matches!((value.to_text(), filter_value.to_text()), (Some(a), Some(b)) if a == b)
    })
    .with_auto_remove(is_falsey)
}

/// Resolves a `[min, max]` filter value into finite-or-infinite bounds.
///
/// Null or unparsable bounds become open; reversed bounds are swapped.
pub fn resolve_number_range(value: &Value) -> (f64, f64) {
    let bound = |v: Option<&Value>, open: f64| v.and_then(Value::as_f64).filter(|n| !n.is_nan()).unwrap_or(open);
    let (min, max) = match value {
        Value::Array(items) => (
            bound(items.first(), f64::NEG_INFINITY),
            bound(items.get(1), f64::INFINITY),
        ),
        other => (bound(Some(other), f64::NEG_INFINITY), f64::INFINITY),
    };
    if min > max { (max, min) } else { (min, max) }
}

/// Inclusive numeric range match on a `[min, max]` filter value.
pub fn in_number_range<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, _| {
        let (min, max) = resolve_number_range(filter_value);
        row.get_value(column_id)
            .as_f64()
            .is_some_and(|n| n >= min && n <= max)
    })
    .with_resolve_filter_value(|value| {
        let (min, max) = resolve_number_range(value);
        Value::Array(vec![Value::Float(min), Value::Float(max)])
    })
    .with_auto_remove(|value| match value {
        Value::Array(items) => {
            items.first().is_none_or(is_falsey) && items.get(1).is_none_or(is_falsey)
        }
        other => is_falsey(other),
    })
}

/// Fuzzy match score of `query` against `haystack`, `None` when it does not match.
pub fn fuzzy_score(query: &str, haystack: &str) -> Option<u32> {
    if query.is_empty() {
        return Some(0);
    }
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);
    let mut buf = Vec::new();
    pattern.score(Utf32Str::new(haystack, &mut buf), &mut matcher)
}

/// Fuzzy text match; the score is recorded as filter meta.
pub fn fuzzy<T: RowData>() -> FilterFn<T> {
    FilterFn::new(|row, column_id, filter_value, meta| {
        let Some(query) = filter_value.to_text() else {
            return true;
        };
        let Some(text) = row.get_value(column_id).to_text() else {
            return false;
        };
        match fuzzy_score(&query, &text) {
            Some(score) => {
                *meta = Some(Value::Int(score as i64));
                true
            }
            None => false,
        }
    })
    .with_auto_remove(is_falsey)
}

/// Looks up a built-in filter function by key.
pub fn builtin_filter_fn<T: RowData>(name: &str) -> Option<FilterFn<T>> {
    let filter_fn = match name {
        "includesString" => includes_string(),
        "includesStringSensitive" => includes_string_sensitive(),
        "equalsString" => equals_string(),
        "arrIncludes" => arr_includes(),
        "arrIncludesAll" => arr_includes_all(),
        "arrIncludesSome" => arr_includes_some(),
        "equals" => equals(),
        "weakEquals" => weak_equals(),
        "inNumberRange" => in_number_range(),
        "fuzzy" => fuzzy(),
        _ => return None,
    };
    Some(filter_fn)
}

/// Built-in key chosen for "auto" filtering from the first observed value.
pub fn infer_filter_fn_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::String => "includesString",
        ValueKind::Number => "inNumberRange",
        ValueKind::Boolean | ValueKind::DateTime | ValueKind::Object => "equals",
        ValueKind::Array => "arrIncludes",
        ValueKind::Unknown => "weakEquals",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_range_opens_missing_bounds() {
        let range = resolve_number_range(&Value::Array(vec![Value::from(2), Value::Null]));
        assert_eq!(range, (2.0, f64::INFINITY));

        let range = resolve_number_range(&Value::Array(vec![Value::from("x"), Value::from("5")]));
        assert_eq!(range, (f64::NEG_INFINITY, 5.0));
    }

    #[test]
    fn test_number_range_swaps_reversed_bounds() {
        let range = resolve_number_range(&Value::Array(vec![Value::from(9), Value::from(3)]));
        assert_eq!(range, (3.0, 9.0));
    }

    #[test]
    fn test_falsey_values() {
        assert!(is_falsey(&Value::Null));
        assert!(is_falsey(&Value::from("")));
        assert!(!is_falsey(&Value::from(0)));
        assert!(is_falsey_or_empty(&Value::Array(Vec::new())));
    }

    #[test]
    fn test_fuzzy_score() {
        assert!(fuzzy_score("ap", "apple").is_some());
        assert!(fuzzy_score("APL", "apple").is_some());
        assert!(fuzzy_score("xyz", "apple").is_none());
        assert_eq!(fuzzy_score("", "apple"), Some(0));
    }

    #[test]
    fn test_auto_inference_table() {
        assert_eq!(infer_filter_fn_name(ValueKind::String), "includesString");
        assert_eq!(infer_filter_fn_name(ValueKind::Number), "inNumberRange");
        assert_eq!(infer_filter_fn_name(ValueKind::Array), "arrIncludes");
        assert_eq!(infer_filter_fn_name(ValueKind::Object), "equals");
        assert_eq!(infer_filter_fn_name(ValueKind::Unknown), "weakEquals");
    }

    #[test]
    fn test_builtin_lookup_covers_every_key() {
        for name in BUILTIN_FILTER_FNS {
            assert!(builtin_filter_fn::<serde_json::Value>(name).is_some(), "{name}");
        }
        assert!(builtin_filter_fn::<serde_json::Value>("nope").is_none());
    }
}
