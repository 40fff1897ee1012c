//! Field access for row records

use super::Record;
use super::Value;

/// A row type a table can read column values from.
///
/// `field` resolves a top-level key. `path` resolves accessor keys with
/// dotted segments (`"address.city"`) and numeric segments for array
/// positions (`"tags.0"`); missing segments yield `None`.
pub trait RowData: Clone + 'static {
    /// Returns the value stored under a top-level key.
    fn field(&self, key: &str) -> Option<Value>;

    /// Walks a dotted path, starting at a top-level key.
    fn path(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let mut current = self.field(segments.next()?)?;
        for segment in segments {
            current = current.child(segment)?.clone();
        }
        Some(current)
    }
}

impl RowData for serde_json::Value {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).map(Value::from)
    }

    fn path(&self, path: &str) -> Option<Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                serde_json::Value::Object(map) => map.get(segment)?,
                serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(Value::from(current))
    }
}

impl RowData for Record {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl RowData for Value {
    fn field(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(key).cloned(),
            _ => None,
        }
    }
}
