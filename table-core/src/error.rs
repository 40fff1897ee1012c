//! Error types

/// Errors returned by table construction, reconfiguration and lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Two column definitions resolved to the same id.
    #[error("Duplicate column id '{id}'")]
    DuplicateColumnId { id: String },

    /// A column definition has no explicit id, accessor key or string header.
    #[error("Column definition at index {index} has no id, accessor key or string header")]
    MissingColumnId { index: usize },

    /// No row with the id exists in the searched row models.
    #[error("Row '{id}' not found")]
    RowNotFound { id: String },

    /// No column with the id exists.
    #[error("Column '{id}' not found")]
    ColumnNotFound { id: String },

    /// A column references a filter function missing from every registry.
    #[error("Column '{column}' references unknown filter function '{name}'")]
    UnknownFilterFn { column: String, name: String },

    /// A column references a sorting function missing from every registry.
    #[error("Column '{column}' references unknown sorting function '{name}'")]
    UnknownSortingFn { column: String, name: String },

    /// A column references an aggregation function missing from every registry.
    #[error("Column '{column}' references unknown aggregation function '{name}'")]
    UnknownAggregationFn { column: String, name: String },
}

impl TableError {
    /// Creates a duplicate column id error.
    pub fn duplicate_column_id(id: impl Into<String>) -> Self {
        Self::DuplicateColumnId { id: id.into() }
    }

    /// Creates a row not found error.
    pub fn row_not_found(id: impl Into<String>) -> Self {
        Self::RowNotFound { id: id.into() }
    }

    /// Creates a column not found error.
    pub fn column_not_found(id: impl Into<String>) -> Self {
        Self::ColumnNotFound { id: id.into() }
    }

    /// Returns `true` for errors raised while building the column tree.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::DuplicateColumnId { .. } | Self::MissingColumnId { .. })
    }
}

/// Result alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = TableError::duplicate_column_id("name");
        assert_eq!(err.to_string(), "Duplicate column id 'name'");
        assert!(err.is_configuration());

        let err = TableError::UnknownSortingFn {
            column: "age".into(),
            name: "byAge".into(),
        };
        assert!(err.to_string().contains("'byAge'"));
        assert!(!err.is_configuration());
    }
}
