//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use super::GroupedColumnMode;
use crate::model::Value;

/// Scalar table options.
///
/// Every field is optional. Features contribute default fragments, the
/// caller's config is merged over them, and readers fall back to the
/// documented default when a field is still unset.
///
/// # Example
///
/// ```
/// use table_core::core::TableConfig;
///
/// let config = TableConfig::new()
///     .with_enable_multi_sort(false)
///     .with_filter_from_leaf_rows(true)
///     .with_debug_table(true);
/// assert_eq!(config.enable_multi_sort, Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    // Filtering
    /// Enables column and global filtering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_filters: Option<bool>,
    /// Enables column filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_column_filters: Option<bool>,
    /// Enables the global filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_global_filter: Option<bool>,
    /// Filter leaf-up: a parent survives when any descendant passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_from_leaf_rows: Option<bool>,
    /// Deepest sub-row level the filters descend into.
    ///
    /// Default: 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_leaf_row_filter_depth: Option<usize>,
    /// Rows arrive pre-filtered; the filtered stage passes its input through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_filtering: Option<bool>,

    // Sorting
    /// Enables sorting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sorting: Option<bool>,
    /// Enables sorting on several columns at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_multi_sort: Option<bool>,
    /// Allows a toggle to clear a column's sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sorting_removal: Option<bool>,
    /// Allows a multi-sort toggle to clear a column's sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_multi_remove: Option<bool>,
    /// Largest number of sort keys kept when adding one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_multi_sort_col_count: Option<usize>,
    /// Sort descending on the first toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_desc_first: Option<bool>,
    /// Rows arrive pre-sorted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_sorting: Option<bool>,

    // Grouping
    /// Enables grouping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_grouping: Option<bool>,
    /// Rows arrive pre-grouped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_grouping: Option<bool>,
    /// Placement of grouped columns among the leaf columns.
    ///
    /// Default: reorder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_column_mode: Option<GroupedColumnMode>,

    // Expanding
    /// Enables expanding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_expanding: Option<bool>,
    /// Rows arrive pre-expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_expanding: Option<bool>,
    /// Expanded sub rows count toward the page size.
    ///
    /// Default: true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginate_expanded_rows: Option<bool>,
    /// Reset expansion when grouping or data change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_reset_expanded: Option<bool>,

    // Pagination
    /// Rows arrive pre-paginated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_pagination: Option<bool>,
    /// Known page count; -1 means unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i64>,
    /// Known row count, for server-side pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    /// Reset the page index when filters, sorting, grouping or data change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_reset_page_index: Option<bool>,
    /// Overrides every auto-reset flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_reset_all: Option<bool>,

    // Visibility and pinning
    /// Enables column hiding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_hiding: Option<bool>,
    /// Enables column and row pinning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_pinning: Option<bool>,
    /// Enables column pinning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_column_pinning: Option<bool>,
    /// Enables row pinning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_row_pinning: Option<bool>,
    /// Pinned rows stay visible when filtered out or paged away.
    ///
    /// Default: true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_pinned_rows: Option<bool>,

    // Selection
    /// Enables row selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_row_selection: Option<bool>,
    /// Allows more than one selected row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_multi_row_selection: Option<bool>,
    /// Selecting a row selects its sub rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sub_row_selection: Option<bool>,

    // Sizing
    /// Enables column resizing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_column_resizing: Option<bool>,

    // Diagnostics
    /// Log every memo recompute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_all: Option<bool>,
    /// Log table-level recomputes (row models, state).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_table: Option<bool>,
    /// Log column recomputes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_columns: Option<bool>,
    /// Log row recomputes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_rows: Option<bool>,
    /// Log cell recomputes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_cells: Option<bool>,
    /// Log header recomputes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_headers: Option<bool>,

    // Rendering
    /// Value rendered for null cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_fallback_value: Option<Value>,
}

impl TableConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays `over` on this config: every field set in `over` wins.
    pub fn merge(mut self, over: &TableConfig) -> Self {
        if over.enable_filters.is_some() {
            self.enable_filters = over.enable_filters;
        }
        if over.enable_column_filters.is_some() {
            self.enable_column_filters = over.enable_column_filters;
        }
        if over.enable_global_filter.is_some() {
            self.enable_global_filter = over.enable_global_filter;
        }
        if over.filter_from_leaf_rows.is_some() {
            self.filter_from_leaf_rows = over.filter_from_leaf_rows;
        }
        if over.max_leaf_row_filter_depth.is_some() {
            self.max_leaf_row_filter_depth = over.max_leaf_row_filter_depth;
        }
        if over.manual_filtering.is_some() {
            self.manual_filtering = over.manual_filtering;
        }
        if over.enable_sorting.is_some() {
            self.enable_sorting = over.enable_sorting;
        }
        if over.enable_multi_sort.is_some() {
            self.enable_multi_sort = over.enable_multi_sort;
        }
        if over.enable_sorting_removal.is_some() {
            self.enable_sorting_removal = over.enable_sorting_removal;
        }
        if over.enable_multi_remove.is_some() {
            self.enable_multi_remove = over.enable_multi_remove;
        }
        if over.max_multi_sort_col_count.is_some() {
            self.max_multi_sort_col_count = over.max_multi_sort_col_count;
        }
        if over.sort_desc_first.is_some() {
            self.sort_desc_first = over.sort_desc_first;
        }
        if over.manual_sorting.is_some() {
            self.manual_sorting = over.manual_sorting;
        }
        if over.enable_grouping.is_some() {
            self.enable_grouping = over.enable_grouping;
        }
        if over.manual_grouping.is_some() {
            self.manual_grouping = over.manual_grouping;
        }
        if over.grouped_column_mode.is_some() {
            self.grouped_column_mode = over.grouped_column_mode;
        }
        if over.enable_expanding.is_some() {
            self.enable_expanding = over.enable_expanding;
        }
        if over.manual_expanding.is_some() {
            self.manual_expanding = over.manual_expanding;
        }
        if over.paginate_expanded_rows.is_some() {
            self.paginate_expanded_rows = over.paginate_expanded_rows;
        }
        if over.auto_reset_expanded.is_some() {
            self.auto_reset_expanded = over.auto_reset_expanded;
        }
        if over.manual_pagination.is_some() {
            self.manual_pagination = over.manual_pagination;
        }
        if over.page_count.is_some() {
            self.page_count = over.page_count;
        }
        if over.row_count.is_some() {
            self.row_count = over.row_count;
        }
        if over.auto_reset_page_index.is_some() {
            self.auto_reset_page_index = over.auto_reset_page_index;
        }
        if over.auto_reset_all.is_some() {
            self.auto_reset_all = over.auto_reset_all;
        }
        if over.enable_hiding.is_some() {
            self.enable_hiding = over.enable_hiding;
        }
        if over.enable_pinning.is_some() {
            self.enable_pinning = over.enable_pinning;
        }
        if over.enable_column_pinning.is_some() {
            self.enable_column_pinning = over.enable_column_pinning;
        }
        if over.enable_row_pinning.is_some() {
            self.enable_row_pinning = over.enable_row_pinning;
        }
        if over.keep_pinned_rows.is_some() {
            self.keep_pinned_rows = over.keep_pinned_rows;
        }
        if over.enable_row_selection.is_some() {
            self.enable_row_selection = over.enable_row_selection;
        }
        if over.enable_multi_row_selection.is_some() {
            self.enable_multi_row_selection = over.enable_multi_row_selection;
        }
        if over.enable_sub_row_selection.is_some() {
            self.enable_sub_row_selection = over.enable_sub_row_selection;
        }
        if over.enable_column_resizing.is_some() {
            self.enable_column_resizing = over.enable_column_resizing;
        }
        if over.debug_all.is_some() {
            self.debug_all = over.debug_all;
        }
        if over.debug_table.is_some() {
            self.debug_table = over.debug_table;
        }
        if over.debug_columns.is_some() {
            self.debug_columns = over.debug_columns;
        }
        if over.debug_rows.is_some() {
            self.debug_rows = over.debug_rows;
        }
        if over.debug_cells.is_some() {
            self.debug_cells = over.debug_cells;
        }
        if over.debug_headers.is_some() {
            self.debug_headers = over.debug_headers;
        }
        if over.render_fallback_value.is_some() {
            self.render_fallback_value = over.render_fallback_value.clone();
        }
        self
    }

    /// Sets `enable_filters`.
    pub fn with_enable_filters(mut self, value: bool) -> Self {
        self.enable_filters = Some(value);
        self
    }

    /// Sets `enable_column_filters`.
    pub fn with_enable_column_filters(mut self, value: bool) -> Self {
        self.enable_column_filters = Some(value);
        self
    }

    /// Sets `enable_global_filter`.
    pub fn with_enable_global_filter(mut self, value: bool) -> Self {
        self.enable_global_filter = Some(value);
        self
    }

    /// Sets `filter_from_leaf_rows`.
    pub fn with_filter_from_leaf_rows(mut self, value: bool) -> Self {
        self.filter_from_leaf_rows = Some(value);
        self
    }

    /// Sets `max_leaf_row_filter_depth`.
    pub fn with_max_leaf_row_filter_depth(mut self, value: usize) -> Self {
        self.max_leaf_row_filter_depth = Some(value);
        self
    }

    /// Sets `manual_filtering`.
    pub fn with_manual_filtering(mut self, value: bool) -> Self {
        self.manual_filtering = Some(value);
        self
    }

    /// Sets `enable_sorting`.
    pub fn with_enable_sorting(mut self, value: bool) -> Self {
        self.enable_sorting = Some(value);
        self
    }

    /// Sets `enable_multi_sort`.
    pub fn with_enable_multi_sort(mut self, value: bool) -> Self {
        self.enable_multi_sort = Some(value);
        self
    }

    /// Sets `enable_sorting_removal`.
    pub fn with_enable_sorting_removal(mut self, value: bool) -> Self {
        self.enable_sorting_removal = Some(value);
        self
    }

    /// Sets `enable_multi_remove`.
    pub fn with_enable_multi_remove(mut self, value: bool) -> Self {
        self.enable_multi_remove = Some(value);
        self
    }

    /// Sets `max_multi_sort_col_count`.
    pub fn with_max_multi_sort_col_count(mut self, value: usize) -> Self {
        self.max_multi_sort_col_count = Some(value);
        self
    }

    /// Sets `sort_desc_first`.
    pub fn with_sort_desc_first(mut self, value: bool) -> Self {
        self.sort_desc_first = Some(value);
        self
    }

    /// Sets `manual_sorting`.
    pub fn with_manual_sorting(mut self, value: bool) -> Self {
        self.manual_sorting = Some(value);
        self
    }

    /// Sets `enable_grouping`.
    pub fn with_enable_grouping(mut self, value: bool) -> Self {
        self.enable_grouping = Some(value);
        self
    }

    /// Sets `manual_grouping`.
    pub fn with_manual_grouping(mut self, value: bool) -> Self {
        self.manual_grouping = Some(value);
        self
    }

    /// Sets `grouped_column_mode`.
    pub fn with_grouped_column_mode(mut self, value: GroupedColumnMode) -> Self {
        self.grouped_column_mode = Some(value);
        self
    }

    /// Sets `enable_expanding`.
    pub fn with_enable_expanding(mut self, value: bool) -> Self {
        self.enable_expanding = Some(value);
        self
    }

    /// Sets `manual_expanding`.
    pub fn with_manual_expanding(mut self, value: bool) -> Self {
        self.manual_expanding = Some(value);
        self
    }

    /// Sets `paginate_expanded_rows`.
    pub fn with_paginate_expanded_rows(mut self, value: bool) -> Self {
        self.paginate_expanded_rows = Some(value);
        self
    }

    /// Sets `auto_reset_expanded`.
    pub fn with_auto_reset_expanded(mut self, value: bool) -> Self {
        self.auto_reset_expanded = Some(value);
        self
    }

    /// Sets `manual_pagination`.
    pub fn with_manual_pagination(mut self, value: bool) -> Self {
        self.manual_pagination = Some(value);
        self
    }

    /// Sets `page_count`.
    pub fn with_page_count(mut self, value: i64) -> Self {
        self.page_count = Some(value);
        self
    }

    /// Sets `row_count`.
    pub fn with_row_count(mut self, value: usize) -> Self {
        self.row_count = Some(value);
        self
    }

    /// Sets `auto_reset_page_index`.
    pub fn with_auto_reset_page_index(mut self, value: bool) -> Self {
        self.auto_reset_page_index = Some(value);
        self
    }

    /// Sets `auto_reset_all`.
    pub fn with_auto_reset_all(mut self, value: bool) -> Self {
        self.auto_reset_all = Some(value);
        self
    }

    /// Sets `enable_hiding`.
    pub fn with_enable_hiding(mut self, value: bool) -> Self {
        self.enable_hiding = Some(value);
        self
    }

    /// Sets `enable_pinning`.
    pub fn with_enable_pinning(mut self, value: bool) -> Self {
        self.enable_pinning = Some(value);
        self
    }

    /// Sets `enable_column_pinning`.
    pub fn with_enable_column_pinning(mut self, value: bool) -> Self {
        self.enable_column_pinning = Some(value);
        self
    }

    /// Sets `enable_row_pinning`.
    pub fn with_enable_row_pinning(mut self, value: bool) -> Self {
        self.enable_row_pinning = Some(value);
        self
    }

    /// Sets `keep_pinned_rows`.
    pub fn with_keep_pinned_rows(mut self, value: bool) -> Self {
        self.keep_pinned_rows = Some(value);
        self
    }

    /// Sets `enable_row_selection`.
    pub fn with_enable_row_selection(mut self, value: bool) -> Self {
        self.enable_row_selection = Some(value);
        self
    }

    /// Sets `enable_multi_row_selection`.
    pub fn with_enable_multi_row_selection(mut self, value: bool) -> Self {
        self.enable_multi_row_selection = Some(value);
        self
    }

    /// Sets `enable_sub_row_selection`.
    pub fn with_enable_sub_row_selection(mut self, value: bool) -> Self {
        self.enable_sub_row_selection = Some(value);
        self
    }

    /// Sets `enable_column_resizing`.
    pub fn with_enable_column_resizing(mut self, value: bool) -> Self {
        self.enable_column_resizing = Some(value);
        self
    }

    /// Sets `debug_all`.
    pub fn with_debug_all(mut self, value: bool) -> Self {
        self.debug_all = Some(value);
        self
    }

    /// Sets `debug_table`.
    pub fn with_debug_table(mut self, value: bool) -> Self {
        self.debug_table = Some(value);
        self
    }

    /// Sets `debug_columns`.
    pub fn with_debug_columns(mut self, value: bool) -> Self {
        self.debug_columns = Some(value);
        self
    }

    /// Sets `debug_rows`.
    pub fn with_debug_rows(mut self, value: bool) -> Self {
        self.debug_rows = Some(value);
        self
    }

    /// Sets `debug_cells`.
    pub fn with_debug_cells(mut self, value: bool) -> Self {
        self.debug_cells = Some(value);
        self
    }

    /// Sets `debug_headers`.
    pub fn with_debug_headers(mut self, value: bool) -> Self {
        self.debug_headers = Some(value);
        self
    }

    /// Sets `render_fallback_value`.
    pub fn with_render_fallback_value(mut self, value: Value) -> Self {
        self.render_fallback_value = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let defaults = TableConfig::new()
            .with_max_leaf_row_filter_depth(100)
            .with_paginate_expanded_rows(true);
        let user = TableConfig::new().with_paginate_expanded_rows(false);
        let merged = defaults.merge(&user);
        assert_eq!(merged.max_leaf_row_filter_depth, Some(100));
        assert_eq!(merged.paginate_expanded_rows, Some(false));
    }

    #[test]
    fn test_deserializes_partial_json() {
        let config: TableConfig =
            serde_json::from_str(r#"{"manual_sorting": true, "grouped_column_mode": "remove"}"#).unwrap();
        assert_eq!(config.manual_sorting, Some(true));
        assert_eq!(config.grouped_column_mode, Some(GroupedColumnMode::Remove));
        assert_eq!(config.enable_sorting, None);
    }
}
