//! Header groups
//!
//! Headers are laid out bottom-up: every visible leaf column gets a header in
//! the bottom group, and each group above holds one header per parent column
//! (or a placeholder when a column is shallower than the group). Adjacent
//! headers over the same column merge, which yields the column spans.

use std::fmt;
use std::rc::Rc;

use super::Column;
use super::DebugFlag;
use super::Table;
use crate::features::FeatureKind;
use crate::features::FeatureSet;
use crate::memo::ById;
use crate::model::RowData;

/// One header cell in a header group.
pub struct Header<T> {
    pub(crate) id: String,
    pub(crate) index: usize,
    pub(crate) depth: usize,
    pub(crate) column: Rc<Column<T>>,
    pub(crate) is_placeholder: bool,
    pub(crate) placeholder_id: Option<String>,
    pub(crate) sub_headers: Vec<Rc<Header<T>>>,
    pub(crate) col_span: usize,
    pub(crate) row_span: usize,
    pub(crate) features: FeatureSet,
}

impl<T> fmt::Debug for Header<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("depth", &self.depth)
            .field("col_span", &self.col_span)
            .field("sub_headers", &self.sub_headers)
            .finish()
    }
}

/// Everything a renderer needs to paint a header.
pub struct HeaderContext<'a, T> {
    pub table: &'a Table<T>,
    pub header: &'a Header<T>,
    pub column: &'a Column<T>,
}

impl<T: RowData> Header<T> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position within its header group.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn column(&self) -> &Rc<Column<T>> {
        &self.column
    }

    /// Fills the space above a column that is shallower than this group.
    pub fn is_placeholder(&self) -> bool {
        self.is_placeholder
    }

    pub fn placeholder_id(&self) -> Option<&str> {
        self.placeholder_id.as_deref()
    }

    pub fn sub_headers(&self) -> &[Rc<Header<T>>] {
        &self.sub_headers
    }

    /// Number of visible leaf headers spanned.
    pub fn col_span(&self) -> usize {
        self.col_span
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.contains(kind)
    }

    /// Every header below this one, children before parents, ending with
    /// this header.
    pub fn get_leaf_headers(self: &Rc<Self>) -> Vec<Rc<Header<T>>> {
        let mut leaf_headers = Vec::new();
        collect_leaf_headers(self, &mut leaf_headers);
        leaf_headers
    }

    pub fn get_context<'a>(&'a self, table: &'a Table<T>) -> HeaderContext<'a, T> {
        HeaderContext {
            table,
            header: self,
            column: &self.column,
        }
    }
}

fn collect_leaf_headers<T>(header: &Rc<Header<T>>, out: &mut Vec<Rc<Header<T>>>) {
    for sub_header in &header.sub_headers {
        collect_leaf_headers(sub_header, out);
    }
    out.push(header.clone());
}

/// One row of headers.
pub struct HeaderGroup<T> {
    pub id: String,
    pub depth: usize,
    pub headers: Vec<Rc<Header<T>>>,
}

impl<T> Clone for HeaderGroup<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            depth: self.depth,
            headers: self.headers.clone(),
        }
    }
}

impl<T> fmt::Debug for HeaderGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderGroup")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("headers", &self.headers)
            .finish()
    }
}

struct DraftHeader<T> {
    id: String,
    index: usize,
    depth: usize,
    column: Rc<Column<T>>,
    is_placeholder: bool,
    placeholder_id: Option<String>,
    sub_headers: Vec<usize>,
    col_span: usize,
    row_span: usize,
}

struct DraftGroup {
    id: String,
    depth: usize,
    headers: Vec<usize>,
}

fn join_id<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn find_max_depth<T: RowData>(table: &Table<T>, columns: &[Rc<Column<T>>], depth: usize, max_depth: &mut usize) {
    *max_depth = (*max_depth).max(depth);
    for column in columns.iter().filter(|column| column.get_is_visible(table)) {
        if !column.columns.is_empty() {
            find_max_depth(table, &column.columns, depth + 1, max_depth);
        }
    }
}

fn compute_spans<T: RowData>(table: &Table<T>, arena: &mut [DraftHeader<T>], headers: &[usize]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for &index in headers {
        if !arena[index].column.get_is_visible(table) {
            continue;
        }
        let children = arena[index].sub_headers.clone();
        let span = if children.is_empty() {
            (1, 0)
        } else {
            let child_spans = compute_spans(table, arena, &children);
            let col_span = child_spans.iter().map(|span| span.0).sum();
            let row_span = child_spans.iter().map(|span| span.1).min().unwrap_or(0);
            (col_span, row_span)
        };
        arena[index].col_span = span.0;
        arena[index].row_span = span.1;
        spans.push(span);
    }
    spans
}

/// Builds the header groups for `leaf_columns`, top group first.
///
/// `family` prefixes group and header ids for the pinned regions.
pub(crate) fn build_header_groups<T: RowData>(
    table: &Table<T>,
    all_columns: &[Rc<Column<T>>],
    leaf_columns: &[Rc<Column<T>>],
    family: &str,
) -> Vec<HeaderGroup<T>> {
    let mut max_depth = 0;
    find_max_depth(table, all_columns, 1, &mut max_depth);

    let mut arena: Vec<DraftHeader<T>> = leaf_columns
        .iter()
        .enumerate()
        .map(|(index, column)| DraftHeader {
            id: column.id.clone(),
            index,
            depth: max_depth,
            column: column.clone(),
            is_placeholder: false,
            placeholder_id: None,
            sub_headers: Vec::new(),
            col_span: 0,
            row_span: 0,
        })
        .collect();

    let mut groups = Vec::new();
    let mut to_group: Vec<usize> = (0..arena.len()).collect();
    let mut depth = max_depth - 1;
    loop {
        let mut pending: Vec<usize> = Vec::new();
        for &child in &to_group {
            let child_column = arena[child].column.clone();
            let parent = child_column.parent_id().and_then(|id| table.get_column(id));
            let is_leaf = child_column.depth == depth;
            let (column, is_placeholder) = match parent {
                Some(parent) if is_leaf => (parent, false),
                _ => (child_column, true),
            };

            let latest = pending.last().copied();
            match latest {
                Some(latest) if Rc::ptr_eq(&arena[latest].column, &column) => {
                    arena[latest].sub_headers.push(child);
                }
                _ => {
                    let placeholder_id = is_placeholder.then(|| {
                        pending
                            .iter()
                            .filter(|&&header| Rc::ptr_eq(&arena[header].column, &column))
                            .count()
                            .to_string()
                    });
                    let depth_part = if depth == 0 { String::new() } else { depth.to_string() };
                    let id = join_id([family, depth_part.as_str(), column.id(), arena[child].id.as_str()]);
                    arena.push(DraftHeader {
                        id,
                        index: pending.len(),
                        depth,
                        column,
                        is_placeholder,
                        placeholder_id,
                        sub_headers: vec![child],
                        col_span: 0,
                        row_span: 0,
                    });
                    pending.push(arena.len() - 1);
                }
            }
        }

        let depth_part = depth.to_string();
        groups.push(DraftGroup {
            id: join_id([family, depth_part.as_str()]),
            depth,
            headers: to_group,
        });
        if depth == 0 {
            break;
        }
        depth -= 1;
        to_group = pending;
    }
    groups.reverse();

    if let Some(top) = groups.first() {
        let top_headers = top.headers.clone();
        compute_spans(table, &mut arena, &top_headers);
    }

    // children always precede their parents in the arena
    let mut frozen: Vec<Rc<Header<T>>> = Vec::with_capacity(arena.len());
    for draft in arena {
        let mut header = Header {
            id: draft.id,
            index: draft.index,
            depth: draft.depth,
            column: draft.column,
            is_placeholder: draft.is_placeholder,
            placeholder_id: draft.placeholder_id,
            sub_headers: draft.sub_headers.iter().map(|&index| frozen[index].clone()).collect(),
            col_span: draft.col_span,
            row_span: draft.row_span,
            features: FeatureSet::default(),
        };
        table.augment_header(&mut header);
        frozen.push(Rc::new(header));
    }

    groups
        .into_iter()
        .map(|group| HeaderGroup {
            id: group.id,
            depth: group.depth,
            headers: group.headers.iter().map(|&index| frozen[index].clone()).collect(),
        })
        .collect()
}

fn pinned_columns<T>(ids: &[String], leaf_columns: &[Rc<Column<T>>]) -> Vec<Rc<Column<T>>> {
    ids.iter()
        .filter_map(|id| leaf_columns.iter().find(|column| &column.id == id).cloned())
        .collect()
}

impl<T: RowData> Table<T> {
    /// Header groups over the visible leaf columns, pinned left columns
    /// first and pinned right columns last.
    pub fn get_header_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let state = self.get_state();
        let pinning = state.column_pinning();
        let deps = (
            ById(self.get_all_columns()),
            ById(self.get_visible_leaf_columns()),
            pinning.left.clone(),
            pinning.right.clone(),
        );
        self.memo("getHeaderGroups", DebugFlag::Headers, deps, |(all, leaf, left, right)| {
            let mut ordered = pinned_columns(left, &leaf.0);
            ordered.extend(
                leaf.0
                    .iter()
                    .filter(|column| !left.contains(&column.id) && !right.contains(&column.id))
                    .cloned(),
            );
            ordered.extend(pinned_columns(right, &leaf.0));
            build_header_groups(self, &all.0, &ordered, "")
        })
    }

    /// Header groups of the left-pinned columns, in pinning order.
    pub fn get_left_header_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let state = self.get_state();
        let deps = (
            ById(self.get_all_columns()),
            ById(self.get_visible_leaf_columns()),
            state.column_pinning().left.clone(),
        );
        self.memo("getLeftHeaderGroups", DebugFlag::Headers, deps, |(all, leaf, left)| {
            build_header_groups(self, &all.0, &pinned_columns(left, &leaf.0), "left")
        })
    }

    /// Header groups of the unpinned columns.
    pub fn get_center_header_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let state = self.get_state();
        let pinning = state.column_pinning();
        let deps = (
            ById(self.get_all_columns()),
            ById(self.get_visible_leaf_columns()),
            pinning.left.clone(),
            pinning.right.clone(),
        );
        self.memo("getCenterHeaderGroups", DebugFlag::Headers, deps, |(all, leaf, left, right)| {
            let center: Vec<_> = leaf
                .0
                .iter()
                .filter(|column| !left.contains(&column.id) && !right.contains(&column.id))
                .cloned()
                .collect();
            build_header_groups(self, &all.0, &center, "center")
        })
    }

    /// Header groups of the right-pinned columns, in pinning order.
    pub fn get_right_header_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let state = self.get_state();
        let deps = (
            ById(self.get_all_columns()),
            ById(self.get_visible_leaf_columns()),
            state.column_pinning().right.clone(),
        );
        self.memo("getRightHeaderGroups", DebugFlag::Headers, deps, |(all, leaf, right)| {
            build_header_groups(self, &all.0, &pinned_columns(right, &leaf.0), "right")
        })
    }

    /// Header groups bottom first.
    pub fn get_footer_groups(&self) -> Rc<Vec<HeaderGroup<T>>> {
        let deps = ById(self.get_header_groups());
        self.memo("getFooterGroups", DebugFlag::Headers, deps, |groups| {
            groups.0.iter().rev().cloned().collect()
        })
    }

    /// Every header of every group, top group first.
    pub fn get_flat_headers(&self) -> Vec<Rc<Header<T>>> {
        self.get_header_groups()
            .iter()
            .flat_map(|group| group.headers.iter().cloned())
            .collect()
    }

    /// Leaf headers of the left, center and right regions, each followed by
    /// its ancestors.
    pub fn get_leaf_headers(&self) -> Vec<Rc<Header<T>>> {
        let regions = [
            self.get_left_header_groups(),
            self.get_center_header_groups(),
            self.get_right_header_groups(),
        ];
        regions
            .iter()
            .filter_map(|groups| groups.first())
            .flat_map(|group| group.headers.iter())
            .flat_map(|header| header.get_leaf_headers())
            .collect()
    }
}
