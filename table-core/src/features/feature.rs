//! Feature hooks and the stock feature set

use std::fmt;
use std::rc::Rc;

use super::ColumnFaceting;
use super::ColumnFiltering;
use super::ColumnGrouping;
use super::ColumnOrdering;
use super::ColumnPinning;
use super::ColumnSizing;
use super::ColumnVisibility;
use super::GlobalFaceting;
use super::GlobalFiltering;
use super::RowExpanding;
use super::RowPagination;
use super::RowPinning;
use super::RowSelection;
use super::RowSorting;
use crate::core::Cell;
use crate::core::Column;
use crate::core::ColumnDef;
use crate::core::Header;
use crate::core::Row;
use crate::core::Table;
use crate::core::TableConfig;
use crate::core::TableState;
use crate::model::RowData;

/// Identifies a stock feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    ColumnVisibility,
    ColumnOrdering,
    ColumnPinning,
    ColumnFaceting,
    ColumnFiltering,
    GlobalFaceting,
    GlobalFiltering,
    RowSorting,
    ColumnGrouping,
    RowExpanding,
    RowPagination,
    RowPinning,
    RowSelection,
    ColumnSizing,
}

impl FeatureKind {
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Set of features that augmented an entity.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet(u32);

impl FeatureSet {
    pub fn insert(&mut self, kind: FeatureKind) {
        self.0 |= kind.bit();
    }

    pub fn contains(&self, kind: FeatureKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const ALL: [FeatureKind; 14] = [
            FeatureKind::ColumnVisibility,
            FeatureKind::ColumnOrdering,
            FeatureKind::ColumnPinning,
            FeatureKind::ColumnFaceting,
            FeatureKind::ColumnFiltering,
            FeatureKind::GlobalFaceting,
            FeatureKind::GlobalFiltering,
            FeatureKind::RowSorting,
            FeatureKind::ColumnGrouping,
            FeatureKind::RowExpanding,
            FeatureKind::RowPagination,
            FeatureKind::RowPinning,
            FeatureKind::RowSelection,
            FeatureKind::ColumnSizing,
        ];
        f.debug_set()
            .entries(ALL.iter().filter(|kind| self.contains(**kind)))
            .finish()
    }
}

/// A unit of table behavior.
///
/// A feature contributes a state fragment, a config fragment and a default
/// column definition fragment, and may augment each entity as it is built.
/// Hooks run in registration order; a hook may rely on the entity's base
/// fields but not on what later features attach.
///
/// Every method has a no-op default, so a custom feature implements only
/// what it needs.
pub trait TableFeature<T> {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// The stock feature this is, if any. Registered kinds gate the matching
    /// state slices and row model stages.
    fn kind(&self) -> Option<FeatureKind> {
        None
    }

    fn get_initial_state(&self) -> TableState {
        TableState::default()
    }

    fn get_default_options(&self) -> TableConfig {
        TableConfig::default()
    }

    fn get_default_column_def(&self) -> ColumnDef<T> {
        ColumnDef::default()
    }

    fn create_table(&self, _table: &mut Table<T>) {}

    fn create_column(&self, _column: &mut Column<T>, _table: &Table<T>) {}

    fn create_row(&self, _row: &mut Row<T>, _table: &Table<T>) {}

    fn create_cell(&self, _cell: &mut Cell<T>, _table: &Table<T>) {}

    fn create_header(&self, _header: &mut Header<T>, _table: &Table<T>) {}
}

/// Every stock feature, in the order their hooks run.
pub fn stock_features<T: RowData>() -> Vec<Rc<dyn TableFeature<T>>> {
    vec![
        Rc::new(ColumnVisibility),
        Rc::new(ColumnOrdering),
        Rc::new(ColumnPinning),
        Rc::new(ColumnFaceting),
        Rc::new(ColumnFiltering),
        Rc::new(GlobalFaceting),
        Rc::new(GlobalFiltering),
        Rc::new(RowSorting),
        Rc::new(ColumnGrouping),
        Rc::new(RowExpanding),
        Rc::new(RowPagination),
        Rc::new(RowPinning),
        Rc::new(RowSelection),
        Rc::new(ColumnSizing),
    ]
}
