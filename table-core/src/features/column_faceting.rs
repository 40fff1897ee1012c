//! Column faceting

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::Column;
use crate::core::FacetedMinMaxFn;
use crate::core::FacetedUniqueValuesFn;
use crate::core::RowModel;
use crate::core::RowModelFn;
use crate::core::Table;
use crate::core::TableOptions;
use crate::model::RowData;
use crate::model::Value;

/// Facet getters of one column (or of the global filter), created from the
/// option factories on first use.
pub struct FacetSlots<T> {
    row_model: RefCell<Option<RowModelFn<T>>>,
    unique_values: RefCell<Option<FacetedUniqueValuesFn<T>>>,
    min_max_values: RefCell<Option<FacetedMinMaxFn<T>>>,
}

impl<T> Default for FacetSlots<T> {
    fn default() -> Self {
        Self {
            row_model: RefCell::new(None),
            unique_values: RefCell::new(None),
            min_max_values: RefCell::new(None),
        }
    }
}

impl<T: RowData> FacetSlots<T> {
    pub(crate) fn row_model(&self, table: &Table<T>, column_id: &str) -> Option<RowModelFn<T>> {
        lazy_slot(&self.row_model, table, |options| {
            let factory = options.get_faceted_row_model.clone()?;
            Some(factory(table, column_id))
        })
    }

    pub(crate) fn unique_values(&self, table: &Table<T>, column_id: &str) -> Option<FacetedUniqueValuesFn<T>> {
        lazy_slot(&self.unique_values, table, |options| {
            let factory = options.get_faceted_unique_values.clone()?;
            Some(factory(table, column_id))
        })
    }

    pub(crate) fn min_max_values(&self, table: &Table<T>, column_id: &str) -> Option<FacetedMinMaxFn<T>> {
        lazy_slot(&self.min_max_values, table, |options| {
            let factory = options.get_faceted_min_max_values.clone()?;
            Some(factory(table, column_id))
        })
    }
}

fn lazy_slot<T, G: Clone>(
    slot: &RefCell<Option<G>>,
    table: &Table<T>,
    create: impl FnOnce(&TableOptions<T>) -> Option<G>,
) -> Option<G>
where
    T: RowData,
{
    let existing = slot.borrow().clone();
    if existing.is_some() {
        return existing;
    }
    let getter = create(&table.options())?;
    *slot.borrow_mut() = Some(getter.clone());
    Some(getter)
}

/// Per-column facets for filter UIs.
pub struct ColumnFaceting;

impl<T: RowData> TableFeature<T> for ColumnFaceting {
    fn name(&self) -> &'static str {
        "ColumnFaceting"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::ColumnFaceting)
    }

    fn create_column(&self, column: &mut Column<T>, _table: &Table<T>) {
        column.faceting = Some(FacetSlots::default());
    }
}

impl<T: RowData> Column<T> {
    /// Rows this column's facets are computed over; the pre-filtered rows
    /// when no faceted row model is configured.
    pub fn get_faceted_row_model(&self, table: &Table<T>) -> Rc<RowModel<T>> {
        let getter = self.faceting.as_ref().and_then(|slots| slots.row_model(table, &self.id));
        match getter {
            Some(getter) => getter(table),
            None => table.get_pre_filtered_row_model(),
        }
    }

    /// Occurrence count of every value of this column in its faceted rows.
    pub fn get_faceted_unique_values(&self, table: &Table<T>) -> Rc<HashMap<Value, usize>> {
        let getter = self
            .faceting
            .as_ref()
            .and_then(|slots| slots.unique_values(table, &self.id));
        match getter {
            Some(getter) => getter(table),
            None => Rc::new(HashMap::new()),
        }
    }

    /// Numeric `(min, max)` of this column in its faceted rows.
    pub fn get_faceted_min_max_values(&self, table: &Table<T>) -> Option<(f64, f64)> {
        let getter = self
            .faceting
            .as_ref()
            .and_then(|slots| slots.min_max_values(table, &self.id))?;
        getter(table)
    }
}
