//! Global faceting

use std::collections::HashMap;
use std::rc::Rc;

use super::FacetSlots;
use super::FeatureKind;
use super::GLOBAL_FILTER_ID;
use super::TableFeature;
use crate::core::RowModel;
use crate::core::Table;
use crate::model::RowData;
use crate::model::Value;

/// Facets of the global filter, over every globally filterable column.
pub struct GlobalFaceting;

impl<T: RowData> TableFeature<T> for GlobalFaceting {
    fn name(&self) -> &'static str {
        "GlobalFaceting"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::GlobalFaceting)
    }

    fn create_table(&self, table: &mut Table<T>) {
        table.global_facets = Some(FacetSlots::default());
    }
}

impl<T: RowData> Table<T> {
    /// Rows the global facets are computed over; the pre-filtered rows when
    /// filtering is manual or no faceted row model is configured.
    pub fn get_global_faceted_row_model(&self) -> Rc<RowModel<T>> {
        if self.config().manual_filtering.unwrap_or(false) {
            return self.get_pre_filtered_row_model();
        }
        let getter = self
            .global_facets
            .as_ref()
            .and_then(|slots| slots.row_model(self, GLOBAL_FILTER_ID));
        match getter {
            Some(getter) => getter(self),
            None => self.get_pre_filtered_row_model(),
        }
    }

    pub fn get_global_faceted_unique_values(&self) -> Rc<HashMap<Value, usize>> {
        let getter = self
            .global_facets
            .as_ref()
            .and_then(|slots| slots.unique_values(self, GLOBAL_FILTER_ID));
        match getter {
            Some(getter) => getter(self),
            None => Rc::new(HashMap::new()),
        }
    }

    pub fn get_global_faceted_min_max_values(&self) -> Option<(f64, f64)> {
        let getter = self
            .global_facets
            .as_ref()
            .and_then(|slots| slots.min_max_values(self, GLOBAL_FILTER_ID))?;
        getter(self)
    }
}
