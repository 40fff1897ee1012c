//! Row pagination

use std::rc::Rc;

use super::FeatureKind;
use super::TableFeature;
use crate::core::DebugFlag;
use crate::core::PaginationState;
use crate::core::RowModel;
use crate::core::Table;
use crate::core::TableState;
use crate::core::Updater;
use crate::model::RowData;

/// Page window over the expanded rows.
pub struct RowPagination;

impl<T: RowData> TableFeature<T> for RowPagination {
    fn name(&self) -> &'static str {
        "RowPagination"
    }

    fn kind(&self) -> Option<FeatureKind> {
        Some(FeatureKind::RowPagination)
    }

    fn get_initial_state(&self) -> TableState {
        TableState {
            pagination: Some(PaginationState::default()),
            ..TableState::default()
        }
    }
}

impl<T: RowData> Table<T> {
    pub fn set_pagination(&self, updater: impl Into<Updater<PaginationState>>) {
        let next = updater.into().apply(&self.get_state().pagination());
        self.commit_slice(
            FeatureKind::RowPagination,
            "pagination",
            next,
            |options| options.on_pagination_change.clone(),
            |state, next| state.pagination = Some(next),
        );
    }

    pub fn reset_pagination(&self, default_state: bool) {
        let next = if default_state {
            PaginationState::default()
        } else {
            self.initial_state().pagination()
        };
        self.set_pagination(next);
    }

    /// Moves to a page, clamped to the last page when the page count is
    /// known from the config.
    pub fn set_page_index(&self, updater: impl Into<Updater<usize>>) {
        let old = self.get_state().pagination();
        let page_index = updater.into().apply(&old.page_index);
        let max_page_index = match self.config().page_count {
            None | Some(-1) => usize::MAX,
            Some(count) => usize::try_from(count.saturating_sub(1)).unwrap_or(0),
        };
        self.set_pagination(PaginationState {
            page_index: page_index.min(max_page_index),
            ..old
        });
    }

    pub fn reset_page_index(&self, default_state: bool) {
        let page_index = if default_state {
            0
        } else {
            self.initial_state().pagination().page_index
        };
        self.set_page_index(page_index);
    }

    /// Changes the page size, keeping the current top row on screen.
    pub fn set_page_size(&self, updater: impl Into<Updater<usize>>) {
        let old = self.get_state().pagination();
        let page_size = updater.into().apply(&old.page_size).max(1);
        let top_row_index = old.page_size * old.page_index;
        self.set_pagination(PaginationState {
            page_index: top_row_index / page_size,
            page_size,
        });
    }

    pub fn reset_page_size(&self, default_state: bool) {
        let page_size = if default_state {
            PaginationState::default().page_size
        } else {
            self.initial_state().pagination().page_size
        };
        self.set_page_size(page_size);
    }

    /// Resets the page index when filters, sorting, grouping or data change,
    /// unless disabled.
    pub(crate) fn auto_reset_page_index(&self) {
        if !self.has_feature(FeatureKind::RowPagination) {
            return;
        }
        let config = self.config();
        let enabled = config
            .auto_reset_all
            .or(config.auto_reset_page_index)
            .unwrap_or(!config.manual_pagination.unwrap_or(false));
        let target = self.initial_state().pagination().page_index;
        if enabled && self.get_state().pagination().page_index != target {
            log::debug!("auto-resetting page index to {}", target);
            self.reset_page_index(false);
        }
    }

    /// Every page index, `0..page_count`.
    pub fn get_page_options(&self) -> Rc<Vec<usize>> {
        let page_count = self.get_page_count();
        self.memo("getPageOptions", DebugFlag::Table, page_count, |page_count| {
            (0..usize::try_from(*page_count).unwrap_or(0)).collect()
        })
    }

    pub fn get_can_previous_page(&self) -> bool {
        self.get_state().pagination().page_index > 0
    }

    pub fn get_can_next_page(&self) -> bool {
        let page_index = self.get_state().pagination().page_index;
        match self.get_page_count() {
            -1 => true,
            0 => false,
            count => i64::try_from(page_index).is_ok_and(|index| index < count - 1),
        }
    }

    pub fn previous_page(&self) {
        self.set_page_index(Updater::with(|old: &usize| old.saturating_sub(1)));
    }

    pub fn next_page(&self) {
        self.set_page_index(Updater::with(|old: &usize| old + 1));
    }

    pub fn first_page(&self) {
        self.set_page_index(0_usize);
    }

    pub fn last_page(&self) {
        let last = usize::try_from(self.get_page_count() - 1).unwrap_or(0);
        self.set_page_index(last);
    }

    /// Configured page count, else the pages needed for every row; -1 means
    /// unknown.
    pub fn get_page_count(&self) -> i64 {
        if let Some(page_count) = self.config().page_count {
            return page_count;
        }
        let page_size = self.get_state().pagination().page_size.max(1);
        let pages = self.get_row_count().div_ceil(page_size);
        i64::try_from(pages).unwrap_or(i64::MAX)
    }

    /// Configured row count, else the number of top-level rows before
    /// pagination.
    pub fn get_row_count(&self) -> usize {
        match self.config().row_count {
            Some(row_count) => row_count,
            None => self.get_pre_pagination_row_model().rows.len(),
        }
    }

    pub fn get_pre_pagination_row_model(&self) -> Rc<RowModel<T>> {
        self.get_expanded_row_model()
    }

    pub fn get_pagination_row_model(&self) -> Rc<RowModel<T>> {
        self.run_stage(
            "paginated",
            FeatureKind::RowPagination,
            self.config().manual_pagination,
            |options| options.get_pagination_row_model.clone(),
            || self.get_pre_pagination_row_model(),
        )
    }
}
