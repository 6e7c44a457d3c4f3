//! TableEvent - Table Notification Enum
//!
//! Everything a table reports to its owning page. In remote mode the sort,
//! search, filter and page events are intents: the page fetches and pushes a
//! fresh `RemotePage` back.

use crate::components::composite::data_table::{ColumnFilters, DateRange, SortState};
use crate::domain::{Record, RowKey};

/// Table events for table -> page communication
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// A data row was clicked
    RowClicked {
        key: RowKey,
        index: usize,
        record: Record,
    },

    /// Selection changed; carries the full selection, not a delta
    SelectionChanged { selected: Vec<RowKey> },

    /// Sort column or direction changed
    SortChanged { sort: SortState },

    /// Page change (requested in remote mode, applied in local mode)
    PageChanged { page: usize },

    PageSizeChanged { page_size: usize },

    /// Settled search query
    SearchChanged { query: String },

    /// Column filters changed (remote mode only)
    FiltersChanged { filters: ColumnFilters },

    /// Combo-box filter picked a value (or was cleared)
    ComboBoxChanged { value: Option<String> },

    DateRangeChanged { range: DateRange },

    /// Bulk action clicked with a non-empty selection
    BulkAction { action: String, selected: Vec<RowKey> },

    /// Primary toolbar button clicked
    PrimaryAction { action: String },
}

impl TableEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::RowClicked { .. } => "row_clicked",
            TableEvent::SelectionChanged { .. } => "selection_changed",
            TableEvent::SortChanged { .. } => "sort_changed",
            TableEvent::PageChanged { .. } => "page_changed",
            TableEvent::PageSizeChanged { .. } => "page_size_changed",
            TableEvent::SearchChanged { .. } => "search_changed",
            TableEvent::FiltersChanged { .. } => "filters_changed",
            TableEvent::ComboBoxChanged { .. } => "combo_box_changed",
            TableEvent::DateRangeChanged { .. } => "date_range_changed",
            TableEvent::BulkAction { .. } => "bulk_action",
            TableEvent::PrimaryAction { .. } => "primary_action",
        }
    }

    /// Whether the owning page has to fetch new data in remote mode
    pub fn needs_fetch(&self) -> bool {
        matches!(
            self,
            TableEvent::SortChanged { .. }
                | TableEvent::PageChanged { .. }
                | TableEvent::PageSizeChanged { .. }
                | TableEvent::SearchChanged { .. }
                | TableEvent::FiltersChanged { .. }
                | TableEvent::ComboBoxChanged { .. }
                | TableEvent::DateRangeChanged { .. }
        )
    }
}
