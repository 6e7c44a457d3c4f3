//! DataTable Component
//!
//! A reusable data table engine: search, column filters, typed sort, local or
//! remote pagination, selection, row actions and cell presentation.

pub mod column;
pub mod data_provider;
pub mod data_table;
pub mod debounce;
pub mod filter;
pub mod pagination;
pub mod presentation;
pub mod row_action;
pub mod selection;
pub mod sort;
pub mod toolbar;

pub use column::{Align, CellRenderer, Column, ColumnWidth, RenderKind};
pub use data_provider::{DataProvider, RemotePage, VecDataProvider};
pub use data_table::{DataTable, EmptyState, EmptyView, HeaderView, RowView, TableView};
pub use debounce::DebouncedQuery;
pub use filter::ColumnFilters;
pub use pagination::{PageItem, PageView, PaginationControls, PaginationMode};
pub use presentation::{
    Cell, CellContent, ExpandToggle, LinkKind, PresentationOptions, PresentationState, StatusTable,
    StatusTone,
};
pub use row_action::{ActionMenuState, ActionView, RowAction, visible_actions};
pub use selection::{SelectionSummary, SelectionTracker};
pub use sort::{SortDirection, SortState};
pub use toolbar::{
    ActionButton, BulkAction, ComboBoxFilter, DateRange, DateRangeFilter, FilterOption, Toolbar,
};
