//! DataTable Component
//!
//! The tabular engine behind every list page: search -> filter -> sort ->
//! paginate, then selection lookup and cell presentation for the visible rows.
//!
//! In local mode the table owns the whole record set and resolves every
//! interaction itself. In remote mode it shows the page it was handed and
//! forwards interactions to the owning page as `TableEvent` intents.

use std::time::Duration;

use ahash::AHashSet;
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use super::column::{Align, Column, ColumnWidth, find_column};
use super::data_provider::{DataProvider, RemotePage};
use super::debounce::DebouncedQuery;
use super::filter::{ColumnFilters, matching_indices};
use super::pagination::{PageView, PaginationControls, PaginationMode, paginate, validate_page_size};
use super::presentation::{Cell, CellPresenter, ExpandToggle, PresentationOptions, PresentationState};
use super::row_action::{ActionMenuState, ActionView, RowAction, visible_actions};
use super::selection::{SelectionSummary, SelectionTracker};
use super::sort::{SortDirection, SortState, sort_indices};
use super::toolbar::{DateRange, Toolbar};
use crate::config::GridConfig;
use crate::domain::{Record, RowKey};
use crate::error::{Error, Result};
use crate::eventing::TableEvent;

/// Header cell as the rendering layer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub width: ColumnWidth,
    pub align: Align,
    pub sortable: bool,
    /// Sort indicator, when this is the sort column
    pub sort: Option<SortDirection>,
}

/// One visible row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Position on the visible page
    pub index: usize,
    pub key: RowKey,
    pub cells: Vec<Cell>,
    pub actions: Vec<ActionView>,
    pub selected: bool,
    pub menu_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing loaded at all
    NoData,
    /// Rows exist but the active search or filters exclude all of them
    NoResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyView {
    pub state: EmptyState,
    pub message: String,
}

/// Snapshot of everything the rendering layer draws
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    /// `None` when there is nothing to page through
    pub pagination: Option<PaginationControls>,
    /// Header checkbox state for the visible page
    pub selection: SelectionSummary,
    pub selected_count: usize,
    /// Selected rows that are not on the visible page
    pub hidden_selected: usize,
    pub bulk_actions_enabled: bool,
    pub empty: Option<EmptyView>,
    /// Text in the search box (may run ahead of the applied query)
    pub search_text: String,
    pub loading: bool,
}

/// DataTable engine
#[derive(Debug)]
pub struct DataTable {
    config: GridConfig,
    columns: Vec<Column>,
    records: Vec<Record>,
    keys: Vec<RowKey>,
    source_id: Option<String>,
    mode: PaginationMode,
    page: usize,
    page_size: usize,
    search: DebouncedQuery,
    /// Query the rows are currently filtered by
    query: String,
    filters: ColumnFilters,
    sort: SortState,
    selection: SelectionTracker,
    menu: ActionMenuState,
    presentation: PresentationState,
    options: PresentationOptions,
    actions: Vec<RowAction>,
    toolbar: Toolbar,
    /// Caller flag for filters the table cannot see
    external_filter_active: bool,
    loading: bool,
    /// Record indices after filtering and sorting
    order: Vec<usize>,
    view: PageView,
    tx: Sender<TableEvent>,
    rx: Receiver<TableEvent>,
}

impl DataTable {
    /// Table that filters, sorts and slices its own records
    pub fn new_local(columns: Vec<Column>, config: GridConfig) -> Result<Self> {
        Self::new(columns, config, PaginationMode::Local)
    }

    /// Table that shows caller-supplied pages and forwards interactions
    pub fn new_remote(columns: Vec<Column>, config: GridConfig) -> Result<Self> {
        Self::new(
            columns,
            config,
            PaginationMode::Remote {
                total_items: 0,
                current_page: 1,
            },
        )
    }

    fn new(columns: Vec<Column>, config: GridConfig, mode: PaginationMode) -> Result<Self> {
        let page_size = validate_page_size(config.page_size)?;
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut table = Self {
            search: DebouncedQuery::new(Duration::from_millis(config.search_debounce_ms)),
            options: PresentationOptions::from_config(&config),
            config,
            columns,
            records: Vec::new(),
            keys: Vec::new(),
            source_id: None,
            mode,
            page: 1,
            page_size,
            query: String::new(),
            filters: ColumnFilters::new(),
            sort: SortState::default(),
            selection: SelectionTracker::new(),
            menu: ActionMenuState::default(),
            presentation: PresentationState::new(),
            actions: Vec::new(),
            toolbar: Toolbar::new(),
            external_filter_active: false,
            loading: false,
            order: Vec::new(),
            view: empty_view(page_size),
            tx,
            rx,
        };
        table.refresh();
        debug!(mode = mode.name(), page_size, "Created data table");
        Ok(table)
    }

    /// Set the row actions
    pub fn with_row_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_toolbar(mut self, toolbar: Toolbar) -> Self {
        self.toolbar = toolbar;
        self
    }

    /// Receiver for the table's notifications
    pub fn events(&self) -> Receiver<TableEvent> {
        self.rx.clone()
    }

    fn emit(&self, event: TableEvent) {
        debug!(event = event.name(), "Table event");
        // We hold a receiver ourselves, so the channel never disconnects
        let _ = self.tx.send(event);
    }

    // ==================== Data ====================

    /// Replace the column schema; resets all interaction state
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.reset();
    }

    /// Load every row of `provider` (local mode)
    ///
    /// A different source id than the current one resets the table first.
    pub fn set_source(&mut self, provider: &dyn DataProvider) -> Result<()> {
        if self.mode.is_remote() {
            return Err(Error::ModeMismatch {
                expected: "local",
                operation: "set_source",
            });
        }
        if self.source_id.as_deref() != Some(provider.source_id()) {
            if self.source_id.is_some() {
                self.reset();
            }
            self.source_id = Some(provider.source_id().to_string());
        }
        self.load_records(provider.all_rows());
        self.refresh();
        Ok(())
    }

    /// Show one page fetched by the owner (remote mode)
    pub fn set_remote_page(&mut self, page: RemotePage) -> Result<()> {
        if !self.mode.is_remote() {
            return Err(Error::ModeMismatch {
                expected: "remote",
                operation: "set_remote_page",
            });
        }
        let page_count = super::pagination::page_count(page.total_items, self.page_size);
        if page_count > 0 && (page.current_page == 0 || page.current_page > page_count) {
            warn!(
                current_page = page.current_page,
                page_count, "Remote page number out of range, clamping"
            );
        }
        self.mode = PaginationMode::Remote {
            total_items: page.total_items,
            current_page: page.current_page,
        };
        self.loading = false;
        self.menu.close();
        self.load_records(page.records);
        self.refresh();
        Ok(())
    }

    /// Remote pages mark the table busy between intent and fresh data
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn load_records(&mut self, records: Vec<Record>) {
        let id_field = self.config.id_field.as_str();
        self.keys = records
            .iter()
            .enumerate()
            .map(|(position, record)| RowKey::for_record(record, id_field, position))
            .collect();
        self.records = records;

        let positional = self.keys.iter().filter(|k| k.is_positional()).count();
        if positional > 0 {
            warn!(
                id_field,
                rows = positional,
                "Rows without identity field, falling back to positional keys"
            );
        }
        let mut seen = AHashSet::with_capacity(self.keys.len());
        if let Some(dup) = self.keys.iter().find(|k| !seen.insert(*k)) {
            warn!(key = %dup, "Duplicate row identity, selection may be ambiguous");
        }
    }

    /// Drop search, filters, sort, selection and view state
    pub fn reset(&mut self) {
        info!(source = ?self.source_id, "Resetting table state");
        self.search.reset();
        self.query.clear();
        self.filters.clear();
        self.sort.clear();
        self.menu.close();
        self.presentation.clear();
        self.page = 1;
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit(TableEvent::SelectionChanged { selected: Vec::new() });
        }
        self.refresh();
    }

    // ==================== Pipeline ====================

    fn refresh(&mut self) {
        self.recompute_order();
        self.repaginate();
    }

    /// Re-run filtering after the query or filters changed
    fn refilter(&mut self) {
        let start = (self.page - 1) * self.page_size;
        self.recompute_order();
        if self.page > 1 && start >= self.order.len() {
            debug!(page = self.page, rows = self.order.len(), "Filtered rows end before current page, back to page 1");
            self.page = 1;
        }
        self.repaginate();
    }

    fn recompute_order(&mut self) {
        if self.mode.is_remote() {
            // Remote rows arrive filtered, sorted and sliced
            self.order = (0..self.records.len()).collect();
            return;
        }
        let mut order = matching_indices(&self.records, &self.query, &self.filters, &self.columns);
        sort_indices(
            &self.records,
            &mut order,
            self.sort.column.as_deref(),
            self.sort.direction,
        );
        self.order = order;
    }

    fn repaginate(&mut self) {
        self.view = match paginate(self.order.len(), self.page, self.page_size, self.mode) {
            Ok(view) => view,
            Err(err) => {
                warn!(%err, "Pagination failed, showing no rows");
                empty_view(self.page_size)
            }
        };
        if !self.mode.is_remote() {
            self.page = self.view.effective_page;
        }
    }

    /// Record indices of the visible page
    fn visible_indices(&self) -> &[usize] {
        self.view.slice(&self.order)
    }

    fn visible_keys(&self) -> Vec<RowKey> {
        self.visible_indices()
            .iter()
            .map(|&i| self.keys[i].clone())
            .collect()
    }

    /// Records on the visible page, in display order
    pub fn visible_records(&self) -> Vec<&Record> {
        self.visible_indices().iter().map(|&i| &self.records[i]).collect()
    }

    fn visible_row(&self, index: usize) -> Option<(usize, &Record)> {
        let record_index = *self.visible_indices().get(index)?;
        Some((record_index, &self.records[record_index]))
    }

    // ==================== Search & filters ====================

    /// Search box keystroke
    ///
    /// Clearing the box applies immediately; anything else waits for the
    /// quiet interval (see `poll_search` / `next_search`).
    pub fn on_search_input(&mut self, raw: impl Into<String>) {
        if let Some(query) = self.search.input(raw) {
            self.apply_search(query);
        }
    }

    /// Apply a settled query if the debounce timer has fired
    pub fn poll_search(&mut self) -> bool {
        match self.search.try_settled() {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    /// Wait for the pending debounce timer and apply its query
    pub async fn next_search(&mut self) -> bool {
        match self.search.settled().await {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    /// Apply `query` now, bypassing the debounce
    pub fn apply_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        debug!(query = %query, "Search applied");
        self.query = query;
        self.emit(TableEvent::SearchChanged {
            query: self.query.clone(),
        });
        self.refilter();
    }

    /// Constrain one column; an empty token clears it
    pub fn set_column_filter(&mut self, key: &str, token: impl Into<String>) -> Result<()> {
        if find_column(&self.columns, key).is_none() {
            return Err(Error::UnknownColumn { key: key.to_string() });
        }
        let before = self.filters.clone();
        self.filters.set(key, token);
        if self.filters == before {
            return Ok(());
        }
        if self.mode.is_remote() {
            self.emit(TableEvent::FiltersChanged {
                filters: self.filters.clone(),
            });
        }
        self.refilter();
        Ok(())
    }

    /// Clear the search box and every column filter
    pub fn clear_filters(&mut self) {
        let had_filters = !self.filters.is_empty();
        self.search.reset();
        self.filters.clear();
        if had_filters && self.mode.is_remote() {
            self.emit(TableEvent::FiltersChanged {
                filters: self.filters.clone(),
            });
        }
        if self.query.is_empty() {
            self.refilter();
        } else {
            self.apply_search(String::new());
        }
    }

    /// Flag filters applied outside this table (page-level widgets)
    pub fn set_external_filter_active(&mut self, active: bool) {
        self.external_filter_active = active;
    }

    // ==================== Sort ====================

    /// Header click
    ///
    /// Returns false for unsortable columns, which ignore the click. In
    /// remote mode only the indicator moves; the owner re-fetches.
    pub fn toggle_sort(&mut self, key: &str) -> Result<bool> {
        let column =
            find_column(&self.columns, key).ok_or_else(|| Error::UnknownColumn { key: key.to_string() })?;
        if !column.sortable {
            debug!(column = key, "Ignoring sort on unsortable column");
            return Ok(false);
        }
        self.sort.toggle(key);
        debug!(column = key, direction = ?self.sort.direction, "Sort changed");
        self.emit(TableEvent::SortChanged {
            sort: self.sort.clone(),
        });
        self.refresh();
        Ok(true)
    }

    /// Restore a sort without notifying (e.g. from saved page state)
    pub fn set_sort(&mut self, sort: SortState) -> Result<()> {
        if let Some(key) = sort.column.as_deref() {
            if find_column(&self.columns, key).is_none() {
                return Err(Error::UnknownColumn { key: key.to_string() });
            }
        }
        self.sort = sort;
        self.refresh();
        Ok(())
    }

    /// Back to input order
    pub fn clear_sort(&mut self) {
        if self.sort.column.is_none() {
            return;
        }
        self.sort.clear();
        self.emit(TableEvent::SortChanged {
            sort: self.sort.clone(),
        });
        self.refresh();
    }

    // ==================== Pagination ====================

    /// Page strip click
    ///
    /// Local mode moves to the page; remote mode only asks the owner for it.
    /// Returns false when there is nowhere to go.
    pub fn go_to_page(&mut self, target: usize) -> bool {
        let Some(target) = self.view.resolve_request(target) else {
            return false;
        };
        self.menu.close();
        if !self.mode.is_remote() {
            self.page = target;
            self.repaginate();
        }
        debug!(page = target, mode = self.mode.name(), "Page changed");
        self.emit(TableEvent::PageChanged { page: target });
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.view.effective_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.view.effective_page.saturating_sub(1))
    }

    /// Page-size picker; goes back to page 1
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        let page_size = validate_page_size(page_size)?;
        if page_size == self.page_size {
            return Ok(());
        }
        self.page_size = page_size;
        self.page = 1;
        self.menu.close();
        self.repaginate();
        self.emit(TableEvent::PageSizeChanged { page_size });
        Ok(())
    }

    // ==================== Selection ====================

    /// Row checkbox; `None` when no loaded row has `key`
    pub fn toggle_row(&mut self, key: &RowKey) -> Option<bool> {
        if !self.keys.contains(key) {
            warn!(key = %key, "Toggle on unknown row ignored");
            return None;
        }
        let selected = self.selection.toggle_row(key.clone());
        self.emit_selection();
        Some(selected)
    }

    /// Header checkbox: acts on the visible page only
    pub fn toggle_all_visible(&mut self) -> bool {
        let visible = self.visible_keys();
        if !self.selection.toggle_all(&visible) {
            return false;
        }
        self.emit_selection();
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.emit_selection();
    }

    fn emit_selection(&self) {
        self.emit(TableEvent::SelectionChanged {
            selected: self.selection.selected(),
        });
    }

    pub fn selection_summary(&self) -> SelectionSummary {
        self.selection.summary(&self.visible_keys())
    }

    /// Full selection, including rows on other pages or hidden by filters
    pub fn selected(&self) -> Vec<RowKey> {
        self.selection.selected()
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selection.is_selected(key)
    }

    // ==================== Rows & actions ====================

    /// Row body click at `index` on the visible page
    pub fn click_row(&mut self, index: usize) -> bool {
        let Some((record_index, record)) = self.visible_row(index) else {
            return false;
        };
        let event = TableEvent::RowClicked {
            key: self.keys[record_index].clone(),
            index,
            record: record.clone(),
        };
        self.menu.close();
        self.emit(event);
        true
    }

    /// Run row action `action` on the visible row `index`
    ///
    /// Hidden or disabled actions do nothing and return false.
    pub fn run_action(&mut self, index: usize, action: usize) -> bool {
        let Some((_, record)) = self.visible_row(index) else {
            return false;
        };
        let Some(row_action) = self.actions.get(action) else {
            warn!(action, "Unknown row action");
            return false;
        };
        let ran = row_action.invoke(record, index);
        if ran {
            debug!(action = %row_action.label, row = index, "Row action invoked");
        }
        self.menu.close();
        ran
    }

    /// Open or close the action menu of visible row `index`
    ///
    /// Opening one row's menu closes any other.
    pub fn toggle_row_menu(&mut self, index: usize) -> bool {
        let Some((record_index, _)) = self.visible_row(index) else {
            return false;
        };
        let key = self.keys[record_index].clone();
        self.menu.toggle(key)
    }

    pub fn close_row_menu(&mut self) {
        self.menu.close();
    }

    pub fn open_menu_row(&self) -> Option<&RowKey> {
        self.menu.open_row()
    }

    /// Expand or collapse a long-text cell
    pub fn toggle_long_text(&mut self, key: &RowKey, column: &str, scroll_offset: f32) -> Option<ExpandToggle> {
        if !self.keys.contains(key) || find_column(&self.columns, column).is_none() {
            return None;
        }
        Some(self.presentation.toggle_long_text(key.clone(), column, scroll_offset))
    }

    /// Avatar image failed to load; later renders use the placeholder asset
    pub fn mark_image_failed(&mut self, src: impl Into<String>) {
        self.presentation.mark_image_failed(src);
    }

    // ==================== Toolbar ====================

    /// Bulk action click; needs a non-empty selection
    pub fn run_bulk_action(&mut self, id: &str) -> Result<bool> {
        if self.toolbar.find_bulk_action(id).is_none() {
            return Err(Error::Invalid {
                message: format!("unknown bulk action: {id}"),
            });
        }
        if self.selection.is_empty() {
            debug!(action = id, "Bulk action without selection ignored");
            return Ok(false);
        }
        self.emit(TableEvent::BulkAction {
            action: id.to_string(),
            selected: self.selection.selected(),
        });
        Ok(true)
    }

    /// Primary button click
    pub fn click_primary(&mut self) -> bool {
        let Some(button) = &self.toolbar.action_button else {
            return false;
        };
        self.emit(TableEvent::PrimaryAction {
            action: button.id.clone(),
        });
        true
    }

    /// Combo-box pick; the page owns the value and pushes it back via `toolbar_mut`
    pub fn select_combo_box(&mut self, value: Option<String>) -> Result<()> {
        let Some(combo) = &self.toolbar.combo_box else {
            return Err(Error::Invalid {
                message: "table has no combo-box filter".to_string(),
            });
        };
        if let Some(v) = value.as_deref() {
            if !combo.accepts(v) {
                return Err(Error::Invalid {
                    message: format!("{v} is not an option of {}", combo.label),
                });
            }
        }
        self.emit(TableEvent::ComboBoxChanged { value });
        Ok(())
    }

    /// Date-range pick; reversed ends are swapped
    pub fn select_date_range(&mut self, range: DateRange) -> Result<()> {
        if self.toolbar.date_range.is_none() {
            return Err(Error::Invalid {
                message: "table has no date-range filter".to_string(),
            });
        }
        self.emit(TableEvent::DateRangeChanged {
            range: range.normalized(),
        });
        Ok(())
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn toolbar_mut(&mut self) -> &mut Toolbar {
        &mut self.toolbar
    }

    // ==================== Accessors ====================

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// Page actually shown (the caller's page in remote mode)
    pub fn page(&self) -> usize {
        self.view.effective_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.view.page_count
    }

    /// Rows after search and filters (the caller's total in remote mode)
    pub fn total_items(&self) -> usize {
        self.view.total_items
    }

    /// Applied query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Search box text
    pub fn search_text(&self) -> &str {
        self.search.displayed()
    }

    pub fn filters(&self) -> &ColumnFilters {
        &self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn filtering_active(&self) -> bool {
        !self.query.is_empty()
            || !self.filters.is_empty()
            || self.external_filter_active
            || self.toolbar.external_filter_active()
    }

    // ==================== View ====================

    /// Build the render snapshot for the current state
    pub fn view(&self) -> TableView {
        let headers = self
            .columns
            .iter()
            .map(|col| HeaderView {
                key: col.key.clone(),
                label: col.label.clone(),
                width: col.width,
                align: col.align,
                sortable: col.sortable,
                sort: self.sort.indicator(&col.key),
            })
            .collect();

        let presenter = CellPresenter::new(&self.options, &self.presentation);
        let rows: Vec<RowView> = self
            .visible_indices()
            .iter()
            .enumerate()
            .map(|(index, &record_index)| {
                let record = &self.records[record_index];
                let key = &self.keys[record_index];
                RowView {
                    index,
                    key: key.clone(),
                    cells: self
                        .columns
                        .iter()
                        .map(|col| presenter.render_cell(col, record, index, key))
                        .collect(),
                    actions: visible_actions(&self.actions, record),
                    selected: self.selection.is_selected(key),
                    menu_open: self.menu.is_open(key),
                }
            })
            .collect();

        let empty = rows.is_empty().then(|| {
            if self.filtering_active() {
                EmptyView {
                    state: EmptyState::NoResults,
                    message: self.config.no_results_message.clone(),
                }
            } else {
                EmptyView {
                    state: EmptyState::NoData,
                    message: self.config.empty_message.clone(),
                }
            }
        });

        let visible = self.visible_keys();
        TableView {
            headers,
            rows,
            pagination: PaginationControls::from_view(
                &self.view,
                self.config.items_label.as_str(),
                &self.config.page_size_options,
            ),
            selection: self.selection.summary(&visible),
            selected_count: self.selection.len(),
            hidden_selected: self.selection.hidden_count(&visible),
            bulk_actions_enabled: !self.toolbar.bulk_actions.is_empty() && !self.selection.is_empty(),
            empty,
            search_text: self.search.displayed().to_string(),
            loading: self.loading,
        }
    }
}

fn empty_view(page_size: usize) -> PageView {
    PageView {
        range: 0..0,
        page_count: 0,
        effective_page: 1,
        total_items: 0,
        page_size,
    }
}
