//! Requests Controller
//!
//! Drives the remote-mode requests table: folds table intents into a backend
//! query, fetches pages, and discards responses that a newer fetch has
//! superseded.

use std::future::Future;

use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

use super::page::{SOURCE_ID, request_columns, request_toolbar};
use crate::components::composite::data_table::filter::matching_indices;
use crate::components::composite::data_table::pagination::{PaginationMode, paginate};
use crate::components::composite::data_table::sort::sort_indices;
use crate::components::composite::data_table::{
    Column, ColumnFilters, DataTable, DateRange, RemotePage, RowAction, SortState,
};
use crate::config::GridConfig;
use crate::domain::{DocumentRequest, Record};
use crate::error::{Error, Result};
use crate::eventing::TableEvent;

/// Everything the backend needs to serve one page
#[derive(Debug, Clone, PartialEq)]
pub struct RequestQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
    pub filters: ColumnFilters,
    pub sort: SortState,
    pub document_type: Option<String>,
    pub submitted: DateRange,
}

impl RequestQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            search: String::new(),
            filters: ColumnFilters::new(),
            sort: SortState::default(),
            document_type: None,
            submitted: DateRange::default(),
        }
    }
}

/// Source of request pages
pub trait RequestsBackend: Send + Sync {
    fn fetch(&self, query: &RequestQuery) -> impl Future<Output = Result<RemotePage>> + Send;
}

/// A fetch in flight; only the latest ticket's response is applied
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub sequence: u64,
    pub query: RequestQuery,
}

/// Owner of the requests table
pub struct RequestsController<B> {
    backend: B,
    table: DataTable,
    events: Receiver<TableEvent>,
    query: RequestQuery,
    /// Sequence of the most recent fetch issued
    sequence: u64,
    /// Table intents changed the query since the last fetch
    dirty: bool,
}

impl<B: RequestsBackend> RequestsController<B> {
    pub fn new(backend: B, config: GridConfig, actions: Vec<RowAction>) -> Result<Self> {
        let query = RequestQuery::new(config.page_size);
        let table = DataTable::new_remote(request_columns(), config)?
            .with_row_actions(actions)
            .with_toolbar(request_toolbar());
        let events = table.events();
        Ok(Self {
            backend,
            table,
            events,
            query,
            sequence: 0,
            dirty: true,
        })
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// For forwarding user interactions
    pub fn table_mut(&mut self) -> &mut DataTable {
        &mut self.table
    }

    pub fn query(&self) -> &RequestQuery {
        &self.query
    }

    /// Fold pending table events into the query
    ///
    /// A search whose debounce interval has elapsed is applied first. Returns
    /// the events this controller does not handle itself (row clicks,
    /// selection, bulk and primary actions) for the page.
    pub fn pump(&mut self) -> Vec<TableEvent> {
        self.table.poll_search();
        let mut passthrough = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if event.needs_fetch() {
                self.apply_intent(event);
                self.dirty = true;
            } else {
                passthrough.push(event);
            }
        }
        passthrough
    }

    fn apply_intent(&mut self, event: TableEvent) {
        match event {
            TableEvent::PageChanged { page } => self.query.page = page,
            TableEvent::SortChanged { sort } => self.query.sort = sort,
            TableEvent::PageSizeChanged { page_size } => {
                self.query.page_size = page_size;
                self.query.page = 1;
            }
            TableEvent::SearchChanged { query } => {
                self.query.search = query;
                self.query.page = 1;
            }
            TableEvent::FiltersChanged { filters } => {
                self.query.filters = filters;
                self.query.page = 1;
            }
            TableEvent::ComboBoxChanged { value } => {
                if let Some(combo) = self.table.toolbar_mut().combo_box.as_mut() {
                    combo.selected = value.clone();
                }
                self.query.document_type = value;
                self.query.page = 1;
            }
            TableEvent::DateRangeChanged { range } => {
                if let Some(filter) = self.table.toolbar_mut().date_range.as_mut() {
                    filter.range = range;
                }
                self.query.submitted = range;
                self.query.page = 1;
            }
            other => debug!(event = other.name(), "Event needs no query change"),
        }
    }

    /// Issue a new fetch; supersedes every earlier ticket
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.sequence += 1;
        self.dirty = false;
        self.table.set_loading(true);
        debug!(sequence = self.sequence, page = self.query.page, "Fetching requests");
        FetchTicket {
            sequence: self.sequence,
            query: self.query.clone(),
        }
    }

    /// Apply a fetch result
    ///
    /// Returns `Ok(false)` for a stale response. On failure the table keeps
    /// its last rows and the error is handed back.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<RemotePage>) -> Result<bool> {
        if ticket.sequence != self.sequence {
            warn!(
                sequence = ticket.sequence,
                latest = self.sequence,
                "Discarding stale requests page"
            );
            return Ok(false);
        }
        match result {
            Ok(page) => {
                debug!(
                    rows = page.records.len(),
                    total = page.total_items,
                    page = page.current_page,
                    "Requests page loaded"
                );
                self.query.page = page.current_page;
                self.table.set_remote_page(page)?;
                Ok(true)
            }
            Err(err) => {
                warn!(%err, "Requests fetch failed, keeping last page");
                self.table.set_loading(false);
                self.query.page = self.table.page();
                Err(err)
            }
        }
    }

    /// Fetch the current query and apply it
    pub async fn refresh(&mut self) -> Result<bool> {
        let ticket = self.begin_fetch();
        let result = self.backend.fetch(&ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Pump events and re-fetch if any of them changed the query
    pub async fn sync(&mut self) -> Result<Vec<TableEvent>> {
        let passthrough = self.pump();
        if self.dirty {
            self.refresh().await?;
        }
        Ok(passthrough)
    }
}

/// Backend over an in-memory request list, evaluated like a server would
pub struct InMemoryBackend {
    requests: Vec<DocumentRequest>,
    records: Vec<Record>,
    columns: Vec<Column>,
}

impl InMemoryBackend {
    pub fn new(requests: Vec<DocumentRequest>) -> Result<Self> {
        let records = requests
            .iter()
            .map(DocumentRequest::to_record)
            .collect::<Result<Vec<_>>>()?;
        info!(source = SOURCE_ID, rows = records.len(), "In-memory requests backend ready");
        Ok(Self {
            requests,
            records,
            columns: request_columns(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn serve(&self, query: &RequestQuery) -> Result<RemotePage> {
        let mut indices: Vec<usize> =
            matching_indices(&self.records, &query.search, &query.filters, &self.columns)
                .into_iter()
                .filter(|&i| {
                    let request = &self.requests[i];
                    query
                        .document_type
                        .as_deref()
                        .is_none_or(|t| request.document_type == t)
                        && query.submitted.contains(request.submitted_on())
                })
                .collect();
        sort_indices(
            &self.records,
            &mut indices,
            query.sort.column.as_deref(),
            query.sort.direction,
        );

        let view = paginate(indices.len(), query.page, query.page_size, PaginationMode::Local)?;
        let records = view
            .slice(&indices)
            .iter()
            .map(|&i| self.records[i].clone())
            .collect();
        Ok(RemotePage::new(records, indices.len(), view.effective_page))
    }
}

impl RequestsBackend for InMemoryBackend {
    async fn fetch(&self, query: &RequestQuery) -> Result<RemotePage> {
        if query.page_size == 0 {
            return Err(Error::InvalidPageSize { page_size: 0 });
        }
        self.serve(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::requests::fixtures::sample_requests;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn controller(count: usize) -> RequestsController<InMemoryBackend> {
        let backend = InMemoryBackend::new(sample_requests(count)).expect("backend");
        RequestsController::new(backend, GridConfig::default(), Vec::new()).expect("controller")
    }

    /// Backend that can be switched off
    struct FlakyBackend {
        inner: InMemoryBackend,
        offline: AtomicBool,
    }

    impl RequestsBackend for FlakyBackend {
        async fn fetch(&self, query: &RequestQuery) -> Result<RemotePage> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(Error::Fetch {
                    message: "connection refused".to_string(),
                });
            }
            self.inner.fetch(query).await
        }
    }

    #[tokio::test]
    async fn test_initial_refresh_loads_first_page() {
        let mut ctl = controller(37);
        assert!(ctl.refresh().await.expect("fetch"));
        let view = ctl.table().view();
        assert_eq!(view.rows.len(), 10);
        let controls = view.pagination.expect("controls");
        assert_eq!(controls.total_items, 37);
        assert_eq!(controls.total_pages, 4);
    }

    #[tokio::test]
    async fn test_page_intent_round_trip() {
        let mut ctl = controller(37);
        ctl.refresh().await.expect("fetch");

        assert!(ctl.table_mut().go_to_page(4));
        assert_eq!(ctl.table().page(), 1);
        ctl.sync().await.expect("sync");
        assert_eq!(ctl.table().page(), 4);
        assert_eq!(ctl.table().view().rows.len(), 7);
        assert_eq!(ctl.table().records()[0].text("reference"), "REQ-2024-0031");
    }

    #[tokio::test]
    async fn test_search_and_sort_are_served_remotely() {
        let mut ctl = controller(37);
        ctl.refresh().await.expect("fetch");
        ctl.table_mut().go_to_page(2);
        ctl.sync().await.expect("sync");

        ctl.table_mut().apply_search("maria");
        ctl.table_mut().toggle_sort("submitted_at").expect("sortable");
        ctl.table_mut().toggle_sort("submitted_at").expect("sortable");
        ctl.sync().await.expect("sync");

        assert_eq!(ctl.query().page, 1);
        let names: Vec<String> = ctl
            .table()
            .records()
            .iter()
            .map(|r| r.text("applicant.name"))
            .collect();
        assert_eq!(names.len(), 5);
        assert!(names.iter().all(|n| n == "Maria Santos"));
        assert_eq!(ctl.table().records()[0].text("reference"), "REQ-2024-0033");
    }

    #[tokio::test]
    async fn test_toolbar_filters_update_page_state() {
        let mut ctl = controller(40);
        ctl.refresh().await.expect("fetch");

        ctl.table_mut()
            .select_combo_box(Some("cedula".into()))
            .expect("valid option");
        let from = NaiveDate::from_ymd_opt(2024, 1, 3).expect("date");
        ctl.table_mut()
            .select_date_range(DateRange::new(Some(from), None))
            .expect("date range");
        ctl.sync().await.expect("sync");

        assert!(ctl.table().toolbar().external_filter_active());
        assert!(
            ctl.table()
                .records()
                .iter()
                .all(|r| r.text("document_type") == "cedula")
        );
        // Request 2 (cedula) was filed on Jan 2 and falls outside the range
        assert_eq!(ctl.table().total_items(), 7);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let mut ctl = controller(37);
        ctl.query.page = 2;
        let older = ctl.begin_fetch();
        ctl.query.page = 3;
        let newer = ctl.begin_fetch();

        let newer_page = ctl.backend.fetch(&newer.query).await;
        let older_page = ctl.backend.fetch(&older.query).await;
        assert!(ctl.complete(&newer, newer_page).expect("apply"));
        assert!(!ctl.complete(&older, older_page).expect("stale"));
        assert_eq!(ctl.table().page(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_last_rows() {
        let backend = FlakyBackend {
            inner: InMemoryBackend::new(sample_requests(12)).expect("backend"),
            offline: AtomicBool::new(false),
        };
        let mut ctl =
            RequestsController::new(backend, GridConfig::default(), Vec::new()).expect("controller");
        ctl.refresh().await.expect("fetch");

        ctl.backend.offline.store(true, Ordering::SeqCst);
        ctl.table_mut().go_to_page(2);
        let err = ctl.sync().await.expect_err("offline");
        assert!(matches!(err, Error::Fetch { .. }));
        assert_eq!(ctl.table().page(), 1);
        assert_eq!(ctl.query().page, 1);
        assert_eq!(ctl.table().view().rows.len(), 10);
        assert!(!ctl.table().is_loading());

        // The next intent fetches from the page on screen, not the failed one
        ctl.backend.offline.store(false, Ordering::SeqCst);
        ctl.table_mut().toggle_sort("reference").expect("sortable");
        ctl.sync().await.expect("sync");
        assert_eq!(ctl.table().page(), 1);
        assert_eq!(ctl.table().records()[0].text("reference"), "REQ-2024-0001");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_reaches_backend() {
        let mut ctl = controller(37);
        ctl.refresh().await.expect("fetch");

        ctl.table_mut().on_search_input("mar");
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctl.table_mut().on_search_input("maria");
        ctl.sync().await.expect("sync");
        assert_eq!(ctl.query().search, "");
        assert_eq!(ctl.table().total_items(), 37);

        tokio::time::sleep(Duration::from_millis(800)).await;
        ctl.sync().await.expect("sync");
        assert_eq!(ctl.query().search, "maria");
        assert_eq!(ctl.table().total_items(), 5);
        assert!(
            ctl.table()
                .records()
                .iter()
                .all(|r| r.text("applicant.name") == "Maria Santos")
        );
    }

    #[test]
    fn test_passthrough_events() {
        let mut ctl = controller(3);
        let rows = InMemoryBackend::new(sample_requests(3))
            .expect("backend")
            .serve(&RequestQuery::new(10))
            .expect("page");
        ctl.table_mut().set_remote_page(rows).expect("remote page");
        ctl.table_mut().click_row(0);
        ctl.table_mut().toggle_sort("status").expect("sortable");

        let events = ctl.pump();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TableEvent::RowClicked { .. }));
        assert_eq!(ctl.query().sort, SortState::by("status", Default::default()));
    }
}
