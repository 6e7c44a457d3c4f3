//! DataProvider Trait
//!
//! Abstraction over where a table's rows come from. The source id is the
//! table's notion of data-source identity: a new id means a new table.

use std::ops::Range;
use std::sync::Arc;

use crate::domain::Record;

/// Trait for providing rows to the DataTable in local mode
pub trait DataProvider: Send + Sync + 'static {
    /// Identity of the underlying data source
    fn source_id(&self) -> &str;

    /// Get the total number of rows
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a row by index
    fn row(&self, index: usize) -> Option<Record>;

    /// Get multiple rows in a range
    fn rows(&self, range: Range<usize>) -> Vec<Record> {
        range.filter_map(|i| self.row(i)).collect()
    }

    /// Every row, in source order
    fn all_rows(&self) -> Vec<Record> {
        self.rows(0..self.len())
    }
}

/// Simple in-memory data provider
pub struct VecDataProvider {
    source_id: String,
    rows: Arc<Vec<Record>>,
}

impl VecDataProvider {
    /// Create a new VecDataProvider
    pub fn new(source_id: impl Into<String>, rows: Vec<Record>) -> Self {
        Self {
            source_id: source_id.into(),
            rows: Arc::new(rows),
        }
    }

    /// Create from a shared reference
    pub fn from_arc(source_id: impl Into<String>, rows: Arc<Vec<Record>>) -> Self {
        Self {
            source_id: source_id.into(),
            rows,
        }
    }

    /// Get all rows
    pub fn all(&self) -> &[Record] {
        &self.rows
    }
}

impl DataProvider for VecDataProvider {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<Record> {
        self.rows.get(index).cloned()
    }

    fn rows(&self, range: Range<usize>) -> Vec<Record> {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        self.rows[start..end].to_vec()
    }
}

/// One page fetched by the owning page in remote mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePage {
    /// Rows of this page, shown as-is
    pub records: Vec<Record>,
    /// Items across all pages
    pub total_items: usize,
    /// 1-based page these rows belong to
    pub current_page: usize,
}

impl RemotePage {
    pub fn new(records: Vec<Record>, total_items: usize, current_page: usize) -> Self {
        Self {
            records,
            total_items,
            current_page,
        }
    }
}
