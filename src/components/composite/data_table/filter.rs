//! Search and Column Filters
//!
//! Free-text search is an OR across filterable columns; column filters are an
//! AND across their entries. A record must pass both.

use std::collections::BTreeMap;

use super::column::{Column, find_column};
use crate::domain::Record;

/// Per-column filter tokens (column key -> token)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilters {
    tokens: BTreeMap<String, String>,
}

impl ColumnFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's token; an empty token removes the constraint
    pub fn set(&mut self, key: impl Into<String>, token: impl Into<String>) {
        let key = key.into();
        let token = token.into();
        if token.trim().is_empty() {
            self.tokens.remove(&key);
        } else {
            self.tokens.insert(key, token);
        }
    }

    pub fn with(mut self, key: impl Into<String>, token: impl Into<String>) -> Self {
        self.set(key, token);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) {
        self.tokens.remove(key);
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// True when no column is constrained
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Indices of the records matching `query` and every column filter, in input order
pub fn matching_indices(
    records: &[Record],
    query: &str,
    filters: &ColumnFilters,
    columns: &[Column],
) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    let constraints: Vec<(&str, String)> = filters
        .iter()
        .map(|(key, token)| (key, token.trim().to_lowercase()))
        .collect();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            matches_query(record, &needle, columns) && matches_filters(record, &constraints, columns)
        })
        .map(|(i, _)| i)
        .collect()
}

/// Records matching `query` and every column filter
pub fn filter<'a>(
    records: &'a [Record],
    query: &str,
    filters: &ColumnFilters,
    columns: &[Column],
) -> Vec<&'a Record> {
    matching_indices(records, query, filters, columns)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

fn matches_query(record: &Record, needle: &str, columns: &[Column]) -> bool {
    if needle.is_empty() {
        return true;
    }
    columns
        .iter()
        .filter(|c| c.filterable)
        .any(|c| c.search_text(record).to_lowercase().contains(needle))
}

fn matches_filters(record: &Record, constraints: &[(&str, String)], columns: &[Column]) -> bool {
    constraints.iter().all(|(key, token)| {
        let text = match find_column(columns, key) {
            Some(column) => column.search_text(record),
            None => record.text(key),
        };
        text.to_lowercase().contains(token.as_str())
    })
}
