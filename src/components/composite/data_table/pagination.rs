//! Pagination Coordinator
//!
//! Local mode slices the filtered/sorted rows itself. Remote mode shows the
//! caller's page as-is and takes the page number from the caller.

use std::ops::Range;

use crate::constants::PAGE_STRIP_SIBLINGS;
use crate::error::{Error, Result};

/// Pagination mode, fixed for the lifetime of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// The engine slices in-memory rows
    Local,
    /// The caller supplies one page plus authoritative metadata
    Remote {
        total_items: usize,
        current_page: usize,
    },
}

impl PaginationMode {
    pub fn is_remote(&self) -> bool {
        matches!(self, PaginationMode::Remote { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaginationMode::Local => "local",
            PaginationMode::Remote { .. } => "remote",
        }
    }
}

/// Result of paginating one record list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Visible slice of the record list
    pub range: Range<usize>,
    /// Zero when there is nothing to show
    pub page_count: usize,
    /// 1-based page actually shown after clamping
    pub effective_page: usize,
    /// Items across all pages
    pub total_items: usize,
    pub page_size: usize,
}

impl PageView {
    /// Visible part of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.range.end.min(items.len());
        let start = self.range.start.min(end);
        &items[start..end]
    }

    /// Validate a page-change click
    ///
    /// Returns the clamped target, or `None` when there are no pages or the
    /// target is already shown.
    pub fn resolve_request(&self, target: usize) -> Option<usize> {
        if self.page_count == 0 {
            return None;
        }
        let target = clamp_page(target, self.page_count);
        (target != self.effective_page).then_some(target)
    }
}

/// `ceil(total / page_size)`
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Clamp a 1-based page into `1..=page_count` (1 when there are no pages)
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.clamp(1, page_count.max(1))
}

/// Fail fast on a zero page size
pub fn validate_page_size(page_size: usize) -> Result<usize> {
    if page_size == 0 {
        return Err(Error::InvalidPageSize { page_size });
    }
    Ok(page_size)
}

/// Paginate `len` rows
///
/// In local mode `page` is the engine's own page number; in remote mode it is
/// ignored in favour of the caller's `current_page`.
pub fn paginate(len: usize, page: usize, page_size: usize, mode: PaginationMode) -> Result<PageView> {
    let page_size = validate_page_size(page_size)?;

    let view = match mode {
        PaginationMode::Local => {
            let page_count = page_count(len, page_size);
            let effective_page = clamp_page(page, page_count);
            if effective_page != page && page_count > 0 {
                tracing::debug!(
                    requested = page,
                    effective = effective_page,
                    "Clamped page to valid range"
                );
            }
            let start = ((effective_page - 1) * page_size).min(len);
            let end = (start + page_size).min(len);
            PageView {
                range: start..end,
                page_count,
                effective_page,
                total_items: len,
                page_size,
            }
        }
        PaginationMode::Remote {
            total_items,
            current_page,
        } => {
            let page_count = page_count(total_items, page_size);
            if len > page_size {
                tracing::debug!(len, page_size, "Remote page larger than page size, shown as-is");
            }
            PageView {
                range: 0..len,
                page_count,
                effective_page: clamp_page(current_page, page_count),
                total_items,
                page_size,
            }
        }
    };

    Ok(view)
}

/// One entry of the page strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Compact page strip: first, last, and `siblings` pages around `current`
pub fn page_items(current: usize, total: usize, siblings: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = clamp_page(current, total);
    let mut pages = vec![1, total];
    let low = current.saturating_sub(siblings).max(1);
    let high = (current + siblings).min(total);
    pages.extend(low..=high);
    pages.sort_unstable();
    pages.dedup();

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut prev: Option<usize> = None;
    for number in pages {
        if let Some(prev) = prev {
            match number - prev {
                1 => {}
                // A single hidden page is cheaper to show than an ellipsis
                2 => items.push(PageItem::Page {
                    number: prev + 1,
                    current: prev + 1 == current,
                }),
                _ => items.push(PageItem::Ellipsis),
            }
        }
        items.push(PageItem::Page {
            number,
            current: number == current,
        });
        prev = Some(number);
    }
    items
}

/// Footer state handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub items_label: String,
    pub can_prev: bool,
    pub can_next: bool,
    pub items: Vec<PageItem>,
    pub page_size_options: Vec<usize>,
}

impl PaginationControls {
    /// Controls for a page view; `None` when there is nothing to page through
    pub fn from_view(
        view: &PageView,
        items_label: impl Into<String>,
        page_size_options: &[usize],
    ) -> Option<Self> {
        if view.page_count == 0 {
            return None;
        }
        let current = view.effective_page;
        let total = view.page_count;
        Some(Self {
            current_page: current,
            total_pages: total,
            total_items: view.total_items,
            page_size: view.page_size,
            items_label: items_label.into(),
            can_prev: current > 1,
            can_next: current < total,
            items: page_items(current, total, PAGE_STRIP_SIBLINGS),
            page_size_options: page_size_options.to_vec(),
        })
    }

    /// "137 items"
    pub fn summary(&self) -> String {
        format!("{} {}", self.total_items, self.items_label)
    }

    /// "3 / 14"
    pub fn page_label(&self) -> String {
        format!("{} / {}", self.current_page, self.total_pages)
    }

    /// "21-30 of 137"
    pub fn range_label(&self) -> String {
        let first = (self.current_page - 1) * self.page_size + 1;
        let last = (self.current_page * self.page_size).min(self.total_items);
        format!("{first}-{last} of {}", self.total_items)
    }
}
