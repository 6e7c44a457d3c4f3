//! Presentation Adapter
//!
//! Maps a column and a raw cell value to a rendering strategy. A custom
//! renderer always wins, then the column's render kind, then a heuristic.

use ahash::{AHashMap, AHashSet};
use serde_json::Value;

use super::column::{Align, Column, RenderKind};
use crate::config::GridConfig;
use crate::domain::{Record, RowKey, stringify};
use crate::theme::colors::{GridColors, Rgb};
use crate::utils::format::{display_url, initials, looks_like_url, truncate};

/// Colour bucket for a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
    Unknown,
}

impl StatusTone {
    /// Parse a tone name from configuration
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Some(StatusTone::Success),
            "warning" => Some(StatusTone::Warning),
            "danger" | "error" => Some(StatusTone::Danger),
            "info" => Some(StatusTone::Info),
            "neutral" => Some(StatusTone::Neutral),
            "unknown" => Some(StatusTone::Unknown),
            _ => None,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            StatusTone::Success => GridColors::success(),
            StatusTone::Warning => GridColors::warning(),
            StatusTone::Danger => GridColors::danger(),
            StatusTone::Info => GridColors::info(),
            StatusTone::Neutral => GridColors::neutral(),
            StatusTone::Unknown => GridColors::unknown(),
        }
    }
}

/// Status string -> tone lookup with an "unknown" default
#[derive(Debug, Clone)]
pub struct StatusTable {
    tones: AHashMap<String, StatusTone>,
}

impl Default for StatusTable {
    fn default() -> Self {
        use StatusTone::*;
        let defaults = [
            ("draft", Neutral),
            ("submitted", Info),
            ("pending", Warning),
            ("for_review", Warning),
            ("in_review", Info),
            ("processing", Info),
            ("for_payment", Warning),
            ("paid", Success),
            ("approved", Success),
            ("ready_for_pickup", Success),
            ("released", Success),
            ("completed", Success),
            ("active", Success),
            ("inactive", Neutral),
            ("rejected", Danger),
            ("cancelled", Danger),
            ("failed", Danger),
            ("expired", Danger),
        ];
        Self {
            tones: defaults
                .into_iter()
                .map(|(status, tone)| (status.to_string(), tone))
                .collect(),
        }
    }
}

impl StatusTable {
    /// Set or replace the tone for a status
    pub fn set(&mut self, status: &str, tone: StatusTone) {
        self.tones.insert(normalize_status(status), tone);
    }

    /// Tone for `status`; unlisted statuses fall into `Unknown`
    pub fn tone(&self, status: &str) -> StatusTone {
        self.tones
            .get(&normalize_status(status))
            .copied()
            .unwrap_or(StatusTone::Unknown)
    }
}

/// "Ready for Pickup" / "ready-for-pickup" -> "ready_for_pickup"
fn normalize_status(status: &str) -> String {
    status
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Where a link points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Map service (pickup location, office address)
    Map,
    Generic,
}

const MAP_HOSTS: [&str; 6] = [
    "maps.google.",
    "maps.app.goo.gl",
    "goo.gl/maps",
    "openstreetmap.org",
    "maps.apple.com",
    "waze.com",
];

/// Classify a URL as a map-service link or a generic one
pub fn link_kind(url: &str) -> LinkKind {
    let lower = display_url(&url.to_lowercase());
    let lower = lower.strip_prefix("www.").unwrap_or(&lower);
    let is_map = MAP_HOSTS.iter().any(|host| lower.starts_with(host))
        || (lower.starts_with("google.") && lower.contains("/maps"))
        || lower.starts_with("bing.com/maps");
    if is_map { LinkKind::Map } else { LinkKind::Generic }
}

/// What the rendering layer should draw for one cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    /// Empty or null value
    Placeholder(String),
    Badge {
        label: String,
        tone: StatusTone,
        color: Rgb,
    },
    LongText {
        preview: String,
        full: String,
        expanded: bool,
    },
    Link {
        href: String,
        label: String,
        kind: LinkKind,
    },
    Avatar {
        /// `None` draws the initials circle
        image: Option<String>,
        initials: String,
    },
}

impl CellContent {
    /// Text a plain-text renderer would print
    pub fn display_text(&self) -> &str {
        match self {
            CellContent::Text(s) | CellContent::Placeholder(s) => s,
            CellContent::Badge { label, .. } => label,
            CellContent::LongText {
                preview,
                full,
                expanded,
            } => {
                if *expanded {
                    full
                } else {
                    preview
                }
            }
            CellContent::Link { label, .. } => label,
            CellContent::Avatar { initials, .. } => initials,
        }
    }
}

/// A rendered cell with its secondary line and alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: String,
    pub content: CellContent,
    pub secondary: Option<String>,
    pub align: Align,
}

/// Rendering knobs taken from the grid configuration
#[derive(Debug, Clone)]
pub struct PresentationOptions {
    pub long_text_max_len: usize,
    pub placeholder: String,
    pub avatar_placeholder: String,
    pub map_link_label: String,
    pub statuses: StatusTable,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl PresentationOptions {
    pub fn from_config(config: &GridConfig) -> Self {
        let mut statuses = StatusTable::default();
        for (status, tone_name) in &config.status_tones {
            match StatusTone::from_name(tone_name) {
                Some(tone) => statuses.set(status, tone),
                None => tracing::warn!(status = %status, tone = %tone_name, "Unknown status tone in config"),
            }
        }
        Self {
            long_text_max_len: config.long_text_max_len,
            placeholder: config.empty_placeholder.clone(),
            avatar_placeholder: config.avatar_placeholder.clone(),
            map_link_label: config.map_link_label.clone(),
            statuses,
        }
    }
}

/// Result of an expand/collapse click on long text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandToggle {
    pub expanded: bool,
    /// Scroll offset the view should restore after re-layout
    pub restore_scroll: f32,
}

/// Per-table view state the adapter consults: expanded cells and broken images
#[derive(Debug, Clone, Default)]
pub struct PresentationState {
    /// Expanded cell -> scroll offset at the moment it was expanded
    expanded: AHashMap<(RowKey, String), f32>,
    failed_images: AHashSet<String>,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a long-text cell
    ///
    /// Collapsing returns the scroll offset recorded when the cell was
    /// expanded, so a collapse lands where the reader started.
    pub fn toggle_long_text(&mut self, row: RowKey, column: &str, scroll_offset: f32) -> ExpandToggle {
        let key = (row, column.to_string());
        match self.expanded.remove(&key) {
            Some(anchor) => ExpandToggle {
                expanded: false,
                restore_scroll: anchor,
            },
            None => {
                self.expanded.insert(key, scroll_offset);
                ExpandToggle {
                    expanded: true,
                    restore_scroll: scroll_offset,
                }
            }
        }
    }

    pub fn is_expanded(&self, row: &RowKey, column: &str) -> bool {
        self.expanded.contains_key(&(row.clone(), column.to_string()))
    }

    /// Record that an avatar image failed to load
    pub fn mark_image_failed(&mut self, src: impl Into<String>) {
        let src = src.into();
        tracing::warn!(src = %src, "Avatar image failed, using placeholder");
        self.failed_images.insert(src);
    }

    pub fn image_failed(&self, src: &str) -> bool {
        self.failed_images.contains(src)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
        self.failed_images.clear();
    }
}

/// Renders cells against options and view state
pub struct CellPresenter<'a> {
    pub options: &'a PresentationOptions,
    pub state: &'a PresentationState,
}

impl<'a> CellPresenter<'a> {
    pub fn new(options: &'a PresentationOptions, state: &'a PresentationState) -> Self {
        Self { options, state }
    }

    /// Render one cell of `record`
    pub fn render_cell(&self, column: &Column, record: &Record, row_index: usize, row: &RowKey) -> Cell {
        let value = record.value(&column.key);
        let content = match (&column.render, column.kind) {
            (Some(render), _) => render(record, row_index),
            (None, Some(RenderKind::Plain)) => self.plain(value),
            (None, Some(RenderKind::Badge)) => self.badge(value),
            (None, Some(RenderKind::LongText)) => self.long_text(value, row, &column.key),
            (None, Some(RenderKind::Url)) => self.link(value),
            (None, Some(RenderKind::Avatar)) => self.avatar(value, record, column),
            (None, None) => self.heuristic(value, row, &column.key),
        };

        // For avatars the sub-field is the name behind the initials
        let secondary = match column.kind {
            Some(RenderKind::Avatar) => None,
            _ => column
                .sub_field
                .as_deref()
                .map(|field| record.text(field))
                .filter(|s| !s.is_empty()),
        };

        Cell {
            column: column.key.clone(),
            content,
            secondary,
            align: column.align,
        }
    }

    fn placeholder(&self) -> CellContent {
        CellContent::Placeholder(self.options.placeholder.clone())
    }

    fn plain(&self, value: Option<&Value>) -> CellContent {
        let text = stringify(value);
        if text.trim().is_empty() {
            self.placeholder()
        } else {
            CellContent::Text(text)
        }
    }

    fn badge(&self, value: Option<&Value>) -> CellContent {
        let status = stringify(value);
        let tone = self.options.statuses.tone(&status);
        let label = if status.trim().is_empty() {
            self.options.placeholder.clone()
        } else {
            status
        };
        CellContent::Badge {
            label,
            tone,
            color: tone.color(),
        }
    }

    fn long_text(&self, value: Option<&Value>, row: &RowKey, column: &str) -> CellContent {
        let full = stringify(value);
        if full.trim().is_empty() {
            return self.placeholder();
        }
        let preview = truncate(&full, self.options.long_text_max_len);
        if preview == full {
            return CellContent::Text(full);
        }
        CellContent::LongText {
            preview,
            expanded: self.state.is_expanded(row, column),
            full,
        }
    }

    fn link(&self, value: Option<&Value>) -> CellContent {
        let href = stringify(value).trim().to_string();
        if href.is_empty() {
            return self.placeholder();
        }
        let kind = link_kind(&href);
        let label = match kind {
            LinkKind::Map => self.options.map_link_label.clone(),
            LinkKind::Generic => truncate(&display_url(&href), self.options.long_text_max_len),
        };
        CellContent::Link { href, label, kind }
    }

    fn avatar(&self, value: Option<&Value>, record: &Record, column: &Column) -> CellContent {
        let name = column
            .sub_field
            .as_deref()
            .map(|field| record.text(field))
            .unwrap_or_default();
        let src = stringify(value).trim().to_string();
        let image = if src.is_empty() {
            None
        } else if self.state.image_failed(&src) {
            Some(self.options.avatar_placeholder.clone())
        } else {
            Some(src)
        };
        CellContent::Avatar {
            image,
            initials: initials(&name),
        }
    }

    fn heuristic(&self, value: Option<&Value>, row: &RowKey, column: &str) -> CellContent {
        match value {
            Some(Value::String(s)) if looks_like_url(s) => self.link(value),
            Some(Value::String(s)) if s.chars().count() > self.options.long_text_max_len => {
                self.long_text(value, row, column)
            }
            _ => self.plain(value),
        }
    }
}
