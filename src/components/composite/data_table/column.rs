//! Column Definition
//!
//! Defines table columns with their properties and rendering strategy.

use std::fmt;

use super::presentation::CellContent;
use crate::domain::Record;

/// Custom cell renderer: `(record, row_index) -> content`
pub type CellRenderer = Box<dyn Fn(&Record, usize) -> CellContent + Send + Sync>;

/// How a column's cells are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Plain text
    Plain,
    /// Status badge coloured by the status table
    Badge,
    /// Truncated text with expand/collapse
    LongText,
    /// Hyperlink (map-service links are told apart)
    Url,
    /// Image with initials fallback
    Avatar,
}

/// Column width specification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in pixels
    Fixed(f32),
    /// Flexible width with optional min/max
    Flex { min: Option<f32>, max: Option<f32> },
    /// Percentage of available space
    Percent(f32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex { min: None, max: None }
    }
}

/// Horizontal alignment of header and cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Column definition for the DataTable
pub struct Column {
    /// Record field (or dotted path) this column reads
    pub key: String,
    /// Column header label
    pub label: String,
    /// Column width (in pixels, or flexible)
    pub width: ColumnWidth,
    /// Cell alignment
    pub align: Align,
    /// Whether clicking the header sorts by this column
    pub sortable: bool,
    /// Whether free-text search and column filters look at this column
    pub filterable: bool,
    /// Rendering strategy; `None` uses the content heuristic
    pub kind: Option<RenderKind>,
    /// Column-specific renderer; takes precedence over `kind`
    pub render: Option<CellRenderer>,
    /// Secondary field shown beneath the main value (or the avatar's name)
    pub sub_field: Option<String>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("kind", &self.kind)
            .field("render", &self.render.as_ref().map(|_| "custom"))
            .field("sub_field", &self.sub_field)
            .finish()
    }
}

impl Column {
    /// Create a new column reading `key`
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: ColumnWidth::default(),
            align: Align::default(),
            sortable: true,
            filterable: true,
            kind: None,
            render: None,
            sub_field: None,
        }
    }

    /// Set fixed width
    pub fn fixed_width(mut self, width: f32) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set flexible width with optional constraints
    pub fn flex_width(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        self.width = ColumnWidth::Flex { min, max };
        self
    }

    /// Set percentage width
    pub fn percent_width(mut self, percent: f32) -> Self {
        self.width = ColumnWidth::Percent(percent);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn plain(self) -> Self {
        self.kind(RenderKind::Plain)
    }

    pub fn badge(self) -> Self {
        self.kind(RenderKind::Badge)
    }

    pub fn long_text(self) -> Self {
        self.kind(RenderKind::LongText)
    }

    pub fn url(self) -> Self {
        self.kind(RenderKind::Url)
    }

    pub fn avatar(self) -> Self {
        self.kind(RenderKind::Avatar)
    }

    /// Render cells with a custom function, whatever the kind
    pub fn render(
        mut self,
        render: impl Fn(&Record, usize) -> CellContent + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn kind(mut self, kind: RenderKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn sub_field(mut self, field: impl Into<String>) -> Self {
        self.sub_field = Some(field.into());
        self
    }

    /// Stringified value this column contributes to search and filters
    pub fn search_text(&self, record: &Record) -> String {
        record.text(&self.key)
    }
}

/// Find a column by key
pub fn find_column<'a>(columns: &'a [Column], key: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_defaults_are_sortable_and_filterable() {
        let col = Column::new("status", "Status");
        assert!(col.sortable);
        assert!(col.filterable);
        assert!(col.kind.is_none());
        assert!(col.render.is_none());
        assert_eq!(col.width, ColumnWidth::Flex { min: None, max: None });
    }

    #[test]
    fn test_custom_render_survives_later_kind() {
        let col = Column::new("fee", "Fee")
            .render(|record, _| CellContent::Text(format!("PHP {}", record.text("fee"))))
            .badge();
        assert_eq!(col.kind, Some(RenderKind::Badge));
        assert!(col.render.is_some());
        assert!(format!("{col:?}").contains("render: Some(\"custom\")"));
    }
}
