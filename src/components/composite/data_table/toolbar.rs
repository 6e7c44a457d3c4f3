//! Table Toolbar
//!
//! Bulk actions, the primary call-to-action, and the external filter widgets.
//! The filter widgets' values belong to the owning page; the table only
//! displays them and reports change intents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Action applied to every selected row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAction {
    pub id: String,
    pub icon: String,
    pub label: String,
    /// Destructive actions get confirmation styling
    pub danger: bool,
}

impl BulkAction {
    pub fn new(id: impl Into<String>, icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            icon: icon.into(),
            label: label.into(),
            danger: false,
        }
    }

    pub fn danger(mut self) -> Self {
        self.danger = true;
        self
    }
}

/// The single primary button ("New request")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
}

impl ActionButton {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Single-choice dropdown filter (e.g. document type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboBoxFilter {
    pub label: String,
    pub options: Vec<FilterOption>,
    pub selected: Option<String>,
}

impl ComboBoxFilter {
    pub fn new(label: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self {
            label: label.into(),
            options,
            selected: None,
        }
    }

    /// Whether `value` is one of the options
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected.as_deref()?;
        self.options
            .iter()
            .find(|o| o.value == selected)
            .map(|o| o.label.as_str())
    }
}

/// Inclusive date range; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }.normalized()
    }

    /// Swap reversed ends instead of rejecting them
    pub fn normalized(self) -> Self {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Self {
                from: Some(to),
                to: Some(from),
            },
            _ => self,
        }
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeFilter {
    pub label: String,
    pub range: DateRange,
}

impl DateRangeFilter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            range: DateRange::default(),
        }
    }
}

/// Everything above the grid that is not the search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolbar {
    pub bulk_actions: Vec<BulkAction>,
    pub action_button: Option<ActionButton>,
    pub combo_box: Option<ComboBoxFilter>,
    pub date_range: Option<DateRangeFilter>,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bulk_action(mut self, action: BulkAction) -> Self {
        self.bulk_actions.push(action);
        self
    }

    pub fn action_button(mut self, button: ActionButton) -> Self {
        self.action_button = Some(button);
        self
    }

    pub fn combo_box(mut self, filter: ComboBoxFilter) -> Self {
        self.combo_box = Some(filter);
        self
    }

    pub fn date_range(mut self, filter: DateRangeFilter) -> Self {
        self.date_range = Some(filter);
        self
    }

    /// Whether a page-owned filter is narrowing the rows
    pub fn external_filter_active(&self) -> bool {
        self.combo_box.as_ref().is_some_and(|c| c.selected.is_some())
            || self.date_range.as_ref().is_some_and(|d| d.range.is_active())
    }

    pub fn find_bulk_action(&self, id: &str) -> Option<&BulkAction> {
        self.bulk_actions.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_date_range_swaps_reversed_ends() {
        let range = DateRange::new(Some(date(2024, 5, 1)), Some(date(2024, 4, 1)));
        assert_eq!(range.from, Some(date(2024, 4, 1)));
        assert!(range.contains(date(2024, 4, 15)));
        assert!(!range.contains(date(2024, 5, 2)));
    }

    #[test]
    fn test_open_ended_range() {
        let range = DateRange::new(Some(date(2024, 1, 1)), None);
        assert!(range.is_active());
        assert!(range.contains(date(2030, 1, 1)));
        assert!(!DateRange::default().is_active());
    }

    #[test]
    fn test_external_filter_active() {
        let mut toolbar = Toolbar::new().combo_box(ComboBoxFilter::new(
            "Document",
            vec![FilterOption::new("cedula", "Cedula")],
        ));
        assert!(!toolbar.external_filter_active());

        if let Some(combo) = toolbar.combo_box.as_mut() {
            combo.selected = Some("cedula".into());
        }
        assert!(toolbar.external_filter_active());
        assert_eq!(
            toolbar.combo_box.as_ref().and_then(ComboBoxFilter::selected_label),
            Some("Cedula")
        );
    }
}
