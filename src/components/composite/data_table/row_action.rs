//! Row Actions
//!
//! Per-row menu entries and the table's single open-menu slot.

use std::fmt;

use crate::domain::{Record, RowKey};

pub type ActionHandler = Box<dyn Fn(&Record, usize) + Send + Sync>;
pub type RecordPredicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;
pub type RecordText = Box<dyn Fn(&Record) -> String + Send + Sync>;

/// An action offered on every row
pub struct RowAction {
    pub icon: String,
    pub label: String,
    on_click: ActionHandler,
    disabled: Option<RecordPredicate>,
    tooltip: Option<RecordText>,
    show: Option<RecordPredicate>,
}

impl fmt::Debug for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("icon", &self.icon)
            .field("label", &self.label)
            .field("has_disabled", &self.disabled.is_some())
            .field("has_show", &self.show.is_some())
            .finish()
    }
}

impl RowAction {
    pub fn new(
        icon: impl Into<String>,
        label: impl Into<String>,
        on_click: impl Fn(&Record, usize) + Send + Sync + 'static,
    ) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
            on_click: Box::new(on_click),
            disabled: None,
            tooltip: None,
            show: None,
        }
    }

    /// Grey the action out for matching records
    pub fn disabled(mut self, predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.disabled = Some(Box::new(predicate));
        self
    }

    pub fn tooltip(mut self, text: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.tooltip = Some(Box::new(text));
        self
    }

    /// Only offer the action for matching records
    pub fn show(mut self, predicate: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.show = Some(Box::new(predicate));
        self
    }

    pub fn is_shown(&self, record: &Record) -> bool {
        self.show.as_ref().is_none_or(|show| show(record))
    }

    pub fn is_disabled(&self, record: &Record) -> bool {
        self.disabled.as_ref().is_some_and(|disabled| disabled(record))
    }

    pub fn tooltip_for(&self, record: &Record) -> Option<String> {
        self.tooltip.as_ref().map(|text| text(record))
    }

    /// Run the handler if the action is shown and enabled for `record`
    pub fn invoke(&self, record: &Record, index: usize) -> bool {
        if !self.is_shown(record) || self.is_disabled(record) {
            return false;
        }
        (self.on_click)(record, index);
        true
    }
}

/// Action as the rendering layer sees it for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionView {
    /// Position in the table's action list
    pub index: usize,
    pub icon: String,
    pub label: String,
    pub disabled: bool,
    pub tooltip: Option<String>,
}

/// Actions offered for `record`; hidden actions are omitted, not disabled
pub fn visible_actions(actions: &[RowAction], record: &Record) -> Vec<ActionView> {
    actions
        .iter()
        .enumerate()
        .filter(|(_, action)| action.is_shown(record))
        .map(|(index, action)| ActionView {
            index,
            icon: action.icon.clone(),
            label: action.label.clone(),
            disabled: action.is_disabled(record),
            tooltip: action.tooltip_for(record),
        })
        .collect()
}

/// The one row menu that may be open in a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMenuState {
    open_row: Option<RowKey>,
}

impl ActionMenuState {
    /// Open `row`'s menu (closing any other), or close it if already open
    pub fn toggle(&mut self, row: RowKey) -> bool {
        if self.open_row.as_ref() == Some(&row) {
            self.open_row = None;
            false
        } else {
            self.open_row = Some(row);
            true
        }
    }

    pub fn close(&mut self) {
        self.open_row = None;
    }

    pub fn open_row(&self) -> Option<&RowKey> {
        self.open_row.as_ref()
    }

    pub fn is_open(&self, row: &RowKey) -> bool {
        self.open_row.as_ref() == Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_action(counter: Arc<AtomicUsize>) -> RowAction {
        RowAction::new("check", "Approve", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_hidden_actions_are_omitted() {
        let actions = vec![
            RowAction::new("eye", "View", |_, _| {}),
            RowAction::new("check", "Approve", |_, _| {}).show(|r| r.text("status") == "pending"),
            RowAction::new("trash", "Delete", |_, _| {})
                .disabled(|r| r.text("status") == "released")
                .tooltip(|r| format!("Delete {}", r.text("id"))),
        ];
        let released = Record::new().with("id", 5).with("status", "released");

        let views = visible_actions(&actions, &released);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].label, "View");
        assert_eq!(views[1].index, 2);
        assert!(views[1].disabled);
        assert_eq!(views[1].tooltip.as_deref(), Some("Delete 5"));
    }

    #[test]
    fn test_disabled_or_hidden_actions_do_not_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let action = counting_action(counter.clone())
            .show(|r| r.text("status") != "draft")
            .disabled(|r| r.text("status") == "approved");

        assert!(!action.invoke(&Record::new().with("status", "draft"), 0));
        assert!(!action.invoke(&Record::new().with("status", "approved"), 0));
        assert!(action.invoke(&Record::new().with("status", "pending"), 0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_one_menu_open() {
        let mut menu = ActionMenuState::default();
        let a = RowKey::Id("a".into());
        let b = RowKey::Id("b".into());

        assert!(menu.toggle(a.clone()));
        assert!(menu.toggle(b.clone()));
        assert!(!menu.is_open(&a));
        assert!(menu.is_open(&b));
        assert!(!menu.toggle(b.clone()));
        assert_eq!(menu.open_row(), None);
    }
}
