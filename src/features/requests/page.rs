//! Requests Page
//!
//! Column schema, row actions and toolbar of the document-requests list.

use crossbeam_channel::Sender;

use crate::components::composite::data_table::{
    ActionButton, Align, BulkAction, CellContent, Column, ComboBoxFilter, DateRangeFilter,
    FilterOption, RowAction, Toolbar,
};
use crate::domain::{Record, RequestStatus};

/// Data-source identity of the requests list
pub const SOURCE_ID: &str = "document-requests";

/// Commands row actions send to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestCommand {
    View { id: String },
    Approve { id: String },
    Reject { id: String },
    Release { id: String },
}

/// Document kinds offered by the municipality
pub fn document_types() -> Vec<FilterOption> {
    vec![
        FilterOption::new("barangay_clearance", "Barangay Clearance"),
        FilterOption::new("cedula", "Community Tax Certificate"),
        FilterOption::new("business_permit", "Business Permit"),
        FilterOption::new("birth_certificate", "Birth Certificate"),
        FilterOption::new("certificate_of_residency", "Certificate of Residency"),
    ]
}

/// Display label of a document type; unknown types show their raw value
pub fn document_label(value: &str) -> String {
    document_types()
        .into_iter()
        .find(|o| o.value == value)
        .map(|o| o.label)
        .unwrap_or_else(|| value.to_string())
}

fn status_of(record: &Record) -> Option<RequestStatus> {
    serde_json::from_value(record.get("status")?.clone()).ok()
}

pub fn request_columns() -> Vec<Column> {
    vec![
        Column::new("reference", "Reference")
            .fixed_width(140.0)
            .sub_field("id"),
        Column::new("applicant.photo_url", "")
            .fixed_width(48.0)
            .avatar()
            .sub_field("applicant.name")
            .sortable(false)
            .filterable(false),
        Column::new("applicant.name", "Applicant")
            .flex_width(Some(160.0), None)
            .sub_field("applicant.email"),
        Column::new("document_type", "Document")
            .render(|record, _| CellContent::Text(document_label(&record.text("document_type")))),
        Column::new("status", "Status")
            .badge()
            .align(Align::Center),
        Column::new("submitted_at", "Submitted").fixed_width(180.0),
        Column::new("fee", "Fee").align(Align::End).fixed_width(90.0),
        Column::new("purpose", "Purpose").long_text().sortable(false),
        Column::new("pickup_location", "Pickup")
            .url()
            .sortable(false)
            .filterable(false),
    ]
}

/// Row actions; each sends a `RequestCommand` to `commands`
pub fn request_actions(commands: Sender<RequestCommand>) -> Vec<RowAction> {
    let view = commands.clone();
    let approve = commands.clone();
    let reject = commands.clone();
    let release = commands;

    vec![
        RowAction::new("eye", "View", move |record, _| {
            let _ = view.send(RequestCommand::View { id: record.text("id") });
        }),
        RowAction::new("check", "Approve", move |record, _| {
            let _ = approve.send(RequestCommand::Approve { id: record.text("id") });
        })
        .show(|record| {
            matches!(
                status_of(record),
                Some(RequestStatus::Pending | RequestStatus::InReview)
            )
        }),
        RowAction::new("x", "Reject", move |record, _| {
            let _ = reject.send(RequestCommand::Reject { id: record.text("id") });
        })
        .show(|record| status_of(record).is_some_and(|s| s.is_open()))
        .disabled(|record| status_of(record) == Some(RequestStatus::ForPayment))
        .tooltip(|record| match status_of(record) {
            Some(RequestStatus::ForPayment) => "Awaiting payment".to_string(),
            _ => format!("Reject {}", record.text("reference")),
        }),
        RowAction::new("package", "Mark released", move |record, _| {
            let _ = release.send(RequestCommand::Release { id: record.text("id") });
        })
        .show(|record| status_of(record) == Some(RequestStatus::ReadyForPickup)),
    ]
}

pub fn request_toolbar() -> Toolbar {
    Toolbar::new()
        .bulk_action(BulkAction::new("approve", "check", "Approve selected"))
        .bulk_action(BulkAction::new("reject", "x", "Reject selected").danger())
        .action_button(ActionButton::new("new_request", "New request").icon("plus"))
        .combo_box(ComboBoxFilter::new("Document type", document_types()))
        .date_range(DateRangeFilter::new("Submitted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::composite::data_table::visible_actions;

    fn request(status: &str) -> Record {
        Record::new()
            .with("id", "7")
            .with("reference", "REQ-2024-0007")
            .with("status", status)
    }

    #[test]
    fn test_actions_follow_status() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let actions = request_actions(tx);

        let labels = |status: &str| -> Vec<String> {
            visible_actions(&actions, &request(status))
                .into_iter()
                .map(|a| a.label)
                .collect()
        };
        assert_eq!(labels("pending"), vec!["View", "Approve", "Reject"]);
        assert_eq!(labels("ready_for_pickup"), vec!["View", "Reject", "Mark released"]);
        assert_eq!(labels("released"), vec!["View"]);

        let for_payment = visible_actions(&actions, &request("for_payment"));
        assert!(for_payment[1].disabled);
        assert_eq!(for_payment[1].tooltip.as_deref(), Some("Awaiting payment"));
    }

    #[test]
    fn test_actions_send_commands() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let actions = request_actions(tx);
        assert!(actions[1].invoke(&request("pending"), 0));
        assert_eq!(
            rx.try_recv().expect("command"),
            RequestCommand::Approve { id: "7".into() }
        );
    }

    #[test]
    fn test_document_label_falls_back_to_value() {
        assert_eq!(document_label("cedula"), "Community Tax Certificate");
        assert_eq!(document_label("dog_license"), "dog_license");
    }
}
