//! DocumentRequest - Resident Document Requests

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::Result;

/// Processing status of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InReview,
    ForPayment,
    Approved,
    ReadyForPickup,
    Released,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 8] = [
        RequestStatus::Pending,
        RequestStatus::InReview,
        RequestStatus::ForPayment,
        RequestStatus::Approved,
        RequestStatus::ReadyForPickup,
        RequestStatus::Released,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
    ];

    /// Wire name, as stored in records
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InReview => "in_review",
            RequestStatus::ForPayment => "for_payment",
            RequestStatus::Approved => "approved",
            RequestStatus::ReadyForPickup => "ready_for_pickup",
            RequestStatus::Released => "released",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    /// Whether staff can still act on the request
    pub fn is_open(&self) -> bool {
        !matches!(
            self,
            RequestStatus::Released | RequestStatus::Rejected | RequestStatus::Cancelled
        )
    }
}

/// Resident who filed the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub email: Option<String>,
    /// Profile photo URL
    pub photo_url: Option<String>,
}

/// A document request as served by the requests API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub id: String,
    /// Human-facing reference number (e.g. "REQ-2024-0042")
    pub reference: String,
    pub applicant: Applicant,
    /// Document kind (e.g. "barangay_clearance")
    pub document_type: String,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    /// Fee in pesos; `None` for free documents
    pub fee: Option<f64>,
    /// Purpose stated by the resident
    pub purpose: Option<String>,
    /// Map link to the pickup office
    pub pickup_location: Option<String>,
}

impl DocumentRequest {
    /// Flatten into a grid record; nested fields stay reachable by dotted path
    pub fn to_record(&self) -> Result<Record> {
        Record::from_serialize(self)
    }

    pub fn submitted_on(&self) -> chrono::NaiveDate {
        self.submitted_at.date_naive()
    }
}
