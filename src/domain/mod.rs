//! Domain - Pure Data Structures
//!
//! The generic row model the grid works on, plus the console's own records.

pub mod document_request;
mod record;

pub use document_request::{Applicant, DocumentRequest, RequestStatus};
pub use record::{Record, RowKey, stringify};
