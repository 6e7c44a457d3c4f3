//! Document Requests
//!
//! The staff list of resident document requests, served page by page.

pub mod controller;
pub mod fixtures;
pub mod page;

pub use controller::{FetchTicket, InMemoryBackend, RequestQuery, RequestsBackend, RequestsController};
pub use page::{RequestCommand, SOURCE_ID, request_actions, request_columns, request_toolbar};
