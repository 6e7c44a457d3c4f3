//! egov-grid Library
//!
//! The tabular data engine behind the e-services administrative console: the
//! resident document-request lists and every other list view share it.

pub mod components;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod features;
pub mod helpers;
pub mod services;
pub mod theme;
pub mod utils;
