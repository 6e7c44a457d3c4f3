//! Components - Reusable Grid Components
//!
//! Pure view-model components that don't do I/O.

pub mod composite;
