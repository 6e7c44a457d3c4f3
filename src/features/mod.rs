//! Features - Vertical Feature Slices
//!
//! Each feature contains its page schema and controller.

pub mod requests;
