//! Utils - Text Formatting Helpers

pub mod format;
