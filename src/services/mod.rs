//! Service Layer
//!
//! Async plumbing shared by the grid: the tokio runtime bridge used by the
//! search debounce timer and by remote page fetches.

mod runtime;

pub use runtime::*;
