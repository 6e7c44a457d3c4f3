//! Composite Components - built from the record model and the theme

pub mod data_table;
