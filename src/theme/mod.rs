//! Theme - Console Palette

pub mod colors;
