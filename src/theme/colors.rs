//! Colors - Grid Theme Colors

use std::fmt;

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl Rgb {
    /// CSS-style hex string, e.g. `#22c55e`
    pub fn hex(self) -> String {
        format!("#{:06x}", self.0 & 0x00ff_ffff)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Grid color palette - All colors are accessed via associated functions
pub struct GridColors;

impl GridColors {
    // Status colors
    /// Success - Green
    pub fn success() -> Rgb { Rgb(0x22c55e) }
    /// Warning - Amber
    pub fn warning() -> Rgb { Rgb(0xf59e0b) }
    /// Error/Danger - Red
    pub fn danger() -> Rgb { Rgb(0xef4444) }
    /// Info - Blue
    pub fn info() -> Rgb { Rgb(0x3b82f6) }
    /// Neutral - Slate
    pub fn neutral() -> Rgb { Rgb(0x64748b) }
    /// Unknown status - Muted gray
    pub fn unknown() -> Rgb { Rgb(0x9ca3af) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_zero_padded() {
        assert_eq!(Rgb(0x0000ff).hex(), "#0000ff");
        assert_eq!(GridColors::success().to_string(), "#22c55e");
    }
}
