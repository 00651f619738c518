//! # Printer Profiles
//!
//! A [`Profile`] selects the wire protocol a receipt is encoded with and
//! carries the protocol's physical settings.
//!
//! ## Supported Profiles
//!
//! | Profile | Protocol | Paper | Grid |
//! |---------|----------|-------|------|
//! | `Character` | ESC/POS | 58mm roll | 32 columns (Font A) |
//! | `Label(LabelSetup::LABEL_58)` | TSPL | 58mm label, auto height | 12 x 24 dot cells |
//!
//! ## Usage
//!
//! ```
//! use chekprint::printer::{LabelSetup, Profile};
//!
//! let receipt = Profile::Character;
//! let label = Profile::Label(LabelSetup::LABEL_58);
//! assert_eq!(label.name(), "label");
//! assert_eq!(receipt.name(), "escpos");
//! ```

use std::str::FromStr;

/// Printer dots per millimeter at 203 DPI.
pub const DOTS_PER_MM: u32 = 8;

/// # Label Setup
///
/// Physical parameters of the label stock and the text grid drawn on it.
///
/// ## Calculations
///
/// ```text
/// x(col)  = origin_x + col * char_width
/// y(row)  = origin_y + row * row_pitch
/// height  = ceil((y_end + margin) / DOTS_PER_MM)   when height_mm is None
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSetup {
    /// Label width in millimeters
    pub width_mm: u32,

    /// Label height in millimeters; `None` sizes the label to its content
    pub height_mm: Option<u32>,

    /// Gap between labels in millimeters
    pub gap_mm: u32,

    /// Built-in font name (`"2"` is 12 x 20 dots)
    pub font: &'static str,

    /// Width of one character cell in dots
    pub char_width: u32,

    /// Vertical advance per text row in dots
    pub row_pitch: u32,

    /// Left margin in dots
    pub origin_x: u32,

    /// Top margin in dots
    pub origin_y: u32,

    /// QR cell width in dots
    pub qr_cell: u8,

    /// Vertical space reserved for a QR code or barcode in dots
    pub code_height: u32,
}

impl LabelSetup {
    /// # 58mm Label Stock
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Width | 58mm (464 dots) |
    /// | Height | sized to content |
    /// | Gap | 2mm |
    /// | Grid | 12 x 24 dots, 32 columns from x=16 |
    pub const LABEL_58: LabelSetup = LabelSetup {
        width_mm: 58,
        height_mm: None,
        gap_mm: 2,
        font: "2",
        char_width: 12,
        row_pitch: 24,
        origin_x: 16,
        origin_y: 16,
        qr_cell: 4,
        code_height: 120,
    };

    /// # 40 x 30mm Shelf Label
    pub const LABEL_40X30: LabelSetup = LabelSetup {
        width_mm: 40,
        height_mm: Some(30),
        gap_mm: 2,
        font: "1",
        char_width: 8,
        row_pitch: 16,
        origin_x: 8,
        origin_y: 8,
        qr_cell: 3,
        code_height: 80,
    };
}

impl Default for LabelSetup {
    fn default() -> Self {
        Self::LABEL_58
    }
}

/// Wire protocol selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// ESC/POS escape sequences.
    #[default]
    Character,
    /// TSPL label directives.
    Label(LabelSetup),
}

impl Profile {
    /// Short profile name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Profile::Character => "escpos",
            Profile::Label(_) => "label",
        }
    }

    /// Names of all selectable profiles.
    pub fn list() -> &'static [&'static str] {
        &["escpos", "label", "label-40x30"]
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "escpos" | "character" => Ok(Profile::Character),
            "label" | "tspl" | "label-58" => Ok(Profile::Label(LabelSetup::LABEL_58)),
            "label-40x30" => Ok(Profile::Label(LabelSetup::LABEL_40X30)),
            other => Err(format!(
                "unknown profile '{}', expected one of: {}",
                other,
                Profile::list().join(", ")
            )),
        }
    }
}
