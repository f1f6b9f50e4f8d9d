//! Font selection for the generated document.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Font families offered by interactive callers.
///
/// The converter itself accepts any family name; this list only exists so
/// front ends can present a fixed, commonly installed palette.
pub const FONT_CHOICES: &[&str] = &[
    "Arial",
    "Calibri",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Georgia",
    "Trebuchet MS",
    "Comic Sans MS",
    "Lucida Console",
    "Tahoma",
];

/// Family used when the caller does not pick one.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Size in points used when the caller does not pick one.
pub const DEFAULT_FONT_SIZE_PT: f64 = 12.0;

/// Largest size WordprocessingML can encode, in half-points.
const MAX_HALF_POINTS: usize = 3276;

/// A font family and size applied uniformly to every text paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Family name, passed through untouched to the output.
    pub family: String,

    /// Size in points.
    pub size_pt: f64,
}

impl FontSpec {
    /// Create a font spec, rejecting sizes the output format cannot carry.
    ///
    /// Sizes are stored in half-point units in the document, so the size is
    /// rounded to the nearest half point and must land in 0.5pt..=1638pt.
    pub fn new(family: impl Into<String>, size_pt: f64) -> Result<Self> {
        validate_size(size_pt)?;
        Ok(Self {
            family: family.into(),
            size_pt,
        })
    }

    /// Re-check the size, for specs built field by field.
    pub fn validate(&self) -> Result<()> {
        validate_size(self.size_pt)
    }

    /// Size in half-point units, as written to `w:sz`.
    pub fn half_points(&self) -> usize {
        (self.size_pt * 2.0).round() as usize
    }

    /// Whether the family is part of [`FONT_CHOICES`].
    pub fn is_known_family(&self) -> bool {
        FONT_CHOICES.contains(&self.family.as_str())
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size_pt: DEFAULT_FONT_SIZE_PT,
        }
    }
}

/// Parse a font size typed by a user.
pub fn parse_font_size(input: &str) -> Result<f64> {
    let size = input
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidFontSize(format!("font size must be a number, got '{}'", input.trim())))?;
    validate_size(size)?;
    Ok(size)
}

fn validate_size(size_pt: f64) -> Result<()> {
    if !size_pt.is_finite() || size_pt <= 0.0 {
        return Err(Error::InvalidFontSize(format!(
            "font size must be a positive number, got {}",
            size_pt
        )));
    }

    let half_points = (size_pt * 2.0).round();
    if half_points < 1.0 || half_points > MAX_HALF_POINTS as f64 {
        return Err(Error::InvalidFontSize(format!(
            "font size must be between 0.5 and {} points, got {}",
            MAX_HALF_POINTS / 2,
            size_pt
        )));
    }

    Ok(())
}
