//! State and validation behind an interactive conversion form.
//!
//! A front end (window, TUI, web page) owns one [`ConversionForm`], updates
//! its fields as the user types, asks it for the preview font on every edit,
//! and calls [`ConversionForm::submit`] when the user confirms.

use crate::converter::{default_output_path, ConversionReport, Converter};
use slidetext_core::{
    parse_font_size, Error, FontSpec, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT,
};
use std::path::{Path, PathBuf};

/// Problems reported back to the user of a conversion form.
#[derive(thiserror::Error, Debug)]
pub enum FormError {
    /// The size field does not hold a number.
    #[error("Font size must be a number.")]
    FontSizeNotNumber,

    /// The source or the output path is empty.
    #[error("Both the presentation and the output document must be selected.")]
    MissingPaths,

    /// The size is a number but not a usable font size.
    #[error("{0}")]
    Font(Error),

    /// The conversion itself failed.
    #[error("{0}")]
    Conversion(Error),
}

/// A validated request, ready to hand to the [`Converter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    pub font: FontSpec,
}

/// The user-editable fields of a conversion form, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionForm {
    pub source_path: String,
    pub output_path: String,
    pub font_family: String,
    pub font_size: String,
}

impl Default for ConversionForm {
    fn default() -> Self {
        Self {
            source_path: String::new(),
            output_path: String::new(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: format!("{}", DEFAULT_FONT_SIZE_PT),
        }
    }
}

impl ConversionForm {
    /// Create a form with default font settings and no paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the source presentation.
    ///
    /// The output path is filled in with a `.docx` sibling if still empty.
    pub fn select_source(&mut self, path: impl Into<String>) {
        self.source_path = path.into();
        if self.output_path.trim().is_empty() && !self.source_path.trim().is_empty() {
            self.output_path = default_output_path(Path::new(self.source_path.trim()))
                .to_string_lossy()
                .into_owned();
        }
    }

    /// Font to show in a live preview of the current selection.
    ///
    /// Falls back to the default size while the size field holds something
    /// that is not a valid size, so the preview never fails.
    pub fn preview_font(&self) -> FontSpec {
        let family = if self.font_family.trim().is_empty() {
            DEFAULT_FONT_FAMILY
        } else {
            self.font_family.as_str()
        };
        let size_pt = parse_font_size(&self.font_size).unwrap_or(DEFAULT_FONT_SIZE_PT);

        FontSpec {
            family: family.to_string(),
            size_pt,
        }
    }

    /// Check the fields and turn them into a conversion request.
    pub fn validate(&self) -> Result<ConversionRequest, FormError> {
        let size_pt = self
            .font_size
            .trim()
            .parse::<f64>()
            .map_err(|_| FormError::FontSizeNotNumber)?;

        let source = self.source_path.trim();
        let output = self.output_path.trim();
        if source.is_empty() || output.is_empty() {
            return Err(FormError::MissingPaths);
        }

        let font = FontSpec::new(self.font_family.as_str(), size_pt).map_err(FormError::Font)?;

        Ok(ConversionRequest {
            source: PathBuf::from(source),
            output: PathBuf::from(output),
            font,
        })
    }

    /// Validate the form and run the conversion.
    pub fn submit(&self) -> Result<ConversionReport, FormError> {
        let request = self.validate()?;
        Converter::new(request.font)
            .run(&request.source, &request.output)
            .map_err(FormError::Conversion)
    }
}
