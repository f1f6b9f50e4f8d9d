//! Core domain types, errors, and text sanitization for converting
//! PowerPoint slides into a plain-text Word document.

pub mod error;
pub mod font;
pub mod sanitize;
pub mod types;

pub use error::{Error, Result};
pub use font::{
    parse_font_size, FontSpec, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT, FONT_CHOICES,
};
pub use sanitize::{contains_disallowed, sanitize};
pub use types::{
    Block, OutputDocument, PresentationFormat, Run, Shape, ShapeKind, Slide, SourceDocument,
};
