//! Conversion of PowerPoint presentations into plain-text Word documents.
//!
//! [`convert`] is the one-call entry point; [`Converter`] exposes the same
//! routine with a reusable configuration, and [`ConversionForm`] holds the
//! state an interactive front end needs around it.

pub mod converter;
pub mod form;

pub use converter::{
    convert, default_output_path, ConversionReport, Converter, DEFAULT_HEADING_LABEL,
};
pub use form::{ConversionForm, ConversionRequest, FormError};
