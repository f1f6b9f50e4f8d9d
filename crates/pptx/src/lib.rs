//! PPTX (Office Open XML) loader for slide text conversion.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents,
//! into the ordered slide and shape tree of a [`slidetext_core::SourceDocument`].

pub mod parser;

pub use parser::PptxParser;
