//! DOCX (WordprocessingML) writer for converted slide text.
//!
//! Renders an [`slidetext_core::OutputDocument`] as headings and uniformly
//! styled paragraphs, and persists it atomically.

pub mod writer;

pub use writer::DocxWriter;
