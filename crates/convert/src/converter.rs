//! The slide-to-document conversion routine.

use serde::{Deserialize, Serialize};
use slidetext_core::{
    sanitize, Error, FontSpec, OutputDocument, PresentationFormat, Result, SourceDocument,
};
use slidetext_docx::DocxWriter;
use slidetext_pptx::PptxParser;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Label placed before the slide number in each heading.
pub const DEFAULT_HEADING_LABEL: &str = "Slide";

/// Outline level of the per-slide headings.
const SLIDE_HEADING_LEVEL: u8 = 1;

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Presentation that was read.
    pub source: PathBuf,
    /// Document that was written.
    pub output: PathBuf,
    /// Number of slides, which is also the number of headings.
    pub slides: usize,
    /// Number of text paragraphs written.
    pub paragraphs: usize,
}

/// Converts presentations into plain-text documents with one uniform font.
#[derive(Debug, Clone)]
pub struct Converter {
    font: FontSpec,
    heading_label: String,
}

impl Converter {
    /// Create a converter rendering every paragraph in `font`.
    pub fn new(font: FontSpec) -> Self {
        Self {
            font,
            heading_label: DEFAULT_HEADING_LABEL.to_string(),
        }
    }

    /// Set the label used in slide headings ("Slide" gives "Slide 1", ...).
    ///
    /// Control characters the document format cannot carry are dropped.
    pub fn with_heading_label(mut self, label: impl Into<String>) -> Self {
        self.heading_label = sanitize(&label.into());
        self
    }

    /// Build the output document for an already loaded presentation.
    ///
    /// Every slide yields a heading, followed by one paragraph per shape that
    /// carries text, even when that text is empty after sanitizing.
    pub fn build_document(&self, source: &SourceDocument) -> OutputDocument {
        let mut document = OutputDocument::new();

        for (idx, slide) in source.slides.iter().enumerate() {
            document.add_heading(
                format!("{} {}", self.heading_label, idx + 1),
                SLIDE_HEADING_LEVEL,
            );

            for text in slide.text_shapes() {
                document.add_paragraph(sanitize(text), &self.font);
            }
        }

        document
    }

    /// Load a presentation, checking its container format first.
    pub fn load(&self, source: &Path) -> Result<SourceDocument> {
        let mut file = File::open(source)
            .map_err(|e| Error::load(format!("cannot open '{}': {}", source.display(), e)))?;

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic).map_err(|_| {
            Error::load(format!("'{}' is too short to be a presentation", source.display()))
        })?;
        drop(file);

        match PresentationFormat::from_magic(&magic) {
            Some(PresentationFormat::Pptx) => {
                log::debug!("Parsing {} as PPTX", source.display());
                PptxParser::new().open(source)
            }
            Some(PresentationFormat::LegacyPpt) => Err(Error::load(format!(
                "'{}' is a legacy .ppt file; save it as .pptx first",
                source.display()
            ))),
            None if claims_pptx(source) => Err(Error::load(format!(
                "'{}' has a .pptx extension but is not a ZIP container; the file may be damaged",
                source.display()
            ))),
            None => Err(Error::load(format!(
                "'{}' is not a presentation container",
                source.display()
            ))),
        }
    }

    /// Convert `source` into a document at `output`.
    ///
    /// Nothing is written unless the presentation loads; an existing file at
    /// `output` is replaced as a whole.
    pub fn run(&self, source: &Path, output: &Path) -> Result<ConversionReport> {
        self.font.validate()?;
        check_distinct_paths(source, output)?;

        let presentation = self.load(source)?;
        log::debug!(
            "{}: {} slides, {} text shapes",
            presentation.filename,
            presentation.slides.len(),
            presentation.text_shape_count()
        );

        let document = self.build_document(&presentation);
        DocxWriter::new().write(&document, output)?;

        let report = ConversionReport {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            slides: document.heading_count(),
            paragraphs: document.paragraph_count(),
        };
        log::info!(
            "Converted {} ({} slides, {} paragraphs) to {}",
            source.display(),
            report.slides,
            report.paragraphs,
            output.display()
        );

        Ok(report)
    }
}

/// Convert a presentation into a plain-text document.
///
/// Every text paragraph is set in `font_family` at `font_size_pt` points.
/// An invalid size is rejected before any file is touched.
pub fn convert(
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
    font_family: &str,
    font_size_pt: f64,
) -> Result<()> {
    let font = FontSpec::new(font_family, font_size_pt)?;
    Converter::new(font).run(source.as_ref(), output.as_ref())?;
    Ok(())
}

/// Default output location: the source path with a `.docx` extension.
pub fn default_output_path(source: &Path) -> PathBuf {
    source.with_extension("docx")
}

/// Whether the file name says the file should be a PPTX package.
fn claims_pptx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(PresentationFormat::from_extension)
        == Some(PresentationFormat::Pptx)
}

/// Refuse to write the output over the presentation being read.
fn check_distinct_paths(source: &Path, output: &Path) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }

    let same = match (source.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if same {
        return Err(Error::save(format!(
            "output '{}' would overwrite the source presentation",
            output.display()
        )));
    }

    Ok(())
}
