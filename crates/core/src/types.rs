//! Domain types for the source presentation and the generated document.

use crate::font::FontSpec;
use serde::{Deserialize, Serialize};

/// A presentation as loaded from disk: its slides, in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl SourceDocument {
    /// Create an empty presentation with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of shapes carrying text across all slides.
    pub fn text_shape_count(&self) -> usize {
        self.slides.iter().map(|s| s.text_shapes().count()).sum()
    }
}

/// The container format of a presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary). Recognised only to report it clearly.
    LegacyPpt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::LegacyPpt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::LegacyPpt);
        }

        None
    }
}

/// A single slide and its shapes, in z-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Top-level shapes on this slide.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Text of every text-bearing shape, in shape order.
    pub fn text_shapes(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| s.text.as_deref())
    }
}

/// The kind of a top-level slide element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// `p:sp`: autoshapes, text boxes and placeholders.
    AutoShape,
    /// `p:grpSp`.
    Group,
    /// `p:graphicFrame`: tables, charts, diagrams.
    GraphicFrame,
    /// `p:cxnSp`.
    Connector,
    /// `p:pic`.
    Picture,
    /// `p:contentPart`.
    ContentPart,
}

impl ShapeKind {
    /// Map an element local name to a shape kind.
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::AutoShape),
            b"grpSp" => Some(Self::Group),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"cxnSp" => Some(Self::Connector),
            b"pic" => Some(Self::Picture),
            b"contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }

    /// Whether shapes of this kind carry a text frame.
    pub fn carries_text(self) -> bool {
        matches!(self, Self::AutoShape)
    }
}

/// A visual element on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// What kind of element this is.
    pub kind: ShapeKind,

    /// Name from the shape's non-visual properties, if present.
    pub name: Option<String>,

    /// Raw text for text-bearing shapes, `None` for everything else.
    ///
    /// An empty string means the shape carries a text frame with no text.
    pub text: Option<String>,
}

impl Shape {
    /// Create a shape that carries no text.
    pub fn without_text(kind: ShapeKind) -> Self {
        Self {
            kind,
            name: None,
            text: None,
        }
    }

    /// Create a text-bearing shape.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            kind: ShapeKind::AutoShape,
            name: None,
            text: Some(text.into()),
        }
    }
}

/// A run of text sharing one font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub font: FontSpec,
}

/// A structural unit of the generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A heading at the given outline level (1 = top level).
    Heading { level: u8, text: String },
    /// A paragraph made of a single styled run.
    Paragraph(Run),
}

/// The word-processing document built by a conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    blocks: Vec<Block>,
}

impl OutputDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading block.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) {
        self.blocks.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    /// Append a paragraph holding one run of `text` in `font`.
    pub fn add_paragraph(&mut self, text: impl Into<String>, font: &FontSpec) {
        self.blocks.push(Block::Paragraph(Run {
            text: text.into(),
            font: font.clone(),
        }));
    }

    /// All blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of heading blocks.
    pub fn heading_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Heading { .. }))
            .count()
    }

    /// Number of paragraph blocks.
    pub fn paragraph_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph(_)))
            .count()
    }

    /// Render the document as plain text, one block per line group.
    ///
    /// Headings are followed by a blank line when they start a new section.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for (idx, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Heading { text, .. } => {
                    if idx > 0 {
                        out.push('\n');
                    }
                    out.push_str(text);
                }
                Block::Paragraph(run) => out.push_str(&run.text),
            }
            out.push('\n');
        }
        out
    }
}
