//! DOCX writer implementation.

use docx_rs::{BreakType, Docx, Paragraph, RunFonts, Style, StyleType};
use slidetext_core::{Block, Error, OutputDocument, Result, Run};
use std::collections::BTreeSet;
use std::io::{Seek, Write};
use std::path::Path;

/// Heading sizes in half-points, indexed by level - 1.
const HEADING_SIZES: &[usize] = &[32, 26, 24];

/// Writer for DOCX (WordprocessingML) files.
pub struct DocxWriter;

impl DocxWriter {
    /// Create a new DOCX writer.
    pub fn new() -> Self {
        Self
    }

    /// Build the in-memory package for `document`.
    pub fn build(&self, document: &OutputDocument) -> Docx {
        let mut docx = Docx::new();

        let levels: BTreeSet<u8> = document
            .blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Heading { level, .. } => Some(*level),
                Block::Paragraph(_) => None,
            })
            .collect();
        for level in levels {
            docx = docx.add_style(heading_style(level));
        }

        for block in document.blocks() {
            let paragraph = match block {
                Block::Heading { level, text } => Paragraph::new()
                    .style(&heading_style_id(*level))
                    .add_run(docx_rs::Run::new().add_text(text.as_str())),
                Block::Paragraph(run) => Paragraph::new().add_run(styled_run(run)),
            };
            docx = docx.add_paragraph(paragraph);
        }

        docx
    }

    /// Serialize `document` as a DOCX package into `writer`.
    pub fn write_to<W: Write + Seek>(&self, document: &OutputDocument, writer: W) -> Result<()> {
        self.build(document)
            .build()
            .pack(writer)
            .map_err(|e| Error::save(format!("failed to package document: {}", e)))
    }

    /// Write `document` to `path`, replacing any existing file.
    ///
    /// The package is written to a temporary file next to `path` and renamed
    /// into place, so a failed write never leaves a truncated document behind.
    pub fn write(&self, document: &OutputDocument, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".slidetext-").suffix(".docx.tmp");
        // Temp files default to 0600; a fresh document gets the umask default.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut temp = builder
            .tempfile_in(dir)
            .map_err(|e| Error::save(format!("cannot write to '{}': {}", dir.display(), e)))?;

        // A replaced document keeps its mode.
        if let Ok(metadata) = std::fs::metadata(path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| Error::save(format!("cannot set permissions on '{}': {}", path.display(), e)))?;
        }

        self.write_to(document, temp.as_file_mut())?;
        temp.as_file_mut()
            .flush()
            .map_err(|e| Error::save(format!("failed to flush '{}': {}", path.display(), e)))?;

        temp.persist(path)
            .map_err(|e| Error::save(format!("cannot replace '{}': {}", path.display(), e.error)))?;

        log::debug!(
            "wrote {} blocks to {}",
            document.blocks().len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level)
}

fn heading_style(level: u8) -> Style {
    let size = HEADING_SIZES
        .get(usize::from(level).saturating_sub(1))
        .copied()
        .unwrap_or(22);

    Style::new(heading_style_id(level), StyleType::Paragraph)
        .name(format!("Heading {}", level))
        .bold()
        .size(size)
}

/// Build a run carrying `run`'s text in its font.
///
/// Tabs become `w:tab` and every CR or LF becomes a line break, as Word
/// itself does when text is typed into a run.
fn styled_run(run: &Run) -> docx_rs::Run {
    let family = run.font.family.as_str();
    let mut out = docx_rs::Run::new()
        .fonts(RunFonts::new().ascii(family).hi_ansi(family))
        .size(run.font.half_points());

    let mut pending = String::new();
    for c in run.text.chars() {
        match c {
            '\t' | '\n' | '\r' => {
                if !pending.is_empty() {
                    out = out.add_text(std::mem::take(&mut pending));
                }
                out = if c == '\t' {
                    out.add_tab()
                } else {
                    out.add_break(BreakType::TextWrapping)
                };
            }
            _ => pending.push(c),
        }
    }
    if !pending.is_empty() {
        out = out.add_text(pending);
    }

    out
}
