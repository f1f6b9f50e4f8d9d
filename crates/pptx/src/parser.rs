//! PPTX file parser implementation.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidetext_core::{Error, Result, Shape, ShapeKind, Slide, SourceDocument};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Package-level relationships part.
const ROOT_RELS_PATH: &str = "_rels/.rels";

/// Main presentation part, used when the package does not declare one.
const DEFAULT_PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Line break inside a paragraph (`a:br`), rendered as a vertical tab.
const LINE_BREAK: char = '\u{b}';

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse a PPTX file from disk.
    pub fn open(&self, path: &Path) -> Result<SourceDocument> {
        let file = File::open(path)
            .map_err(|e| Error::load(format!("cannot open '{}': {}", path.display(), e)))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        self.parse(BufReader::new(file), filename)
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<SourceDocument> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::load(format!("not a valid presentation container: {}", e)))?;

        let mut document = SourceDocument::new(filename);

        let slide_paths = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slides listed", filename, slide_paths.len());

        for (idx, slide_path) in slide_paths.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            document.add_slide(slide);
        }

        Ok(document)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// Order comes from `p:sldIdLst` in the presentation part; each entry is
    /// resolved to a part path through the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let presentation_path = self.find_presentation_part(archive)?;
        let presentation_xml = self.read_file_from_archive(archive, &presentation_path)?;
        let slide_rel_ids = read_slide_id_list(&presentation_xml)?;

        let rels_path = rels_path_for(&presentation_path);
        let relationships = if archive.by_name(&rels_path).is_ok() {
            let rels_xml = self.read_file_from_archive(archive, &rels_path)?;
            read_relationships(&rels_xml)?
        } else {
            HashMap::new()
        };

        let base_dir = parent_dir(&presentation_path);
        slide_rel_ids
            .iter()
            .map(|rel_id| -> Result<String> {
                let rel = relationships.get(rel_id).ok_or_else(|| {
                    Error::load(format!("slide relationship '{}' is not defined", rel_id))
                })?;
                Ok(resolve_part_path(base_dir, &rel.target))
            })
            .collect()
    }

    /// Locate the main presentation part via the package relationships.
    fn find_presentation_part<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<String> {
        if archive.by_name(ROOT_RELS_PATH).is_err() {
            return Ok(DEFAULT_PRESENTATION_PATH.to_string());
        }

        let rels_xml = self.read_file_from_archive(archive, ROOT_RELS_PATH)?;
        let path = read_relationships(&rels_xml)?
            .into_values()
            .find(|rel| rel.rel_type.ends_with("/officeDocument"))
            .map(|rel| resolve_part_path("", &rel.target))
            .unwrap_or_else(|| DEFAULT_PRESENTATION_PATH.to_string());

        Ok(path)
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = Slide::new(slide_number);

        for shape in extract_shapes_from_xml(&content)
            .map_err(|e| Error::load(format!("{}: {}", slide_path, e)))?
        {
            log::debug!(
                "slide {}: {:?} {:?} (text: {})",
                slide_number,
                shape.kind,
                shape.name.as_deref().unwrap_or(""),
                shape.text.is_some()
            );
            slide.add_shape(shape);
        }

        Ok(slide)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::load(format!("part '{}' not found in archive: {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::load(format!("failed to read part '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A relationship entry from a `.rels` part.
#[derive(Debug, Clone)]
struct Relationship {
    rel_type: String,
    target: String,
}

/// Parse a relationships part into a map keyed by relationship id.
fn read_relationships(xml: &str) -> Result<HashMap<String, Relationship>> {
    let mut rels = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel = Relationship {
                    rel_type: String::new(),
                    target: String::new(),
                };

                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::load(format!("bad relationship attribute: {}", e)))?
                        .into_owned();
                    match attr.key.as_ref() {
                        b"Id" => id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        _ => {}
                    }
                }

                if !id.is_empty() && !rel.target.is_empty() {
                    rels.insert(id, rel);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::load(format!("error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship ids of the slides listed in `p:sldIdLst`, in order.
fn read_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut seen_presentation = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"presentation" => {
                seen_presentation = true;
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // The id lives in the relationships namespace (r:id), not the
                // unprefixed numeric `id` attribute.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|a| {
                        let key = a.key.as_ref();
                        key.contains(&b':') && local_name(key) == b"id"
                    })
                    .map(|a| String::from_utf8_lossy(&a.value).to_string())
                    .ok_or_else(|| Error::load("slide entry without a relationship id"))?;
                ids.push(rel_id);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::load(format!("error parsing presentation part: {}", e)));
            }
            _ => {}
        }
    }

    if !seen_presentation {
        return Err(Error::load("presentation part has no p:presentation root"));
    }

    Ok(ids)
}

/// Shape under construction while walking a slide's shape tree.
#[derive(Debug)]
struct ShapeBuilder {
    kind: ShapeKind,
    name: Option<String>,
    paragraphs: Vec<String>,
    in_text_body: bool,
    in_text: bool,
}

impl ShapeBuilder {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            name: None,
            paragraphs: Vec::new(),
            in_text_body: false,
            in_text: false,
        }
    }

    fn start(&mut self, name: &[u8], e: &BytesStart<'_>) {
        match name {
            b"cNvPr" => self.read_name(e),
            b"txBody" if self.kind.carries_text() => self.in_text_body = true,
            b"p" if self.in_text_body => self.paragraphs.push(String::new()),
            b"t" if self.in_text_body => self.in_text = true,
            b"br" if self.in_text_body => self.push_char(LINE_BREAK),
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8], e: &BytesStart<'_>) {
        match name {
            b"cNvPr" => self.read_name(e),
            b"p" if self.in_text_body => self.paragraphs.push(String::new()),
            b"br" if self.in_text_body => self.push_char(LINE_BREAK),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"txBody" => self.in_text_body = false,
            _ => {}
        }
    }

    fn read_name(&mut self, e: &BytesStart<'_>) {
        if self.name.is_some() {
            return;
        }
        self.name = e
            .attributes()
            .flatten()
            .find(|a| a.key.as_ref() == b"name")
            .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.push_str(text);
        }
    }

    fn push_char(&mut self, c: char) {
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.push(c);
        }
    }

    fn finish(self) -> Shape {
        let text = self
            .kind
            .carries_text()
            .then(|| self.paragraphs.join("\n"));

        Shape {
            kind: self.kind,
            name: self.name,
            text,
        }
    }
}

/// Extract the top-level shapes of a slide, in document order.
///
/// Only direct children of `p:spTree` are shapes; anything nested inside a
/// group belongs to the group. Text is kept exactly as stored, without
/// trimming.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<Shape>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(false);

    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut current: Option<ShapeBuilder> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.name();
                let local_name = local_name(name.as_ref());

                match tree_depth {
                    None if local_name == b"spTree" => tree_depth = Some(depth),
                    Some(tree) if depth == tree + 1 => {
                        current = ShapeKind::from_local_name(local_name).map(ShapeBuilder::new);
                    }
                    Some(_) => {
                        if let Some(ref mut shape) = current {
                            shape.start(local_name, e);
                        }
                    }
                    None => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local_name = local_name(name.as_ref());

                match tree_depth {
                    Some(tree) if depth == tree => {
                        if let Some(kind) = ShapeKind::from_local_name(local_name) {
                            shapes.push(ShapeBuilder::new(kind).finish());
                        }
                    }
                    Some(_) => {
                        if let Some(ref mut shape) = current {
                            shape.empty(local_name, e);
                        }
                    }
                    None => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut shape) = current {
                    if shape.in_text {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::load(format!("bad text content: {}", e)))?;
                        shape.push_text(&text);
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(ref mut shape) = current {
                    if shape.in_text {
                        shape.push_text(&String::from_utf8_lossy(e));
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local_name = local_name(name.as_ref());

                match tree_depth {
                    Some(tree) if depth == tree + 1 => {
                        if let Some(shape) = current.take() {
                            shapes.push(shape.finish());
                        }
                    }
                    Some(tree) if depth == tree => break,
                    Some(_) => {
                        if let Some(ref mut shape) = current {
                            shape.end(local_name);
                        }
                    }
                    None => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::load(format!("XML parsing error: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Path of the relationships part belonging to `part_path`.
fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Directory portion of a part path, without a trailing slash.
fn parent_dir(part_path: &str) -> &str {
    part_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_part_path(base_dir: &str, target: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else if base_dir.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", base_dir, target)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
