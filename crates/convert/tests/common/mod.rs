//! Shared fixtures: in-memory PPTX packages and a DOCX paragraph reader.

#![allow(dead_code)]

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Top-level slide element used to build fixtures.
pub enum FixtureShape {
    /// A `p:sp` whose text frame holds these paragraphs (raw XML text).
    Text(Vec<&'static str>),
    /// A `p:sp` without a text body.
    NoTextBody,
    /// A `p:pic`.
    Picture,
}

fn shape_xml(id: usize, shape: &FixtureShape) -> String {
    match shape {
        FixtureShape::Text(paragraphs) => {
            let body: String = paragraphs
                .iter()
                .map(|p| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p))
                .collect();
            format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp>"#
            )
        }
        FixtureShape::NoTextBody => format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Rectangle {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>"#
        ),
        FixtureShape::Picture => format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill/><p:spPr/></p:pic>"#
        ),
    }
}

fn slide_xml(shapes: &[FixtureShape]) -> String {
    let body: String = shapes
        .iter()
        .enumerate()
        .map(|(idx, shape)| shape_xml(idx + 2, shape))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{body}</p:spTree></p:cSld></p:sld>"#
    )
}

/// Build a PPTX package with the given slides.
pub fn build_pptx(slides: &[Vec<FixtureShape>]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#).unwrap();

        let mut ids = String::new();
        let mut rels = String::new();
        for idx in 0..slides.len() {
            ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + idx, idx + 2));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                idx + 2,
                idx + 1
            ));
        }

        zip.start_file("ppt/presentation.xml", options).unwrap();
        zip.write_all(
            format!(r#"<?xml version="1.0" encoding="UTF-8"?><p:presentation {NS}><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#)
                .as_bytes(),
        )
        .unwrap();

        zip.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        zip.write_all(
            format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#)
                .as_bytes(),
        )
        .unwrap();

        for (idx, shapes) in slides.iter().enumerate() {
            zip.start_file(format!("ppt/slides/slide{}.xml", idx + 1), options)
                .unwrap();
            zip.write_all(slide_xml(shapes).as_bytes()).unwrap();
        }

        zip.finish().unwrap();
    }
    buffer
}

/// Write a PPTX package to `path`.
pub fn write_pptx(path: &Path, slides: &[Vec<FixtureShape>]) {
    std::fs::write(path, build_pptx(slides)).unwrap();
}

/// A paragraph read back from a generated document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocParagraph {
    pub style: Option<String>,
    pub text: String,
    pub font: Option<String>,
    pub size: Option<String>,
}

impl DocParagraph {
    pub fn is_heading(&self) -> bool {
        self.style.as_deref() == Some("Heading1")
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn apply_tag(e: &BytesStart<'_>, current: &mut Option<DocParagraph>) {
    if e.name().as_ref() == b"w:p" {
        *current = Some(DocParagraph::default());
        return;
    }
    let Some(p) = current.as_mut() else {
        return;
    };
    match e.name().as_ref() {
        b"w:pStyle" => p.style = attr(e, b"w:val"),
        b"w:rFonts" => p.font = attr(e, b"w:ascii"),
        b"w:sz" => p.size = attr(e, b"w:val"),
        b"w:tab" => p.text.push('\t'),
        b"w:br" => p.text.push('\n'),
        _ => {}
    }
}

/// Read the body paragraphs of a DOCX file.
pub fn read_docx(path: &Path) -> Vec<DocParagraph> {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<DocParagraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
                apply_tag(&e, &mut current);
            }
            Event::Empty(e) => apply_tag(&e, &mut current),
            Event::Text(t) => {
                if in_text {
                    if let Some(p) = current.as_mut() {
                        p.text.push_str(&t.unescape().unwrap());
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.extend(current.take()),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    paragraphs
}
