//! Pitch deck assembly: slide records in, `.pptx` package out.

use crate::package::{self, CONTENT_LAYOUT, LAYOUT_COUNT, NS_DML, NS_PML, NS_REL, TITLE_LAYOUT};
use cofounder_core::{Error, Result, SlideRecord, FALLBACK_TITLE};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Split slide content into bullets on `;` and newlines.
///
/// Bullets are trimmed and empty ones dropped.
pub fn split_bullets(content: &str) -> Vec<String> {
    content
        .split(|c| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Author stored in the package properties.
const CREATOR: &str = "cofounder";

/// Builds presentation files from slide records.
///
/// The first record becomes a title slide (title + subtitle), the rest use a
/// title-and-content layout with one bullet per line.
#[derive(Debug, Clone, Default)]
pub struct DeckAssembler {
    /// Document title stored in the package properties.
    title: Option<String>,
}

impl DeckAssembler {
    /// Create an assembler with default document properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title. Defaults to the first slide's title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Write a deck for `slides` into `writer`.
    ///
    /// Fails with [`Error::EmptyDeck`] if `slides` is empty.
    pub fn assemble<W: Write + Seek>(&self, slides: &[SlideRecord], writer: W) -> Result<()> {
        if slides.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = slides.len();

        let mut add = |path: &str, content: &str| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", path, e)))?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        add(package::CONTENT_TYPES_PATH, &package::content_types_xml(count))?;
        add(package::PACKAGE_RELS_PATH, &package::package_rels_xml())?;
        add(
            package::CORE_PROPS_PATH,
            &package::core_props_xml(&xml_text(self.document_title(slides)), CREATOR),
        )?;
        add(package::APP_PROPS_PATH, &package::app_props_xml(count))?;
        add(package::PRESENTATION_PATH, &package::presentation_xml(count))?;
        add(package::PRESENTATION_RELS_PATH, &package::presentation_rels_xml(count))?;
        add(package::SLIDE_MASTER_PATH, package::SLIDE_MASTER_XML)?;
        add(package::SLIDE_MASTER_RELS_PATH, &package::slide_master_rels_xml())?;
        for layout in 1..=LAYOUT_COUNT {
            add(&package::layout_path(layout), package::layout_xml(layout))?;
            add(&package::layout_rels_path(layout), &package::layout_rels_xml())?;
        }
        add(package::THEME_PATH, package::THEME_XML)?;

        for (idx, slide) in slides.iter().enumerate() {
            let number = idx + 1;
            let layout = if idx == 0 { TITLE_LAYOUT } else { CONTENT_LAYOUT };
            log::debug!("Writing slide {} ({:?}) with layout {}", number, slide.title, layout);

            add(&package::slide_path(number), &slide_xml(slide, layout))?;
            add(&package::slide_rels_path(number), &package::slide_rels_xml(layout))?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::info!("Assembled deck with {} slides", count);
        Ok(())
    }

    /// Assemble a deck into memory.
    pub fn to_bytes(&self, slides: &[SlideRecord]) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.assemble(slides, &mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Assemble a deck and write it to `path`.
    ///
    /// The parent directory must already exist. Nothing is created when
    /// `slides` is empty.
    pub fn write_file(&self, slides: &[SlideRecord], path: &Path) -> Result<()> {
        if slides.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.assemble(slides, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn document_title<'a>(&'a self, slides: &'a [SlideRecord]) -> &'a str {
        self.title
            .as_deref()
            .or_else(|| {
                slides
                    .first()
                    .map(|s| s.title.as_str())
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or(FALLBACK_TITLE)
    }
}

/// Generate the XML for one slide.
fn slide_xml(slide: &SlideRecord, layout: usize) -> String {
    let bullets = split_bullets(&slide.content);
    let mut xml = String::with_capacity(1024 + slide.content.len() * 2);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    let _ = write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_DML, NS_REL, NS_PML
    );
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(concat!(
        "<p:grpSpPr><a:xfrm>",
        r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
        "</a:xfrm></p:grpSpPr>"
    ));

    let (title_ph, body_name, body_ph) = if layout == TITLE_LAYOUT {
        (r#"<p:ph type="ctrTitle"/>"#, "Subtitle 2", r#"<p:ph type="subTitle" idx="1"/>"#)
    } else {
        (r#"<p:ph type="title"/>"#, "Content Placeholder 2", r#"<p:ph idx="1"/>"#)
    };

    let title = [slide.title.trim().to_string()];
    write_placeholder(&mut xml, 2, "Title 1", title_ph, &title);
    write_placeholder(&mut xml, 3, body_name, body_ph, &bullets);

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Write a placeholder shape with one paragraph per line.
fn write_placeholder(xml: &mut String, id: u32, name: &str, ph: &str, lines: &[String]) {
    let _ = write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr>"#,
        id, name, ph
    );
    xml.push_str("<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>");

    let mut wrote_paragraph = false;
    for line in lines.iter().filter(|l| !l.is_empty()) {
        let _ = write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            xml_text(line)
        );
        wrote_paragraph = true;
    }
    if !wrote_paragraph {
        // a txBody needs at least one paragraph
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }

    xml.push_str("</p:txBody></p:sp>");
}

/// Escape text for XML content, dropping characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect();
    escape(&cleaned).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_split_bullets() {
        assert_eq!(split_bullets("a; b\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_bullets("  one ;; \n\n two  "), vec!["one", "two"]);
        assert!(split_bullets(" ; \n ").is_empty());
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let err = DeckAssembler::new().to_bytes(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyDeck));
    }

    #[test]
    fn test_write_file_empty_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitch_deck.pptx");

        let err = DeckAssembler::new().write_file(&[], &path).unwrap_err();
        assert!(matches!(err, Error::EmptyDeck));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_file_creates_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitch_deck.pptx");

        DeckAssembler::new()
            .write_file(&[SlideRecord::new("Acme", "Smarter budgeting")], &path)
            .unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert!(archive.file_names().any(|name| name == "ppt/slides/slide1.xml"));
    }

    #[test]
    fn test_package_contains_all_parts() {
        let slides = vec![
            SlideRecord::new("Acme", "Smarter budgeting"),
            SlideRecord::new("Problem", "fees; confusion"),
            SlideRecord::new("Team", "Ana\nBo"),
        ];
        let bytes = DeckAssembler::new().to_bytes(&slides).unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide3.xml",
            "ppt/slides/_rels/slide3.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
        assert!(!names.contains(&"ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_first_slide_uses_title_layout() {
        let slides = vec![
            SlideRecord::new("Acme", "Smarter budgeting"),
            SlideRecord::new("Problem", "fees; confusion"),
        ];
        let bytes = DeckAssembler::new().to_bytes(&slides).unwrap();

        let first = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(first.contains(r#"<p:ph type="ctrTitle"/>"#));
        assert!(first.contains(r#"<p:ph type="subTitle" idx="1"/>"#));
        assert!(read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels")
            .contains("slideLayout1.xml"));

        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(second.contains(r#"<p:ph type="title"/>"#));
        assert!(second.contains("<a:t>fees</a:t>"));
        assert!(second.contains("<a:t>confusion</a:t>"));
        assert!(read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels")
            .contains("slideLayout2.xml"));
    }

    #[test]
    fn test_text_is_escaped() {
        let slides = vec![SlideRecord::new("R&D <Plan>", "costs < revenue & \"growth\"")];
        let bytes = DeckAssembler::new().to_bytes(&slides).unwrap();

        let xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(xml.contains("R&amp;D &lt;Plan&gt;"));
        assert!(xml.contains("costs &lt; revenue &amp; &quot;growth&quot;"));
    }

    #[test]
    fn test_empty_content_still_has_paragraph() {
        let xml = slide_xml(&SlideRecord::new("", ""), CONTENT_LAYOUT);
        assert_eq!(xml.matches("<a:endParaRPr").count(), 2);
    }

    #[test]
    fn test_document_title() {
        let slides = vec![SlideRecord::new("Acme", "x")];
        let bytes = DeckAssembler::new().to_bytes(&slides).unwrap();
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Acme</dc:title>"));

        let bytes = DeckAssembler::new()
            .with_title("Acme Seed Round")
            .to_bytes(&slides)
            .unwrap();
        assert!(read_part(&bytes, "docProps/core.xml")
            .contains("<dc:title>Acme Seed Round</dc:title>"));

        let untitled = vec![SlideRecord::new("", "x")];
        let bytes = DeckAssembler::new().to_bytes(&untitled).unwrap();
        assert!(read_part(&bytes, "docProps/core.xml").contains("<dc:title>Pitch Deck</dc:title>"));
    }

    #[test]
    fn test_control_characters_dropped() {
        assert_eq!(xml_text("a\u{0}b\u{1b}c"), "abc");
        assert_eq!(xml_text("tab\there"), "tab\there");
    }
}
