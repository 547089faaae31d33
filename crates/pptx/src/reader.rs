//! Reads a `.pptx` deck back into titles and bullets.

use cofounder_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A slide as read back from a presentation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Text of the title placeholder, if any.
    pub title: Option<String>,

    /// Non-empty paragraphs from every other text shape, in document order.
    pub body: Vec<String>,
}

/// Reader for PPTX (Office Open XML) decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide of a deck, in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<DeckSlide>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Deck has {} slide parts", slide_order.len());

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let content = self.read_file_from_archive(&mut archive, path)?;
                parse_slide_xml(&content, idx + 1)
            })
            .collect()
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            _ => {}
                        }
                    }

                    if rel_type.ends_with("/slide") {
                        let order = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::CorruptedFile(format!("Part not found '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Text gathered from one `p:sp` shape.
#[derive(Debug, Default)]
struct ShapeText {
    placeholder: Option<String>,
    paragraphs: Vec<String>,
}

impl ShapeText {
    fn is_title(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("title") | Some("ctrTitle"))
    }
}

/// Extract title and body text from slide XML.
fn parse_slide_xml(xml_content: &str, number: usize) -> Result<DeckSlide> {
    let mut reader = Reader::from_str(xml_content);

    let mut shapes: Vec<ShapeText> = Vec::new();
    let mut current: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeText::default()),
                b"p" if current.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = paragraph.is_some(),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"ph" {
                    if let Some(ref mut shape) = current {
                        // a placeholder without a type is a body/object placeholder
                        let mut kind = "body".to_string();
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"type" {
                                kind = String::from_utf8_lossy(&attr.value).to_string();
                            }
                        }
                        shape.placeholder = Some(kind);
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(ref mut text) = paragraph {
                        text.push_str(&e.unescape().unwrap_or_default());
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(text), Some(shape)) = (paragraph.take(), current.as_mut()) {
                        let text = text.trim();
                        if !text.is_empty() {
                            shape.paragraphs.push(text.to_string());
                        }
                    }
                }
                b"sp" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing slide {}: {}",
                    number, e
                )));
            }
            _ => {}
        }
    }

    let mut slide = DeckSlide {
        number,
        title: None,
        body: Vec::new(),
    };
    for shape in shapes {
        if slide.title.is_none() && shape.is_title() {
            slide.title = Some(shape.paragraphs.join("\n"));
        } else {
            slide.body.extend(shape.paragraphs);
        }
    }

    Ok(slide)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckAssembler;
    use cofounder_core::SlideRecord;
    use std::io::Cursor;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_parse_slide_xml() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Go </a:t></a:r><a:r><a:t>to Market</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Partnerships &amp; ads</a:t></a:r></a:p><a:p><a:endParaRPr/></a:p><a:p><a:r><a:t>SEO</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;

        let slide = parse_slide_xml(xml, 4).unwrap();
        assert_eq!(slide.number, 4);
        assert_eq!(slide.title.as_deref(), Some("Go to Market"));
        assert_eq!(slide.body, vec!["Partnerships & ads", "SEO"]);
    }

    #[test]
    fn test_reads_assembled_deck() {
        let records: Vec<SlideRecord> = (1..=12)
            .map(|n| SlideRecord::new(format!("Slide {}", n), format!("point {}a; point {}b", n, n)))
            .collect();
        let bytes = DeckAssembler::new().to_bytes(&records).unwrap();

        let slides = DeckReader::new().read(Cursor::new(bytes)).unwrap();

        assert_eq!(slides.len(), 12);
        for (slide, n) in slides.iter().zip(1..) {
            assert_eq!(slide.number, n);
            assert_eq!(slide.title, Some(format!("Slide {}", n)));
            assert_eq!(slide.body, vec![format!("point {}a", n), format!("point {}b", n)]);
        }
    }

    #[test]
    fn test_not_a_zip() {
        let err = DeckReader::new()
            .read(Cursor::new(b"plain text".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
