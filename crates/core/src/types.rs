//! Domain types for representing a parsed pitch deck outline.

use serde::{Deserialize, Serialize};

/// Title used for the single slide emitted when an outline has no structure.
pub const FALLBACK_TITLE: &str = "Pitch Deck";

/// One deck page: a title and its bullet content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Short human-readable title. May be empty if the outline omitted it.
    pub title: String,

    /// Bullet text, still delimited by `;` and/or newlines.
    pub content: String,
}

impl SlideRecord {
    /// Create a new slide record.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Create the fallback record that carries an unparseable outline verbatim.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self::new(FALLBACK_TITLE, raw)
    }
}

/// An outline line that did not match the slide shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedLine {
    /// 1-based line number in the raw outline.
    pub line_number: usize,

    /// The line as it appeared, without its newline.
    pub text: String,
}

/// The result of parsing a raw outline.
///
/// Always holds at least one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    slides: Vec<SlideRecord>,
    unmatched: Vec<UnmatchedLine>,
    fallback: bool,
}

impl Outline {
    /// Build an outline from parsed slides, falling back to a single slide
    /// holding `raw` if none were found.
    pub(crate) fn from_parts(
        slides: Vec<SlideRecord>,
        unmatched: Vec<UnmatchedLine>,
        raw: &str,
    ) -> Self {
        if slides.is_empty() {
            Self {
                slides: vec![SlideRecord::fallback(raw)],
                unmatched,
                fallback: true,
            }
        } else {
            Self {
                slides,
                unmatched,
                fallback: false,
            }
        }
    }

    /// Slides in outline order. Never empty.
    pub fn slides(&self) -> &[SlideRecord] {
        &self.slides
    }

    /// Lines that contributed to no slide.
    pub fn unmatched(&self) -> &[UnmatchedLine] {
        &self.unmatched
    }

    /// Whether the outline degraded to the single fallback slide.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether there are no slides. Never true for a parsed outline.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_keeps_slides() {
        let outline = Outline::from_parts(vec![SlideRecord::new("Team", "Alice")], vec![], "x");
        assert!(!outline.is_fallback());
        assert_eq!(outline.len(), 1);
        assert_eq!(outline.slides()[0].title, "Team");
    }

    #[test]
    fn test_from_parts_falls_back_when_empty() {
        let outline = Outline::from_parts(vec![], vec![], "raw text");
        assert!(outline.is_fallback());
        assert!(!outline.is_empty());
        assert_eq!(outline.slides(), &[SlideRecord::fallback("raw text")]);
    }
}
