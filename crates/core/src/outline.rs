//! Outline parsing: turns a numbered slide list into slide records.
//!
//! The expected shape is one slide per line:
//!
//! ```text
//! 1. Problem: customers lack X; they waste Y
//! 2. Solution: an app that does Z
//! ```
//!
//! The model does not always follow that shape, so parsing is best-effort and
//! never fails. Bullet lines (`- ...`) following a slide are folded into that
//! slide's content; anything else that does not match is kept aside as an
//! [`UnmatchedLine`]. If no slide is recognized at all the whole text becomes a
//! single fallback slide.

use crate::types::{Outline, SlideRecord, UnmatchedLine};
use regex::Regex;
use std::sync::LazyLock;

/// A line starting with an ordinal marker such as `1.`, `10.5.`, `3)` or
/// `Slide 2.`, optionally preceded by markdown heading or quote markers.
///
/// Emphasis stars must touch the ordinal (`**1.`); a star followed by a space
/// is a bullet, not decoration.
static SLIDE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s#>]*\**(?:(?i:slide)\s+)?\d+(?:\.\d+)*[.)]\s*(?P<rest>.*)$").unwrap()
});

/// A bullet-marked continuation line.
static BULLET_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+(?P<text>.*\S)\s*$").unwrap());

/// Bullet markers (or a closing `**` left over from a bold title) at the
/// front of slide content. Each needs trailing whitespace or the end of text.
static LEADING_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(?:[-•]|\*+)(?:\s+|$))+").unwrap());

/// Parse a raw outline into slides.
///
/// Always returns at least one slide.
pub fn parse(raw: &str) -> Outline {
    let mut slides: Vec<SlideRecord> = Vec::new();
    let mut unmatched = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(slide) = parse_slide_line(line) {
            slides.push(slide);
            continue;
        }

        if let (Some(previous), Some(caps)) = (slides.last_mut(), BULLET_LINE_REGEX.captures(line))
        {
            append_bullet(&mut previous.content, &caps["text"]);
            continue;
        }

        log::warn!("Outline line {} does not look like a slide: {:?}", idx + 1, line);
        unmatched.push(UnmatchedLine {
            line_number: idx + 1,
            text: line.to_string(),
        });
    }

    log::debug!(
        "Parsed {} slides ({} unmatched lines)",
        slides.len(),
        unmatched.len()
    );

    if slides.is_empty() {
        log::warn!("No slides recognized in outline; using the raw text as a single slide");
    }

    Outline::from_parts(slides, unmatched, raw)
}

/// Parse a single `<ordinal>. <title>: <content>` line.
fn parse_slide_line(line: &str) -> Option<SlideRecord> {
    let caps = SLIDE_LINE_REGEX.captures(line)?;
    let (title, content) = caps.name("rest")?.as_str().split_once(':')?;

    let title = title.trim().trim_matches('*').trim();
    let content = LEADING_MARKER_REGEX.replace(content.trim(), "");

    Some(SlideRecord::new(title, content.as_ref()))
}

fn append_bullet(content: &mut String, bullet: &str) {
    if !content.is_empty() {
        content.push('\n');
    }
    content.push_str(bullet.trim());
}
