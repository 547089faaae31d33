//! PPTX (Office Open XML) backend for pitch decks.
//!
//! Assembles slide records into .pptx files, which are ZIP archives of XML
//! parts, and reads them back for verification.

mod package;
pub mod reader;
pub mod writer;

pub use reader::{DeckReader, DeckSlide};
pub use writer::{split_bullets, DeckAssembler};
