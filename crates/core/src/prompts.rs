//! Prompt construction for each deliverable.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse whitespace runs (including newlines) into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// One of the artifacts generated for an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deliverable {
    /// Demand, market size, and competitor report.
    MarketAnalysis,
    /// Three or more priced packages.
    PricingTiers,
    /// Headline, description and call to action.
    LandingPage,
    /// Ten-slide outline, assembled into a presentation.
    PitchDeck,
}

impl Deliverable {
    /// All deliverables, in generation order.
    pub const ALL: [Deliverable; 4] = [
        Deliverable::MarketAnalysis,
        Deliverable::PricingTiers,
        Deliverable::LandingPage,
        Deliverable::PitchDeck,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Deliverable::MarketAnalysis => "Market analysis",
            Deliverable::PricingTiers => "Pricing tiers",
            Deliverable::LandingPage => "Landing page copy",
            Deliverable::PitchDeck => "Pitch deck",
        }
    }

    /// File name the deliverable is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            Deliverable::MarketAnalysis => "market_analysis.txt",
            Deliverable::PricingTiers => "pricing_tiers.txt",
            Deliverable::LandingPage => "landing_page.txt",
            Deliverable::PitchDeck => "pitch_deck.pptx",
        }
    }
}

impl fmt::Display for Deliverable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a business idea for embedding in a prompt.
///
/// Applies NFC, trims, and collapses whitespace runs to single spaces.
pub fn normalize_idea(idea: &str) -> Result<String> {
    let composed: String = idea.nfc().collect();
    let collapsed = WHITESPACE_COLLAPSE_REGEX.replace_all(composed.trim(), " ");

    if collapsed.is_empty() {
        return Err(Error::EmptyIdea);
    }

    Ok(collapsed.into_owned())
}

/// Build the user prompt for a deliverable.
pub fn build_prompt(deliverable: Deliverable, idea: &str) -> String {
    match deliverable {
        Deliverable::MarketAnalysis => market_analysis_prompt(idea),
        Deliverable::PricingTiers => pricing_tiers_prompt(idea),
        Deliverable::LandingPage => landing_page_prompt(idea),
        Deliverable::PitchDeck => pitch_deck_prompt(idea),
    }
}

fn market_analysis_prompt(idea: &str) -> String {
    format!(
        "You are assisting a founder in understanding their market. \
         Given the business idea below, perform a concise market analysis. \
         Your analysis should cover:\n\
         - Demand: describe who the customers are and their pain points.\n\
         - Market size: estimate the addressable market size and growth.\n\
         - Economic indicators: mention relevant economic factors (e.g. disposable income, technology adoption).\n\
         - Location and saturation: note any geographic considerations and whether the market is crowded.\n\
         - Pricing considerations: discuss typical pricing strategies in this space.\n\
         - Competitor analysis: identify a few key competitors, their strengths and weaknesses, opportunities, and barriers to entry.\n\n\
         Business idea: {idea}\n\n\
         Respond in a professional tone with headings for each section."
    )
}

fn pricing_tiers_prompt(idea: &str) -> String {
    format!(
        "You are a pricing strategist. Propose a tiered pricing structure for \
         the following business idea. Provide at least three tiers (e.g. Basic, \
         Pro, Premium), with a clear name, monthly price in USD, and the key \
         features or usage limits each tier includes. Consider cost analysis, \
         market research for price sensitivities, segmentation, and value \
         proposition for each customer group. Highlight how each tier adds \
         additional value compared with the lower tier.\n\n\
         Business idea: {idea}\n\n\
         Present your answer in a bullet list where each tier starts with the tier name and price, \
         followed by a colon and its features."
    )
}

fn landing_page_prompt(idea: &str) -> String {
    format!(
        "You are a marketing copywriter. Write concise and persuasive landing page \
         copy for the business idea below. Include:\n\
         - A bold headline summarising the core value proposition.\n\
         - A short paragraph describing the product or service and its benefits.\n\
         - A clear call to action encouraging visitors to sign up or learn more.\n\n\
         Business idea: {idea}\n\n\
         Use an enthusiastic yet professional tone."
    )
}

fn pitch_deck_prompt(idea: &str) -> String {
    format!(
        "You are an expert pitch deck designer. Create an outline for a 10-slide \
         pitch deck for the startup idea below. Follow this structure: (1) \
         Business Overview, (2) Problem, (3) Solution & Value Proposition, \
         (4) Market Size & Analysis, (5) Product & Business Model, (6) Go-to-Market \
         Strategy, (7) Competitive Analysis, (8) Team, (9) Financials & Traction, \
         (10) Ask & Use of Funds. For each slide, provide a title and 3-5 bullet \
         points summarising the key messages you would include on that slide.\n\n\
         Business idea: {idea}\n\n\
         Respond with exactly one line per slide in the form \
         \"<number>. <title>: <bullet>; <bullet>; <bullet>\"."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_prompt_embeds_idea() {
        let idea = "AI-powered personal finance coach";
        for deliverable in Deliverable::ALL {
            let prompt = build_prompt(deliverable, idea);
            assert!(
                prompt.contains(&format!("Business idea: {idea}")),
                "{deliverable} prompt is missing the idea"
            );
        }
    }

    #[test]
    fn test_pitch_deck_prompt_requests_line_shape() {
        let prompt = build_prompt(Deliverable::PitchDeck, "x");
        assert!(prompt.contains("(10) Ask & Use of Funds"));
        assert!(prompt.contains("<number>. <title>: <bullet>"));
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<_> = Deliverable::ALL.iter().map(|d| d.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
        assert_eq!(Deliverable::PitchDeck.file_name(), "pitch_deck.pptx");
    }

    #[test]
    fn test_normalize_idea() {
        assert_eq!(
            normalize_idea("  dog   walking\n app ").unwrap(),
            "dog walking app"
        );
        // decomposed "é" becomes the precomposed form
        assert_eq!(normalize_idea("cafe\u{301} finder").unwrap(), "caf\u{e9} finder");
    }

    #[test]
    fn test_normalize_idea_rejects_blank() {
        assert!(matches!(normalize_idea(" \t\n"), Err(Error::EmptyIdea)));
    }
}
