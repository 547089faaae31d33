//! Deliverable generation on top of a [`CompletionClient`].

use crate::client::{CompletionClient, CompletionRequest};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::outline;
use crate::prompts::{build_prompt, normalize_idea, Deliverable};
use crate::types::Outline;

/// Generates deliverables for a business idea.
pub struct Generator<C> {
    client: C,
    config: ClientConfig,
}

impl<C: CompletionClient> Generator<C> {
    /// Create a generator that sends requests through `client` using the
    /// model, temperature and persona from `config`.
    pub fn new(client: C, config: &ClientConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Build the completion request for a deliverable.
    pub fn request(&self, deliverable: Deliverable, idea: &str) -> Result<CompletionRequest> {
        let idea = normalize_idea(idea)?;
        Ok(CompletionRequest::new(
            self.config.model(),
            self.config.system_prompt(),
            build_prompt(deliverable, &idea),
            self.config.temperature(),
        ))
    }

    /// Generate the raw completion text for a deliverable.
    pub fn generate(&self, deliverable: Deliverable, idea: &str) -> Result<String> {
        let request = self.request(deliverable, idea)?;
        log::info!("Requesting {}", deliverable.label().to_lowercase());
        self.client.complete(&request)
    }

    /// Generate a market analysis report.
    pub fn market_analysis(&self, idea: &str) -> Result<String> {
        self.generate(Deliverable::MarketAnalysis, idea)
    }

    /// Generate a tiered pricing proposal.
    pub fn pricing_tiers(&self, idea: &str) -> Result<String> {
        self.generate(Deliverable::PricingTiers, idea)
    }

    /// Generate landing page copy.
    pub fn landing_page(&self, idea: &str) -> Result<String> {
        self.generate(Deliverable::LandingPage, idea)
    }

    /// Generate and parse a pitch deck outline.
    pub fn pitch_deck_outline(&self, idea: &str) -> Result<Outline> {
        let raw = self.generate(Deliverable::PitchDeck, idea)?;
        Ok(outline::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::SlideRecord;
    use std::cell::RefCell;

    /// Replies with a fixed string and records every request.
    struct FakeClient {
        reply: std::result::Result<String, u16>,
        requests: RefCell<Vec<CompletionRequest>>,
    }

    impl FakeClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for FakeClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.requests.borrow_mut().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(Error::UpstreamStatus {
                    status: *status,
                    body: "nope".to_string(),
                }),
            }
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("sk-test")
            .unwrap()
            .with_model("test-model")
            .with_temperature(0.2)
            .unwrap()
    }

    #[test]
    fn test_request_uses_config() {
        let client = FakeClient::replying("report");
        let generator = Generator::new(&client, &config());

        assert_eq!(generator.market_analysis("  pet  sitting ").unwrap(), "report");

        let requests = client.requests.borrow();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "test-model");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(
            request.messages[0].content,
            "You are an expert startup consultant."
        );
        assert!(request
            .prompt()
            .unwrap()
            .contains("Business idea: pet sitting"));
    }

    #[test]
    fn test_each_deliverable_sends_its_prompt() {
        let client = FakeClient::replying("ok");
        let generator = Generator::new(&client, &config());

        generator.pricing_tiers("idea").unwrap();
        generator.landing_page("idea").unwrap();

        let requests = client.requests.borrow();
        assert!(requests[0].prompt().unwrap().starts_with("You are a pricing strategist."));
        assert!(requests[1].prompt().unwrap().starts_with("You are a marketing copywriter."));
    }

    #[test]
    fn test_pitch_deck_outline_is_parsed() {
        let client = FakeClient::replying("1. Problem: slow; costly\n2. Team: Ana; Bo");
        let generator = Generator::new(&client, &config());

        let outline = generator.pitch_deck_outline("idea").unwrap();
        assert_eq!(
            outline.slides(),
            &[
                SlideRecord::new("Problem", "slow; costly"),
                SlideRecord::new("Team", "Ana; Bo"),
            ]
        );
    }

    #[test]
    fn test_pitch_deck_outline_falls_back() {
        let client = FakeClient::replying("Sorry, here is some prose instead.");
        let generator = Generator::new(&client, &config());

        let outline = generator.pitch_deck_outline("idea").unwrap();
        assert!(outline.is_fallback());
        assert_eq!(outline.slides()[0].content, "Sorry, here is some prose instead.");
    }

    #[test]
    fn test_upstream_error_propagates() {
        let client = FakeClient::failing(503);
        let generator = Generator::new(&client, &config());

        let err = generator.landing_page("idea").unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_empty_idea_fails_before_request() {
        let client = FakeClient::replying("unused");
        let generator = Generator::new(&client, &config());

        let err = generator.market_analysis("   ").unwrap_err();
        assert!(matches!(err, Error::EmptyIdea));
        assert!(client.requests.borrow().is_empty());
    }
}
