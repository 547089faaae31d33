//! CLI that turns a business idea into a market analysis, pricing tiers,
//! landing page copy, and a pitch deck.

use anyhow::{Context, Result};
use clap::Parser;
use cofounder_core::{
    normalize_idea, ClientConfig, CompletionClient, Deliverable, Generator, OpenAiClient,
};
use cofounder_pptx::{DeckAssembler, DeckReader};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Generate market analysis, pricing tiers, landing page copy and a pitch deck for a startup idea.
#[derive(Parser, Debug)]
#[command(name = "cofounder")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A short description of your business idea
    idea: String,

    /// Directory where output files will be written
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Explicit OpenAI API key (default: OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Model name (default: OPENAI_MODEL or gpt-4)
    #[arg(short, long)]
    model: Option<String>,

    /// API base URL (default: OPENAI_BASE_URL or https://api.openai.com/v1)
    #[arg(long)]
    base_url: Option<String>,

    /// Sampling temperature
    #[arg(short, long, default_value = "0.7")]
    temperature: f32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    // Everything that can fail without the network fails here.
    let idea = normalize_idea(&args.idea)?;
    let config = build_config(&args, ClientConfig::from_env(args.api_key.clone())?)?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;
    let output_dir = std::fs::canonicalize(&args.output_dir)
        .with_context(|| format!("Failed to resolve {}", args.output_dir.display()))?;

    let client = OpenAiClient::new(config.clone())?;
    let generator = Generator::new(client, &config);

    let written = run(&generator, &idea, &output_dir)?;

    println!();
    for (deliverable, path) in written {
        println!("✔ {} written to {}", deliverable, path.display());
    }

    Ok(())
}

/// Apply command line overrides on top of the environment config.
fn build_config(args: &Args, mut config: ClientConfig) -> Result<ClientConfig> {
    if let Some(ref model) = args.model {
        config = config.with_model(model);
    }
    if let Some(ref base_url) = args.base_url {
        config = config.with_base_url(base_url)?;
    }
    Ok(config.with_temperature(args.temperature)?)
}

/// Generate every deliverable, writing each one as soon as it is ready.
///
/// Returns the written paths in generation order. Files written before a
/// failure are left in place.
fn run<C: CompletionClient>(
    generator: &Generator<C>,
    idea: &str,
    output_dir: &Path,
) -> Result<Vec<(Deliverable, PathBuf)>> {
    let mut written = Vec::with_capacity(Deliverable::ALL.len());

    for deliverable in Deliverable::ALL {
        eprintln!("Generating {}...", deliverable.label().to_lowercase());
        let path = output_dir.join(deliverable.file_name());

        match deliverable {
            Deliverable::PitchDeck => {
                let outline = generator
                    .pitch_deck_outline(idea)
                    .with_context(|| format!("Failed to generate {}", deliverable.label()))?;

                if outline.is_fallback() {
                    log::warn!("Pitch deck outline had no recognizable slides; writing it as a single slide");
                } else if !outline.unmatched().is_empty() {
                    log::warn!(
                        "{} outline lines were not used as slides",
                        outline.unmatched().len()
                    );
                }

                DeckAssembler::new()
                    .write_file(outline.slides(), &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                verify_deck(&path, outline.len())?;
            }
            _ => {
                let text = generator
                    .generate(deliverable, idea)
                    .with_context(|| format!("Failed to generate {}", deliverable.label()))?;
                write_output(&path, &text)?;
            }
        }

        log::debug!("Written to: {}", path.display());
        written.push((deliverable, path));
    }

    Ok(written)
}

/// Read the written deck back and check that every slide made it.
fn verify_deck(path: &Path, expected: usize) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let slides = DeckReader::new()
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    if slides.len() != expected {
        anyhow::bail!(
            "{} has {} slides, expected {}",
            path.display(),
            slides.len(),
            expected
        );
    }
    Ok(())
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
