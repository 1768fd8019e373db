use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use giftscout_config::{AppConfig, DEFAULT_CONFIG_PATH, redact};
use giftscout_pipeline::{GiftPipeline, GiftProfile, PipelineError};

#[derive(Debug, Parser)]
#[command(
    name = "giftscout",
    version,
    about = "Web-researched gift recommendations from a recipient profile"
)]
struct Cli {
    /// Config file path (defaults to ./giftscout.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the research → curation pipeline for a recipient profile.
    Recommend {
        /// Recipient profile TOML (see `giftscout init-profile`).
        #[arg(long, value_name = "PATH")]
        profile: PathBuf,
        /// Write the report to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Write a sample recipient profile to fill in.
    InitProfile {
        #[arg(value_name = "PATH", default_value = "profile.toml")]
        path: PathBuf,
    },
    /// Show which credentials and settings are configured.
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        Commands::Recommend { profile, output } => {
            recommend(&config, &profile, output.as_deref()).await
        }
        Commands::InitProfile { path } => init_profile(&path),
        Commands::Doctor => {
            doctor(&config, &config_path);
            Ok(())
        }
    }
}

async fn recommend(config: &AppConfig, profile_path: &Path, output: Option<&Path>) -> Result<()> {
    let raw = fs::read_to_string(profile_path)
        .with_context(|| format!("failed to read profile from {}", profile_path.display()))?;
    let profile: GiftProfile = toml::from_str(&raw)
        .with_context(|| format!("invalid profile in {}", profile_path.display()))?;

    let pipeline = match GiftPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(PipelineError::MissingCredential(kind)) => bail!(
            "please provide your {kind} (credentials section of the config file, \
             or the matching environment variable) — run `giftscout doctor` to check"
        ),
        Err(err) => return Err(err.into()),
    };

    let report = pipeline.run(&profile).await?;

    match output {
        Some(path) => {
            fs::write(path, report.into_inner())
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}

const SAMPLE_PROFILE: &str = r#"# GiftScout recipient profile.
# Fill in the fields below, then run: giftscout recommend --profile profile.toml

age = 30

# parent | sibling | partner | friend | child | colleague | teacher | other
relationship = "partner"

# Optional: male | female | other (omit for "prefer not to say")
gender = "female"

# birthday | anniversary | graduation | wedding | retirement | thank-you
# | housewarming | baby-shower | just-because
occasion = "anniversary"

# Any of: books, tech-gadgets, fashion, fitness, food-and-cooking,
# art-and-craft, home-decor, travel, gaming, pets, wellness, music, hobbies
interests = ["food-and-cooking"]

# Optional: sentimental | practical | trendy | humorous | creative | adventurous
personality = "sentimental"

# under-25 | 25-50 | 50-100 | 100-200 | 200-plus
budget = "50-100"

# Optional: thoughtful | fun | luxury | personalized | diy-friendly | techy | surprise-me
gift_style = "thoughtful"

# Optional free text.
notes = "Avoid perfumes, they already have a Kindle"
"#;

fn init_profile(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists, not overwriting", path.display());
    }
    fs::write(path, SAMPLE_PROFILE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Sample profile written to {}", path.display());
    Ok(())
}

fn doctor(config: &AppConfig, config_path: &Path) {
    println!("config file:       {}", config_path.display());
    println!(
        "OpenAI API key:    {}",
        redact(&config.credentials.openai_api_key)
    );
    println!(
        "SerpAPI key:       {}",
        redact(&config.credentials.serpapi_api_key)
    );
    println!("researcher model:  {}", config.models.researcher_model);
    println!("curator model:     {}", config.models.curator_model);
    println!("API base URL:      {}", config.models.base_url);
    println!("search results:    {}", config.search.max_results);
    println!("request timeout:   {}s", config.search.timeout_secs);

    if config.openai_key().is_none() || config.serpapi_key().is_none() {
        println!();
        println!(
            "Missing credentials — set OPENAI_API_KEY / SERPAPI_API_KEY or add a \
             [credentials] section to the config file."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_profile_parses() {
        let profile: GiftProfile = toml::from_str(SAMPLE_PROFILE).unwrap();
        assert_eq!(profile.age, 30);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.interests.len(), 1);
    }
}
