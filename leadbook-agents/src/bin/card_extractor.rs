use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use config::{Config, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use leadbook_agents::card_extractor::CardExtractorAgent;
use leadbook_agents::llm::OpenAiChatClient;
use leadbook_agents::retry::RetryPolicy;

#[derive(Parser, Debug)]
#[command(name = "card-extractor", about = "Run the business-card extractor agent on OCR text")]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["text", "text_path"]),
))]
struct Cli {
    /// Raw OCR text from a business card
    #[arg(long, group = "input")]
    text: Option<String>,

    /// Path to a file containing the OCR text
    #[arg(long, value_name = "PATH", group = "input")]
    text_path: Option<PathBuf>,

    /// Override the OpenAI model ID
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiConfig {
    api_keys: Option<ApiKeysConfig>,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiKeysConfig {
    openai_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (config, config_path) = load_api_config().context("Failed to load leadbook API config")?;
    let api_key = config
        .api_keys
        .as_ref()
        .and_then(|keys| keys.openai_api_key.as_ref())
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing openai_api_key in config at {:?}", config_path))?;

    let raw_text = match (&cli.text, &cli.text_path) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?,
        (None, None) => unreachable!("clap enforces the input group"),
    };

    let client = Arc::new(OpenAiChatClient::new(&api_key)?);
    let agent = CardExtractorAgent::new(client, cli.model, RetryPolicy::default());

    let result = agent.parse(&raw_text).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn load_api_config() -> Result<(ApiConfig, PathBuf)> {
    let config_path = if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("leadbook").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    };

    let builder = Config::builder()
        .add_source(File::from(config_path.clone()).required(false))
        .build()?;

    let config: ApiConfig = builder.try_deserialize()?;

    Ok((config, config_path))
}
