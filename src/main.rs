use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use headlines::api::ApiClient;
use headlines::app::App;
use headlines::config::{generate_default_config, Config};
use headlines::logging;
use headlines::state::{SubmitResult, MAX_INPUT_CHARS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "headlines", version, about = "A terminal ticker for Multiplayer Headlines")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the latest headline and exit
    Fetch,
    /// Submit a headline and print the backend's answer
    Submit { headline: String },
    /// Print a commented default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::InitConfig) = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    config.validate()?;

    match cli.command {
        None => {
            logging::init_file(&config.logging.level, &config.logging.file_path())?;
            App::new(config).run().await
        }
        Some(command) => {
            logging::init_stderr(&config.logging.level)?;
            let client = ApiClient::with_timeout(
                config.api.base_url.clone(),
                config.api.request_timeout(),
            );
            run_command(command, &client).await
        }
    }
}

async fn run_command(command: Command, client: &ApiClient) -> Result<()> {
    match command {
        Command::Fetch => {
            let headline = client.fetch_headline().await?;
            println!("{}", headline);
        }
        Command::Submit { headline } => {
            let headline = headline.trim();
            if headline.is_empty() {
                bail!("Headline must not be empty");
            }
            if headline.chars().count() > MAX_INPUT_CHARS {
                bail!("Headline must be at most {} characters", MAX_INPUT_CHARS);
            }

            let response = client.submit_headline(headline).await;
            let result = SubmitResult::from_response(&response);
            if result.is_error {
                bail!("{}", result.message);
            }
            println!("{}", result.message);
        }
        Command::InitConfig => print!("{}", generate_default_config()),
    }
    Ok(())
}
