//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ask;
pub mod auth;
pub mod settings;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::GeminiClient;
use crate::core::app::App;
use crate::core::config::{Config, ConfigOrchestrator};
use crate::core::credentials::resolve_from_environment;
use crate::core::keyring::KeyringStore;
use crate::core::session::SessionId;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "physbot")]
#[command(version)]
#[command(about = "A terminal physics expert powered by Google Gemini")]
#[command(
    long_about = "Physbot answers physics questions (formulas and concepts) in short, factual \
replies and declines anything outside physics. The whole conversation is replayed to the model \
on every question, so follow-ups keep their context.\n\n\
Authentication:\n\
  GEMINI_API_KEY    Your Gemini API key\n\
  physbot auth      Store the key in the system keyring instead\n\n\
Commands inside the chat:\n\
  /help             List commands\n\
  /clear            Start over from the greeting\n\
  /log [file]       Enable, pause, or resume conversation logging\n\
  /dump [file]      Write the conversation to a file\n\
  /quit             Leave (Ctrl+D works too)\n\n\
Diagnostics go to stderr; set PHYSBOT_LOG=debug to see them."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use instead of the configured one
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Set configuration values, or print them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    crate::logging::init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            match auth::run_auth(&KeyringStore::default()) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    eprintln!("❌ Authentication failed: {e}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Deauth => {
            match auth::run_deauth(&KeyringStore::default()) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    eprintln!("❌ Deauthentication failed: {e}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let orchestrator = ConfigOrchestrator::for_default_path()?;
            match settings::run_set(&orchestrator, key, value) {
                Ok(message) if message.is_empty() => {}
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let orchestrator = ConfigOrchestrator::for_default_path()?;
            match settings::run_unset(&orchestrator, &key) {
                Ok(message) => println!("{message}"),
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Ask { question } => {
            let app = build_app(args.model, args.log)?;
            let code = ask::run_ask(app, question).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Chat => run_chat(build_app(args.model, args.log)?).await,
    }
}

/// Resolves the key before anything else; a missing key ends the process.
fn build_app(model: Option<String>, log: Option<PathBuf>) -> Result<App, Box<dyn Error>> {
    let credential = match resolve_from_environment(&KeyringStore::default()) {
        Ok(credential) => credential,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };
    info!(source = %credential.source(), "resolved API key");

    let config = ConfigOrchestrator::for_default_path()?.load_with_cache()?;
    let model = model_client(&config, model, credential.api_key())?;
    let logging = LoggingState::new(log)?;

    Ok(App::new(
        Box::new(model),
        config.engine_settings(),
        SessionId::generate()?,
        logging,
    ))
}

fn model_client(
    config: &Config,
    model_override: Option<String>,
    api_key: &str,
) -> Result<GeminiClient, Box<dyn Error>> {
    let mut settings = config.generation_settings();
    if let Some(model) = model_override.filter(|model| !model.trim().is_empty()) {
        settings.model = model.trim().to_string();
    }
    let client = reqwest::Client::builder().build()?;
    info!(model = %settings.model, base_url = %config.base_url(), "configured Gemini client");
    Ok(GeminiClient::new(client, config.base_url(), api_key, settings))
}
