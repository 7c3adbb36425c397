//! Gemini chat - terminal front-end
//!
//! Line-oriented shell around the chat core. Configuration comes from the
//! environment (and `.env`); lines starting with `/` adjust the session.

use gemini_chat::llm::{GeminiService, LoggingService};
use gemini_chat::{ChatMode, LlmConfig, LlmService, Session, SessionConfig};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "Commands: /key <api key>, /persona <label>, /mission <text>, /feedback on|off, /quit";

/// A line typed by the user
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Message(&'a str),
    SetKey(&'a str),
    SetPersona(&'a str),
    SetMission(&'a str),
    SetFeedback(bool),
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(line);
    };

    let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
    let arg = arg.trim();
    match name {
        "key" => Input::SetKey(arg),
        "persona" => Input::SetPersona(arg),
        "mission" => Input::SetMission(arg),
        "feedback" => match arg {
            "on" => Input::SetFeedback(true),
            "off" => Input::SetFeedback(false),
            _ => Input::Help,
        },
        "quit" | "exit" => Input::Quit,
        _ => Input::Help,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env loaded"),
    }

    // Configuration
    let llm_config = LlmConfig::from_env();
    if !llm_config.has_env_key() {
        tracing::warn!("GOOGLE_API_KEY not set. Use /key to supply a key for this session.");
    }

    let gemini = GeminiService::new(llm_config)?;
    tracing::info!(model = gemini.model_id(), url = gemini.url(), "Gemini client ready");
    let llm = LoggingService::new(Arc::new(gemini));

    let mode = ChatMode::from_env();
    let mut session = Session::new(mode, SessionConfig::from_env());

    println!("assistant> {}", mode.greeting());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Empty => {}
            Input::Message(text) => match session.submit(text, &llm).await {
                Ok(reply) => println!("assistant> {}", reply.content()),
                Err(e) => eprintln!("error> {e}"),
            },
            Input::SetKey(key) => {
                session.config_mut().api_key = (!key.is_empty()).then(|| key.to_string());
                println!("API key updated for this session.");
            }
            Input::SetPersona(label) => {
                session.config_mut().persona_label = label.to_string();
                println!("Persona set to {label:?}.");
            }
            Input::SetMission(text) => {
                session.config_mut().mission_text = text.to_string();
                println!("Mission updated.");
            }
            Input::SetFeedback(enabled) => {
                session.config_mut().feedback_enabled = enabled;
                println!("Feedback {}.", if enabled { "on" } else { "off" });
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }

    Ok(())
}
