pub mod call;
pub mod tools;

use crate::cli::{Cli, OutputFormat};
use owo_colors::OwoColorize;
use serde_json::json;
use slackq_core::connectors::slack::api::GatewayError;
use slackq_core::config::parse_api_base;
use slackq_core::error::ConfigError;
use slackq_core::{SlackConfig, SlackConnector};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("No Slack token: pass --token or set SLACK_TOKEN")]
    MissingToken,

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Core library error: {0}")]
    Core(#[from] slackq_core::ConnectorError),

    #[error("Could not build Slack client: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub fn connector(cli: &Cli) -> Result<SlackConnector> {
    connector_from(cli.token.as_deref(), cli.api_base.as_deref(), cli.timeout)
}

fn connector_from(token: Option<&str>, api_base: Option<&str>, timeout: u64) -> Result<SlackConnector> {
    let token = token
        .filter(|t| !t.trim().is_empty())
        .ok_or(CommandError::MissingToken)?;

    let mut config = SlackConfig::new(token).with_timeout(Duration::from_secs(timeout.max(1)));
    if let Some(base) = api_base {
        config = config.with_api_base(parse_api_base(base)?);
    }
    Ok(SlackConnector::from_config(&config)?)
}

/// Prints a tool's text result in the selected format.
pub fn print_result(cli: &Cli, tool: &str, text: &str) -> Result<()> {
    match cli.output {
        OutputFormat::Json => {
            let out = json!({ "tool": tool, "result": text });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Pretty if cli.no_color => println!("{}", text),
        OutputFormat::Pretty => {
            for line in text.lines() {
                if line == "---" {
                    println!("{}", line.dimmed());
                } else if let Some((head, body)) = line.split_once("] ") {
                    println!("{}{} {}", head.dimmed(), "]".dimmed(), body);
                } else {
                    println!("{}", line);
                }
            }
        }
    }
    Ok(())
}
