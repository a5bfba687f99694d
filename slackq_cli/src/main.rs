use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::json;
use std::process;

mod cli;
mod commands;

use cli::{Cli, Commands};
use slackq_core::connectors::slack::{
    TOOL_MESSAGES_FROM_USER, TOOL_POST_MESSAGE, TOOL_RECENT_MESSAGES, TOOL_USER_INFO,
};

fn as_args(v: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match v {
        serde_json::Value::Object(m) => m,
        _ => serde_json::Map::new(),
    }
}

#[tokio::main]
async fn main() {
    slackq_core::config::load_dotenv();
    let cli = Cli::parse();

    let directives = match cli.verbose {
        0 => "slackq_core=error",
        1 => "slackq_core=info",
        _ => "slackq_core=debug",
    };
    slackq_core::logging::init_tracing(directives);

    let result = match &cli.command {
        Commands::Recent { channel, limit } => {
            let args = as_args(json!({ "channel_id": channel, "limit": limit }));
            commands::call::invoke(&cli, TOOL_RECENT_MESSAGES, args).await
        }
        Commands::User { name } => {
            let args = as_args(json!({ "username": name }));
            commands::call::invoke(&cli, TOOL_USER_INFO, args).await
        }
        Commands::FromUser {
            channel,
            username,
            limit,
        } => {
            let args = as_args(json!({
                "channel_id": channel,
                "username": username,
                "limit": limit,
            }));
            commands::call::invoke(&cli, TOOL_MESSAGES_FROM_USER, args).await
        }
        Commands::Post { channel, text } => {
            let args = as_args(json!({ "channel_id": channel, "text": text }));
            commands::call::invoke(&cli, TOOL_POST_MESSAGE, args).await
        }
        Commands::Tools => commands::tools::run(&cli).await,
        Commands::Call { tool, args, params } => {
            commands::call::run(&cli, tool, args.as_deref(), params).await
        }
    };

    if let Err(e) = result {
        if cli.no_color {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
        }
        process::exit(1);
    }
}
