use crate::cli::{Cli, OutputFormat};
use crate::commands::Result;
use owo_colors::OwoColorize;
use slackq_core::{Connector, SlackConfig, SlackConnector};

/// Listing is local, so no token is required.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = SlackConfig::new(cli.token.clone().unwrap_or_default());
    let slack = SlackConnector::from_config(&config)?;
    let tools = slack.list_tools(None).await?.tools;

    if let OutputFormat::Json = cli.output {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    for tool in &tools {
        let description = tool.description.as_deref().unwrap_or("");
        let required = tool
            .input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        if cli.no_color {
            println!("{}  {}", tool.name, description);
            println!("    required: {}", required);
        } else {
            println!("{}  {}", tool.name.bold().cyan(), description.dimmed());
            println!("    required: {}", required.yellow());
        }
    }
    Ok(())
}
