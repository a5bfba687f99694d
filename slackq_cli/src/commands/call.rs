use crate::cli::Cli;
use crate::commands::{connector, print_result, CommandError, Result};
use serde_json::{Map, Value};
use slackq_core::{result_text, CallToolRequestParam, Connector};

pub async fn run(cli: &Cli, tool: &str, args_json: Option<&str>, params: &[String]) -> Result<()> {
    let mut args = match args_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => match serde_json::from_str::<Value>(s)? {
            Value::Object(m) => m,
            _ => {
                return Err(CommandError::InvalidArgs(
                    "--args must be a JSON object".to_string(),
                ))
            }
        },
        None => Map::new(),
    };
    for (k, v) in parse_params(params)? {
        args.insert(k, v);
    }
    invoke(cli, tool, args).await
}

pub async fn invoke(cli: &Cli, tool: &str, args: Map<String, Value>) -> Result<()> {
    let slack = connector(cli)?;
    let result = slack
        .call_tool(CallToolRequestParam {
            name: tool.to_string().into(),
            arguments: Some(args),
        })
        .await?;
    print_result(cli, tool, &result_text(&result))
}

/// `key=value` pairs; values that parse as JSON numbers or booleans keep that type.
fn parse_params(params: &[String]) -> Result<Vec<(String, Value)>> {
    params
        .iter()
        .map(|p| {
            let (k, v) = p.split_once('=').ok_or_else(|| {
                CommandError::InvalidArgs(format!("expected key=value, got '{}'", p))
            })?;
            let value = match serde_json::from_str::<Value>(v) {
                Ok(n @ Value::Number(_)) | Ok(n @ Value::Bool(_)) => n,
                _ => Value::String(v.to_string()),
            };
            Ok((k.trim().to_string(), value))
        })
        .collect()
}
