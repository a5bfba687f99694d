use std::sync::Arc;
use tracing::{error, info};

use slackq_core::{
    logging::init_tracing,
    mcp_server::{JsonRpcHandler, McpServer},
    transport::{HttpTransport, StdioTransport},
    SlackConfig, SlackConnector, Transport,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("slackq_core=info,slackq_mcp=info");

    let config = match SlackConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    info!(?config, "Starting slackq MCP server");

    let connector = SlackConnector::from_config(&config)?;
    let handler = JsonRpcHandler::new(McpServer::new(Arc::new(connector)));

    let result = match config.transport {
        Transport::Stdio => {
            info!("MCP Server ready, listening on stdio");
            StdioTransport::new(handler).run().await
        }
        Transport::Http => {
            let transport = HttpTransport::new(handler, config.bind_addr());
            tokio::select! {
                res = transport.run() => res,
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = result {
        error!("Transport error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
