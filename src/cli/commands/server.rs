use clap::Subcommand;
use serde_json::json;

use super::http_client;
use crate::cli::config::{load_cli_config, ping_server, save_cli_config, ServerStatus};
use crate::cli::utils::{output_fields, output_success, read_envelope};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server")]
    Use {
        #[arg(help = "Server base URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Health check the current server")]
    Ping,

    #[command(about = "Show server information from API root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            let parsed = url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let mut cli_config = load_cli_config()?;
            cli_config.server_url = parsed.as_str().trim_end_matches('/').to_string();
            save_cli_config(&cli_config)?;
            output_success(
                &output_format,
                &format!("Using server {}", cli_config.server_url),
                Some(json!({ "server_url": cli_config.server_url })),
            )
        }
        ServerCommands::Ping => {
            let cli_config = load_cli_config()?;
            let status = ping_server(&cli_config).await;
            let message = format!("{} is {}", cli_config.server_url, if status == ServerStatus::Up { "up" } else { "down" });
            output_success(&output_format, &message, Some(json!({ "status": status })))?;
            if status == ServerStatus::Down {
                anyhow::bail!("server unreachable");
            }
            Ok(())
        }
        ServerCommands::Info => {
            let cli_config = load_cli_config()?;
            let response = http_client()?.get(cli_config.endpoint("/")?).send().await?;
            let data = read_envelope(response).await?;
            output_fields(&output_format, &data)
        }
    }
}
