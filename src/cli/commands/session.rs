use clap::Subcommand;

use super::http_client;
use crate::cli::config::load_cli_config;
use crate::cli::utils::{output_fields, output_success, read_envelope};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum SessionCommands {
    #[command(about = "Show the resolved role, tier and landing route for the stored token")]
    Show,

    #[command(about = "Sign out: drop the server's cached role for the stored token")]
    SignOut,
}

pub async fn handle(cmd: SessionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let cli_config = load_cli_config()?;
    let client = http_client()?;
    let url = cli_config.endpoint("/api/session")?;

    let request = match cmd {
        SessionCommands::Show => client.get(url),
        SessionCommands::SignOut => client.delete(url),
    };
    let request = match &cli_config.token {
        Some(token) => request.bearer_auth(token),
        None => request,
    };

    let data = read_envelope(request.send().await?).await?;
    match cmd {
        SessionCommands::Show => output_fields(&output_format, &data),
        SessionCommands::SignOut => output_success(&output_format, "Signed out", None),
    }
}
