use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a bearer token signed with the local JWT secret")]
    Issue {
        #[arg(long, help = "User id (profile id) the token authenticates")]
        user: Uuid,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to the configured expiry)")]
        hours: Option<u64>,
        #[arg(long, help = "Store the token for later session commands")]
        save: bool,
    },

    #[command(about = "Forget the stored token")]
    Clear,
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user, email, hours, save } => {
            let _ = dotenvy::dotenv();
            let claims = match hours {
                Some(hours) => Claims::with_expiry(user, email, hours),
                None => Claims::new(user, email),
            };
            let token = generate_jwt(&claims)?;

            if save {
                let mut cli_config = load_cli_config()?;
                cli_config.token = Some(token.clone());
                save_cli_config(&cli_config)?;
            }

            match output_format {
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({ "token": token, "user_id": user, "expires_at": claims.exp, "saved": save })),
                )?,
            }
            Ok(())
        }
        TokenCommands::Clear => {
            let mut cli_config = load_cli_config()?;
            cli_config.token = None;
            save_cli_config(&cli_config)?;
            output_success(&output_format, "Stored token cleared", None)
        }
    }
}
