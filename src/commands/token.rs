//! Token command - Issues verification tokens without email delivery.

use crate::cli::args::{TokenArgs, TokenKind};
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::{JwtTokens, TokenService};

/// Execute the token command
pub async fn execute(args: TokenArgs, config: Config) -> AppResult<()> {
    let tokens = JwtTokens::from_config(&config);

    match args.kind {
        TokenKind::Verification { user_id } => {
            let token = tokens.issue_verification_token(user_id)?;
            tracing::debug!(user_id, "Verification token issued");
            println!("{}", token);
        }
    }

    Ok(())
}
