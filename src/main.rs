//! # vkc
//!
//! Command-line tool for retyping OpenStack block-storage volumes.
//!
//! ```bash
//! vkc volume retype <volume-id> [ --type <new_type> ] [ --zone <new_zone> ]
//! ```
//!
//! Credentials and endpoint selection come from the standard `OS_*`
//! environment variables (`OS_AUTH_URL`, `OS_USERNAME`, `OS_PASSWORD`,
//! project/domain scope, `OS_REGION_NAME`, `OS_INTERFACE`).

use std::env;
use std::process::ExitCode;

use vkc_cli::auth::{Session, SessionConfig};
use vkc_cli::commands;
use vkc_cli::error::CliError;
use vkc_cli::volumes::Outcome;

#[tokio::main]
async fn main() -> ExitCode {
    let argv: Vec<String> = env::args().skip(1).collect();
    match run(&argv).await {
        Ok(Outcome::Accepted) => {
            println!("Accepted");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Rejected {
            status,
            reason,
            detail,
        }) => {
            println!("Error: {status} / {reason}");
            println!("{detail}");
            ExitCode::FAILURE
        }
        Err(err) => {
            println!("Error: {err}");
            commands::usage();
            ExitCode::FAILURE
        }
    }
}

async fn run(argv: &[String]) -> Result<Outcome, CliError> {
    let config = SessionConfig::from_env()?;
    let session = Session::establish(&config).await?;
    commands::dispatch(&session, argv).await
}
