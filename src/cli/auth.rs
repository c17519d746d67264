//! Auth command - test and explain authentication

use crate::cli::style::{check, Stylize};
use anstream::println;
use bidline::auth::{get_auth, test_auth};
use bidline::config::ClientConfig;
use bidline::error::Result;

/// Run the auth test command
pub async fn run_auth_test(api_url: Option<&str>, token: Option<&str>) -> Result<()> {
    let config = ClientConfig::load(api_url)?;
    println!("Testing authentication against {}...", config.api_url.accent());

    let auth = get_auth(token)?;
    let account = test_auth(&auth, &config).await?;
    println!("{} Authenticated as: {}", check(), account.emphasis());
    println!("Token source: {:?}", auth.source);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "Marketplace Authentication Setup".emphasis());
    println!("================================");
    println!();
    println!("Option 1: Command-line flag");
    println!("  bidline --token <TOKEN> submit ...");
    println!();
    println!("Option 2: Environment variable");
    println!("  Set BIDLINE_TOKEN (or MARKETPLACE_TOKEN)");
    println!();
    println!("For a staging or self-hosted API:");
    println!("  Set BIDLINE_API_URL or pass --api-url");
}
