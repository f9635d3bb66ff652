//! Claim command - redeem a setup token.

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;

use super::Context;

/// Arguments for the claim command.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Setup token issued by the bridge (base64)
    pub setup_token: String,
}

/// Run the claim command.
pub async fn run(args: ClaimArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    if ctx.verbose {
        if let Ok(claim_url) = simplefin_client::decode_setup_token(&args.setup_token) {
            eprintln!(
                "{}",
                dim.apply_to(format!(
                    "Claiming from {}",
                    claim_url.host_str().unwrap_or("<no host>")
                ))
            );
        }
    }

    let access = client
        .auth()
        .exchange(&args.setup_token)
        .await
        .context("Failed to claim setup token")?;

    if ctx.json_output {
        let out = serde_json::json!({ "access_url": access.to_string() });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let yellow = Style::new().yellow();
        eprintln!(
            "{}",
            yellow.apply_to(
                "The access URL below grants read access to your accounts. Store it like a password."
            )
        );
        println!("{access}");
    }

    Ok(())
}
