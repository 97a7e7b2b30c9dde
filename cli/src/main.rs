use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use librenoun_mint::{
    Config, MintParams, TARGET_CHAIN_ID,
    renoun::{get_contract_address, get_signer},
    submit_and_confirm_mint, submit_contribution_mint,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::utils::display_hex;

mod utils;

/// Mint a Renoun token for a pull request, configured through the
/// environment of the CI job.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read environment variables from this file instead of `./.env`.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print the derived mint call and exit without touching the network.
    #[arg(long, conflicts_with = "wait")]
    dry_run: bool,

    /// Wait for the mint to be included and fail if it reverted.
    #[arg(long)]
    wait: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // before the subscriber, so RUST_LOG may come from the env file
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    // stdout is reserved for the transaction hash
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "renoun_mint=info,librenoun_mint=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    if args.dry_run {
        return dry_run(&config, &mut std::io::stdout().lock());
    }

    let tx_hash = if args.wait {
        submit_and_confirm_mint(&config).await
    } else {
        submit_contribution_mint(&config).await
    }
    .context("Failed to mint Renoun token")?;

    println!("{}", display_hex(tx_hash.to_string()));
    Ok(())
}

fn dry_run(config: &Config, out: &mut impl Write) -> Result<()> {
    let params = MintParams::from_config(config).context("Failed to derive mint parameters")?;
    let contract = get_contract_address(config)?;
    let sender = get_signer(config)?.address();

    writeln!(out, "chain id: {TARGET_CHAIN_ID}")?;
    writeln!(out, "contract: {}", display_hex(contract.to_string()))?;
    writeln!(out, "sender: {}", display_hex(sender.to_string()))?;
    writeln!(out, "recipient: {}", display_hex(params.to.to_string()))?;
    writeln!(out, "pull request: #{} {}", params.pull_request_id, params.title)?;
    writeln!(out, "changes: +{} -{}", params.additions, params.deletions)?;
    writeln!(
        out,
        "repository: {} stars, {} contributors",
        params.repository_stars, params.repository_contributors
    )?;
    writeln!(out, "calldata: {}", params.calldata())?;
    Ok(())
}
