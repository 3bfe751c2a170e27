//! shopbook
//!
//! Credit book for a small shop, driven from the command line.

use anyhow::Context;
use clap::Parser;

use shopbook_app::{AppConfig, ShopService};

mod cli;
mod commands;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut config = AppConfig::from_env().context("reading configuration")?;
    if let Some(path) = args.data {
        config.data_path = path;
    }
    if let Some(policy) = args.policy {
        config.overpay_policy = policy;
    }

    shopbook_observability::init(config.log_format);
    tracing::debug!(data = %config.data_path.display(), policy = ?config.overpay_policy, "starting");

    let service = ShopService::open(&config)
        .with_context(|| format!("opening {}", config.data_path.display()))?;

    let stdout = std::io::stdout();
    commands::run(&service, args.command, &mut stdout.lock())
}
