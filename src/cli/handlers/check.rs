// src/cli/handlers/check.rs

use crate::cli::handlers::commons::{self, SourceArgs};
use crate::core::config_loader;
use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Validates the configuration and reports action targets without a route."
)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Treat unrouted action targets as errors.
    #[arg(long)]
    strict: bool,
}

/// `menutree check`: validates a configuration and reports unrouted targets.
pub fn handle(args: Vec<String>) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;

    // 1. Loading validates and builds every menu.
    let site = commons::load_site(&check_args.source)?;

    // 2. Targets that would fail to resolve at query time.
    let mut unrouted = 0;
    for (name, menu_config) in &site.loaded.config.menus {
        for (item, target) in config_loader::unrouted_targets(menu_config, &site.routes) {
            unrouted += 1;
            println!(
                "{} {}",
                "!".yellow().bold(),
                format!(t!("check.unrouted"), menu = name, item = item, target = target.cyan())
            );
        }
    }

    if unrouted > 0 && check_args.strict {
        bail!(format!(t!("check.error.strict"), count = unrouted));
    }

    let total: usize = site.registry.menus().map(|menu| commons::count_items(menu)).sum();
    println!(
        "{} {}",
        "✔".green().bold(),
        format!(
            t!("check.ok"),
            path = site.loaded.path.display(),
            menus = site.registry.len(),
            items = total
        )
    );
    Ok(())
}
