// src/bin/menutree.rs

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser};
use colored::*;
use menutree::{
    cli::{Cli, handlers},
    t,
};

// --- Command Definition and Registry ---

/// Defines a command, its aliases, and its handler function.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>) -> Result<()>,
}

/// The single source of truth for all commands.
/// To add a new command, add a new entry to this static array.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "check",
        aliases: &["validate"],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "path",
        aliases: &["breadcrumbs", "bc"],
        handler: handlers::path::handle,
    },
    CommandDefinition {
        name: "render",
        aliases: &["menu", "show"],
        handler: handlers::render::handle,
    },
    CommandDefinition {
        name: "sitemap",
        aliases: &[],
        handler: handlers::sitemap::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Sets up logging, parses arguments, dispatches to the handler and reports errors.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Help and usage errors of a command's own arguments are printed by clap.
        if let Some(clap_error) = e.downcast_ref::<clap::Error>() {
            clap_error.exit();
        }
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(command_name) = args.next() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let command = find_command(&command_name)
        .ok_or_else(|| anyhow!(format!(t!("error.unknown_command"), name = command_name)))?;
    (command.handler)(args.collect())
}
