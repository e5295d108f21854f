// src/cli/handlers/list.rs

use crate::cli::handlers::commons::{self, SourceArgs};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the menus declared in the configuration."
)]
struct ListArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct MenuSummary<'a> {
    name: &'a str,
    top_level: usize,
    total: usize,
    menu_template: &'a str,
    breadcrumbs_template: &'a str,
    sitemap_template: &'a str,
}

/// `menutree list`: lists the configured menus.
pub fn handle(args: Vec<String>) -> Result<()> {
    // 1. Parse this handler's specific arguments.
    let list_args = ListArgs::try_parse_from(&args)?;

    // 2. Build every menu; a broken configuration fails here.
    let site = commons::load_site(&list_args.source)?;

    // 3. Summarize.
    let summaries: Vec<MenuSummary<'_>> = site
        .registry
        .menus()
        .map(|menu| MenuSummary {
            name: menu.name(),
            top_level: menu.len(),
            total: commons::count_items(menu),
            menu_template: menu.menu_template(),
            breadcrumbs_template: menu.breadcrumbs_template(),
            sitemap_template: menu.sitemap_template(),
        })
        .collect();

    if list_args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "\n{}",
        format!(t!("list.header"), path = site.loaded.path.display()).bold()
    );
    if summaries.is_empty() {
        println!("  {}", t!("list.empty").dimmed());
        return Ok(());
    }

    for summary in &summaries {
        println!(
            "  {} {}",
            summary.name.cyan().bold(),
            format!(t!("list.counts"), top = summary.top_level, total = summary.total).dimmed()
        );
        println!("    {:<13} {}", t!("list.label.menu").blue(), summary.menu_template);
        println!("    {:<13} {}", t!("list.label.breadcrumbs").blue(), summary.breadcrumbs_template);
        println!("    {:<13} {}", t!("list.label.sitemap").blue(), summary.sitemap_template);
    }
    Ok(())
}
