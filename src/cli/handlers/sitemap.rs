// src/cli/handlers/sitemap.rs

use crate::cli::handlers::commons::{self, OutputArgs, RequestArgs, SourceArgs};
use crate::core::container::Visibility;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the sitemap view of a menu."
)]
struct SitemapArgs {
    /// The name of the menu.
    menu: String,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// `menutree sitemap`: prints the sitemap view of one menu.
pub fn handle(args: Vec<String>) -> Result<()> {
    let sitemap_args = SitemapArgs::try_parse_from(&args)?;
    commons::show_view(
        Visibility::Sitemap,
        &sitemap_args.menu,
        &sitemap_args.source,
        &sitemap_args.request,
        &sitemap_args.output,
    )
}
