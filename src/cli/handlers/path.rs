// src/cli/handlers/path.rs

use crate::cli::handlers::commons::{self, OutputArgs, RequestArgs, SourceArgs};
use crate::core::container::Visibility;
use anyhow::{Result, bail};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the breadcrumb trail of a menu for a route."
)]
struct PathArgs {
    /// The name of the menu.
    menu: String,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// `menutree path`: prints the breadcrumb trail for a route.
pub fn handle(args: Vec<String>) -> Result<()> {
    let path_args = PathArgs::try_parse_from(&args)?;
    if path_args.request.route.is_none() {
        bail!(t!("path.error.route_required"));
    }

    commons::show_view(
        Visibility::Breadcrumbs,
        &path_args.menu,
        &path_args.source,
        &path_args.request,
        &path_args.output,
    )
}
