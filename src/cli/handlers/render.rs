// src/cli/handlers/render.rs

use crate::cli::handlers::commons::{self, OutputArgs, RequestArgs, SourceArgs};
use crate::core::container::Visibility;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Renders a menu for a route: visible, allowed items with their links and active state."
)]
struct RenderArgs {
    /// The name of the menu to render.
    menu: String,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// `menutree render`: prints the menu view of one menu.
pub fn handle(args: Vec<String>) -> Result<()> {
    let render_args = RenderArgs::try_parse_from(&args)?;
    commons::show_view(
        Visibility::Menu,
        &render_args.menu,
        &render_args.source,
        &render_args.request,
        &render_args.output,
    )
}
