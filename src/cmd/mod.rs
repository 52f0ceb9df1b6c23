//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`serve`], [`rewrite`], [`validate`], or [`init`].
//! Each handler lives in its own submodule.

pub mod init;
pub mod rewrite;
pub mod serve;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::PortlyError;

pub async fn dispatch(cli: Cli) -> Result<(), PortlyError> {
    match cli.command {
        Some(Commands::Serve(args)) => serve::execute(*args).await,
        Some(Commands::Rewrite(ref args)) => rewrite::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Init(ref args)) => init::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  portly v{version} \u{2014} URL rewriting for apps behind a reverse proxy\n\n  \
         No command provided. To get started:\n\n    \
         portly init                       Generate a starter config\n    \
         portly serve                      Start the rewrite service\n    \
         portly rewrite <URL> --forwarded-host <HOST>\n    \
         portly --help                     See all commands and options\n"
    );
}
