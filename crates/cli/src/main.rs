//! opgen: lower REST operation descriptions into wire-level call
//! descriptors and caller-visible method variants.

mod check;
mod common;
mod lower;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "opgen",
    version,
    about = "Lower REST operations into call descriptors and client method variants"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print lowered descriptors and variants as JSON
    Lower(lower::LowerArgs),
    /// Lower every group and print a per-operation summary
    Check(check::CheckArgs),
}

fn main() {
    common::init_tracing();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Lower(args) => lower::run(&args),
        Command::Check(args) => check::run(&args),
    };
    std::process::exit(code);
}
