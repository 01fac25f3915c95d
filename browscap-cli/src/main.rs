//! entrypoint for browscap-cli

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

use clap::{Parser, Subcommand};

pub mod cmd;
use self::cmd::{query, stats};

pub mod trace;

#[derive(Debug, Parser)]
#[command(name = "browscap")]
#[command(bin_name = "browscap")]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, short = 'v', global = true)]
    /// log debug information of the catalog build to stderr
    ///
    /// (overwritten by the `RUST_LOG` env variable)
    verbose: bool,

    #[command(subcommand)]
    cmds: CliCommands,
}

#[derive(Debug, Subcommand)]
enum CliCommands {
    Query(query::CliCommandQuery),
    Stats(stats::CliCommandStats),
}

fn main() {
    let cli = Cli::parse();

    #[expect(clippy::exit)]
    if let Err(err) = trace::init_tracing(cli.verbose).and_then(|()| match cli.cmds {
        CliCommands::Query(cfg) => query::run(cfg),
        CliCommands::Stats(cfg) => stats::run(cfg),
    }) {
        eprintln!("🚩 exit with error: {err}");
        std::process::exit(1);
    }
}
