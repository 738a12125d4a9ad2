//! Channelflow CLI - daily and weekly channel analytics ingestion

use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::common::ExitCode;
#[cfg(feature = "serve")]
use commands::serve;
use commands::{daily, weekly};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(&cli.global);

    let result = match &cli.command {
        cli::Commands::Daily(args) => daily::execute(args, &cli.global).await,
        cli::Commands::Weekly(args) => weekly::execute(args, &cli.global).await,
        #[cfg(feature = "serve")]
        cli::Commands::Serve(args) => serve::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => *code,
            None => {
                eprintln!("Error: {:#}", err);
                1
            }
        };
        std::process::exit(code);
    }
}
