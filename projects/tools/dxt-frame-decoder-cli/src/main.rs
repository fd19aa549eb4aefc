#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs, Debug)]
/// Decoding tool for raw DXT1/DXT5 video frame dumps
struct TopLevel {
    /// log at debug level (overrides RUST_LOG)
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Convert(commands::convert::ConvertCmd),
    Info(commands::info::InfoCmd),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert(cmd) => {
            commands::convert::handle_convert_command(cmd)?;
        }
        Commands::Info(cmd) => {
            commands::info::handle_info_command(cmd)?;
        }
    }

    Ok(())
}
