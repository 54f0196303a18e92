mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// In-memory user directory served over HTTP
#[derive(Parser, Debug)]
#[command(name = "userdir", version, about)]
struct Cli {
    /// Log filter directive (e.g. info, user_rpc=debug)
    #[arg(long, global = true, env = "USERDIR_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the user directory over HTTP
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli.log_level)
        .wrap_err_with(|| format!("Invalid log filter '{}'", cli.log_level))?;

    match cli.command {
        Command::Serve(args) => commands::serve::execute(args).await,
    }
}

fn log_filter(directive: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::try_new(directive)?)
}

fn init_tracing(directive: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directive)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| eyre!("{}", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert!(log_filter("info").is_ok());
        assert!(log_filter("warn,user_rpc=debug").is_ok());
        assert!(log_filter("user_rpc=loud").is_err());
    }

    #[test]
    fn test_invalid_log_filter_is_an_error() {
        let err = init_tracing("user_rpc=loud")
            .wrap_err_with(|| "Invalid log filter 'user_rpc=loud'")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid log filter 'user_rpc=loud'");
    }
}
