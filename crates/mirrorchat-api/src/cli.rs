//! CLI definitions for the `mirrorchat` binary.

use clap::{Parser, Subcommand};

/// Personality-mirroring chat server.
#[derive(Parser)]
#[command(name = "mirrorchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Address to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on.
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            host: None,
            port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["mirrorchat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Serve { host: None, .. }
        ));
    }

    #[test]
    fn test_serve_flags() {
        let cli =
            Cli::try_parse_from(["mirrorchat", "-vv", "--otel", "serve", "--host", "127.0.0.1", "--port", "9000"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.otel);
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            None => panic!("expected serve"),
        }
    }
}
