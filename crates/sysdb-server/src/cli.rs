//! Command-line interface (ambient stack, SPEC_FULL.md "CLI"): a `clap`
//! derive struct mirroring the teacher's `Cli`/`Commands` split
//! (`cli-lib/src/commands.rs`) — one subcommand to run the server, one to
//! print the version and exit.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sysdbd")]
#[command(about = "sysdbd is a system-information database server", long_about = None, version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// TCP address to listen on, overriding the config file.
    #[arg(long, global = true)]
    pub tcp: Option<SocketAddr>,

    /// UNIX socket path to listen on, overriding the config file.
    #[arg(long, global = true)]
    pub unix: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace), overriding `SYSDB_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "serve", about = "Run the server")]
    Serve,
    #[command(name = "version", about = "Print the server version and exit")]
    Version,
}

impl Cli {
    /// `serve` is the implicit default when no subcommand is given.
    pub fn command_or_default(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli {
            command: None,
            config: None,
            tcp: None,
            unix: None,
            log_level: None,
        };
        assert!(matches!(cli.command_or_default(), Commands::Serve));
    }
}
