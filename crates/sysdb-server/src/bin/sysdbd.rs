//! `sysdbd` process entry point (SPEC_FULL.md "CLI"): parse flags, load
//! config, initialize logging, and run the server — errors collapse to
//! `anyhow::Result` at this outermost layer, as in the teacher's binaries.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sysdb_server::cli::{Cli, Commands};
use sysdb_server::{listener, logger, Config};
use sysdb_store::Store;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config file {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(tcp) = cli.tcp {
        config.tcp_listen = Some(tcp);
    }
    if cli.unix.is_some() {
        config.unix_socket = cli.unix.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = Some(level.clone());
    }

    logger::init(config.log_level.as_deref()).context("initializing logger")?;

    match cli.command_or_default() {
        Commands::Version => {
            println!("{}", config.version_string());
            Ok(())
        }
        Commands::Serve => serve(config),
    }
}

fn serve(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(Store::new());
    let version = config.version_string();

    let mut handles = Vec::new();
    if let Some(addr) = config.tcp_listen {
        handles.push(
            listener::spawn_tcp(addr, Arc::clone(&store), version.clone())
                .with_context(|| format!("binding TCP listener on {addr}"))?,
        );
    }
    if let Some(path) = config.unix_socket.clone() {
        handles.push(
            listener::spawn_unix(path.clone(), Arc::clone(&store), version.clone())
                .with_context(|| format!("binding UNIX socket listener on {}", path.display()))?,
        );
    }

    if handles.is_empty() {
        anyhow::bail!("no listener configured: set tcp_listen or unix_socket");
    }

    for handle in handles {
        let _ = handle.join();
    }
    Ok(())
}
