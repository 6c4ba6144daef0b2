//! Socket listeners (spec.md §5 "Scheduling model": worker-per-connection).
//! Out of the specified core per spec.md §1 ("TCP/UNIX socket listener
//! boilerplate" is an external collaborator), but still needed for a
//! runnable binary — std `TcpListener`/`UnixListener` plus a thread per
//! accepted connection, matching the blocking, thread-per-client model §5
//! describes rather than introducing an async runtime the rest of the
//! workspace has no other use for.

use std::net::{SocketAddr, TcpListener};
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use log::{error, info};
use sysdb_store::Store;

use crate::connection::Connection;

/// Spawns an accept loop on its own thread; returns the thread handle so
/// `main` can join both listeners (TCP and UNIX may run side by side).
pub fn spawn_tcp(addr: SocketAddr, store: Arc<Store>, server_version: String) -> std::io::Result<thread::JoinHandle<()>> {
    let listener = TcpListener::bind(addr)?;
    info!("frontend: listening on tcp://{addr}");
    Ok(thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let store = Arc::clone(&store);
                    let version = server_version.clone();
                    thread::spawn(move || {
                        let mut conn = Connection::new(version);
                        if let Err(err) = conn.serve(stream, &store) {
                            error!("frontend: connection error: {err}");
                        }
                    });
                }
                Err(err) => error!("frontend: accept error: {err}"),
            }
        }
    }))
}

pub fn spawn_unix(path: PathBuf, store: Arc<Store>, server_version: String) -> std::io::Result<thread::JoinHandle<()>> {
    let _ = std::fs::remove_file(&path);
    let listener = UnixListener::bind(&path)?;
    info!("frontend: listening on unix://{}", path.display());
    Ok(thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let store = Arc::clone(&store);
                    let version = server_version.clone();
                    thread::spawn(move || {
                        let mut conn = Connection::new(version);
                        if let Err(err) = conn.serve(stream, &store) {
                            error!("frontend: connection error: {err}");
                        }
                    });
                }
                Err(err) => error!("frontend: accept error: {err}"),
            }
        }
    }))
}
