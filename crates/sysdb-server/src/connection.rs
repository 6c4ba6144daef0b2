//! Per-client connection state machine (spec.md §4.6): handshake → ready,
//! buffered frame decoding via [`sysdb_wire::FrameDecoder`], and synchronous
//! dispatch of each complete frame to the matching executor.

use std::io::{self, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use sysdb_ast::{Fetch, List, Lookup, Node};
use sysdb_core::{ObjectType, Time};
use sysdb_store::Store;
use sysdb_wire::{request, response, Code, Frame, FrameDecoder, WireError};

use crate::executor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Handshake,
    Ready,
}

/// Wall-clock timestamp for `AGE` field resolution and filter evaluation.
/// Only `now()` is allowed to read the system clock; everything downstream
/// takes it as a parameter, keeping the store and executors free of
/// hidden clock reads.
fn now() -> Time {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Time(dur.as_nanos() as u64)
}

fn parse_username(bytes: &[u8]) -> Result<String, WireError> {
    let trimmed = match bytes.last() {
        Some(0) => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    std::str::from_utf8(trimmed)
        .map(str::to_string)
        .map_err(|_| WireError::InvalidUtf8)
}

pub struct Connection {
    state: State,
    username: Option<String>,
    server_version: String,
}

impl Connection {
    pub fn new(server_version: String) -> Self {
        Connection {
            state: State::Handshake,
            username: None,
            server_version,
        }
    }

    /// Drives one accepted stream until EOF or a fatal I/O error (spec.md
    /// §4.6 "Terminal" state): reads whatever bytes are available, feeds
    /// the frame decoder, and dispatches every complete frame in arrival
    /// order before reading again.
    pub fn serve<S: Read + Write>(&mut self, mut stream: S, store: &Store) -> io::Result<()> {
        let mut decoder = FrameDecoder::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            decoder.feed(&buf[..n]);
            loop {
                match decoder.try_take_frame() {
                    Ok(Some(frame)) => {
                        for reply in self.dispatch(&frame, store) {
                            stream.write_all(&reply.encode())?;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!("frontend: protocol error: {err}");
                        stream.write_all(&response::error(err.to_string()).encode())?;
                        break;
                    }
                }
            }
        }
    }

    /// Dispatches one complete frame (spec.md §4.6 dispatch table),
    /// returning the reply frame(s) to send in order. Usually one frame;
    /// a multi-statement `QUERY` also emits a trailing `LOG` (§4.7, S6).
    fn dispatch(&mut self, frame: &Frame, store: &Store) -> Vec<Frame> {
        let Some(code) = Code::from_u32(frame.code) else {
            return vec![response::error(format!("PROTOCOL_ERROR: unknown frame code {}", frame.code))];
        };

        if code == Code::Startup {
            return match parse_username(&frame.payload) {
                Ok(username) => {
                    info!("frontend: connection authenticated as '{username}'");
                    self.username = Some(username);
                    self.state = State::Ready;
                    vec![response::ok("")]
                }
                Err(err) => vec![response::error(format!("STARTUP: {err}"))],
            };
        }

        if self.state == State::Handshake {
            return vec![response::error("Authentication required")];
        }

        match code {
            Code::Ping => vec![response::ok("")],
            Code::ServerVersion => vec![response::server_version(&self.server_version)],
            Code::Query => self.dispatch_query(&frame.payload, store),
            Code::Fetch => vec![self.dispatch_fetch(&frame.payload, store)],
            Code::List => vec![self.dispatch_list(&frame.payload, store)],
            Code::Lookup => vec![self.dispatch_lookup(&frame.payload, store)],
            Code::Store => vec![self.dispatch_store(&frame.payload, store)],
            Code::Timeseries => vec![response::error("not implemented")],
            Code::Startup | Code::Idle | Code::Ok | Code::Error | Code::Log | Code::Data => {
                vec![response::error(format!("unexpected command code {}", frame.code))]
            }
        }
    }

    fn dispatch_query(&self, payload: &[u8], store: &Store) -> Vec<Frame> {
        let text = match std::str::from_utf8(payload) {
            Ok(t) => t,
            Err(_) => return vec![response::error("QUERY: invalid UTF-8 in query text")],
        };
        let mut errbuf = None;
        let nodes = match sysdb_parser::parse(text, &mut errbuf) {
            Some(nodes) => nodes,
            None => {
                let diag = errbuf.map(|d| d.to_string()).unwrap_or_default();
                warn!("frontend: failed to execute query '{text}': {diag}");
                return vec![response::error(diag)];
            }
        };

        let mut frames = vec![executor::analyze_and_execute(store, &nodes[0], now())];
        let ignored = nodes.len() - 1;
        if ignored > 0 {
            let word = if ignored == 1 { "command" } else { "commands" };
            frames.push(response::log(format!("{ignored} {word} ignored")));
        }
        frames
    }

    /// The wire `FETCH` command only ever names a bare object, never a
    /// host-scoped one (`hostname` is always `None` here) — the original
    /// (`examples/original_source/src/frontend/query.c`'s `sdb_conn_fetch`)
    /// carries a `/* TODO: support other types besides hosts */` marker
    /// above the same gap. A host-scoped `FETCH SERVICE`/`FETCH METRIC`
    /// is reachable through `QUERY` text instead, whose grammar takes a
    /// separate hostname argument.
    fn dispatch_fetch(&self, payload: &[u8], store: &Store) -> Frame {
        let req = match request::decode_typed_text(payload) {
            Ok(req) => req,
            Err(err) => return response::error(format!("FETCH: {err}")),
        };
        let node = Node::Fetch(Fetch {
            object_type: req.object_type,
            hostname: None,
            name: Some(req.text),
            filter: None,
        });
        executor::analyze_and_execute(store, &node, now())
    }

    fn dispatch_list(&self, payload: &[u8], store: &Store) -> Frame {
        let object_type = match request::decode_list(payload) {
            Ok(t) => t,
            Err(err) => return response::error(format!("LIST: {err}")),
        };
        let node = Node::List(List {
            object_type,
            filter: None,
        });
        executor::analyze_and_execute(store, &node, now())
    }

    fn dispatch_lookup(&self, payload: &[u8], store: &Store) -> Frame {
        let req = match request::decode_typed_text(payload) {
            Ok(req) => req,
            Err(err) => return response::error(format!("LOOKUP: {err}")),
        };
        let mut errbuf = None;
        let matcher = match sysdb_parser::parse_conditional(&req.text, &mut errbuf) {
            Some(m) => m,
            None => {
                let diag = errbuf.map(|d| d.to_string()).unwrap_or_default();
                return response::error(format!(
                    "Failed to parse lookup condition '{}': {diag}",
                    req.text
                ));
            }
        };
        let node = Node::Lookup(Lookup {
            object_type: req.object_type,
            matcher,
            filter: None,
        });
        executor::analyze_and_execute(store, &node, now())
    }

    fn dispatch_store(&self, payload: &[u8], store: &Store) -> Frame {
        let obj = match request::decode_store(payload) {
            Ok(obj) => obj,
            Err(err) => return response::error(format!("STORE: {err}")),
        };
        let node = Node::Store(executor::store_object_to_ast(obj));
        executor::analyze_and_execute(store, &node, now())
    }
}
