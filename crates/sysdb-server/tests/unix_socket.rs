//! Integration test for the wire protocol and connection state machine over
//! a real UNIX socket (SPEC_FULL.md "Testing"), as opposed to the in-memory
//! `DuplexBuf` harness in `connection.rs`'s unit tests.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::time::Duration;

use sysdb_store::Store;
use sysdb_wire::{Code, Frame, FrameDecoder};

fn read_frame(stream: &mut UnixStream) -> Frame {
    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(frame) = decoder.try_take_frame().unwrap() {
            return frame;
        }
        let n = stream.read(&mut buf).expect("read reply");
        assert!(n > 0, "peer closed before a full frame arrived");
        decoder.feed(&buf[..n]);
    }
}

#[test]
fn startup_then_query_round_trips_over_a_real_socket() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sysdbd.sock");
    let store = Arc::new(Store::new());
    store.store_host("web01", sysdb_core::Time(1));

    let handle = sysdb_server::listener::spawn_unix(path.clone(), store, "sysdb 0.1.0".into())
        .expect("bind unix listener");

    // give the accept loop a moment to start listening.
    for _ in 0..50 {
        if path.exists() {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let mut stream = UnixStream::connect(&path).expect("connect");

    stream
        .write_all(&Frame::new(Code::Startup.as_u32(), b"alice".to_vec()).encode())
        .unwrap();
    let startup_reply = read_frame(&mut stream);
    assert_eq!(startup_reply.code, Code::Ok.as_u32());

    stream
        .write_all(&Frame::new(Code::Query.as_u32(), b"LIST HOST".to_vec()).encode())
        .unwrap();
    let reply = read_frame(&mut stream);
    assert_eq!(reply.code, Code::Data.as_u32());
    let json = std::str::from_utf8(&reply.payload[4..]).unwrap();
    assert!(json.contains("web01"));

    drop(stream);
    drop(handle); // accept loop thread is daemon-like; dropping the handle just stops joining it.
}
