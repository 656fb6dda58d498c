//! Minimal HTTP/1.1 server that serves a blacklist feed for integration tests.
//!
//! Answers every request with the current status and body, and counts
//! requests so tests can tell whether the gate re-fetched or used its cache.
//! The status can be switched while the server runs to simulate a feed
//! that goes down after serving successfully.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Handle to a running feed server.
pub struct FeedServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    status: Arc<Mutex<&'static str>>,
}

impl FeedServer {
    /// Answer subsequent requests with `status`, e.g. "503 Service Unavailable".
    pub fn set_status(&self, status: &'static str) {
        *self.status.lock().unwrap() = status;
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `body` with a 200 status. The server runs until the process exits.
pub fn start(body: &str) -> FeedServer {
    start_with_status(body, "200 OK")
}

/// Serve `body` with an arbitrary status line, e.g. "503 Service Unavailable".
pub fn start_with_status(body: &str, status: &'static str) -> FeedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body.to_string());
    let hits = Arc::new(AtomicUsize::new(0));
    let status = Arc::new(Mutex::new(status));

    let server_hits = Arc::clone(&hits);
    let server_status = Arc::clone(&status);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            server_hits.fetch_add(1, Ordering::SeqCst);
            let body = Arc::clone(&body);
            let status = *server_status.lock().unwrap();
            thread::spawn(move || handle(stream, &body, status));
        }
    });

    FeedServer {
        url: format!("http://127.0.0.1:{}/blacklist.txt", port),
        hits,
        status,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &str, status: &str) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
