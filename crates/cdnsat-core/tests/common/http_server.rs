//! Minimal HTTP/1.1 server for integration tests.
//!
//! Every connection carries one request and is closed after the reply, so a
//! dropped request can never be retried transparently on a reused connection.
//! What each request gets is decided by a script keyed on the request's
//! 1-based ordinal across all connections.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// 200 with the server's body.
    Ok,
    /// The given status with an empty body.
    Status(u16),
    /// Close the connection without answering.
    Drop,
}

pub struct TestServer {
    pub url: String,
    served: Arc<AtomicUsize>,
}

impl TestServer {
    /// Requests read so far (including dropped ones).
    pub fn requests(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    /// Polls until at least `n` requests were read or `timeout` passes.
    pub fn wait_for_requests(&self, n: usize, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            if self.requests() >= n {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        self.requests() >= n
    }
}

/// Always replies 200 with `body`.
pub fn start(body: Vec<u8>) -> TestServer {
    start_scripted(body, |_| Reply::Ok)
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start_scripted<F>(body: Vec<u8>, script: F) -> TestServer
where
    F: Fn(usize) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let script = Arc::new(script);
    let served = Arc::new(AtomicUsize::new(0));
    let served_in_thread = Arc::clone(&served);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let script = Arc::clone(&script);
            let served = Arc::clone(&served_in_thread);
            thread::spawn(move || handle(stream, &body, &*script, &served));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/f.ico", port),
        served,
    }
}

fn read_request_head(stream: &mut TcpStream) -> bool {
    let mut head = Vec::with_capacity(1024);
    let mut buf = [0u8; 1024];
    loop {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            return true;
        }
        if head.len() > 16 * 1024 {
            return false;
        }
    }
}

fn handle(
    mut stream: TcpStream,
    body: &[u8],
    script: &(dyn Fn(usize) -> Reply + Send + Sync),
    served: &AtomicUsize,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    if !read_request_head(&mut stream) {
        return;
    }
    let ordinal = served.fetch_add(1, Ordering::SeqCst) + 1;
    match script(ordinal) {
        Reply::Ok => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: image/x-icon\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        Reply::Status(code) => {
            let head = format!(
                "HTTP/1.1 {} Scripted\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                code
            );
            let _ = stream.write_all(head.as_bytes());
        }
        Reply::Drop => {}
    }
    let _ = stream.flush();
}
