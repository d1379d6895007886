//! Local HTTP responder for loader and resolver tests

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Answer one request on a loopback port with a canned response.
///
/// Returns the server's base URL, e.g. `http://127.0.0.1:40123`.
pub(crate) fn serve_once(status: &'static str, body: &'static str) -> Option<String> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let addr = listener.local_addr().ok()?;

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });

    Some(format!("http://{}", addr))
}
