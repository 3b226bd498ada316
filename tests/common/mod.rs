//! Minimal local HTTP responder for exercising the real client.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// Serves the given `(status line, body)` pairs, one connection each, in order.
///
/// Returns the base URL and a handle yielding the raw requests received.
pub fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().expect("accept connection");
            requests.push(read_request(&mut stream));
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response");
        }
        requests
    });

    (format!("http://{addr}"), handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

pub const ANALYSIS_BODY: &str = r#"{
    "has_error": false,
    "input_text": "Contact Maria in Berlin",
    "redacted_text": "Contact ***** in Berlin",
    "lang": {"has_error": false, "result": {"name": "English", "iso6391_name": "en", "confidence_score": 0.99}},
    "sentiment": {"has_error": false, "result": {"sentiment": "neutral", "confidence_score": 0.05}},
    "pii": {"has_error": false, "result": [{"category": "Person", "confidence_score": 0.95, "offset": 8, "length": 5}]},
    "key_phrases": {"has_error": false, "result": {"key_phrases": ["Maria", "Berlin"]}},
    "entities": {"has_error": false, "result": [{"category": "Location", "confidence_score": 0.7, "offset": 17, "length": 6}]},
    "linked_entities": {"has_error": true, "error": "Linking unavailable"}
}"#;
