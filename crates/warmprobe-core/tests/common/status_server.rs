//! Minimal HTTP/1.1 server that answers each path with a scripted status sequence.
//!
//! Every request to a path consumes the next status of its script; once the
//! script runs out the last status repeats. Status 0 closes the connection
//! without a reply (curl sees an empty response). Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

type Scripts = Arc<HashMap<String, Vec<u32>>>;
type Hits = Arc<Mutex<HashMap<String, usize>>>;

pub struct StatusServer {
    pub base_url: String,
    hits: Hits,
}

impl StatusServer {
    /// Requests received for `path` so far.
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Vec<u32>)>) -> StatusServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let scripts: Scripts = Arc::new(
        routes
            .into_iter()
            .map(|(path, statuses)| (path.to_string(), statuses))
            .collect(),
    );
    let hits: Hits = Arc::new(Mutex::new(HashMap::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let scripts = Arc::clone(&scripts);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &scripts, &hits));
        }
    });
    StatusServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        hits,
    }
}

/// Returns a URL on a port nobody listens on (connection refused).
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn handle(mut stream: TcpStream, scripts: &Scripts, hits: &Hits) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request_path(request).to_string();

    let index = {
        let mut hits = hits.lock().unwrap();
        let count = hits.entry(path.clone()).or_insert(0);
        let index = *count;
        *count += 1;
        index
    };
    let status = match scripts.get(&path) {
        Some(script) => script
            .get(index)
            .or_else(|| script.last())
            .copied()
            .unwrap_or(404),
        None => 404,
    };
    if status == 0 {
        return;
    }
    let response = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Path of the request line ("GET /about HTTP/1.1" -> "/about").
fn request_path(request: &str) -> &str {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
}
