use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a small routed HTTP/1.1 server for tests.
///
/// Routes:
/// - `/ok`: 200 text with two cookies and cache validators
/// - `/gzip`: 200 with a gzip-encoded body
/// - `/bin`: 200 `image/png`
/// - `/missing`: 404 with a short body
/// - `/empty`: 204
/// - `/redirect`: 302 to `/ok`
/// - `/see-other`: 303 to `/echo`
/// - `/loop`: 302 to itself
/// - `/no-location`: 302 without a `Location` header
/// - `/echo`: 200 echoing the raw request (head and body)
/// - `/fine`: 200 with the non-canonical reason `Everything Fine`
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

struct Reply {
    status: &'static str,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl Reply {
    fn new(status: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

fn handle_client(mut stream: TcpStream) {
    if stream.set_nonblocking(false).is_err()
        || stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .is_err()
    {
        return;
    }
    let Some(raw) = read_request(&mut stream) else {
        return;
    };
    let head = String::from_utf8_lossy(&raw);
    let mut request_line = head.lines().next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_owned();
    let path = request_line.next().unwrap_or_default().to_owned();

    let reply = route(&path, &raw);
    let mut out = format!("HTTP/1.1 {}\r\n", reply.status);
    for (name, value) in &reply.headers {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push_str("\r\n");
    }
    if reply.status != "204 No Content" {
        out.push_str("Content-Length: ");
        out.push_str(&reply.body.len().to_string());
        out.push_str("\r\n");
    }
    out.push_str("Connection: close\r\n\r\n");

    let mut bytes = out.into_bytes();
    if method != "HEAD" {
        bytes.extend_from_slice(&reply.body);
    }
    if stream.write_all(&bytes).is_err() || stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn route(path: &str, raw: &[u8]) -> Reply {
    match path {
        "/ok" => Reply::new("200 OK", "hello")
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Set-Cookie", "a=1")
            .header("Set-Cookie", "b=2; Path=/")
            .header("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT")
            .header("ETag", "\"v1\""),
        "/gzip" => Reply::new("200 OK", gzip(b"compressed body"))
            .header("Content-Type", "text/plain")
            .header("Content-Encoding", "gzip"),
        "/bin" => Reply::new("200 OK", vec![0x89, b'P', b'N', b'G']).header("Content-Type", "image/png"),
        "/empty" => Reply::new("204 No Content", Vec::new()),
        "/redirect" => Reply::new("302 Found", Vec::new()).header("Location", "/ok"),
        "/see-other" => Reply::new("303 See Other", Vec::new()).header("Location", "/echo"),
        "/loop" => Reply::new("302 Found", Vec::new()).header("Location", "/loop"),
        "/no-location" => Reply::new("302 Found", Vec::new()),
        "/echo" => Reply::new("200 OK", raw.to_vec()).header("Content-Type", "text/plain"),
        "/fine" => Reply::new("200 Everything Fine", "fine").header("Content-Type", "text/plain"),
        _ => Reply::new("404 Not Found", "nope").header("Content-Type", "text/plain"),
    }
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    if encoder.write_all(data).is_err() {
        return Vec::new();
    }
    encoder.finish().unwrap_or_default()
}

/// Reads one request: the head, then as many body bytes as `Content-Length` declares.
fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return Some(raw);
        }
        raw.extend_from_slice(buffer.get(..read)?);
        if let Some(head_end) = find_head_end(&raw) {
            let body_len = content_length(raw.get(..head_end)?);
            if raw.len() >= head_end.saturating_add(4).saturating_add(body_len) {
                return Some(raw);
            }
        }
    }
}

fn find_head_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}
