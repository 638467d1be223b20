//! A throwaway HTTP responder standing in for AnyVar.

#![allow(dead_code)]

use serde_json::Value;
use std::{
    io::Write,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Value,
}

/// Answers connections in order with the given `(status, body)` replies, then
/// stops accepting.
pub struct CannedServer {
    pub url: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl CannedServer {
    pub async fn start(replies: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            for (status, body) in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                seen.lock().unwrap().push(request);

                let reply = format!(
                    "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        CannedServer { url, requests }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn definitions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.body["definition"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub fn registered(definition: &str) -> (u16, String) {
    let body = serde_json::json!({
        "messages": [],
        "object": {"type": "Allele", "id": format!("ga4gh:VA.{definition}")},
    });
    (200, body.to_string())
}

pub fn rejected(message: &str) -> (u16, String) {
    let body = serde_json::json!({"messages": [message], "object": null});
    (200, body.to_string())
}

pub fn null_object() -> (u16, String) {
    (200, r#"{"messages": [], "object": null}"#.to_string())
}

pub fn server_error() -> (u16, String) {
    (500, r#"{"detail": "Internal Server Error"}"#.to_string())
}

pub const VCF_HEADER: &str = "##fileformat=VCFv4.3\n\
    ##reference=GRCh38\n\
    ##contig=<ID=1>\n\
    ##contig=<ID=2>\n\
    #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

pub fn write_vcf(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".vcf").tempfile().unwrap();
    file.write_all(VCF_HEADER.as_bytes()).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

async fn read_request(socket: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_len = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buf) {
            break end;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_len + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(head_len + content_length);
    let body = serde_json::from_slice(&buf[head_len..end]).unwrap_or(Value::Null);

    Some(Request { method, path, body })
}
