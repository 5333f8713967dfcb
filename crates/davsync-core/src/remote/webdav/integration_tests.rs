//! `WebDavStore` against a local server answering with canned responses

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::*;
use crate::error::ErrorKind;

const LAST_MODIFIED: &str = "Mon, 02 Jan 2023 10:00:00 GMT";

/// One request as received by the server
#[derive(Debug, Clone)]
struct Received {
    method: String,
    path: String,
    /// Lowercased request head
    head: String,
    body: Vec<u8>,
}

impl Received {
    fn has_header(&self, line: &str) -> bool {
        self.head.lines().any(|l| l.trim() == line)
    }
}

/// Maps `(method, path)` to `(status, body)`
type Route = fn(&str, &str) -> (u16, String);

struct FakeDav {
    base: Url,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeDav {
    async fn start(route: Route) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                let (status, body) = route(&request.method, &request.path);
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\n\
                     Content-Type: application/xml; charset=utf-8\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base: Url::parse(&format!("http://{addr}/dav/")).unwrap(),
            received,
        }
    }

    fn store(&self) -> WebDavStore {
        WebDavStore::new(self.base.clone(), "deploy", Some("secret".into())).unwrap()
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    fn request_lines(&self) -> Vec<String> {
        self.received()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

/// Read one request, including a fixed-length or chunked body
async fn read_request(stream: &mut TcpStream) -> Option<Received> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let raw_head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let head = raw_head.to_ascii_lowercase();
    let body_start = head_end + 4;
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = head.contains("transfer-encoding: chunked");

    loop {
        let body = &buf[body_start..];
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = raw_head.lines().next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    Some(Received {
        method,
        path,
        body: buf[body_start..].to_vec(),
        head,
    })
}

/// 207 body listing `(href, is_collection)` pairs
fn multistatus(entries: &[(&str, bool)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0"?><d:multistatus xmlns:d="DAV:">"#);
    for (href, is_collection) in entries {
        let resourcetype = if *is_collection {
            "<d:resourcetype><d:collection/></d:resourcetype>"
        } else {
            "<d:resourcetype/>"
        };
        xml.push_str(&format!(
            "<d:response><d:href>{href}</d:href><d:propstat><d:prop>\
             <d:getlastmodified>{LAST_MODIFIED}</d:getlastmodified>{resourcetype}\
             </d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>"
        ));
    }
    xml.push_str("</d:multistatus>");
    xml
}

fn content(bytes: &[u8]) -> ContentStream {
    Box::new(Cursor::new(bytes.to_vec()))
}

#[tokio::test]
async fn test_exists_maps_statuses() {
    fn route(method: &str, path: &str) -> (u16, String) {
        match (method, path) {
            ("PROPFIND", "/dav/site") => (207, multistatus(&[("/dav/site/", true)])),
            ("PROPFIND", "/dav/missing") => (404, String::new()),
            _ => (500, String::new()),
        }
    }
    let server = FakeDav::start(route).await;
    let store = server.store();

    assert!(store.exists("/site").await.unwrap());
    assert!(!store.exists("/missing").await.unwrap());
    let err = store.exists("/broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("500"));

    let received = server.received();
    assert_eq!(received.len(), 3);
    assert!(received[0].has_header("depth: 0"));
    assert!(received[0].head.contains("authorization: basic "));
}

#[tokio::test]
async fn test_put_without_overwrite_on_existing_target() {
    fn route(method: &str, path: &str) -> (u16, String) {
        match (method, path) {
            ("PUT", "/dav/site/a.txt") => (412, String::new()),
            ("PUT", "/dav/site/new.txt") => (201, String::new()),
            _ => (500, String::new()),
        }
    }
    let server = FakeDav::start(route).await;
    let store = server.store();

    let err = store
        .put_file("/site/a.txt", content(b"hello"), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedRemoteState);

    store
        .put_file("/site/new.txt", content(b"hello"), false)
        .await
        .unwrap();

    let received = server.received();
    assert_eq!(received.len(), 2);
    assert!(received[0].has_header("if-none-match: *"));
    assert!(String::from_utf8_lossy(&received[1].body).contains("hello"));
}

#[tokio::test]
async fn test_put_with_overwrite_keeps_precondition_failure_as_protocol_error() {
    fn route(_method: &str, _path: &str) -> (u16, String) {
        (412, String::new())
    }
    let server = FakeDav::start(route).await;
    let store = server.store();

    let err = store
        .put_file("/site/a.txt", content(b"hello"), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method, "PUT");
    assert!(!received[0].head.contains("if-none-match"));
}

#[tokio::test]
async fn test_list_recursive_walks_collections_once() {
    fn route(method: &str, path: &str) -> (u16, String) {
        match (method, path) {
            ("PROPFIND", "/dav/site/") => (
                207,
                multistatus(&[
                    ("/dav/site/", true),
                    ("/dav/site/a.txt", false),
                    ("/dav/site/b/", true),
                    ("/dav/site/b", true),
                ]),
            ),
            ("PROPFIND", "/dav/site/b/") => (
                207,
                multistatus(&[("/dav/site/b/", true), ("/dav/site/b/c%20d.txt", false)]),
            ),
            _ => (404, String::new()),
        }
    }
    let server = FakeDav::start(route).await;
    let store = server.store();

    let entries = store.list_recursive("/site").await.unwrap();

    assert_eq!(
        server.request_lines(),
        vec!["PROPFIND /dav/site/", "PROPFIND /dav/site/b/"]
    );
    assert!(server.received().iter().all(|r| r.has_header("depth: 1")));

    let mut files: Vec<&str> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::File)
        .map(|e| e.full_path.as_str())
        .collect();
    files.sort_unstable();
    assert_eq!(files, vec!["/site/a.txt", "/site/b/c d.txt"]);

    assert!(entries.iter().all(|e| e.full_path != "/site"));
    assert!(
        entries
            .iter()
            .any(|e| e.full_path == "/site/b" && e.kind == EntryKind::Directory)
    );
    assert!(entries.iter().all(|e| e.last_modified == LAST_MODIFIED));
}

#[tokio::test]
async fn test_list_recursive_failed_listing_is_protocol_error() {
    fn route(_method: &str, _path: &str) -> (u16, String) {
        (403, String::new())
    }
    let server = FakeDav::start(route).await;

    let err = server.store().list_recursive("/site").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("PROPFIND"));
}

#[tokio::test]
async fn test_mkcol_and_delete() {
    fn route(method: &str, path: &str) -> (u16, String) {
        match (method, path) {
            ("MKCOL", "/dav/site/b/") => (201, String::new()),
            ("DELETE", "/dav/site/old.txt") => (204, String::new()),
            _ => (409, String::new()),
        }
    }
    let server = FakeDav::start(route).await;
    let store = server.store();

    store.create_directory("/site/b").await.unwrap();
    store.delete_file("/site/old.txt").await.unwrap();

    let err = store.create_directory("/nowhere/deep").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    let err = store.delete_file("/site/gone.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);

    assert_eq!(
        server.request_lines(),
        vec![
            "MKCOL /dav/site/b/",
            "DELETE /dav/site/old.txt",
            "MKCOL /dav/nowhere/deep/",
            "DELETE /dav/site/gone.txt",
        ]
    );
}
