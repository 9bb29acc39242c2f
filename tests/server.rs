use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use httpserve::plugin::IndexFile;
use httpserve::store::FsStore;
use httpserve::{ConnectionHandler, Dispatcher, PluginChain, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn public_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("httpserve-it-{}-{name}", std::process::id()));
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::write(dir.join("docs/index.html"), "<h1>docs</h1>").unwrap();
    std::fs::write(dir.join("a.txt"), "alpha").unwrap();
    std::fs::write(dir.join("b.txt"), "bravo").unwrap();
    dir
}

async fn start(root: &Path) -> SocketAddr {
    let plugins = PluginChain::new().with(IndexFile::new("index.html"));
    let dispatcher = Dispatcher::with_static_files(FsStore::new(root));
    let handler = ConnectionHandler::new(Arc::new(plugins), Arc::new(dispatcher));

    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    tokio::spawn(server.run(handler));
    addr
}

async fn request(addr: SocketAddr, raw: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut received = Vec::new();
    stream.read_to_end(&mut received).await.unwrap();
    received
}

#[tokio::test]
async fn serves_files_and_index() {
    let root = public_dir("basic");
    let addr = start(&root).await;

    let res = request(addr, "GET /a.txt HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 200 OK\r\n\r\nalpha");

    let res = request(addr, "GET / HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 200 OK\r\n\r\n<h1>home</h1>");

    let res = request(addr, "GET /docs/ HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 200 OK\r\n\r\n<h1>docs</h1>");

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn missing_and_escaping_paths_are_404() {
    let root = public_dir("missing");
    let addr = start(&root).await;

    let res = request(addr, "GET /nope.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 404 Not Found\r\n\r\n");

    let res = request(addr, "GET /../../etc/passwd HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 404 Not Found\r\n\r\n");

    let res = request(addr, "GET /a.txt/x HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 404 Not Found\r\n\r\n");

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn fatal_errors_close_without_bytes() {
    let root = public_dir("fatal");
    let addr = start(&root).await;

    let res = request(addr, "DELETE /a.txt HTTP/1.1\r\n\r\n").await;
    assert!(res.is_empty());

    let res = request(addr, "GET /a.txt HTTP/1.1\r\nno colon\r\n\r\n").await;
    assert!(res.is_empty());

    // The server keeps serving after failed connections.
    let res = request(addr, "GET /b.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(res, b"HTTP/1.0 200 OK\r\n\r\nbravo");

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn client_hanging_up_early_gets_nothing() {
    let root = public_dir("hangup");
    let addr = start(&root).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /a.txt HTTP/1.1\r\n").await.unwrap();
    stream.shutdown().await.unwrap();
    let mut received = Vec::new();
    stream.read_to_end(&mut received).await.unwrap();
    assert!(received.is_empty());

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_connections_are_isolated() {
    let root = public_dir("concurrent");
    let addr = start(&root).await;

    // Open both connections and send the heads in interleaved halves so the
    // two requests are in flight at the same time.
    let mut first = TcpStream::connect(addr).await.unwrap();
    let mut second = TcpStream::connect(addr).await.unwrap();
    first.write_all(b"GET /a.txt HTTP/1.1\r\n").await.unwrap();
    second.write_all(b"GET /b.txt HTTP/1.1\r\n").await.unwrap();
    second.write_all(b"X-Client: second\r\n\r\n").await.unwrap();
    first.write_all(b"X-Client: first\r\n\r\n").await.unwrap();

    let (a, b) = tokio::join!(
        async {
            let mut buf = Vec::new();
            first.read_to_end(&mut buf).await.unwrap();
            buf
        },
        async {
            let mut buf = Vec::new();
            second.read_to_end(&mut buf).await.unwrap();
            buf
        }
    );

    assert_eq!(a, b"HTTP/1.0 200 OK\r\n\r\nalpha");
    assert_eq!(b, b"HTTP/1.0 200 OK\r\n\r\nbravo");

    let many: Vec<_> = (0..16)
        .map(|i| {
            let file = if i % 2 == 0 { "a.txt" } else { "b.txt" };
            tokio::spawn(async move { (i, request(addr, &format!("GET /{file} HTTP/1.1\r\n\r\n")).await) })
        })
        .collect();
    for task in many {
        let (i, res) = task.await.unwrap();
        let expected: &[u8] = if i % 2 == 0 {
            b"HTTP/1.0 200 OK\r\n\r\nalpha"
        } else {
            b"HTTP/1.0 200 OK\r\n\r\nbravo"
        };
        assert_eq!(res, expected);
    }

    std::fs::remove_dir_all(&root).unwrap();
}
