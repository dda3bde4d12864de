use std::net::SocketAddr;
use std::path::Path;

use accessionkit_catalog::{CatalogService, SpecExportOptions, SpecMergeOptions};
use accessionkit_io_fs::{DatasetStore, SpecStoreOptions};
use accessionkit_server::{AppState, build_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec(value).expect("encode")).expect("write fixture");
}

fn seed_documents(dir: &Path) {
    write_json(
        &dir.join("data.json"),
        &json!([
            {"ACCESSION": "1", "NAME": "Alice", "TITLE": "Rust"},
            {"ACCESSION": "2", "NAME": "Bob", "TITLE": "Tokio"}
        ]),
    );
    write_json(&dir.join("data2.json"), &json!([{"COST ": "10"}]));
}

async fn spawn_app(
    dir: &Path,
    cors_allowed_origins: Vec<String>,
    max_body_bytes: usize,
) -> SocketAddr {
    let store = DatasetStore::new(SpecStoreOptions::from_dir(dir, "data.json", "data2.json"));
    let service = CatalogService::new(
        store,
        SpecMergeOptions::default(),
        SpecExportOptions::default(),
    );
    let app = build_router(AppState::new(service, cors_allowed_origins, max_body_bytes));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn spawn_default_app(dir: &Path) -> SocketAddr {
    spawn_app(dir, vec!["*".to_string()], 10 * 1024 * 1024).await
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> (u16, String, Vec<u8>) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if method == "POST" {
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    let mut v_request = req.into_bytes();
    v_request.extend_from_slice(body);
    stream
        .write_all(&v_request)
        .await
        .expect("write request");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let n_idx_split = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("http response must have separator");
    let head = String::from_utf8_lossy(&response[..n_idx_split]).to_ascii_lowercase();
    let body = response[n_idx_split + 4..].to_vec();
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head, body)
}

fn parse_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn get_data_returns_primary_document() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let addr = spawn_default_app(dir.path()).await;

    let (status, head, body) = send_raw(addr, "GET", "/api/data", &[], b"").await;
    assert_eq!(status, 200);
    assert!(head.contains("content-type: application/json"));
    assert!(head.contains("access-control-allow-origin: *"));
    assert_eq!(
        parse_json(&body),
        json!([
            {"ACCESSION": "1", "NAME": "Alice", "TITLE": "Rust"},
            {"ACCESSION": "2", "NAME": "Bob", "TITLE": "Tokio"}
        ])
    );
}

#[tokio::test]
async fn get_data_without_document_is_internal_error() {
    let dir = tempdir().expect("tempdir");
    let addr = spawn_default_app(dir.path()).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/data", &[], b"").await;
    assert_eq!(status, 500);
    assert_eq!(parse_json(&body), json!({"error": "Failed to read data file"}));
}

#[tokio::test]
async fn merged_view_is_projected_onto_schema() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let addr = spawn_default_app(dir.path()).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/merged", &[], b"").await;
    assert_eq!(status, 200);
    let records = parse_json(&body);
    let l_records = records.as_array().expect("array");
    assert_eq!(l_records.len(), 2);
    let record_first = l_records[0].as_object().expect("object");
    assert_eq!(record_first.len(), 17);
    assert_eq!(record_first["COST "], json!("10"));
    assert_eq!(l_records[1]["COST "], json!(""));
    assert_eq!(l_records[1]["NAME"], json!("Bob"));
}

#[tokio::test]
async fn download_returns_xlsx_attachment() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let addr = spawn_default_app(dir.path()).await;

    let (status, head, body) = send_raw(addr, "GET", "/api/download", &[], b"").await;
    assert_eq!(status, 200);
    assert!(head.contains(
        "content-type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    ));
    assert!(head.contains("content-disposition: attachment; filename=output.xlsx"));
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn download_without_secondary_is_internal_error() {
    let dir = tempdir().expect("tempdir");
    write_json(&dir.path().join("data.json"), &json!([]));
    let addr = spawn_default_app(dir.path()).await;

    let (status, _, body) = send_raw(addr, "GET", "/api/download", &[], b"").await;
    assert_eq!(status, 500);
    assert_eq!(parse_json(&body), json!({"error": "Failed to generate file"}));
}

#[tokio::test]
async fn save_then_read_round_trips() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let addr = spawn_default_app(dir.path()).await;

    let payload = json!([{"ACCESSION": "9", "NAME": "Zed", "YEAR ": 2001}]);
    let v_payload = serde_json::to_vec(&payload).expect("encode");
    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/api/save",
        &[("Content-Type", "application/json")],
        &v_payload,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        parse_json(&body),
        json!({"success": true, "message": "Data saved successfully!"})
    );

    let (status, _, body) = send_raw(addr, "GET", "/api/data", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body), payload);
}

#[tokio::test]
async fn save_rejects_invalid_payload_without_writing() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let v_before = std::fs::read(dir.path().join("data.json")).expect("read");
    let addr = spawn_default_app(dir.path()).await;

    let (status, _, body) = send_raw(
        addr,
        "POST",
        "/api/save",
        &[("Content-Type", "application/json")],
        br#"{"ACCESSION": "1"}"#,
    )
    .await;
    assert_eq!(status, 400);
    let message = parse_json(&body)["error"]
        .as_str()
        .expect("error text")
        .to_string();
    assert!(message.starts_with("Invalid payload"));
    assert_eq!(
        std::fs::read(dir.path().join("data.json")).expect("read"),
        v_before
    );

    let (status, _, _) = send_raw(
        addr,
        "POST",
        "/api/save",
        &[("Content-Type", "application/json")],
        b"[{\"ACCESSION\": ",
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn save_rejects_oversize_body() {
    let dir = tempdir().expect("tempdir");
    seed_documents(dir.path());
    let addr = spawn_app(dir.path(), vec!["*".to_string()], 64).await;

    let payload = json!([{"NAME": "x".repeat(256)}]);
    let v_payload = serde_json::to_vec(&payload).expect("encode");
    let (status, _, _) = send_raw(
        addr,
        "POST",
        "/api/save",
        &[("Content-Type", "application/json")],
        &v_payload,
    )
    .await;
    assert_eq!(status, 413);
}

#[tokio::test]
async fn preflight_is_answered_with_no_content() {
    let dir = tempdir().expect("tempdir");
    let addr = spawn_default_app(dir.path()).await;

    let (status, head, _) = send_raw(
        addr,
        "OPTIONS",
        "/api/save",
        &[
            ("Origin", "https://library.example"),
            ("Access-Control-Request-Method", "POST"),
        ],
        b"",
    )
    .await;
    assert_eq!(status, 204);
    assert!(head.contains("access-control-allow-origin: *"));
    assert!(head.contains("access-control-allow-methods: get,post"));
    assert!(head.contains("access-control-allow-headers: content-type"));
}

#[tokio::test]
async fn healthz_reports_ok() {
    let dir = tempdir().expect("tempdir");
    let addr = spawn_default_app(dir.path()).await;

    let (status, _, body) = send_raw(addr, "GET", "/healthz", &[], b"").await;
    assert_eq!(status, 200);
    assert_eq!(parse_json(&body), json!({"status": "ok"}));
}
