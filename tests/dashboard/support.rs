//! Shared fixtures for the dashboard integration tests

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use casedoc_dashboard::app::{ArtifactFetcher, DirectoryFetcher};
use casedoc_dashboard::constants::artifacts;
use casedoc_dashboard::errors::FetchResult;

pub const ROWS_CSV: &str = "\
file_name,case_number,filed_date,document_type,party_petitioner,party_respondent,party_guardian,event_type_code,event_type_label,judge,low_confidence,notes,source_view,document_id
a.pdf,22-GA-1,2022-01-03,Petition,Doe,Roe,,PET,Petition filed,Smith,no,,docket,1
b.pdf,22-GA-1,2022-02-10,Bond,Doe,Roe,,BND,Bond posted,Smith,yes,\"amount unclear, check scan\",docket,2

c.pdf,22-GA-2,2022-03-01,Petition,Poe,,,PET,Petition filed,Jones,no,,scan,3
";

pub const AUDIT_CSV: &str = "\
issue_type,case_id,detail,file_name,filed_date
missing_documents,22-GA-2,no letters issued,,
orphan_document,,unmatched file,x.pdf,
";

pub const REPORT_JSON: &str = r#"[
  {"filename": "a.pdf", "strategy_used": "table_lattice", "warnings": []},
  {"filename": "b.pdf", "strategy_used": "regex", "warnings": ["low OCR quality"]}
]"#;

/// Write all three artifacts into `dir`
pub async fn write_artifacts(dir: &Path) {
    tokio::fs::write(dir.join(artifacts::ROWS_FILE), ROWS_CSV)
        .await
        .unwrap();
    tokio::fs::write(dir.join(artifacts::AUDIT_FILE), AUDIT_CSV)
        .await
        .unwrap();
    tokio::fs::write(dir.join(artifacts::PARSER_REPORT_FILE), REPORT_JSON)
        .await
        .unwrap();
}

/// Directory fetcher that counts its fetches
pub struct CountingFetcher {
    inner: DirectoryFetcher,
    fetches: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(dir: &Path) -> Arc<Self> {
        Arc::new(Self {
            inner: DirectoryFetcher::new(dir),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactFetcher for CountingFetcher {
    async fn fetch(&self, name: &str) -> FetchResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(name).await
    }

    fn describe(&self) -> String {
        format!("counting {}", self.inner.describe())
    }
}

/// Serve canned responses keyed by the last path segment
///
/// Unknown paths get a 404. Returns the base URL to fetch from.
pub async fn serve_artifacts(routes: HashMap<&'static str, (u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let name = path.rsplit('/').next().unwrap_or("");

                let (status, body) = routes.get(name).copied().unwrap_or((404, "not found"));
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    503 => "Service Unavailable",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/out", addr)
}
