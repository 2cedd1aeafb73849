//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `onboard-server`
//! integration tests:
//!
//! - `TestApp`: spawns the real router on a random port, with the policy document in a
//!   temporary directory and the Gemini API replaced by an `httpmock::MockServer`.
//! - `gemini_answer`: the JSON body of a successful Gemini response.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use onboard_server::{
    config::AppConfig,
    router::create_router,
    state::{build_answer_service, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{net::SocketAddr, path::PathBuf};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

pub const TEST_API_KEY: &str = "test-key";

/// How the spawned application is set up.
pub struct TestAppOptions {
    /// Document bytes written to `policy.pdf`. `None` leaves the document missing.
    pub document: Option<Vec<u8>>,
    pub api_key: Option<String>,
    pub candidates: Vec<String>,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            document: None,
            api_key: Some(TEST_API_KEY.to_string()),
            candidates: vec!["models/m1".to_string(), "models/m2".to_string()],
        }
    }
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub document_path: PathBuf,
    _document_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn(options: TestAppOptions) -> Result<Self> {
        dotenvy::dotenv().ok();
        // `try_init` is used to prevent panic if the logger is already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;
        let document_dir = tempfile::tempdir()?;
        let document_path = document_dir.path().join("policy.pdf");
        if let Some(bytes) = &options.document {
            std::fs::write(&document_path, bytes)?;
        }

        let config = AppConfig {
            port: 0,
            gemini_api_key: options.api_key,
            gemini_api_base_url: mock_server.url("/v1beta"),
            model_candidates: options.candidates,
            ..Default::default()
        };
        let answer_service = build_answer_service(&config)?;
        let app_state = AppState::new(config, document_path.clone(), answer_service);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        // Give the server a moment to start up.
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            document_path,
            _document_dir: document_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Fetches the onboarding page, optionally asking `question`, and returns its HTML.
    pub async fn get_page(&self, question: Option<&str>) -> Result<String> {
        let mut request = self.client.get(format!("{}/", self.address));
        if let Some(question) = question {
            request = request.query(&[("q", question)]);
        }
        let response = request.send().await?;
        assert!(
            response.status().is_success(),
            "Page request failed with status: {}",
            response.status()
        );
        Ok(response.text().await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver might already be gone if the server task panicked,
            // so we ignore the result of send.
            let _ = tx.send(());
        }
    }
}

/// A successful `generateContent` response carrying `text`.
pub fn gemini_answer(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"}
        }]
    })
}
