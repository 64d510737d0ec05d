use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Revalidator
///
/// Tells the rendering layer that previously rendered pages are stale and must
/// be regenerated before they are served again.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate(&self, paths: &[String]) -> Result<(), String>;
}

pub type RevalidatorState = Arc<dyn Revalidator>;

/// HttpRevalidator
///
/// Calls the frontend's revalidation webhook with the list of stale paths.
pub struct HttpRevalidator {
    client: reqwest::Client,
    endpoint: String,
    secret: Option<String>,
}

impl HttpRevalidator {
    pub fn new(endpoint: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            secret,
        }
    }
}

#[async_trait]
impl Revalidator for HttpRevalidator {
    async fn revalidate(&self, paths: &[String]) -> Result<(), String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "paths": paths }));
        if let Some(secret) = &self.secret {
            request = request.header("x-revalidate-secret", secret);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("revalidation webhook returned {}", response.status()));
        }
        Ok(())
    }
}

/// LogRevalidator
///
/// Used when no webhook is configured: stale paths are only logged.
pub struct LogRevalidator;

#[async_trait]
impl Revalidator for LogRevalidator {
    async fn revalidate(&self, paths: &[String]) -> Result<(), String> {
        tracing::debug!(?paths, "no revalidation webhook configured");
        Ok(())
    }
}

/// MockRevalidator
///
/// Records every batch of invalidated paths, for assertions in tests.
#[derive(Default)]
pub struct MockRevalidator {
    calls: Mutex<Vec<Vec<String>>>,
    /// When true, every call fails.
    pub should_fail: bool,
}

impl MockRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            calls: Mutex::default(),
            should_fail: true,
        }
    }

    /// Each inner vector is one `revalidate` call, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Revalidator for MockRevalidator {
    async fn revalidate(&self, paths: &[String]) -> Result<(), String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(paths.to_vec());
        }
        if self.should_fail {
            return Err("Mock revalidation error".to_string());
        }
        Ok(())
    }
}
