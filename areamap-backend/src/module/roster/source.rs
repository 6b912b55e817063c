//! Roster sources
//!
//! A source only fetches the raw export; decoding is the parser's job.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{RosterDocument, RosterError, RosterFormat};

#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Human-readable origin, used in logs and reports.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<RosterDocument, RosterError>;
}

/// Roster export on the local filesystem (`.json` or `.csv`).
pub struct FileRosterSource {
    path: PathBuf,
}

impl FileRosterSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn format(&self) -> Result<RosterFormat, RosterError> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(RosterFormat::from_extension)
            .ok_or_else(|| RosterError::UnsupportedFormat(self.path.display().to_string()))
    }
}

#[async_trait]
impl RosterSource for FileRosterSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<RosterDocument, RosterError> {
        let format = self.format()?;
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(RosterDocument { format, content })
    }
}

/// Roster export published over HTTP.
pub struct HttpRosterSource {
    client: Client,
    url: String,
}

impl HttpRosterSource {
    pub fn new(url: impl Into<String>) -> Result<Self, RosterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("areamap-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<RosterDocument, RosterError> {
        tracing::info!("Downloading roster from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(RosterError::HttpStatus {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let is_csv = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("csv"));
        let format = if is_csv { RosterFormat::Csv } else { RosterFormat::Json };

        let content = response.text().await?;
        Ok(RosterDocument { format, content })
    }
}
