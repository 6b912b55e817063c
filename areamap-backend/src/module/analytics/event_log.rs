//! Analytics event log
//!
//! Appends events as JSON lines and keeps the latest ones in memory.
//! Recording is best-effort: a failed write is logged and dropped so that
//! analytics can never break a query.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::types::AnalyticsEvent;

/// New opaque session identifier.
pub fn new_session_id() -> String {
    format!("session_{}", Uuid::now_v7())
}

pub struct AnalyticsLog {
    enabled: bool,
    path: Option<PathBuf>,
    capacity: usize,
    recent: Mutex<VecDeque<AnalyticsEvent>>,
}

impl AnalyticsLog {
    /// Log writing to `path` (if any) and buffering `capacity` events.
    pub fn new(path: Option<impl AsRef<Path>>, capacity: usize) -> Self {
        Self {
            enabled: true,
            path: path.map(|p| p.as_ref().to_path_buf()),
            capacity: capacity.max(1),
            recent: Mutex::new(VecDeque::new()),
        }
    }

    /// Log that drops everything.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            path: None,
            capacity: 1,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn record(&self, event: AnalyticsEvent) {
        if !self.enabled {
            return;
        }

        tracing::debug!(
            "Analytics event {} (session {})",
            event.event_type,
            event.session_id
        );

        if let Some(path) = &self.path {
            if let Err(e) = Self::append(path, &event).await {
                tracing::warn!("Analytics logging failed: {:#}", e);
            }
        }

        let mut recent = self.recent.lock().await;
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(event);
    }

    /// Up to `limit` most recent events, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<AnalyticsEvent> {
        let recent = self.recent.lock().await;
        recent.iter().rev().take(limit).cloned().collect()
    }

    async fn append(path: &Path, event: &AnalyticsEvent) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context(format!("Failed to create {}", parent.display()))?;
            }
        }

        let mut line = serde_json::to_string(event).context("Failed to serialize analytics event")?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .context(format!("Failed to open {}", path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
