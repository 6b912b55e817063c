//! Roster updater
//!
//! Fetches the export from its source, parses it and publishes the result
//! as the new snapshot. A failed reload leaves the previous snapshot live.

use std::time::Instant;

use anyhow::{Context, Result};

use super::parser::parse_document;
use super::source::RosterSource;
use super::store::RosterStore;
use super::types::{Roster, RosterColumns, RosterLoadReport};

pub struct RosterUpdater {
    source: Box<dyn RosterSource>,
    store: RosterStore,
    columns: RosterColumns,
    include_hidden: bool,
}

impl RosterUpdater {
    pub fn new(
        source: Box<dyn RosterSource>,
        store: RosterStore,
        columns: RosterColumns,
        include_hidden: bool,
    ) -> Self {
        Self {
            source,
            store,
            columns,
            include_hidden,
        }
    }

    /// Fetch, parse and swap in one cycle.
    pub async fn update(&self) -> Result<RosterLoadReport> {
        let started = Instant::now();
        let origin = self.source.describe();
        tracing::info!("Reloading roster from {}", origin);

        let document = self
            .source
            .fetch()
            .await
            .context(format!("Failed to fetch roster from {}", origin))?;

        let parsed = parse_document(&document, &self.columns, self.include_hidden)
            .context(format!("Failed to parse roster from {}", origin))?;

        let report = RosterLoadReport {
            source: origin.clone(),
            loaded: parsed.records.len(),
            skipped: parsed.skipped,
            hidden: parsed.hidden,
            duration_seconds: started.elapsed().as_secs_f64(),
        };

        if parsed.records.is_empty() {
            tracing::warn!("Roster from {} has no usable records", origin);
        }

        self.store.replace(Roster::new(parsed.records, origin)).await;
        tracing::info!("Roster reloaded: {}", report);

        Ok(report)
    }
}
