use std::sync::Arc;

use areamap_backend::config::{self, AppConfig};
use areamap_backend::module::analytics::AnalyticsLog;
use areamap_backend::module::roster::{
    FileRosterSource, HttpRosterSource, RosterSource, RosterStore, RosterUpdater,
};
use areamap_backend::module::scheduled::{ScheduledTaskConfig, ScheduledTaskManager};
use areamap_backend::service::{self, AppState};

use anyhow::{Context, Result};

fn build_source(config: &AppConfig) -> Result<Box<dyn RosterSource>> {
    match config.roster.url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => Ok(Box::new(
            HttpRosterSource::new(url).context("Failed to create roster HTTP client")?,
        )),
        None => Ok(Box::new(FileRosterSource::new(&config.roster.path))),
    }
}

fn build_analytics(config: &AppConfig) -> AnalyticsLog {
    if config.analytics.enabled {
        AnalyticsLog::new(Some(&config.analytics.path), config.analytics.buffer_size)
    } else {
        AnalyticsLog::disabled()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let config = config::read_config(&config_path)?;

    // Initialize logging
    let _logging_guard =
        areamap_backend::logging::init_logging(&config.log_dir, "areamap-backend", &config.log_level)?;

    tracing::info!("Area map backend starting...");

    // Roster: first load before serving, a failure leaves the roster empty
    let store = RosterStore::empty();
    let updater = Arc::new(RosterUpdater::new(
        build_source(config)?,
        store.clone(),
        config.roster.columns.clone(),
        config.roster.include_hidden,
    ));
    if let Err(e) = updater.update().await {
        tracing::warn!("Initial roster load failed, serving an empty roster: {:#}", e);
    }

    let task_config = ScheduledTaskConfig {
        roster_reload_interval_minutes: config.roster.reload_interval_minutes,
        perform_initial_reload: false,
    };
    let mut task_manager = ScheduledTaskManager::new(task_config, updater);
    task_manager.start_all();

    let state = AppState {
        store,
        analytics: Arc::new(build_analytics(config)),
        options: config.matching.match_options(),
        user_search_limit: config.matching.user_search_limit,
    };
    let app = service::router(state);

    let address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .context(format!("Failed to bind {}", address))?;
    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    task_manager.shutdown().await;
    tracing::info!("Area map backend stopped");

    Ok(())
}
