//! Scheduled task manager
//!
//! Runs the periodic roster reload. Reloads fire on interval boundaries
//! counted from midnight UTC (every 15 minutes means xx:00, xx:15, ...).

use super::roster::RosterUpdater;
use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(60);
const RELOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for scheduled tasks
#[derive(Debug, Clone)]
pub struct ScheduledTaskConfig {
    /// Interval for roster reloads (in minutes); 0 disables them
    pub roster_reload_interval_minutes: u64,

    /// Reload once immediately on start
    pub perform_initial_reload: bool,
}

/// Scheduled task manager
pub struct ScheduledTaskManager {
    config: ScheduledTaskConfig,
    updater: Arc<RosterUpdater>,
    task_handles: Vec<JoinHandle<()>>,
}

impl ScheduledTaskManager {
    pub fn new(config: ScheduledTaskConfig, updater: Arc<RosterUpdater>) -> Self {
        Self {
            config,
            updater,
            task_handles: Vec::new(),
        }
    }

    /// Start all scheduled tasks
    pub fn start_all(&mut self) {
        if self.config.roster_reload_interval_minutes == 0 {
            tracing::info!("Roster reload disabled (interval is 0)");
            return;
        }

        let handle = self.start_roster_reload_task();
        self.task_handles.push(handle);

        tracing::info!(
            "Started {} scheduled tasks (roster reload every {} min)",
            self.task_handles.len(),
            self.config.roster_reload_interval_minutes
        );
    }

    pub fn task_count(&self) -> usize {
        self.task_handles.len()
    }

    fn start_roster_reload_task(&self) -> JoinHandle<()> {
        let updater = self.updater.clone();
        let interval_minutes = self.config.roster_reload_interval_minutes;
        let perform_initial = self.config.perform_initial_reload;

        tokio::spawn(async move {
            if perform_initial {
                if let Err(e) = Self::run_roster_reload(&updater).await {
                    tracing::error!("Initial roster reload failed: {:#}", e);
                }
            }

            Self::roster_reload_loop(updater, interval_minutes).await;
        })
    }

    async fn roster_reload_loop(updater: Arc<RosterUpdater>, interval_minutes: u64) {
        loop {
            let now = Utc::now();
            let next_trigger = Self::calculate_next_reload_time(now, interval_minutes);
            let sleep_duration = (next_trigger - now)
                .to_std()
                .unwrap_or(Duration::from_secs(60));

            tracing::debug!(
                "Next roster reload at: {} (in {:.1} min)",
                next_trigger.format("%Y-%m-%d %H:%M:%S UTC"),
                sleep_duration.as_secs_f64() / 60.0
            );

            tokio::time::sleep(sleep_duration).await;

            for attempt in 1..=MAX_RETRIES {
                match Self::run_roster_reload(&updater).await {
                    Ok(()) => break,
                    Err(e) if attempt < MAX_RETRIES => {
                        tracing::warn!(
                            "Roster reload failed (attempt {}/{}): {:#}. Retrying in {}s...",
                            attempt,
                            MAX_RETRIES,
                            e,
                            RETRY_DELAY.as_secs()
                        );
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Roster reload failed after {} attempts, keeping previous snapshot: {:#}",
                            MAX_RETRIES,
                            e
                        );
                    }
                }
            }
        }
    }

    /// Next boundary strictly after `now`, on a multiple of `interval_minutes`
    /// counted from the start of the UTC day.
    fn calculate_next_reload_time(now: DateTime<Utc>, interval_minutes: u64) -> DateTime<Utc> {
        let interval = interval_minutes.max(1) as i64;
        let start_of_minute = now
            - ChronoDuration::seconds(now.second() as i64)
            - ChronoDuration::nanoseconds(now.nanosecond() as i64);
        let minute_of_day = (now.hour() * 60 + now.minute()) as i64;
        let next_boundary = (minute_of_day / interval + 1) * interval;

        start_of_minute + ChronoDuration::minutes(next_boundary - minute_of_day)
    }

    async fn run_roster_reload(updater: &Arc<RosterUpdater>) -> anyhow::Result<()> {
        match tokio::time::timeout(RELOAD_TIMEOUT, updater.update()).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => {
                anyhow::bail!("Roster reload timed out after {} seconds", RELOAD_TIMEOUT.as_secs());
            }
        }
    }

    /// Gracefully shutdown all tasks
    pub async fn shutdown(self) {
        tracing::info!("Shutting down scheduled task manager...");

        for handle in self.task_handles {
            handle.abort();
        }

        tracing::info!("All scheduled tasks stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::roster::{FileRosterSource, RosterColumns, RosterStore};
    use chrono::TimeZone;

    #[test]
    fn test_calculate_next_reload_time() {
        // 10:07:30 -> 10:15:00
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 7, 30).unwrap();
        let next = ScheduledTaskManager::calculate_next_reload_time(now, 15);
        assert_eq!((next.hour(), next.minute(), next.second()), (10, 15, 0));

        // Exactly on a boundary -> the following one
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 15, 0).unwrap();
        let next = ScheduledTaskManager::calculate_next_reload_time(now, 15);
        assert_eq!((next.hour(), next.minute()), (10, 30));

        // 10:50 -> 11:00
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 10, 50, 0).unwrap();
        let next = ScheduledTaskManager::calculate_next_reload_time(now, 15);
        assert_eq!((next.hour(), next.minute()), (11, 0));
    }

    #[test]
    fn test_calculate_next_reload_time_crosses_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 58, 12).unwrap();
        let next = ScheduledTaskManager::calculate_next_reload_time(now, 15);
        assert_eq!(next, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_zero_interval_treated_as_one_minute() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 59).unwrap();
        let next = ScheduledTaskManager::calculate_next_reload_time(now, 0);
        assert_eq!((next.hour(), next.minute()), (8, 1));
    }

    #[tokio::test]
    async fn test_disabled_interval_starts_nothing() {
        let updater = Arc::new(RosterUpdater::new(
            Box::new(FileRosterSource::new("missing.json")),
            RosterStore::empty(),
            RosterColumns::default(),
            false,
        ));
        let mut manager = ScheduledTaskManager::new(
            ScheduledTaskConfig {
                roster_reload_interval_minutes: 0,
                perform_initial_reload: false,
            },
            updater,
        );

        manager.start_all();
        assert_eq!(manager.task_count(), 0);
        manager.shutdown().await;
    }
}
