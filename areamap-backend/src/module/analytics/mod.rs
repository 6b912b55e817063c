//! Interaction analytics (map clicks, searches, card views, filter changes)

mod event_log;
mod types;

pub use event_log::{AnalyticsLog, new_session_id};
pub use types::{AnalyticsEvent, EventType};
