use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::Roster;

/// Shared holder of the current roster snapshot.
///
/// Readers get an `Arc<Roster>` that stays valid and unchanged for as long
/// as they hold it; a reload swaps in a whole new snapshot.
#[derive(Clone)]
pub struct RosterStore {
    current: Arc<RwLock<Arc<Roster>>>,
}

impl RosterStore {
    pub fn new(roster: Roster) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(roster))),
        }
    }

    pub fn empty() -> Self {
        Self::new(Roster::empty())
    }

    pub async fn snapshot(&self) -> Arc<Roster> {
        self.current.read().await.clone()
    }

    /// Publish a new snapshot, returning the one it replaced.
    pub async fn replace(&self, roster: Roster) -> Arc<Roster> {
        let mut current = self.current.write().await;
        std::mem::replace(&mut *current, Arc::new(roster))
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::empty()
    }
}
