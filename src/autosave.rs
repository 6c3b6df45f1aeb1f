//! Fire-and-forget persistence of committed snapshots.
//!
//! The session pushes each committed snapshot into an unbounded channel and
//! moves on. A background task drains the channel, keeps only the newest
//! snapshot of a burst, and saves it with bounded retries. Snapshots no newer
//! than the last saved version are skipped, so storage never goes backwards.
//! The newest saved version is published on a watch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AutosaveConfig;
use crate::domain::Itinerary;
use crate::error::{ItineraryError, Result};
use crate::storage::Storage;

pub type SnapshotSender = mpsc::UnboundedSender<Arc<Itinerary>>;

/// Handle to a running autosave task for one itinerary
pub struct AutosaveHandle {
    sender: SnapshotSender,
    saved: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    pub fn sender(&self) -> SnapshotSender {
        self.sender.clone()
    }

    /// Receiver for the newest version that reached storage
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.saved.clone()
    }

    pub fn saved_version(&self) -> u64 {
        *self.saved.borrow()
    }

    /// Waits until the pending snapshots are flushed and the task exits.
    ///
    /// Every sender handed out by [`AutosaveHandle::sender`] (including the
    /// one inside a session) must be dropped first.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.sender);
        self.task
            .await
            .map_err(|err| ItineraryError::StorageError(format!("autosave task failed: {}", err)))
    }
}

/// Starts the autosave task on the current tokio runtime
pub fn spawn_autosave(storage: Arc<dyn Storage>, config: AutosaveConfig) -> AutosaveHandle {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Arc<Itinerary>>();
    let (saved_tx, saved) = watch::channel(0u64);

    let task = tokio::spawn(async move {
        while let Some(mut snapshot) = receiver.recv().await {
            while let Ok(next) = receiver.try_recv() {
                if next.version() >= snapshot.version() {
                    snapshot = next;
                }
            }

            let version = snapshot.version();
            let last_saved = *saved_tx.borrow();
            if version <= last_saved {
                debug!(
                    itinerary_id = %snapshot.id(),
                    version,
                    last_saved,
                    "skipped snapshot no newer than saved version"
                );
                continue;
            }
            if save_with_retry(storage.as_ref(), &snapshot, &config).await {
                saved_tx.send_replace(version);
            }
        }
    });

    AutosaveHandle {
        sender,
        saved,
        task,
    }
}

async fn save_with_retry(
    storage: &dyn Storage,
    snapshot: &Itinerary,
    config: &AutosaveConfig,
) -> bool {
    let attempts = config.max_retries + 1;

    for attempt in 1..=attempts {
        match storage.save_itinerary(snapshot).await {
            Ok(()) => {
                info!(
                    itinerary_id = %snapshot.id(),
                    version = snapshot.version(),
                    attempt,
                    "autosaved itinerary"
                );
                return true;
            }
            Err(err) if attempt < attempts => {
                warn!(
                    itinerary_id = %snapshot.id(),
                    version = snapshot.version(),
                    attempt,
                    error = %err,
                    "autosave failed, retrying"
                );
                tokio::time::sleep(config.retry_delay()).await;
            }
            Err(err) => {
                warn!(
                    itinerary_id = %snapshot.id(),
                    version = snapshot.version(),
                    error = %err,
                    "autosave gave up"
                );
            }
        }
    }
    false
}
