//! Change notifier for the prompt storage directory.
//!
//! A recursive file-system watcher publishes one [`CollectionChanged`] event
//! per observed mutation (file created, written, removed or renamed) on a
//! broadcast channel. Bursts are not coalesced; subscribers decide how to
//! batch them.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use notify::event::{EventKind, ModifyKind};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Capacity of the broadcast channel; slower subscribers lag past this.
const CHANNEL_CAPACITY: usize = 64;

/// Rename cookies remembered to pair the halves of one rename.
const RENAME_WINDOW: usize = 16;

/// Signal that the stored prompt collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionChanged;

/// Whether a watch is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    Watching,
}

#[derive(Debug, Error)]
enum WatchError {
    #[error("cannot create '{path}': {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot watch: {0}")]
    Watcher(#[from] notify::Error),
}

/// A running watch. Dropping the watcher ends the subscription.
struct ActiveWatch {
    cancel: CancellationToken,
    _watcher: RecommendedWatcher,
}

/// Watches a directory and broadcasts change events.
pub struct ChangeNotifier {
    root: PathBuf,
    sender: broadcast::Sender<CollectionChanged>,
    active: Mutex<Option<ActiveWatch>>,
}

impl ChangeNotifier {
    /// Create an idle notifier for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            root: root.into(),
            sender,
            active: Mutex::new(None),
        }
    }

    /// Receive every change event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChanged> {
        self.sender.subscribe()
    }

    /// Start watching. A watch already running is cancelled first.
    ///
    /// Setup failures are logged and leave the notifier [`NotifierState::Idle`].
    pub fn start(&self) {
        let mut active = self.lock();
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
            debug!("Cancelled previous watch");
        }

        let cancel = CancellationToken::new();
        match open_watcher(&self.root, self.sender.clone(), cancel.clone()) {
            Ok(watcher) => {
                *active = Some(ActiveWatch {
                    cancel,
                    _watcher: watcher,
                });
                info!("Watching {} for changes", self.root.display());
            }
            Err(e) => error!("Failed to start watching prompts: {}", e),
        }
    }

    /// Stop watching. Does nothing when idle.
    pub fn stop(&self) {
        if let Some(watch) = self.lock().take() {
            watch.cancel.cancel();
            info!("Stopped watching {}", self.root.display());
        }
    }

    pub fn state(&self) -> NotifierState {
        match self.lock().as_ref() {
            Some(watch) if !watch.cancel.is_cancelled() => NotifierState::Watching,
            _ => NotifierState::Idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveWatch>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ChangeNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_watcher(
    root: &Path,
    sender: broadcast::Sender<CollectionChanged>,
    cancel: CancellationToken,
) -> Result<RecommendedWatcher, WatchError> {
    std::fs::create_dir_all(root).map_err(|source| WatchError::Setup {
        path: root.to_path_buf(),
        source,
    })?;

    let mut filter = MutationFilter::default();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        // Events still in flight when the watch is cancelled are dropped.
        if cancel.is_cancelled() {
            return;
        }
        match result {
            Ok(event) if filter.is_mutation(&event) => {
                debug!("Storage changed ({:?}): {:?}", event.kind, event.paths);
                if sender.send(CollectionChanged).is_err() {
                    debug!("No subscribers for change notification");
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watch error: {}", e),
        }
    })?;
    watcher.watch(root, RecursiveMode::Recursive)?;
    Ok(watcher)
}

/// Decides which raw watcher events count as one collection mutation.
///
/// Reads, opens and attribute changes are ignored. A rename reported as
/// several events sharing a tracker cookie counts once.
#[derive(Debug, Default)]
struct MutationFilter {
    renames: VecDeque<usize>,
}

impl MutationFilter {
    fn is_mutation(&mut self, event: &Event) -> bool {
        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => true,
            EventKind::Modify(ModifyKind::Name(_)) => match event.attrs.tracker() {
                Some(cookie) => self.first_sighting(cookie),
                None => true,
            },
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => false,
        }
    }

    fn first_sighting(&mut self, cookie: usize) -> bool {
        if self.renames.contains(&cookie) {
            return false;
        }
        if self.renames.len() == RENAME_WINDOW {
            self.renames.pop_front();
        }
        self.renames.push_back(cookie);
        true
    }
}
