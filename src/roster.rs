use crate::error::LoadError;
use crate::model::{DriverRecord, Roster};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Parses the whole roster source before anything is constructed from it.
/// Touches no shared state, so a failed parse cannot leave a partial table
/// anywhere.
pub fn load_once(path: &Path) -> Result<Vec<DriverRecord>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<DriverRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Shared pointer to the latest complete roster snapshot.
///
/// Readers clone the `Arc` inside a short read-locked section and then work
/// against their own immutable snapshot; `publish` swaps the pointer without
/// waiting for any reader to finish with a previous version.
pub struct RosterHandle {
    current: RwLock<Arc<Roster>>,
}

impl Default for RosterHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterHandle {
    /// Starts on the explicit empty roster (version 0).
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Roster::empty())),
        }
    }

    /// Latest successfully published snapshot. Never blocks on a reload in
    /// progress and never yields a partially-built table.
    pub fn current(&self) -> Arc<Roster> {
        self.current.read().clone()
    }

    /// Builds the next snapshot from fully-parsed records and makes it
    /// current. Versions count successful publishes, starting at 1.
    pub fn publish(&self, records: Vec<DriverRecord>) -> Arc<Roster> {
        let mut guard = self.current.write();
        let next = Arc::new(Roster::from_records(records, guard.version() + 1));
        *guard = Arc::clone(&next);
        drop(guard);
        info!(
            version = next.version(),
            records = next.len(),
            "roster published"
        );
        next
    }

    /// `load_once` + `publish`. A parse failure leaves the current snapshot
    /// in place and is reported to the caller.
    pub fn reload_from(&self, path: &Path) -> Result<Arc<Roster>, LoadError> {
        let records = load_once(path)?;
        Ok(self.publish(records))
    }
}

/// Channel-driven reload loop behind the file watcher.
///
/// One queued signal stands for any number of change events: the sender side
/// uses a capacity-1 channel, and after waking the loop sleeps out the
/// debounce window and drains stragglers, so a burst of rapid modifications
/// ends in exactly one reload and reloads never overlap.
pub async fn run_reload_loop(
    mut rx: mpsc::Receiver<()>,
    handle: Arc<RosterHandle>,
    path: PathBuf,
    debounce: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => {
                if received.is_none() {
                    break;
                }
                tokio::time::sleep(debounce).await;
                while rx.try_recv().is_ok() {}
                if let Err(err) = handle.reload_from(&path) {
                    warn!(error = %err, "roster reload failed; keeping previous snapshot");
                }
            }
        }
    }
    debug!("roster reload loop stopped");
}

/// Subscribes to filesystem changes of the roster source and keeps the
/// handle fresh until cancelled.
///
/// The watcher observes the parent directory (editors commonly replace the
/// file rather than write it in place) and filters events down to the
/// source's file name. The returned watcher must be kept alive.
pub fn spawn_watcher(
    path: PathBuf,
    handle: Arc<RosterHandle>,
    debounce: Duration,
    cancel: CancellationToken,
) -> Result<(RecommendedWatcher, JoinHandle<()>), LoadError> {
    let (tx, rx) = mpsc::channel(1);
    let file_name = path.file_name().map(|n| n.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "roster watcher error");
                return;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return;
        }
        let matches_source = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if matches_source {
            // A full channel means a reload signal is already pending.
            let _ = tx.try_send(());
        }
    })?;

    let watch_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;
    info!(source = %path.display(), "watching roster source for changes");

    let task = tokio::spawn(run_reload_loop(rx, handle, path, debounce, cancel));
    Ok((watcher, task))
}
