mod record;

use log::{debug, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::{oneshot, watch};

pub use record::*;

enum Command {
    Begin {
        name: String,
        reply: oneshot::Sender<DownloadRecord>,
    },
    Update {
        name: String,
        progress: f64,
    },
    Reset(oneshot::Sender<()>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the progress records of a session.
///
/// The records are owned by a single task; every handle sends it commands over one channel,
/// so mutations are applied one at a time and in the order they were sent. Observers read
/// consistent snapshots through [`Registry::snapshot`] or [`Registry::subscribe`].
#[derive(Debug, Clone)]
pub struct Registry {
    tx: UnboundedSender<Command>,
    records: watch::Receiver<Vec<DownloadRecord>>,
}

impl Registry {
    /// Starts the task owning the records. Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (records_tx, records) = watch::channel(Vec::new());
        tokio::spawn(run(rx, records_tx));
        Self { tx, records }
    }

    /// Registers a download with progress 0.0. If a record with the same name already exists
    /// it is kept and returned instead.
    pub async fn begin(&self, name: impl Into<String>) -> DownloadRecord {
        let name = name.into();
        let (reply, rx) = oneshot::channel();
        self.send(Command::Begin {
            name: name.clone(),
            reply,
        });
        match rx.await {
            Ok(record) => record,
            Err(_) => {
                warn!("registry task is not running, {} is not tracked", name);
                DownloadRecord::new(name)
            }
        }
    }

    /// Overwrites the progress of the named download. Does not wait for the update to be applied.
    pub fn update(&self, name: &str, progress: f64) {
        self.send(Command::Update {
            name: name.to_string(),
            progress,
        });
    }

    /// Removes all records.
    pub async fn reset(&self) {
        let (done, rx) = oneshot::channel();
        self.send(Command::Reset(done));
        let _ = rx.await;
    }

    /// Waits until every command sent before this call has been applied.
    pub async fn flush(&self) {
        let (done, rx) = oneshot::channel();
        self.send(Command::Flush(done));
        let _ = rx.await;
    }

    pub fn snapshot(&self) -> Vec<DownloadRecord> {
        self.records.borrow().clone()
    }

    /// Returns a receiver that is notified after every applied change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<DownloadRecord>> {
        self.records.clone()
    }

    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("registry task is not running");
        }
    }
}

async fn run(mut rx: UnboundedReceiver<Command>, records: watch::Sender<Vec<DownloadRecord>>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Begin { name, reply } => {
                let mut registered = None;
                records.send_if_modified(|records| {
                    if let Some(existing) = records.iter().find(|record| record.name == name) {
                        debug!("download {} already registered", name);
                        registered = Some(existing.clone());
                        return false;
                    }
                    let record = DownloadRecord::new(name);
                    registered = Some(record.clone());
                    records.push(record);
                    true
                });
                if let Some(record) = registered {
                    let _ = reply.send(record);
                }
            }

            Command::Update { name, progress } => {
                records.send_if_modified(|records| {
                    match records.iter_mut().find(|record| record.name == name) {
                        Some(record) => {
                            record.progress = progress;
                            true
                        }
                        None => {
                            debug!("ignoring progress for unknown download {}", name);
                            false
                        }
                    }
                });
            }

            Command::Reset(done) => {
                records.send_modify(Vec::clear);
                let _ = done.send(());
            }

            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("registry closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_of(registry: &Registry) -> Vec<(String, f64)> {
        registry
            .snapshot()
            .into_iter()
            .map(|record| (record.name, record.progress))
            .collect()
    }

    #[tokio::test]
    async fn begin_registers_at_zero() {
        let registry = Registry::spawn();

        let record = registry.begin("a.txt").await;

        assert_eq!(record.progress, 0.0);
        assert_eq!(registry.snapshot(), vec![record]);
    }

    #[tokio::test]
    async fn begin_without_running_task_is_not_tracked() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (_records_tx, records) = watch::channel(Vec::new());
        drop(rx);
        let registry = Registry { tx, records };

        let record = registry.begin("a.bin").await;

        assert_eq!(record.name, "a.bin");
        assert_eq!(record.progress, 0.0);
        assert!(registry.snapshot().is_empty());
    }

    #[tokio::test]
    async fn begin_keeps_existing_record() {
        let registry = Registry::spawn();

        let first = registry.begin("a.txt").await;
        registry.update("a.txt", 0.5);
        let second = registry.begin("a.txt").await;

        assert_eq!(second.id, first.id);
        assert_eq!(second.progress, 0.5);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn updates_are_applied_in_order() {
        let registry = Registry::spawn();
        registry.begin("a.txt").await;
        registry.begin("b.txt").await;

        registry.update("a.txt", 0.25);
        registry.update("b.txt", 0.1);
        registry.update("a.txt", 0.75);
        registry.flush().await;

        assert_eq!(
            progress_of(&registry),
            vec![("a.txt".to_string(), 0.75), ("b.txt".to_string(), 0.1)]
        );
    }

    #[tokio::test]
    async fn update_of_unknown_download_is_ignored() {
        let registry = Registry::spawn();
        registry.begin("a.txt").await;

        registry.update("missing.txt", 1.0);
        registry.flush().await;

        assert_eq!(progress_of(&registry), vec![("a.txt".to_string(), 0.0)]);
    }

    #[tokio::test]
    async fn reset_clears_records() {
        let registry = Registry::spawn();
        registry.begin("a.txt").await;
        registry.update("a.txt", 1.0);

        registry.reset().await;
        assert!(registry.snapshot().is_empty());

        let record = registry.begin("a.txt").await;
        assert_eq!(record.progress, 0.0);
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let registry = Registry::spawn();
        let mut rx = registry.subscribe();

        registry.begin("a.txt").await;
        rx.changed().await.expect("registry is running");

        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
