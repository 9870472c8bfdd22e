//! Audit storage backends.

use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::AuditError;
use crate::event::AuditEvent;
use crate::logger::AuditFilter;

/// Where recorded events go.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    async fn store(&self, event: AuditEvent) -> Result<(), AuditError>;

    /// Matching events, newest first.
    async fn query(&self, filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError>;
}

/// Swallows everything. Used when auditing is disabled.
pub struct NullStorage;

#[async_trait]
impl AuditStorage for NullStorage {
    async fn store(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        Ok(Vec::new())
    }
}

/// Prints the human-readable line to stdout; nothing is retained, so queries
/// come back empty.
pub struct ConsoleStorage;

#[async_trait]
impl AuditStorage for ConsoleStorage {
    async fn store(&self, event: AuditEvent) -> Result<(), AuditError> {
        println!("{}", event.to_log_line());
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        Ok(Vec::new())
    }
}

/// JSON lines appended to a file, held open for the lifetime of the store.
///
/// Existing lines are loaded on open so `query` sees the whole history, not
/// just this process's events. Unreadable lines (truncated writes, older
/// formats) are skipped with a warning rather than failing the open.
pub struct FileStorage {
    file: Mutex<File>,
    events: RwLock<Vec<AuditEvent>>,
    /// Mirror each event's log line to stdout too.
    echo: bool,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let events = if path.exists() {
            load_events(&path)
        } else {
            Vec::new()
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
            events: RwLock::new(events),
            echo: false,
        })
    }

    /// Also print each stored event to stdout.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }
}

fn load_events(path: &Path) -> Vec<AuditEvent> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<AuditEvent>(line) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable audit line");
                None
            }
        })
        .collect()
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn store(&self, event: AuditEvent) -> Result<(), AuditError> {
        let json = serde_json::to_string(&event)?;

        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| AuditError::StorageError("audit file lock poisoned".to_string()))?;
            writeln!(file, "{json}")?;
        }

        if self.echo {
            println!("{}", event.to_log_line());
        }

        self.events
            .write()
            .map_err(|_| AuditError::StorageError("audit index lock poisoned".to_string()))?
            .push(event);

        Ok(())
    }

    async fn query(&self, filter: AuditFilter) -> Result<Vec<AuditEvent>, AuditError> {
        let events = self
            .events
            .read()
            .map_err(|_| AuditError::StorageError("audit index lock poisoned".to_string()))?;

        let skip = filter.offset.unwrap_or(0);
        let take = filter.limit.unwrap_or(usize::MAX);

        Ok(events
            .iter()
            .rev()
            .filter(|event| filter.matches(event))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuditAction;

    fn placed(actor: &str, order: i64) -> AuditEvent {
        AuditEvent::record(
            actor,
            format!("order/{order}"),
            AuditAction::OrderPlaced {
                quantity: 1,
                amount: 10.0,
            },
        )
    }

    #[tokio::test]
    async fn test_console_storage_is_write_only() {
        let storage = ConsoleStorage;
        storage.store(placed("vendor", 1)).await.unwrap();
        assert!(storage.query(AuditFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_storage_filters_by_actor() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("audit.log")).unwrap();

        storage.store(placed("vendor", 1)).await.unwrap();
        storage.store(placed("admin", 2)).await.unwrap();

        let results = storage
            .query(AuditFilter {
                actor: Some("admin".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity, "order/2");
    }

    #[tokio::test]
    async fn test_file_storage_newest_first_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("audit.log")).unwrap();

        for n in 1..=5 {
            storage.store(placed("vendor", n)).await.unwrap();
        }

        let results = storage
            .query(AuditFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entity, "order/5");
        assert_eq!(results[1].entity, "order/4");
    }

    #[tokio::test]
    async fn test_file_storage_reloads_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.store(placed("vendor", 9)).await.unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        let results = reopened.query(AuditFilter::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity, "order/9");
    }
}
