use crate::errors::AppError;
use crate::identity::Identity;
use crate::log::CompletionLog;
use crate::models::{Task, TrackerData};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

const TASKS_FILE: &str = "tasks.json";
const LOGS_FILE: &str = "logs.json";

/// File-backed persistence, one directory per identity under `root`.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scoped(&self, identity: &Identity) -> ScopedStore {
        ScopedStore {
            dir: self.root.join(identity.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopedStore {
    dir: PathBuf,
}

impl ScopedStore {
    /// Loads tasks and log independently; a missing or unreadable file
    /// yields the empty default for that half.
    pub async fn load(&self) -> TrackerData {
        TrackerData {
            tasks: load_or_default::<Vec<Task>>(&self.dir.join(TASKS_FILE)).await,
            log: load_or_default::<CompletionLog>(&self.dir.join(LOGS_FILE)).await,
        }
    }

    pub async fn save_tasks(&self, tasks: &[Task]) -> Result<(), AppError> {
        persist(&self.dir.join(TASKS_FILE), tasks).await
    }

    pub async fn save_log(&self, log: &CompletionLog) -> Result<(), AppError> {
        persist(&self.dir.join(LOGS_FILE), log).await
    }

    pub async fn save_all(&self, data: &TrackerData) -> Result<(), AppError> {
        self.save_tasks(&data.tasks).await?;
        self.save_log(&data.log).await
    }
}

async fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

async fn persist<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(value).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKey;

    fn temp_root(label: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("relentless_{label}_{}_{nanos}", std::process::id()))
    }

    #[tokio::test]
    async fn missing_files_load_as_empty() {
        let store = Store::new(temp_root("missing"));
        let data = store.scoped(&"nobody".parse().unwrap()).load().await;
        assert_eq!(data, TrackerData::default());
    }

    #[tokio::test]
    async fn saved_data_round_trips_per_identity() {
        let root = temp_root("roundtrip");
        let store = Store::new(&root);
        let alice = store.scoped(&"alice".parse().unwrap());
        let bob = store.scoped(&"bob".parse().unwrap());

        let mut data = TrackerData::default();
        let task = Task::create("Journal", 0).unwrap();
        data.log.toggle(DateKey::from_ymd(2026, 5, 1).unwrap(), &task.id);
        data.tasks.push(task);
        alice.save_all(&data).await.unwrap();

        assert_eq!(alice.load().await, data);
        assert_eq!(bob.load().await, TrackerData::default());
        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_without_touching_the_other_half() {
        let root = temp_root("corrupt");
        let store = Store::new(&root);
        let scoped = store.scoped(&"carol".parse().unwrap());

        let task = Task::create("Walk", 0).unwrap();
        scoped.save_tasks(std::slice::from_ref(&task)).await.unwrap();
        std::fs::write(root.join("carol").join(LOGS_FILE), b"{not json").unwrap();

        let data = scoped.load().await;
        assert_eq!(data.tasks, vec![task]);
        assert!(data.log.is_empty());
        let _ = std::fs::remove_dir_all(root);
    }
}
