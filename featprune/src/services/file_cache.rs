//! File-backed result cache
//!
//! Results are appended to a JSON-lines file (one cached result per line)
//! and reloaded when the cache is reopened, so a run restarted after a crash
//! or a failed round skips every candidate it already trained.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use shared::TrainResult;
use crate::core::Fingerprint;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ResultCache;

/// One line of the cache file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fingerprint: Fingerprint,
    result: TrainResult,
    cached_at: String,
}

pub struct FileCache {
    path: PathBuf,
    entries: RwLock<HashMap<Fingerprint, TrainResult>>,
    file: Mutex<fs::File>,
}

impl FileCache {
    /// Open (or create) the cache file at `path` and load its entries
    ///
    /// Lines that fail to parse, such as a line truncated by a crash, are
    /// skipped with a warning.
    pub async fn open(path: impl AsRef<Path>) -> OrchestratorResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut entries = HashMap::new();
        let mut torn_tail = false;
        if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            torn_tail = !content.is_empty() && !content.ends_with('\n');
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<CacheEntry>(line) {
                    Ok(entry) => {
                        entries.insert(entry.fingerprint, entry.result);
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = line_no + 1,
                            "⚠️ Skipping unreadable cache line: {}",
                            e
                        );
                    }
                }
            }
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| OrchestratorError::CacheError {
                message: format!("cannot open {}: {e}", path.display()),
            })?;

        // New entries must not be glued onto a truncated last line
        if torn_tail {
            file.write_all(b"\n").await?;
            file.flush().await?;
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "📂 Opened result cache");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultCache for FileCache {
    async fn get(&self, fingerprint: &Fingerprint) -> OrchestratorResult<Option<TrainResult>> {
        Ok(self.entries.read().await.get(fingerprint).cloned())
    }

    async fn put(&self, fingerprint: &Fingerprint, result: &TrainResult) -> OrchestratorResult<()> {
        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            result: result.clone(),
            cached_at: chrono::Utc::now().to_rfc3339(),
        };
        let line = serde_json::to_string(&entry)?;

        // Persist first so the in-memory view never holds an unsaved entry
        {
            let mut file = self.file.lock().await;
            file.write_all(format!("{line}\n").as_bytes()).await?;
            file.flush().await?;
        }

        self.entries.write().await.insert(entry.fingerprint, entry.result);
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
