use crate::record::{SessionPatch, SessionRecord};
use async_trait::async_trait;
use luna_core::{LunaError, LunaResult};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Bytes kept verbatim in a session file name; everything else is percent-encoded.
const KEY_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Longest encoded key used directly as a file stem. Longer keys are hashed.
const MAX_ENCODED_STEM: usize = 200;

/// Marks a hashed stem. `~` is always escaped by [`KEY_SET`], so an encoded
/// key can never start with it.
const HASHED_PREFIX: char = '~';

/// Durable per-key document store holding [`SessionRecord`]s.
///
/// `merge_set` overwrites only the fields present in the patch and creates
/// the record (with defaults for absent fields) if it does not exist. A
/// single `merge_set` is all-or-nothing.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> LunaResult<Option<SessionRecord>>;
    async fn merge_set(&self, key: &str, patch: SessionPatch) -> LunaResult<()>;
    async fn delete(&self, key: &str) -> LunaResult<()>;
    async fn list(&self) -> LunaResult<Vec<String>>;
}

/// On-disk document. `key` is only written for hashed file names, where the
/// name alone no longer tells which session the file belongs to.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(flatten)]
    record: SessionRecord,
}

/// File-based session store: one JSON document per session key.
///
/// Keys are percent-encoded into file names; keys whose encoding would be
/// too long for the filesystem are stored under the hex SHA-256 of the key.
/// Writes go to a temporary file that is renamed over the target, so a
/// failed write never leaves a half-written record behind. Each write runs
/// to completion on a blocking thread even if the caller stops waiting.
pub struct FileSessionStore {
    dir: PathBuf,
    write_lock: Arc<parking_lot::Mutex<()>>,
}

impl FileSessionStore {
    pub async fn new(dir: PathBuf) -> LunaResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Arc::new(parking_lot::Mutex::new(())),
        })
    }

    fn session_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Run `op` on a blocking thread while holding the write lock.
    async fn exclusive<T, F>(&self, op: F) -> LunaResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> LunaResult<T> + Send + 'static,
    {
        let write_lock = self.write_lock.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = write_lock.lock();
            op()
        })
        .await
        .map_err(|e| LunaError::Session(format!("Session write task failed: {e}")))?
    }
}

fn parse(data: &str) -> LunaResult<StoredSession> {
    serde_json::from_str(data)
        .map_err(|e| LunaError::Session(format!("Failed to parse session: {e}")))
}

fn read_blocking(path: &Path) -> LunaResult<Option<StoredSession>> {
    match std::fs::read_to_string(path) {
        Ok(data) => parse(&data).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> LunaResult<Option<SessionRecord>> {
        let path = self.session_path(key);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(&path).await?;
        Ok(Some(parse(&data)?.record))
    }

    async fn merge_set(&self, key: &str, patch: SessionPatch) -> LunaResult<()> {
        let stem = file_stem(key);
        let path = self.dir.join(format!("{stem}.json"));
        let key = stem.starts_with(HASHED_PREFIX).then(|| key.to_string());

        let turns = self
            .exclusive(move || {
                let mut record = read_blocking(&path)?
                    .map(|stored| stored.record)
                    .unwrap_or_default();
                record.apply(patch);
                let turns = record.history.len();

                let json = serde_json::to_string_pretty(&StoredSession { key, record })?;
                let tmp = path.with_extension("json.tmp");
                std::fs::write(&tmp, json)?;
                std::fs::rename(&tmp, &path)?;
                Ok(turns)
            })
            .await?;

        debug!(turns, "Session record written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> LunaResult<()> {
        let path = self.session_path(key);
        self.exclusive(move || match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn list(&self) -> LunaResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            if stem.starts_with(HASHED_PREFIX) {
                let data = tokio::fs::read_to_string(entry.path()).await?;
                if let Some(key) = parse(&data)?.key {
                    keys.push(key);
                }
            } else if let Some(key) = decode_stem(stem) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-process session store. Not durable; used for tests and `backend = "memory"`.
pub struct InMemorySessionStore {
    records: RwLock<HashMap<String, SessionRecord>>,
    writes: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `merge_set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> LunaResult<Option<SessionRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn merge_set(&self, key: &str, patch: SessionPatch) -> LunaResult<()> {
        let mut records = self.records.write().await;
        records.entry(key.to_string()).or_default().apply(patch);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> LunaResult<()> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn list(&self) -> LunaResult<Vec<String>> {
        let mut keys: Vec<String> = self.records.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// File stem for a client-chosen session key.
fn file_stem(key: &str) -> String {
    let encoded = utf8_percent_encode(key, KEY_SET).to_string();
    if encoded.len() <= MAX_ENCODED_STEM {
        encoded
    } else {
        format!("{HASHED_PREFIX}{}", hex::encode(Sha256::digest(key.as_bytes())))
    }
}

fn decode_stem(stem: &str) -> Option<String> {
    percent_decode_str(stem)
        .decode_utf8()
        .ok()
        .map(|key| key.into_owned())
}
