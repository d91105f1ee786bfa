//! File system storage for the turftap dataset

use std::fs::{self, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use turftap_core::config::StorageConfig;
use turftap_core::error::{Result, TurftapError};
use turftap_core::store::{DataFile, DataMigrator, Dataset, Store, CURRENT_SCHEMA_VERSION};

const DATA_FILE: &str = "turftap.json";
const TEMP_FILE: &str = ".turftap.json.tmp";
const LOCK_FILE: &str = "turftap.lock";

/// Stores the whole dataset in one JSON file.
///
/// A transaction holds an in-process mutex plus a lock file, reads the
/// committed file, runs the closure and replaces the file atomically. A
/// failed closure leaves the file untouched.
pub struct FileSystemStorage {
    /// Base directory for turftap data
    base_dir: PathBuf,
    lock_retries: u32,
    lock_retry_delay: Duration,
    lock_stale_after: Duration,
    writer: Mutex<()>,
}

impl FileSystemStorage {
    /// Create a new file system storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let defaults = StorageConfig::default();
        let storage = Self {
            base_dir: base_dir.into(),
            lock_retries: defaults.lock_retries,
            lock_retry_delay: Duration::from_millis(defaults.lock_retry_delay_ms),
            lock_stale_after: Duration::from_secs(defaults.lock_stale_after_secs),
            writer: Mutex::new(()),
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage from configuration, using the default directory when
    /// none is set
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let base_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_dir);
        Ok(Self::new(base_dir)?
            .with_lock_policy(config.lock_retries, Duration::from_millis(config.lock_retry_delay_ms))
            .with_stale_lock_after(Duration::from_secs(config.lock_stale_after_secs)))
    }

    /// Create storage with default directory
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// Platform data directory, falling back to `~/.turftap`
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "turftap", "turftap")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".turftap")
            })
    }

    /// How long to wait for a lock held by another process
    pub fn with_lock_policy(mut self, retries: u32, delay: Duration) -> Self {
        self.lock_retries = retries;
        self.lock_retry_delay = delay;
        self
    }

    /// Age after which a lock file is treated as abandoned
    pub fn with_stale_lock_after(mut self, age: Duration) -> Self {
        self.lock_stale_after = age;
        self
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                TurftapError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the committed data file
    pub fn data_path(&self) -> PathBuf {
        self.base_dir.join(DATA_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_dir.join(TEMP_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.base_dir.join(LOCK_FILE)
    }

    /// Whether anything has been committed yet
    pub fn exists(&self) -> bool {
        self.data_path().exists()
    }

    /// Read the committed dataset, empty when nothing is stored yet
    pub fn load(&self) -> Result<Dataset> {
        let path = self.data_path();
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Dataset::new()),
            Err(e) => return Err(TurftapError::Io(e)),
        };

        let reader = BufReader::new(file);
        let data_file: DataFile = serde_json::from_reader(reader)
            .map_err(|e| TurftapError::Serde(e).with_context(path.display().to_string()))?;

        let migrated = if DataMigrator::needs_migration(&data_file) {
            info!(
                "Migrating data from version {} to {}",
                data_file.schema_version, CURRENT_SCHEMA_VERSION
            );
            DataMigrator::migrate(data_file)?
        } else {
            data_file
        };

        Ok(migrated.into_data())
    }

    /// Write the dataset atomically (write to temp, then rename)
    fn atomic_write(&self, data: &Dataset) -> Result<()> {
        let temp_path = self.temp_path();
        let final_path = self.data_path();

        let file = DataFile::new(data.clone());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            TurftapError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| TurftapError::Io(e.into_error()))?
            .sync_all()?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TurftapError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved dataset to {:?}", final_path);
        Ok(())
    }

    /// Take the cross-process lock, retrying a bounded number of times.
    ///
    /// The lock file holds the owner's PID. A lock whose mtime is older than
    /// the stale threshold is removed and the attempt repeated.
    fn acquire_lock(&self) -> Result<LockFile> {
        let path = self.lock_path();
        let mut attempt = 0;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let lock = LockFile { path };
                    writeln!(file, "{}", std::process::id())?;
                    return Ok(lock);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.break_if_stale(&path)? {
                        continue;
                    }
                    if attempt >= self.lock_retries {
                        return Err(TurftapError::Store(format!(
                            "Data directory is locked by {} ({}). \
                             Remove the file if no turftap command is running.",
                            lock_owner(&path),
                            path.display()
                        )));
                    }
                    attempt += 1;
                    debug!("Lock busy, retry {}/{}", attempt, self.lock_retries);
                    thread::sleep(self.lock_retry_delay);
                }
                Err(e) => return Err(TurftapError::Io(e)),
            }
        }
    }

    /// Remove `path` if it has not been touched within the stale threshold
    fn break_if_stale(&self, path: &Path) -> Result<bool> {
        let modified = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            // Released between our open and this check.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(TurftapError::Io(e)),
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        if age < self.lock_stale_after {
            return Ok(false);
        }

        warn!(
            "Breaking stale lock {:?} held by {} for {}s",
            path,
            lock_owner(path),
            age.as_secs()
        );
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(TurftapError::Io(e)),
        }
    }
}

fn lock_owner(path: &Path) -> String {
    fs::read_to_string(path)
        .ok()
        .map(|pid| pid.trim().to_string())
        .filter(|pid| !pid.is_empty())
        .map(|pid| format!("process {}", pid))
        .unwrap_or_else(|| "another process".to_string())
}

impl Store for FileSystemStorage {
    fn view(&self, op: &mut dyn FnMut(&Dataset) -> Result<()>) -> Result<()> {
        // Commits are renames, so a plain read always sees a whole file.
        let data = self.load()?;
        op(&data)
    }

    fn update(&self, op: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()> {
        let _guard = self
            .writer
            .lock()
            .map_err(|_| TurftapError::Store("storage mutex poisoned".to_string()))?;
        let _lock = self.acquire_lock()?;

        let mut data = self.load()?;
        op(&mut data)?;
        self.atomic_write(&data)
    }
}

/// Removes the lock file when dropped
struct LockFile {
    path: PathBuf,
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to release lock {:?}: {}", self.path, e);
        }
    }
}
