//! redb-backed ordered link store
//!
//! One flat table maps raw key bytes to raw URL bytes. All access goes
//! through scoped transactions: readers get a consistent snapshot, and a
//! single writer at a time either commits everything or nothing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::Mutex;
use redb::{Database, ReadOnlyTable, ReadableTable, Table, TableDefinition};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::{Result, ShortkeyError};

/// Table holding `key -> url`.
const LINKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("links");

/// Default bound on waiting for the writer slot.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// A `(key, value)` pair copied out of the store.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Durable, sorted link store.
pub struct LinkStore {
    db: Database,
    path: PathBuf,
    /// redb 的 begin_write 会无限期阻塞，用这把锁给写者排队加上超时
    writer: Mutex<()>,
    write_timeout: Duration,
}

/// Binary image of the whole store, held in a scratch file that is removed
/// when the snapshot is dropped.
#[derive(Debug)]
pub struct Snapshot {
    file: NamedTempFile,
    len: u64,
    pub records: usize,
}

impl Snapshot {
    /// Size of the image in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the image to `dest`.
    pub fn write_to(&self, dest: &Path) -> Result<()> {
        std::fs::copy(self.file.path(), dest).map_err(|e| {
            ShortkeyError::file_operation(format!(
                "failed to write snapshot to {}: {}",
                dest.display(),
                e
            ))
        })?;
        Ok(())
    }

    /// Hand over the scratch file, e.g. to stream it out.
    pub fn into_file(self) -> NamedTempFile {
        self.file
    }
}

impl LinkStore {
    /// Open (or create) the store file at `path`.
    ///
    /// Creates missing parent directories and the links table. Any failure
    /// here means the process must not start serving.
    pub fn open(path: impl AsRef<Path>, write_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShortkeyError::store_open(format!(
                    "failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let db = Database::create(&path).map_err(|e| {
            ShortkeyError::store_open(format!("failed to open {}: {}", path.display(), e))
        })?;

        let txn = db.begin_write().map_err(open_err)?;
        {
            txn.open_table(LINKS_TABLE).map_err(open_err)?;
        }
        txn.commit().map_err(open_err)?;

        info!("Link store opened at {}", path.display());

        Ok(Self {
            db,
            path,
            writer: Mutex::new(()),
            write_timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Run `f` against a read-only snapshot.
    pub fn with_read_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn) -> Result<T>,
    {
        let txn = self.db.begin_read()?;
        let reader = ReadTxn {
            table: txn.open_table(LINKS_TABLE)?,
        };
        f(&reader)
    }

    /// Run `f` inside the single write transaction.
    ///
    /// Commits when `f` returns `Ok`; otherwise the transaction is aborted
    /// and none of its writes become visible.
    pub fn with_write_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T>,
    {
        let _writer = self.writer.try_lock_for(self.write_timeout).ok_or_else(|| {
            ShortkeyError::writer_timeout(format!(
                "write lock not acquired within {}ms",
                self.write_timeout.as_millis()
            ))
        })?;

        let txn = self.db.begin_write()?;
        let outcome = {
            let mut writer = WriteTxn {
                table: txn.open_table(LINKS_TABLE)?,
            };
            f(&mut writer)
        };

        match outcome {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!("Failed to abort write transaction: {}", abort_err);
                }
                Err(e)
            }
        }
    }

    /// Copy every record into a standalone store image.
    ///
    /// The copy is taken from a single read transaction, so it reflects one
    /// committed state even while writers keep going.
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let scratch = tempfile::Builder::new()
            .prefix(".backup-")
            .suffix(".db")
            .tempfile_in(&dir)?;

        let records = self.copy_into(scratch.path())?;
        let len = scratch.as_file().metadata()?.len();
        debug!("Snapshot exported: {} records, {} bytes", records, len);

        Ok(Snapshot {
            file: scratch,
            len,
            records,
        })
    }

    fn copy_into(&self, dest: &Path) -> Result<usize> {
        let out = Database::create(dest)?;

        self.with_read_transaction(|reader| {
            let txn = out.begin_write()?;
            let mut copied = 0usize;
            {
                let mut table = txn.open_table(LINKS_TABLE)?;
                for item in reader.table.range::<&[u8]>(..)? {
                    let (key, value) = item?;
                    table.insert(key.value(), value.value())?;
                    copied += 1;
                }
            }
            txn.commit()?;
            Ok(copied)
        })
    }
}

fn open_err<E: std::fmt::Display>(err: E) -> ShortkeyError {
    ShortkeyError::store_open(err.to_string())
}

/// Read side of a transaction.
pub struct ReadTxn {
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
}

impl ReadTxn {
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|v| v.value().to_vec()))
    }

    /// Smallest key in the store.
    pub fn first_key(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.table.first()?.map(|(k, _)| k.value().to_vec()))
    }

    /// Ascending entries starting at the first key `>= start`.
    pub fn cursor_from(&self, start: &[u8]) -> Result<impl Iterator<Item = Result<Entry>> + '_> {
        let range = self.table.range(start..)?;
        Ok(range.map(|item| -> Result<Entry> {
            let (k, v) = item?;
            Ok((k.value().to_vec(), v.value().to_vec()))
        }))
    }
}

/// Write side of a transaction. Reads observe the transaction's own writes.
pub struct WriteTxn<'txn> {
    table: Table<'txn, &'static [u8], &'static [u8]>,
}

impl WriteTxn<'_> {
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|v| v.value().to_vec()))
    }

    /// Upsert.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.table.insert(key, value)?;
        Ok(())
    }

    /// Remove `key`; returns whether it existed.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.table.remove(key)?.is_some())
    }

    pub fn first_key(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.table.first()?.map(|(k, _)| k.value().to_vec()))
    }

    pub fn cursor_from(&self, start: &[u8]) -> Result<impl Iterator<Item = Result<Entry>> + '_> {
        let range = self.table.range(start..)?;
        Ok(range.map(|item| -> Result<Entry> {
            let (k, v) = item?;
            Ok((k.value().to_vec(), v.value().to_vec()))
        }))
    }
}
