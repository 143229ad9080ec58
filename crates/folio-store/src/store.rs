use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, JsonCodec};
use crate::config::StoreOptions;
use crate::error::{StoreError, StoreResult};
use crate::locks::LockTable;
use crate::logger::Logger;
use crate::names::{validate_key, validate_name};
use crate::paths::{self, EntryKind, Resolved};

/// Prefix and suffix of in-flight temporary files. The leading dot keeps
/// them out of collection listings.
const TEMP_PREFIX: &str = ".";
const TEMP_SUFFIX: &str = ".tmp";

/// Mode given to every record file, whatever the process umask.
#[cfg(unix)]
const RECORD_MODE: u32 = 0o644;

/// Filesystem-backed document store.
///
/// Records live at `<root>/<collection>/<resource>.<ext>`. Writes and
/// deletes take the collection's lock from the store's [`LockTable`]; reads
/// take no lock and rely on writes replacing files atomically.
pub struct RecordStore<C: Codec = JsonCodec> {
    root: PathBuf,
    codec: C,
    locks: LockTable,
    logger: Arc<dyn Logger>,
    sync_writes: bool,
}

impl RecordStore<JsonCodec> {
    /// Open a JSON store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        Self::with_codec(root, JsonCodec, options)
    }

    /// Open a JSON store with default options.
    pub fn open_default(root: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(root, StoreOptions::default())
    }
}

impl<C: Codec> RecordStore<C> {
    /// Open a store rooted at `root` that encodes records with `codec`.
    ///
    /// An existing root is reused as-is, so several instances (or several
    /// processes) can attach to the same data over time.
    pub fn with_codec(root: impl AsRef<Path>, codec: C, options: StoreOptions) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        let logger = options.logger_or_default();

        if root.is_dir() {
            logger.debug(format_args!(
                "using '{}' (store already exists)",
                root.display()
            ));
        } else {
            logger.debug(format_args!("creating the store at '{}'", root.display()));
            fs::create_dir_all(&root)
                .map_err(|e| StoreError::io("create directory", &root, e))?;
        }

        Ok(Self {
            root,
            codec,
            locks: LockTable::new(),
            logger,
            sync_writes: options.sync_writes,
        })
    }

    /// The directory all collections live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The codec records are encoded with.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Write `document` as `collection/resource`, replacing any previous
    /// version atomically.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        document: &T,
    ) -> StoreResult<()> {
        validate_key(collection, resource, "writing a record")?;

        let mut bytes = self.codec.encode(document).map_err(StoreError::Encode)?;
        bytes.push(b'\n');

        let lock = self.locks.lock_for(collection);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.root.join(collection);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io("create directory", &dir, e))?;

        let target = self.record_path(collection, resource);
        self.replace_file(&dir, &target, &bytes)?;

        self.logger.trace(format_args!(
            "wrote '{}/{}' ({} bytes)",
            collection,
            resource,
            bytes.len()
        ));
        Ok(())
    }

    /// Read and decode `collection/resource`.
    ///
    /// Existence is checked with and without the storage suffix, but the
    /// bytes always come from `<resource>.<ext>`, so a resource named
    /// `John.json` is stored and read as `John.json.json`.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> StoreResult<T> {
        let (path, bytes) = self.load_record(collection, resource, "reading a record")?;
        self.decode(&path, &bytes)
    }

    /// Read the stored bytes of `collection/resource` without decoding.
    pub fn read_raw(&self, collection: &str, resource: &str) -> StoreResult<Vec<u8>> {
        let (_, bytes) = self.load_record(collection, resource, "reading a record")?;
        Ok(bytes)
    }

    /// Read every record in `collection` as raw encoded bytes, ordered by
    /// file name.
    ///
    /// Sub-directories and hidden entries (in-flight temporary files) are
    /// skipped. The first unreadable file aborts the whole call. While
    /// writers are active the returned set may miss a record being added or
    /// hold the previous version of one being replaced.
    pub fn read_all(&self, collection: &str) -> StoreResult<Vec<Vec<u8>>> {
        let records = self.load_collection(collection, "reading all records")?;
        Ok(records.into_iter().map(|(_, bytes)| bytes).collect())
    }

    /// [`read_all`](Self::read_all) followed by decoding each record as `T`.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        self.load_collection(collection, "reading all records")?
            .into_iter()
            .map(|(path, bytes)| self.decode(&path, &bytes))
            .collect()
    }

    /// Names of the records in `collection`, sorted.
    pub fn list(&self, collection: &str) -> StoreResult<Vec<String>> {
        validate_name(collection, "collection", "listing records")?;
        let dir = self.resolve_collection(collection)?;
        let suffix = format!(".{}", self.codec.extension());
        Ok(self
            .collection_files(&dir)?
            .iter()
            .filter_map(|path| path.file_name()?.to_str()?.strip_suffix(&suffix))
            .filter(|stem| !stem.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Whether `collection/resource` names a stored record.
    pub fn exists(&self, collection: &str, resource: &str) -> StoreResult<bool> {
        validate_key(collection, resource, "checking a record")?;
        let path = self.record_path(collection, resource);
        let found = paths::stat(&path).map_err(|e| StoreError::io("stat", &path, e))?;
        Ok(matches!(found, Some(ref r) if r.is_file()))
    }

    /// Delete `collection/resource`.
    ///
    /// `resource` is resolved with and without the storage suffix. When it
    /// resolves to a regular file, the record `<resource>.<ext>` is removed;
    /// a directory (a nested collection) is removed recursively. Removing a
    /// directory is not atomic: an interrupted delete can leave part of the
    /// tree behind.
    pub fn delete(&self, collection: &str, resource: &str) -> StoreResult<()> {
        validate_key(collection, resource, "deleting a record")?;

        let lock = self.locks.lock_for(collection);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.root.join(collection).join(resource);
        let found = self
            .resolve(&path)?
            .ok_or(StoreError::NotFound { path })?;

        let record = self.record_path(collection, resource);
        self.remove(found, &record)?;
        self.logger
            .trace(format_args!("deleted '{}/{}'", collection, resource));
        Ok(())
    }

    /// Delete a whole collection and everything in it.
    pub fn delete_collection(&self, collection: &str) -> StoreResult<()> {
        validate_name(collection, "collection", "deleting a collection")?;

        let lock = self.locks.lock_for(collection);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.resolve_collection(collection)?;
        fs::remove_dir_all(&dir).map_err(|e| StoreError::io("remove directory", &dir, e))?;

        self.logger
            .trace(format_args!("deleted collection '{}'", collection));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn record_path(&self, collection: &str, resource: &str) -> PathBuf {
        paths::with_suffix(
            &self.root.join(collection).join(resource),
            self.codec.extension(),
        )
    }

    fn resolve(&self, path: &Path) -> StoreResult<Option<Resolved>> {
        paths::resolve(path, self.codec.extension()).map_err(|e| StoreError::io("stat", path, e))
    }

    fn resolve_collection(&self, collection: &str) -> StoreResult<PathBuf> {
        let path = self.root.join(collection);
        match self.resolve(&path)? {
            None => Err(StoreError::NotFound { path }),
            Some(found) => match found.kind {
                EntryKind::Directory => Ok(found.path),
                EntryKind::File => Err(StoreError::NotACollection { path: found.path }),
                EntryKind::Other => Err(StoreError::UnsupportedEntry { path: found.path }),
            },
        }
    }

    /// Write `bytes` to a temporary file in `dir`, then rename it over
    /// `target`. The temporary file is removed if any step fails.
    fn replace_file(&self, dir: &Path, target: &Path, bytes: &[u8]) -> StoreResult<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| StoreError::io("create temporary file in", dir, e))?;
        let tmp_path = tmp.path().to_path_buf();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(RECORD_MODE))
                .map_err(|e| StoreError::io("set permissions on", &tmp_path, e))?;
        }

        tmp.write_all(bytes)
            .map_err(|e| StoreError::io("write", &tmp_path, e))?;
        if self.sync_writes {
            tmp.as_file()
                .sync_all()
                .map_err(|e| StoreError::io("sync", &tmp_path, e))?;
        }

        tmp.persist(target)
            .map_err(|e| StoreError::io("replace", target, e.error))?;

        if self.sync_writes {
            sync_dir(dir).map_err(|e| StoreError::io("sync", dir, e))?;
        }
        Ok(())
    }

    fn load_record(
        &self,
        collection: &str,
        resource: &str,
        op: &'static str,
    ) -> StoreResult<(PathBuf, Vec<u8>)> {
        validate_key(collection, resource, op)?;

        let path = self.root.join(collection).join(resource);
        let found = self
            .resolve(&path)?
            .ok_or(StoreError::NotFound { path })?;

        match found.kind {
            EntryKind::File => {}
            EntryKind::Directory => return Err(StoreError::NotARecord { path: found.path }),
            EntryKind::Other => return Err(StoreError::UnsupportedEntry { path: found.path }),
        }

        // The record is always the suffixed file, even when the bare name
        // resolved. A delete may also land between resolving and reading.
        let record = self.record_path(collection, resource);
        let bytes = fs::read(&record).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                path: record.clone(),
            },
            _ => StoreError::io("read", &record, e),
        })?;
        Ok((record, bytes))
    }

    fn load_collection(
        &self,
        collection: &str,
        op: &'static str,
    ) -> StoreResult<Vec<(PathBuf, Vec<u8>)>> {
        validate_name(collection, "collection", op)?;
        let dir = self.resolve_collection(collection)?;

        let mut records = Vec::new();
        for path in self.collection_files(&dir)? {
            match fs::read(&path) {
                Ok(bytes) => records.push((path, bytes)),
                // Deleted after the directory was listed.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io("read", &path, e)),
            }
        }

        self.logger.trace(format_args!(
            "read {} records from '{}'",
            records.len(),
            collection
        ));
        Ok(records)
    }

    /// Regular files in `dir`, sorted by file name.
    ///
    /// Sub-directories and hidden entries (in-flight temporary files) are
    /// skipped, as are sockets, FIFOs and devices.
    fn collection_files(&self, dir: &Path) -> StoreResult<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::io("list", dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list", dir, e))?;
            if entry.file_name().as_encoded_bytes().first() == Some(&b'.') {
                continue;
            }

            let path = entry.path();
            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io("stat", &path, e)),
            };
            if meta.is_dir() {
                continue;
            }
            if !meta.is_file() {
                self.logger.warn(format_args!(
                    "skipping '{}': not a regular file",
                    path.display()
                ));
                continue;
            }
            files.push(path);
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn remove(&self, found: Resolved, record: &Path) -> StoreResult<()> {
        match found.kind {
            EntryKind::Directory => fs::remove_dir_all(&found.path)
                .map_err(|e| StoreError::io("remove directory", &found.path, e)),
            EntryKind::File => fs::remove_file(record).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => StoreError::NotFound {
                    path: record.to_path_buf(),
                },
                _ => StoreError::io("remove", record, e),
            }),
            EntryKind::Other => Err(StoreError::UnsupportedEntry { path: found.path }),
        }
    }

    fn decode<T: DeserializeOwned>(&self, path: &Path, bytes: &[u8]) -> StoreResult<T> {
        self.codec.decode(bytes).map_err(|reason| StoreError::Decode {
            path: path.to_path_buf(),
            reason,
        })
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl<C: Codec> std::fmt::Debug for RecordStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("root", &self.root)
            .field("extension", &self.codec.extension())
            .field("locked_collections", &self.locks.len())
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}
