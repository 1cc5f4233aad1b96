use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::StorageError, interpreter::value::core::Number};

/// A named-profile key-value store for saved variables.
///
/// Implementations only move opaque documents in and out; encoding is handled
/// by [`Snapshot`].
pub trait ProfileStore: Send {
    /// Reads the document saved under `profile`.
    ///
    /// # Errors
    /// `StorageError::Missing` if nothing was ever saved under that name, or
    /// `StorageError::Io` if the backend failed.
    fn read(&self, profile: &str) -> Result<String, StorageError>;

    /// Replaces the document saved under `profile`.
    ///
    /// # Errors
    /// `StorageError::Io` if the backend failed.
    fn write(&mut self, profile: &str, contents: &str) -> Result<(), StorageError>;
}

/// The persisted form of the variable store.
///
/// ```json
/// {"variables": {"$foo": {"value": "0xff", "system": "hex"}}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Variables by name, including the `$`.
    pub variables: BTreeMap<String, Number>,
}

impl Snapshot {
    /// Encodes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    /// `StorageError::Encoding` if serialization fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    /// `StorageError::Encoding` if the document is not a valid snapshot.
    pub fn decode(contents: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(contents)?)
    }
}

/// Stores each profile as `<root>/<profile>.json`.
///
/// The root directory is created on first write. On Unix the directory is
/// private to the user (`0700`) and profile files are `0600`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory profiles are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `profile`.
    ///
    /// Path separators and other characters that are not portable in file
    /// names are replaced with `_`.
    #[must_use]
    pub fn path_of(&self, profile: &str) -> PathBuf {
        let name = profile.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '.'], "_");
        self.root.join(format!("{name}.json"))
    }

    fn create_root(&self) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.root)
    }

    fn open_for_write(path: &Path) -> io::Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(path)
    }
}

impl ProfileStore for FileStore {
    fn read(&self, profile: &str) -> Result<String, StorageError> {
        let path = self.path_of(profile);
        debug!(path = %path.display(), "reading profile");

        fs::read_to_string(&path).map_err(|source| match source.kind() {
                                     io::ErrorKind::NotFound => {
                                         StorageError::Missing { profile: profile.to_string() }
                                     },
                                     _ => StorageError::Io { profile: profile.to_string(),
                                                             source },
                                 })
    }

    fn write(&mut self, profile: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.path_of(profile);
        debug!(path = %path.display(), "writing profile");

        let io_error = |source: io::Error| StorageError::Io { profile: profile.to_string(),
                                                   source };
        self.create_root().map_err(io_error)?;
        let mut file = Self::open_for_write(&path).map_err(io_error)?;
        file.write_all(contents.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)
    }
}

/// An in-process store. Clones share the same profiles.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profiles: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    fn read(&self, profile: &str) -> Result<String, StorageError> {
        let profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        profiles.get(profile)
                .cloned()
                .ok_or_else(|| StorageError::Missing { profile: profile.to_string() })
    }

    fn write(&mut self, profile: &str, contents: &str) -> Result<(), StorageError> {
        let mut profiles = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);
        profiles.insert(profile.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::interpreter::value::core::NumberSystem;

    fn snapshot() -> Snapshot {
        let mut variables = BTreeMap::new();
        variables.insert("$foo".to_string(), Number::new(0, "0xff", NumberSystem::Hex));
        variables.insert("$bar".to_string(), Number::new(0, "-1.5", NumberSystem::Dec));
        Snapshot { variables }
    }

    #[test]
    fn snapshot_document_format() {
        let json: serde_json::Value = serde_json::from_str(&snapshot().encode().unwrap()).unwrap();
        assert_eq!(json,
                   serde_json::json!({
                       "variables": {
                           "$bar": {"value": "-1.5", "system": "dec"},
                           "$foo": {"value": "0xff", "system": "hex"}
                       }
                   }));
    }

    #[test]
    fn invalid_documents_are_encoding_errors() {
        assert!(matches!(Snapshot::decode("{\"variables\": 3}"), Err(StorageError::Encoding(_))));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.write("work", &snapshot().encode().unwrap()).unwrap();
        let restored = Snapshot::decode(&store.read("work").unwrap()).unwrap();

        assert_eq!(restored, snapshot());
        assert!(dir.path().join("nested").join("work.json").is_file());
    }

    #[test]
    fn file_store_missing_profile() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.read("nope"), Err(StorageError::Missing { profile }) if profile == "nope"));
    }

    #[test]
    fn profile_names_cannot_escape_the_root() {
        let store = FileStore::new("/tmp/radcalc");
        assert_eq!(store.path_of("../etc/passwd"),
                   PathBuf::from("/tmp/radcalc/___etc_passwd.json"));
        assert_eq!(store.path_of("a/../../b").parent(), Some(store.root()));
    }

    #[cfg(unix)]
    #[test]
    fn file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("profiles");
        let mut store = FileStore::new(&root);
        store.write("p", "{}").unwrap();

        let dir_mode = fs::metadata(&root).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(root.join("p.json")).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode & 0o077, 0);
        assert_eq!(file_mode & 0o077, 0);
    }

    #[test]
    fn memory_store_clones_share_profiles() {
        let mut store = MemoryStore::new();
        let view = store.clone();
        store.write("a", "{}").unwrap();
        assert_eq!(view.read("a").unwrap(), "{}");
        assert!(matches!(view.read("c"), Err(StorageError::Missing { .. })));
    }
}
