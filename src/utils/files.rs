use crate::error::TeamupResult;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local JSON key-value file store used for incidental caching
///
/// Each entry is one pretty-printed `<name>.json` file under the store's
/// data directory.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonStore { dir: dir.into() }
    }

    /// Resolve the file path for an entry, not doubling a `.json` suffix
    fn path_for(&self, name: &str) -> PathBuf {
        let name = name.strip_suffix(".json").unwrap_or(name);
        self.dir.join(format!("{name}.json"))
    }

    /// Write an entry, creating the data directory if needed
    pub fn save(&self, name: &str, data: &Value) -> TeamupResult<()> {
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(data)?)?;
        debug!("saved {}", path.display());
        Ok(())
    }

    /// Read an entry back
    ///
    /// A missing entry is created as an empty object when
    /// `create_if_missing` is set, otherwise the error names the file.
    pub fn open(&self, name: &str, create_if_missing: bool) -> TeamupResult<Value> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound && create_if_missing => {
                let empty = Value::Object(serde_json::Map::new());
                self.save(name, &empty)?;
                Ok(empty)
            }
            Err(err) => Err(with_path(&path, err).into()),
        }
    }
}

fn with_path(path: &Path, err: io::Error) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {}", path.display(), err))
}
