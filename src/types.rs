//! Public types for the treesum API and pipeline.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::hashing::HashAlgorithm;
use crate::utils::config::PoolDefaults;

/// Digest of one regular file, as produced by a worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path as discovered by the walk (root joined with the relative components, not canonicalized).
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    /// Lowercase hex digest of the file's full content at read time.
    pub digest: String,
}

impl FileRecord {
    pub fn new(path: PathBuf, digest: String) -> Self {
        Self { path, digest }
    }
}

fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Byte-wise comparison of two paths' encoded bytes.
///
/// Unlike `Path::cmp` (component-wise), this orders `a.txt` before `a/b`.
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    a.as_os_str()
        .as_encoded_bytes()
        .cmp(b.as_os_str().as_encoded_bytes())
}

/// Records of a successful run, sorted ascending by path. Only constructible sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<FileRecord>,
}

impl ResultSet {
    /// Sort `records` by path and seal them.
    pub fn sorted(mut records: Vec<FileRecord>) -> Self {
        records.sort_by(|a, b| compare_paths(&a.path, &b.path));
        Self { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

impl IntoIterator for ResultSet {
    type Item = FileRecord;
    type IntoIter = std::vec::IntoIter<FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Options for a checksum run. Injected at [`Checksummer`](crate::Checksummer) construction.
#[derive(Clone, Debug)]
pub struct ChecksumOpts {
    /// Number of digesting workers (pool size). Must be at least 1.
    pub workers: usize,
    /// Hash applied to each file's content.
    pub algorithm: HashAlgorithm,
    /// Fail the run with a timeout if it has not finished within this duration.
    pub deadline: Option<Duration>,
}

impl Default for ChecksumOpts {
    fn default() -> Self {
        Self {
            workers: PoolDefaults::WORKERS,
            algorithm: HashAlgorithm::default(),
            deadline: None,
        }
    }
}
