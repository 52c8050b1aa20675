//! Corpus sources.
//!
//! A corpus source is one named, line-oriented stream of candidate domains,
//! typically one day of newly registered domains. Fetching and unpacking the
//! lists is left to the caller; this module only opens what is already on
//! disk or in memory.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::{CorpusErrorKind, Result, SquatError};

/// Trait for named streams of candidate domain lines
pub trait CorpusSource: Send + Sync {
    /// Name used in reports and logs (file name, date, ...)
    fn name(&self) -> &str;

    /// Open the stream for reading. Failure here makes the whole source
    /// unavailable.
    fn open(&self) -> Result<Box<dyn BufRead + Send + '_>>;
}

/// Corpus source backed by a single file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    /// Create a file source named after the file name of `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    /// Override the report name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send + '_>> {
        let file = File::open(&self.path).map_err(|e| {
            let kind = if e.kind() == ErrorKind::NotFound {
                CorpusErrorKind::NotFound
            } else {
                CorpusErrorKind::Unreadable
            };
            SquatError::corpus(
                kind,
                &self.name,
                format!("Failed to open '{}': {}", self.path.display(), e),
            )
        })?;

        if file.metadata().map(|m| m.is_dir()).unwrap_or(false) {
            return Err(SquatError::corpus(
                CorpusErrorKind::Unreadable,
                &self.name,
                format!("'{}' is a directory", self.path.display()),
            ));
        }

        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory corpus source
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Build from an iterator of lines.
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Vec::new();
        for line in lines {
            data.extend_from_slice(line.as_ref().as_bytes());
            data.push(b'\n');
        }
        Self::new(name, data)
    }
}

impl CorpusSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }
}

/// One file source per `*.txt` file in `dir`, sorted by file name.
pub fn sources_from_dir(dir: impl AsRef<Path>) -> Result<Vec<FileSource>> {
    let dir = dir.as_ref();
    let name = dir.display().to_string();

    let entries = fs::read_dir(dir).map_err(|e| {
        let kind = if e.kind() == ErrorKind::NotFound {
            CorpusErrorKind::NotFound
        } else {
            CorpusErrorKind::Unreadable
        };
        SquatError::corpus(kind, &name, format!("Failed to list directory: {}", e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            SquatError::corpus(
                CorpusErrorKind::ReadFailed,
                &name,
                format!("Failed to list directory: {}", e),
            )
        })?;
        let path = entry.path();
        let is_txt = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if is_txt && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths.into_iter().map(FileSource::new).collect())
}
