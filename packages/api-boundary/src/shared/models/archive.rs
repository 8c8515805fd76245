//! Archive handle
//!
//! An archive is identified by its name. The name is the only key used for
//! caching, so two handles with the same name are the same archive.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{BoundaryError, Result};

/// Where the archive bytes come from
#[derive(Clone)]
pub enum ArchiveSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Opaque handle to a compiled unit (jar)
#[derive(Clone)]
pub struct Archive {
    name: String,
    source: ArchiveSource,
}

impl Archive {
    /// Archive backed by a file; its name is the path as given
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.to_string_lossy().into_owned(),
            source: ArchiveSource::Path(path),
        }
    }

    /// Archive backed by an in-memory buffer
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            source: ArchiveSource::Bytes(bytes.into()),
        }
    }

    /// Override the identity of the archive
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ArchiveSource {
        &self.source
    }

    /// Last path segment of the name (`/repo/lib-1.0.jar` -> `lib-1.0.jar`)
    pub fn file_name(&self) -> &str {
        let name = match &self.source {
            ArchiveSource::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(self.name.as_str()),
            ArchiveSource::Bytes(_) => self.name.as_str(),
        };
        name.rsplit(['/', '\\']).next().unwrap_or(name)
    }

    /// Fails with `InvalidArgument` for an archive without identity
    pub fn ensure_named(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BoundaryError::invalid_argument("Archive must have a name."));
        }
        Ok(())
    }

    /// Open a seekable stream over the archive bytes
    pub fn open(&self) -> io::Result<ArchiveReader> {
        match &self.source {
            ArchiveSource::Path(path) => {
                Ok(ArchiveReader::File(BufReader::new(File::open(path)?)))
            }
            ArchiveSource::Bytes(bytes) => Ok(ArchiveReader::Memory(Cursor::new(Arc::clone(bytes)))),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            ArchiveSource::Path(path) => Some(path),
            ArchiveSource::Bytes(_) => None,
        }
    }
}

impl fmt::Debug for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            ArchiveSource::Path(path) => format!("path={}", path.display()),
            ArchiveSource::Bytes(bytes) => format!("bytes={}", bytes.len()),
        };
        f.debug_struct("Archive")
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Archive {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Archive {}

/// Seekable reader returned by [`Archive::open`]
pub enum ArchiveReader {
    File(BufReader<File>),
    Memory(Cursor<Arc<[u8]>>),
}

impl Read for ArchiveReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ArchiveReader::File(reader) => reader.read(buf),
            ArchiveReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for ArchiveReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            ArchiveReader::File(reader) => reader.seek(pos),
            ArchiveReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_path() {
        let archive = Archive::from_path("/repo/old/lib-1.0.jar");
        assert_eq!(archive.name(), "/repo/old/lib-1.0.jar");
        assert_eq!(archive.file_name(), "lib-1.0.jar");
    }

    #[test]
    fn test_file_name_from_bytes() {
        let archive = Archive::from_bytes("new/lib-2.0.jar", vec![1u8, 2, 3]);
        assert_eq!(archive.file_name(), "lib-2.0.jar");
    }

    #[test]
    fn test_identity_is_name() {
        let a = Archive::from_bytes("lib.jar", vec![1u8]);
        let b = Archive::from_bytes("lib.jar", vec![2u8]);
        let c = Archive::from_bytes("other.jar", vec![1u8]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ensure_named() {
        assert!(Archive::from_bytes("lib.jar", Vec::<u8>::new()).ensure_named().is_ok());
        let err = Archive::from_bytes("", Vec::<u8>::new()).ensure_named().unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn test_open_memory() {
        let archive = Archive::from_bytes("lib.jar", vec![7u8, 8, 9]);
        let mut reader = archive.open().unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![7, 8, 9]);
    }

    #[test]
    fn test_open_missing_file() {
        let archive = Archive::from_path("/definitely/not/here.jar");
        assert!(archive.open().is_err());
    }
}
