//! Document file I/O
//!
//! Reads are plain whole-file reads. Writes are guarded and atomic:
//!
//! 1. If the target exists it is opened read/write and an exclusive
//!    non-blocking lock is attempted. Contention aborts the write with
//!    [`CodecError::Locked`]; a missing target is fine.
//! 2. The new contents go to a temporary file in the target's directory,
//!    which is flushed and then renamed over the target.
//!
//! The lock probe only sees advisory locks taken by cooperating processes.
//!
//! [`DocumentLoader`] bundles the configured ingestor and format registry
//! into the parse-file / write-file pair used by the command line.

use crate::building::RecordBuilder;
use crate::config::FollowersConfig;
use crate::error::CodecError;
use crate::formats::FormatRegistry;
use crate::ingest::{IngestOptions, Ingestor};
use crate::model::FollowerSet;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Read a whole document into memory
pub fn read_document(path: impl AsRef<Path>) -> Result<String, CodecError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|err| CodecError::io(path, err))
}

/// Fail with [`CodecError::Locked`] if another handle holds a lock on `path`
pub fn ensure_not_locked(path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let file = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(CodecError::io(path, err)),
    };
    probe_lock(&file).map_err(|err| match err {
        TryLockError::WouldBlock => {
            warn!(path = %path.display(), "document is locked by another process");
            CodecError::Locked {
                path: path.to_path_buf(),
            }
        }
        TryLockError::Error(err) => CodecError::io(path, err),
    })
}

fn probe_lock(file: &File) -> Result<(), TryLockError> {
    file.try_lock()?;
    file.unlock().map_err(TryLockError::Error)
}

/// Replace the contents of `path` atomically
pub fn write_document(path: impl AsRef<Path>, contents: &str) -> Result<(), CodecError> {
    let path = path.as_ref();
    ensure_not_locked(path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| CodecError::io(dir, err))?;
    temp.write_all(contents.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| CodecError::io(temp.path(), err))?;
    temp.persist(path)
        .map_err(|err| CodecError::io(path, err.error))?;

    info!(path = %path.display(), bytes = contents.len(), "wrote document");
    Ok(())
}

/// Configured parse / serialize pipeline for document files
pub struct DocumentLoader {
    ingestor: Ingestor,
    formats: FormatRegistry,
    write_format: String,
}

impl DocumentLoader {
    pub fn new(ingestor: Ingestor, formats: FormatRegistry, write_format: impl Into<String>) -> Self {
        Self {
            ingestor,
            formats,
            write_format: write_format.into(),
        }
    }

    pub fn from_config(config: &FollowersConfig) -> Self {
        let ingestor = Ingestor::new(
            config.parse.matcher.matcher(),
            RecordBuilder::new(config.parse.field_policy),
            IngestOptions::from(&config.ingest),
        );
        Self::new(ingestor, FormatRegistry::with_defaults(), config.write.format.clone())
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Parse text that is already in memory
    pub async fn parse(&self, source: &str) -> Result<FollowerSet, CodecError> {
        Ok(self.ingestor.ingest(source).await?)
    }

    /// Read and parse a document file
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<FollowerSet, CodecError> {
        let source = read_document(path)?;
        self.parse(&source).await
    }

    /// Serialize with the configured format
    pub fn render(&self, set: &FollowerSet) -> Result<String, CodecError> {
        self.render_as(set, &self.write_format)
    }

    pub fn render_as(&self, set: &FollowerSet, format: &str) -> Result<String, CodecError> {
        Ok(self.formats.serialize(set, format)?)
    }

    /// Write with the configured format
    pub fn save(&self, set: &FollowerSet, path: impl AsRef<Path>) -> Result<(), CodecError> {
        self.save_as(set, path, &self.write_format)
    }

    pub fn save_as(
        &self,
        set: &FollowerSet,
        path: impl AsRef<Path>,
        format: &str,
    ) -> Result<(), CodecError> {
        let contents = self.render_as(set, format)?;
        write_document(path, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_defaults;
    use crate::model::Follower;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cult.txt");
        write_document(&path, "first").unwrap();
        write_document(&path, "second").unwrap();
        assert_eq!(read_document(&path).unwrap(), "second");
    }

    #[test]
    fn test_missing_file_is_an_io_error_on_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match read_document(&path) {
            Err(CodecError::Io { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("cult.json");
        assert!(matches!(
            write_document(&path, "x"),
            Err(CodecError::Io { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_locked_target_is_left_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cult.json");
        fs::write(&path, "original").unwrap();

        let holder = File::open(&path).unwrap();
        holder.lock().unwrap();

        assert!(matches!(
            write_document(&path, "replacement"),
            Err(CodecError::Locked { .. })
        ));
        drop(holder);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[tokio::test]
    async fn test_loader_round_trip() {
        let loader = DocumentLoader::from_config(&load_defaults().unwrap());
        let dir = tempdir().unwrap();
        let path = dir.path().join("cult.txt");

        let set = FollowerSet::from(vec![
            Follower::new("f1", "Seed").with_trigger("grow", "f2"),
            Follower::new("f2", "Sprout").with_aspect("growth", 4),
        ]);
        loader.save(&set, &path).unwrap();
        let reloaded = loader.load(&path).await.unwrap();
        assert_eq!(reloaded, set);
    }

    #[test]
    fn test_unknown_format() {
        let loader = DocumentLoader::from_config(&load_defaults().unwrap());
        let err = loader.render_as(&FollowerSet::new(), "xml").unwrap_err();
        assert_eq!(err.to_string(), "Format 'xml' not found");
    }
}
