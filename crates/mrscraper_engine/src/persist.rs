use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mrscraper_logging::{scrape_debug, scrape_info};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

/// Prefix of in-flight item files; they never carry a release name.
const PARTIAL_PREFIX: &str = ".partial-";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot prepare output directory {dir:?}: {reason}")]
    OutputDir { dir: PathBuf, reason: String },
    #[error("cannot save {file:?}: {source}")]
    Write {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    fn output_dir(dir: &Path, reason: impl ToString) -> Self {
        Self::OutputDir {
            dir: dir.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Deletes `dir` and everything under it, then recreates it empty and
/// checks that files can be created there.
pub fn reset_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            scrape_info!("Clearing previous output in {:?}", dir);
            fs::remove_dir_all(dir).map_err(|err| PersistError::output_dir(dir, err))?;
        }
        Ok(_) => return Err(PersistError::output_dir(dir, "a file is in the way")),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(PersistError::output_dir(dir, err)),
    }
    fs::create_dir_all(dir).map_err(|err| PersistError::output_dir(dir, err))?;
    Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(dir)
        .map_err(|err| PersistError::output_dir(dir, err))?;
    Ok(())
}

/// Saves item bodies into one directory. Each body lands under a hidden
/// temporary name first and is renamed onto its final name once complete.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Opens a hidden file that becomes `{dir}/{file_name}` on `commit`.
    /// Dropping it uncommitted deletes it.
    pub fn begin(&self, file_name: &str) -> Result<PartialFile, PersistError> {
        let target = self.dir.join(file_name);
        let file = Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempfile_in(&self.dir)
            .map_err(|source| PersistError::Write {
                file: target.clone(),
                source,
            })?;
        Ok(PartialFile {
            file,
            target,
            written: 0,
        })
    }

    /// Writes `content` to `{dir}/{file_name}`, replacing an existing file.
    pub fn write(&self, file_name: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        let mut partial = self.begin(file_name)?;
        partial.write_all(content).map_err(|err| partial.error(err))?;
        partial.commit()
    }
}

/// An item body being written. Implements `Write`.
pub struct PartialFile {
    file: NamedTempFile,
    target: PathBuf,
    written: u64,
}

impl PartialFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn error(&self, source: io::Error) -> PersistError {
        PersistError::Write {
            file: self.target.clone(),
            source,
        }
    }

    /// Syncs the body and renames it onto the target name.
    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        self.file.flush().map_err(|err| self.error(err))?;
        self.file.as_file().sync_all().map_err(|err| self.error(err))?;

        // Windows refuses to rename onto an existing file.
        if self.target.exists() {
            fs::remove_file(&self.target).map_err(|err| self.error(err))?;
        }
        let Self {
            file,
            target,
            written,
        } = self;
        file.persist(&target).map_err(|err| PersistError::Write {
            file: target.clone(),
            source: err.error,
        })?;
        scrape_debug!("Saved {} bytes as {:?}", written, target);
        Ok(target)
    }
}

impl Write for PartialFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
