use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes `{dir}/{filename}` through a temp file in the same directory, then
/// renames it over the target. Readers never see a half-written file.
///
/// The published file keeps the mode of the file it replaces; a new file gets
/// the usual `0666` minus umask.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Runs `fill` against a buffered temp file and publishes it on success.
    /// On any error the temp file is dropped and the target is left untouched.
    pub fn write_with<E, F>(&self, filename: &str, fill: F) -> Result<PathBuf, E>
    where
        E: From<PersistError>,
        F: FnOnce(&mut dyn Write) -> Result<(), E>,
    {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = temp_file_for(&self.dir, &target)?;
        {
            let mut buffered = BufWriter::new(tmp.as_file_mut());
            fill(&mut buffered)?;
            buffered.flush().map_err(PersistError::from)?;
        }
        tmp.as_file_mut().sync_all().map_err(PersistError::from)?;

        tmp.persist(&target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

fn temp_file_for(dir: &Path, target: &Path) -> Result<NamedTempFile, PersistError> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(target) {
        fs::set_permissions(tmp.path(), existing.permissions())?;
    }
    Ok(tmp)
}
