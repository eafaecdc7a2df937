//! Scoped working-directory swap for file paths the image codecs cannot open directly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::PlotResult;

/// Resolves a path for a codec call, swapping the process working directory
/// to the file's parent while the handler is alive if the path is not ASCII.
///
/// The previous working directory is restored on drop, including when the
/// guarded call fails. The working directory is process-wide, so handlers
/// are not reentrant: do not nest them or hold them on more than one thread.
#[derive(Debug)]
pub struct PathHandler {
    path: PathBuf,
    restore: Option<PathBuf>,
}

impl PathHandler {
    pub fn new(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        if path.to_string_lossy().is_ascii() {
            return Ok(Self {
                path: path.to_path_buf(),
                restore: None,
            });
        }

        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(&parent)?;
        tracing::debug!("Switched working directory to {:?}", parent);

        Ok(Self {
            path: PathBuf::from(file_name),
            restore: Some(previous),
        })
    }

    /// The path to hand to the codec while this handler is alive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_swapped(&self) -> bool {
        self.restore.is_some()
    }
}

impl Drop for PathHandler {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            if let Err(e) = std::env::set_current_dir(&previous) {
                tracing::error!("Failed to restore working directory {:?}: {}", previous, e);
            }
        }
    }
}
