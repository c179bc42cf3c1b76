//! # Export Files
//!
//! Writes voxel buffers to `{directory}/{prefix}_{frame:04}.raw`. The file
//! holds the buffer bytes and nothing else.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use abyssal_volume::ExportBuffer;

use crate::error::PipelineResult;

/// Frame-indexed writer for exported voxel buffers.
#[derive(Clone, Debug)]
pub struct ExportWriter {
    directory: PathBuf,
    prefix: String,
}

impl ExportWriter {
    /// Creates a writer for `directory`. Nothing is touched until `write`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Output folder.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the buffer for `frame` is written to.
    #[must_use]
    pub fn path_for(&self, frame: u32) -> PathBuf {
        self.directory.join(format!("{}_{frame:04}.raw", self.prefix))
    }

    /// Writes `buffer` as frame `frame`, creating the folder if needed.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from creating the folder or writing the file.
    pub fn write(&self, buffer: &ExportBuffer, frame: u32) -> PipelineResult<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(frame);
        let file = File::create(&path)?;
        buffer.write_to(BufWriter::new(file))?;
        tracing::info!("Exported {} bytes to {}", buffer.len(), path.display());
        Ok(path)
    }
}
