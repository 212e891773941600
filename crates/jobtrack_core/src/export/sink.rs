//! Export delivery boundary.

use super::{ExportError, ExportPayload};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Receives a finished export payload.
pub trait ExportSink {
    /// Delivers the payload; returns where it ended up, if meaningful.
    fn deliver(&mut self, payload: &ExportPayload) -> Result<Option<PathBuf>, ExportError>;
}

/// Writes payloads as files under one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, payload: &ExportPayload) -> Result<Option<PathBuf>, ExportError> {
        let path = self.dir.join(&payload.filename);
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::write(&path, payload.content.as_bytes()));

        match result {
            Ok(()) => {
                info!(
                    "event=export_deliver module=export status=ok mime={} records={} bytes={}",
                    payload.mime_type,
                    payload.record_count,
                    payload.content.len()
                );
                Ok(Some(path))
            }
            Err(err) => {
                // Do not leave a truncated file behind.
                let _ = std::fs::remove_file(&path);
                error!(
                    "event=export_deliver module=export status=error mime={} error={}",
                    payload.mime_type, err
                );
                Err(ExportError::Sink(err))
            }
        }
    }
}
