use crate::domain::ports::{Sink, Source};
use crate::utils::error::{Result, RunnerError};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| RunnerError::io(self.describe(), e))
    }
}

/// Reads everything from a stream such as stdin.
pub struct ReaderSource<R: Read> {
    label: String,
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(label: impl Into<String>, reader: R) -> Self {
        Self {
            label: label.into(),
            reader,
        }
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.reader
            .read_to_end(&mut buffer)
            .map_err(|e| RunnerError::io(self.label.clone(), e))?;
        Ok(buffer)
    }
}

/// Writes the document to a temporary file beside the target and renames it
/// into place, so the target never holds a partial document.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl Sink for FileSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let target = self.describe();
        let dir = self.parent_dir();

        fs::create_dir_all(dir).map_err(|e| RunnerError::io(target.clone(), e))?;

        let mut staged = staging_builder()
            .tempfile_in(dir)
            .map_err(|e| RunnerError::io(target.clone(), e))?;

        // 覆寫時保留原檔權限
        if let Some(existing) = fs::metadata(&self.path).ok().filter(|m| m.is_file()) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| RunnerError::io(target.clone(), e))?;
        }

        staged
            .write_all(data)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| RunnerError::io(target.clone(), e))?;
        staged
            .persist(&self.path)
            .map_err(|e| RunnerError::io(target, e.error))?;
        Ok(())
    }
}

/// Staged files are created like `File::create` would create the target
/// (0666 minus umask on unix) rather than tempfile's owner-only 0600.
fn staging_builder() -> Builder<'static, 'static> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

/// Writes to a stream such as stdout and flushes it.
pub struct WriterSink<W: Write> {
    label: String,
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(label: impl Into<String>, writer: W) -> Self {
        Self {
            label: label.into(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.writer
            .write_all(data)
            .and_then(|_| self.writer.flush())
            .map_err(|e| RunnerError::io(self.label.clone(), e))
    }
}
