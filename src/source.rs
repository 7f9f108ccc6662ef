//! Text I/O seams for import, export and the system clipboard.
//!
//! The session never touches files directly: it reads through a
//! [`TextSource`], writes through a [`TextSink`] and talks to a
//! [`Clipboard`]. The filesystem implementations are what the CLI uses;
//! the in-memory ones back tests and embedders without a real clipboard.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::error::{EditorError, EditorResult};

/// Read a whole text file at a logical path.
pub trait TextSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String>;
}

/// Persist a named text payload. Returns where it ended up.
pub trait TextSink {
    fn save(&mut self, filename: &str, payload: &str) -> Result<Utf8PathBuf>;
}

pub trait Clipboard {
    fn read_text(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Reads files directly from the local filesystem.
pub struct FsSource;

impl TextSource for FsSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path.as_std_path()).with_context(|| format!("Failed to read {}", path))
    }
}

/// Writes files into one directory.
pub struct DirSink {
    dir: Utf8PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TextSink for DirSink {
    fn save(&mut self, filename: &str, payload: &str) -> Result<Utf8PathBuf> {
        std::fs::create_dir_all(self.dir.as_std_path())
            .with_context(|| format!("Failed to create {}", self.dir))?;
        let path = self.dir.join(filename);
        std::fs::write(path.as_std_path(), payload)
            .with_context(|| format!("Failed to write {}", path))?;
        Ok(path)
    }
}

/// Keeps saved payloads in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: IndexMap<String, String>,
}

impl TextSink for MemorySink {
    fn save(&mut self, filename: &str, payload: &str) -> Result<Utf8PathBuf> {
        self.files.insert(filename.to_string(), payload.to_string());
        Ok(Utf8PathBuf::from(filename))
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<String> {
        self.text.clone().ok_or_else(|| anyhow!("Clipboard is empty"))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Only `.json` files (any case) are accepted for import.
pub fn ensure_json_extension(path: &Utf8Path) -> EditorResult<()> {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        _ => Err(EditorError::UnsupportedExtension(path.to_string())),
    }
}

/// `canvas-export-YYYY-MM-DD-HH-MM-SS.json`
pub fn default_export_name(now: DateTime<Utc>) -> String {
    format!("canvas-export-{}.json", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// `plantas-YYYY-MM-DD.json`
pub fn default_floors_export_name(now: DateTime<Utc>) -> String {
    format!("plantas-{}.json", now.format("%Y-%m-%d"))
}
