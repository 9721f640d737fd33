//! Writing generated documents.
//!
//! Documents are handed over only after every category has been generated,
//! so a failed run never leaves a partial set of files behind from the
//! generation step itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::emit::Document;
use crate::error::WriteError;

/// Destination for generated documents.
pub trait DocumentSink {
    fn write_document(&mut self, file_name: &str, content: &str) -> Result<(), WriteError>;
}

/// Writes each document into one output directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectoryWriter {
    root: PathBuf,
}

impl DirectoryWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSink for DirectoryWriter {
    fn write_document(&mut self, file_name: &str, content: &str) -> Result<(), WriteError> {
        if !self.root.as_os_str().is_empty() {
            fs::create_dir_all(&self.root).map_err(|source| WriteError::CreateDir {
                path: self.root.clone(),
                source,
            })?;
        }

        let path = self.root.join(file_name);
        fs::write(&path, content).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = content.len(), "wrote document");
        Ok(())
    }
}

/// Collects documents in memory, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub documents: BTreeMap<String, String>,
}

impl DocumentSink for MemorySink {
    fn write_document(&mut self, file_name: &str, content: &str) -> Result<(), WriteError> {
        self.documents
            .insert(file_name.to_string(), content.to_string());
        Ok(())
    }
}

/// Hand every document to `sink`, stopping at the first failure.
pub fn write_all<S: DocumentSink + ?Sized>(sink: &mut S, documents: &[Document]) -> Result<usize, WriteError> {
    for document in documents {
        sink.write_document(&document.file_name, &document.content)?;
    }
    Ok(documents.len())
}
