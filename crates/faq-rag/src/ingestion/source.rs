//! Knowledge base source loading and validation

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::KnowledgeEntry;

/// A validated set of knowledge entries plus the digest of their source
#[derive(Debug, Clone)]
pub struct KnowledgeSource {
    pub entries: Vec<KnowledgeEntry>,
    /// SHA-256 of the raw source bytes, hex encoded
    pub digest: String,
}

impl KnowledgeSource {
    /// Read a JSON array of `{id, question, answer}` records
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::SourceNotFound(path.display().to_string()),
            _ => Error::SourceNotFound(format!("{}: {}", path.display(), e)),
        })?;

        let source = Self::from_slice(&bytes).map_err(|e| match e {
            Error::SourceMalformed(msg) => {
                Error::SourceMalformed(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::info!(
            "Loaded {} knowledge base entries from {}",
            source.entries.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse and validate raw JSON
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_slice(bytes)
            .map_err(|e| Error::SourceMalformed(format!("invalid JSON: {}", e)))?;
        validate(&entries)?;

        Ok(Self {
            entries,
            digest: hex::encode(Sha256::digest(bytes)),
        })
    }

    /// Build a source from in-memory entries
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let bytes = serde_json::to_vec(&entries)?;
        validate(&entries)?;
        Ok(Self {
            entries,
            digest: hex::encode(Sha256::digest(&bytes)),
        })
    }
}

fn validate(entries: &[KnowledgeEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::SourceMalformed("no entries".to_string()));
    }

    let mut ids = HashSet::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        if entry.id.trim().is_empty() {
            return Err(Error::SourceMalformed(format!(
                "entry #{} has an empty id",
                position
            )));
        }
        if !ids.insert(entry.id.as_str()) {
            return Err(Error::SourceMalformed(format!("duplicate id '{}'", entry.id)));
        }
        if entry.question.trim().is_empty() {
            return Err(Error::SourceMalformed(format!(
                "entry '{}' has an empty question",
                entry.id
            )));
        }
        if entry.answer.trim().is_empty() {
            return Err(Error::SourceMalformed(format!(
                "entry '{}' has an empty answer",
                entry.id
            )));
        }
    }
    Ok(())
}

/// Where a build reads its entries from
#[derive(Debug, Clone)]
pub enum SourceLocation {
    /// JSON file on disk
    File(PathBuf),
    /// Entries already in memory
    Entries(Vec<KnowledgeEntry>),
}

impl SourceLocation {
    /// Load and validate the entries
    pub fn load(&self) -> Result<KnowledgeSource> {
        match self {
            SourceLocation::File(path) => KnowledgeSource::load(path),
            SourceLocation::Entries(entries) => KnowledgeSource::from_entries(entries.clone()),
        }
    }
}
