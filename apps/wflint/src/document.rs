//! A workflow document: path, raw text and the tree parsed from it.

use crate::error::{Result, WflintError};
use crate::models::node::Node;
use crate::parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub tree: Node,
}

impl Document {
    /// Parse `text` into a document. Never fails; the tree may be partial.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let tree = parser::parse(&text);
        Self {
            path: path.into(),
            text,
            tree,
        }
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| WflintError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    /// Raw lines; line `n` (1-indexed) is at index `n - 1`.
    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
