//! Input resources
//!
//! A [`Resource`] names a regexml document and opens a fresh reader over it
//! each time it is asked, so a document can be read once for validation and
//! again for translation.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{RegexmlError, Result};

/// A readable regexml document
pub trait Resource {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Open a new reader positioned at the start of the document
    fn open(&self) -> Result<Box<dyn BufRead + '_>>;
}

/// A document on the file system
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
    name: String,
}

impl FileResource {
    /// Create a resource for the file at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        FileResource { path, name }
    }

    /// The file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        if !self.path.is_file() {
            return Err(RegexmlError::ResourceNotFound {
                name: self.name.clone(),
                reason: "not a file".to_string(),
            });
        }
        let file = File::open(&self.path).map_err(|err| RegexmlError::ResourceNotFound {
            name: self.name.clone(),
            reason: err.to_string(),
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A document held in memory, e.g. compiled into the binary with `include_str!`
#[derive(Debug, Clone)]
pub struct EmbeddedResource {
    name: String,
    content: Cow<'static, str>,
}

impl EmbeddedResource {
    /// Create a resource named `name` holding `content`
    pub fn new(name: impl Into<String>, content: impl Into<Cow<'static, str>>) -> Self {
        EmbeddedResource {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The document text
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Resource for EmbeddedResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(self.content.as_bytes()))
    }
}
