//! Prompt files on disk.
//!
//! A prompt named `system` is read from `{dir}/system.md`, falling back to
//! `{dir}/system.txt`. Names are single path components.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::prompt::PromptSource;
use parley_types::error::PromptError;

/// File extensions tried, in order, for a prompt name.
const EXTENSIONS: [&str; 2] = ["md", "txt"];

/// [`PromptSource`] reading plain text files from one directory.
pub struct FilePromptSource {
    dir: PathBuf,
}

impl FilePromptSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

impl PromptSource for FilePromptSource {
    async fn load(&self, name: &str) -> Result<String, PromptError> {
        if !is_valid_name(name) {
            return Err(PromptError::NotFound(name.to_string()));
        }

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{name}.{ext}"));
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    let content = content.trim_end();
                    if content.trim().is_empty() {
                        return Err(PromptError::Empty(name.to_string()));
                    }
                    tracing::debug!(prompt = name, path = %path.display(), "loaded prompt");
                    return Ok(content.to_string());
                }
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(PromptError::Read {
                        name: name.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        Err(PromptError::NotFound(name.to_string()))
    }
}
