//! Loading Ivrit source code into a program of code lines

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::error::{IvritError, Result};
use crate::syntax::keywords::COMMENT;

/// The code lines of a program, 0-indexed. Blank and comment lines are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceProgram {
    lines: Vec<String>,
}

impl SourceProgram {
    /// Build a program from raw lines, dropping blank and comment lines
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT))
            .collect();
        SourceProgram { lines }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// The line at a 0-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Supplies the raw text of a program
pub trait SourceLoader {
    fn load(&self) -> Result<SourceProgram>;
}

/// Loads a program from a file. The path may be wrapped in quotes.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref().trim();
        let path = path
            .strip_prefix('"')
            .and_then(|p| p.strip_suffix('"'))
            .unwrap_or(path);
        FileLoader {
            path: PathBuf::from(path),
        }
    }
}

impl SourceLoader for FileLoader {
    fn load(&self) -> Result<SourceProgram> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| IvritError::Load(format!("{}: {}", self.path.display(), e)))?;
        let program = SourceProgram::from_text(&text);
        info!(
            "loaded {} code line(s) from {}",
            program.len(),
            self.path.display()
        );
        Ok(program)
    }
}

/// Loads a program from text held in memory
#[derive(Debug, Clone)]
pub struct TextLoader {
    text: String,
}

impl TextLoader {
    pub fn new(text: impl Into<String>) -> Self {
        TextLoader { text: text.into() }
    }
}

impl SourceLoader for TextLoader {
    fn load(&self) -> Result<SourceProgram> {
        Ok(SourceProgram::from_text(&self.text))
    }
}
