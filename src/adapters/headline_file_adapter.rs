//! Headline source backed by plain text files, `<base>/<SYMBOL>.txt`, one
//! headline per line.

use crate::domain::error::CouncilError;
use crate::ports::news_port::NewsPort;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct HeadlineFileAdapter {
    base_path: PathBuf,
}

impl HeadlineFileAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Reads one headline file directly; a missing file yields no headlines.
    pub fn read_file(path: &Path) -> Result<Vec<String>, CouncilError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(CouncilError::Io(e)),
        }
    }
}

impl NewsPort for HeadlineFileAdapter {
    fn headlines(&self, symbol: &str) -> Result<Vec<String>, CouncilError> {
        Self::read_file(&self.base_path.join(format!("{}.txt", symbol)))
    }
}
