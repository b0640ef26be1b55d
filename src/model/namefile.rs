//! Name file (`<run>.nam`) parsing and rendering.
//!
//! Each non-comment line reads `FTYPE UNIT FNAME [STATUS]`.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub ftype: String,
    pub unit: i32,
    pub file: String,
    pub status: Option<String>,
}

impl NameEntry {
    pub fn new(ftype: impl Into<String>, unit: i32, file: impl Into<String>) -> Self {
        Self {
            ftype: ftype.into(),
            unit,
            file: file.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_list(&self) -> bool {
        self.ftype.eq_ignore_ascii_case("LIST")
    }
}

impl fmt::Display for NameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14} {:>4}  {}", self.ftype, self.unit, self.file)?;
        if let Some(status) = &self.status {
            write!(f, " {}", status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFile {
    pub entries: Vec<NameEntry>,
}

impl NameFile {
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                return Err(Error::NameFile(format!(
                    "line {}: expected FTYPE UNIT FNAME, got '{}'",
                    lineno + 1,
                    line
                )));
            }
            let unit = tokens[1].parse::<i32>().map_err(|_| {
                Error::NameFile(format!(
                    "line {}: invalid unit number '{}'",
                    lineno + 1,
                    tokens[1]
                ))
            })?;
            entries.push(NameEntry {
                ftype: tokens[0].to_ascii_uppercase(),
                unit,
                file: tokens[2].to_string(),
                status: tokens.get(3).map(|s| s.to_string()),
            });
        }
        Ok(Self { entries })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for NameFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Name file written by mfsession")?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
