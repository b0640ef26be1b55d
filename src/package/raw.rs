//! Packages loaded from disk and kept as their original text.

use std::io::Write;

use crate::error::Result;
use crate::package::{GridContext, PackageKind};

/// A package read from an existing model directory.
///
/// The file contents are rewritten unchanged when the model is written.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPackage {
    pub kind: PackageKind,
    pub unit: i32,
    pub file: String,
    pub text: String,
}

impl RawPackage {
    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        w.write_all(self.text.as_bytes())?;
        Ok(())
    }

    /// Grid dimensions from a free-format DIS file.
    ///
    /// Returns `None` for other package kinds or when the header cannot be
    /// read (e.g. fixed-format files).
    pub fn grid_summary(&self) -> Option<GridContext> {
        if self.kind != PackageKind::Dis {
            return None;
        }
        let mut lines = self
            .text
            .lines()
            .map(|l| l.split('#').next().unwrap_or("").trim())
            .filter(|l| !l.is_empty());

        let header: Vec<usize> = lines
            .next()?
            .split_whitespace()
            .take(4)
            .map(|t| t.parse().ok())
            .collect::<Option<_>>()?;
        if header.len() < 4 {
            return None;
        }

        let transient = lines.any(|l| {
            l.split_whitespace()
                .last()
                .map(|t| t.eq_ignore_ascii_case("TR"))
                .unwrap_or(false)
        });

        Some(GridContext::new(
            header[0], header[1], header[2], header[3], transient,
        ))
    }
}
