// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entries file: one comic per line as `name;source`.

use std::path::{Path, PathBuf};

use comicpress_core::error::{ComicpressError, Result};
use tracing::info;

/// One comic to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name; also names the PDF.
    pub name: String,
    /// Directory holding the page images.
    pub source: PathBuf,
}

/// A parsed line. Malformed lines keep their error so the runner can report
/// and skip them without dropping the rest of the file.
#[derive(Debug)]
pub struct ParsedLine {
    pub line_no: usize,
    pub entry: Result<Entry>,
}

/// Parse the entries file contents. Blank lines and lines starting with `#`
/// are ignored.
pub fn parse_entries(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(i, line)| ParsedLine {
            line_no: i + 1,
            entry: parse_line(line),
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Entry> {
    let (name, source) = line.split_once(';').ok_or_else(|| {
        ComicpressError::SourceSelectorMismatch(format!("no ';' in entry \"{}\"", line.trim()))
    })?;
    let name = name.trim();
    let source = source.trim();
    if name.is_empty() || source.is_empty() {
        return Err(ComicpressError::SourceSelectorMismatch(format!(
            "entry \"{}\" needs both a name and a source",
            line.trim()
        )));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ComicpressError::SourceSelectorMismatch(format!(
            "entry name \"{name}\" must not be a path"
        )));
    }
    Ok(Entry {
        name: name.to_owned(),
        source: PathBuf::from(source),
    })
}

/// Read the entries file. A missing file is created empty and `Ok(None)` is
/// returned so the caller can tell the user to fill it in.
pub fn read_entries_file(path: &Path) -> Result<Option<Vec<ParsedLine>>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_entries(&text))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::write(path, "")?;
            info!(path = %path.display(), "created empty entries file");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
