//! Delimiter and padding detection from the first non-blank line of a file.

use std::{fmt, path::Path};

use encoding_rs::Encoding;
use serde::Serialize;

use crate::{error::Result, io_utils};

/// Number of physical lines inspected when looking for a header line.
pub const SNIFF_LINE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Candidates in tie-breaking order.
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }

    pub fn is_default(self) -> bool {
        self == Delimiter::Comma
    }

    /// Rendering used inside SQL string literals and log lines.
    pub fn escaped(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Semicolon => ";",
            Delimiter::Tab => "\\t",
            Delimiter::Pipe => "|",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.escaped())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectedFormat {
    pub delimiter: Delimiter,
    /// Header fields are padded with a space after each comma.
    pub strip_spaces: bool,
}

impl Default for DetectedFormat {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            strip_spaces: false,
        }
    }
}

/// Sniffs the delimiter of `path` from the first non-blank of its leading lines.
pub fn detect_format(path: &Path, encoding: &'static Encoding) -> Result<DetectedFormat> {
    let lines = io_utils::read_leading_lines(path, SNIFF_LINE_LIMIT)?;
    let header = lines
        .iter()
        .map(|bytes| io_utils::decode_lossy(bytes, encoding))
        .find(|line| !line.trim().is_empty());
    Ok(header
        .map(|line| detect_from_line(&line))
        .unwrap_or_default())
}

/// Picks the most frequent candidate delimiter in `line`.
///
/// Only a strictly higher count displaces an earlier candidate, so comma wins
/// ties and a line without any candidate falls back to comma.
pub fn detect_from_line(line: &str) -> DetectedFormat {
    let mut best = Delimiter::Comma;
    let mut best_count = 0usize;
    for candidate in Delimiter::CANDIDATES {
        let count = line.matches(candidate.as_char()).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    let strip_spaces = best == Delimiter::Comma && comma_space_majority(line);
    DetectedFormat {
        delimiter: best,
        strip_spaces,
    }
}

fn comma_space_majority(line: &str) -> bool {
    let commas = line.matches(',').count();
    if commas == 0 {
        return false;
    }
    let padded = line.matches(", ").count();
    padded * 2 > commas
}
