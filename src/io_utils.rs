//! I/O utilities for sampling and decoding raw CSV files.
//!
//! All reads of source files flow through this module. It provides:
//!
//! - **Encoding**: label resolution via `encoding_rs`, defaulting to UTF-8.
//! - **Lenient decoding**: undecodable byte sequences are dropped rather than
//!   failing the read, and a leading byte-order mark is removed.
//! - **Line sampling**: the first few physical lines of a file, used by the
//!   delimiter sniffer.
//! - **Reader construction**: `open_csv_reader` with the builder settings
//!   used for header extraction.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::{GeneratorError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| GeneratorError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn open_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| GeneratorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads up to `limit` physical lines (terminators included) as raw bytes.
pub fn read_leading_lines(path: &Path, limit: usize) -> Result<Vec<Vec<u8>>> {
    let mut reader = open_file(path)?;
    let mut lines = Vec::with_capacity(limit);
    while lines.len() < limit {
        let mut buf = Vec::new();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| GeneratorError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        lines.push(buf);
    }
    Ok(lines)
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Decodes `bytes`, discarding anything the encoding cannot represent.
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> String {
    let text = if encoding == UTF_8 {
        decode_utf8_dropping_invalid(bytes)
    } else {
        let (text, _) = encoding.decode_without_bom_handling(bytes);
        text.chars()
            .filter(|ch| *ch != char::REPLACEMENT_CHARACTER)
            .collect()
    };
    match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Vec<String> {
    record
        .iter()
        .map(|field| decode_lossy(field, encoding))
        .collect()
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len());
    let mut rest = bytes;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                output.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..valid_up_to]) {
                    output.push_str(valid);
                }
                let skip = err.error_len().unwrap_or(rest.len() - valid_up_to);
                rest = &rest[valid_up_to + skip..];
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn invalid_utf8_bytes_are_dropped() {
        let bytes = b"na\xffme,ci\xc3ty";
        assert_eq!(decode_lossy(bytes, UTF_8), "name,city");
    }

    #[test]
    fn truncated_sequence_at_end_is_dropped() {
        let bytes = b"id,caf\xc3";
        assert_eq!(decode_lossy(bytes, UTF_8), "id,caf");
    }

    #[test]
    fn byte_order_mark_is_removed() {
        let bytes = "\u{feff}id,name".as_bytes();
        assert_eq!(decode_lossy(bytes, UTF_8), "id,name");
    }

    #[test]
    fn legacy_encodings_are_decoded() {
        let (encoded, _, _) = WINDOWS_1252.encode("Caf\u{e9}");
        assert_eq!(decode_lossy(&encoded, WINDOWS_1252), "Caf\u{e9}");
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        let err = resolve_encoding(Some("klingon")).unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownEncoding(_)));
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
    }
}
