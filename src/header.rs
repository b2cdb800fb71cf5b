use std::{collections::HashSet, path::Path};

use encoding_rs::Encoding;
use log::warn;

use crate::{
    error::{GeneratorError, Result},
    io_utils,
    naming::normalize_name,
    sniff::DetectedFormat,
};

/// Raw header tokens alongside their normalized column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumns {
    pub raw: Vec<String>,
    pub normalized: Vec<String>,
}

/// Reads the first record of `path` and normalizes each field into a column name.
pub fn read_header_columns(
    path: &Path,
    format: DetectedFormat,
    encoding: &'static Encoding,
) -> Result<HeaderColumns> {
    let file = io_utils::open_file(path)?;
    let mut reader = io_utils::open_csv_reader(file, format.delimiter.as_byte());
    let mut record = csv::ByteRecord::new();
    let found = reader
        .read_byte_record(&mut record)
        .map_err(|source| GeneratorError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    if !found || record.is_empty() {
        return Err(GeneratorError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut raw = io_utils::decode_record(&record, encoding);
    if format.strip_spaces {
        for field in &mut raw {
            *field = field.trim().to_string();
        }
    }
    let normalized = raw.iter().map(|field| normalize_name(field)).collect();
    let columns = HeaderColumns { raw, normalized };
    warn_on_suspicious_names(path, &columns);
    Ok(columns)
}

fn warn_on_suspicious_names(path: &Path, columns: &HeaderColumns) {
    let mut seen = HashSet::new();
    for (idx, name) in columns.normalized.iter().enumerate() {
        if name.is_empty() {
            warn!(
                "Column {} ('{}') in {:?} normalizes to an empty name",
                idx + 1,
                columns.raw[idx],
                path
            );
        } else if !seen.insert(name.as_str()) {
            warn!("Column name '{name}' appears more than once in {path:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use encoding_rs::UTF_8;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::sniff::{Delimiter, detect_format};

    fn write_temp(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("write temp file");
        file
    }

    #[test]
    fn padded_header_is_stripped_and_normalized() {
        let file = write_temp(b"Hotel Name, City , Overall Rating (1-10)\nRitz, Paris, 9\n");
        let format = detect_format(file.path(), UTF_8).expect("detect");
        assert!(format.strip_spaces);
        let columns = read_header_columns(file.path(), format, UTF_8).expect("header");
        assert_eq!(columns.normalized, vec!["hotel_name", "city", "overall_rating"]);
        assert_eq!(columns.raw[1], "City");
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let file = write_temp(b"\"Name; Full\";Country\nA;B\n");
        let format = DetectedFormat {
            delimiter: Delimiter::Semicolon,
            strip_spaces: false,
        };
        let columns = read_header_columns(file.path(), format, UTF_8).expect("header");
        assert_eq!(columns.normalized, vec!["name;_full", "country"]);
    }

    #[test]
    fn duplicate_names_are_preserved() {
        let file = write_temp(b"Score,score,SCORE\n");
        let columns =
            read_header_columns(file.path(), DetectedFormat::default(), UTF_8).expect("header");
        assert_eq!(columns.normalized, vec!["score", "score", "score"]);
    }

    #[test]
    fn empty_file_has_no_header() {
        let file = write_temp(b"");
        let err = read_header_columns(file.path(), DetectedFormat::default(), UTF_8).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingHeader { .. }));
    }

    #[test]
    fn undecodable_bytes_do_not_fail_the_read() {
        let file = write_temp(b"na\xffme,city\n");
        let columns =
            read_header_columns(file.path(), DetectedFormat::default(), UTF_8).expect("header");
        assert_eq!(columns.normalized, vec!["name", "city"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_header_columns(
            Path::new("does/not/exist.csv"),
            DetectedFormat::default(),
            UTF_8,
        )
        .unwrap_err();
        assert!(matches!(err, GeneratorError::Read { .. }));
    }
}
