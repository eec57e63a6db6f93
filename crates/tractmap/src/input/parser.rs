//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{RecordSet, SourceMetadata};
use crate::error::{Result, TractMapError};

/// Delimiters to try when auto-detecting.
/// Candidate delimiters, in tie-breaking order.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited record files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the record set and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RecordSet, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, hash, size_bytes) = read_source(path)?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let records = self.parse_with_delimiter(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = records.row_count(),
            columns = records.column_count(),
            format = %format,
            "parsed record file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            records.row_count(),
        );

        Ok((records, metadata))
    }

    /// Parse in-memory bytes, detecting the delimiter unless configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RecordSet> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_with_delimiter(bytes, delimiter)
    }

    fn parse_with_delimiter(&self, bytes: &[u8], delimiter: u8) -> Result<RecordSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        let headers: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .map(|s| s.trim_start_matches('\u{feff}').to_string())
                .collect()
        } else {
            // Generate column names
            match rows.first() {
                Some(first) => (0..first.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                None => return Err(TractMapError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(TractMapError::EmptyData("No columns found".to_string()));
        }

        if rows.is_empty() {
            return Err(TractMapError::EmptyData("No data rows found".to_string()));
        }

        Ok(RecordSet::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole file, returning its bytes, content hash and size.
pub(crate) fn read_source(path: &Path) -> Result<(Vec<u8>, String, u64)> {
    let io_err = |e: std::io::Error| TractMapError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let size_bytes = file.metadata().map_err(io_err)?.len();

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(io_err)?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    Ok((contents, hash, size_bytes))
}

/// Pick the delimiter that splits the leading lines into the most fields.
///
/// A delimiter appearing the same number of times on every sampled line
/// beats one whose count varies. Equal candidates go to the earlier entry
/// of `DELIMITERS`, so comma wins ties.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(TractMapError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let mut counts = lines.iter().map(|line| fields_split_by(line, delim));
            let header = counts.next()?;
            if header == 0 {
                return None;
            }
            let steady = counts.all(|c| c == header);
            Some((delim, (steady, header)))
        })
        .fold(None, |best: Option<(u8, (bool, usize))>, candidate| match best {
            Some(b) if b.1 >= candidate.1 => Some(b),
            _ => Some(candidate),
        });

    Ok(best.map_or(b',', |(delim, _)| delim))
}

/// Unquoted occurrences of `delimiter` in `line`.
fn fields_split_by(line: &str, delimiter: u8) -> usize {
    line.bytes()
        .scan(false, |quoted, b| {
            if b == b'"' {
                *quoted = !*quoted;
            }
            Some(b == delimiter && !*quoted)
        })
        .filter(|&split| split)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_prefers_comma_on_tie() {
        let data = b"GEOID,time\ttransit\n11001000100,25\t0.4";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_prefers_steady_count() {
        // More commas than tabs in the header, but only tabs are steady
        let data = b"GEOID\tname, state, county, city\ttime\n1\tWard 1\t20\n2\tWard 2\t30";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"name;value\n\"Washington, DC\";1\n\"Arlington, VA\";2";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"GEOID,time,name\n11001000100,25.5,Tract 1\n11001000201,,Tract 2.01";
        let set = parser.parse_bytes(data).unwrap();

        assert_eq!(set.headers, vec!["GEOID", "time", "name"]);
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.get(0, 0), Some("11001000100"));
        assert_eq!(set.get(1, 1), Some(""));
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..Default::default()
        });
        let set = parser.parse_bytes(b"1,2\n3,4").unwrap();
        assert_eq!(set.headers, vec!["column_1", "column_2"]);
        assert_eq!(set.row_count(), 2);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"GEOID,time\n").unwrap_err();
        assert!(matches!(err, TractMapError::EmptyData(_)));
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let set = parser.parse_bytes(b"a,b\n1,2\n3,4\n5,6").unwrap();
        assert_eq!(set.row_count(), 1);
    }
}
