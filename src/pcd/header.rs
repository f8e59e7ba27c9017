//! PCD text header parsing.
//!
//! A PCD file opens with ASCII `KEY value...` lines and is terminated by a
//! `DATA` line naming the body encoding. The scan is capped at 11 physical
//! lines; a file that has not produced a `DATA` line by then is rejected.
//! Individual lines that cannot be understood are logged and skipped, the
//! way real-world exporters' quirks have to be tolerated.

use std::io::BufRead;
use std::str::FromStr;

use tracing::warn;

use crate::util::{Error, Result};

/// Maximum number of physical lines scanned before giving up on `DATA`.
const HEADER_SCAN_LIMIT: usize = 11;

const DEFAULT_VERSION: &str = ".7";
const DEFAULT_VIEWPOINT: [f64; 7] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

/// Body encoding declared by the `DATA` header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Whitespace-delimited text, one point per line
    Ascii,
    /// Row-major packed records
    Binary,
    /// LZF-compressed field-major columns
    BinaryCompressed,
}

impl Encoding {
    /// The header spelling of this encoding.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Binary => "binary",
            Self::BinaryCompressed => "binary_compressed",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(Self::Ascii),
            "binary" => Some(Self::Binary),
            "binary_compressed" => Some(Self::BinaryCompressed),
            _ => None,
        }
    }
}

/// Parsed PCD header, immutable once finalized.
#[derive(Clone, Debug, PartialEq)]
pub struct PcdMetadata {
    /// Format version string, `.7` when the header does not say
    pub version: String,
    /// Field names as declared (lower-cased, duplicates not yet resolved)
    pub fields: Vec<String>,
    /// Bytes per scalar, parallel to `fields`
    pub size: Vec<usize>,
    /// TYPE codes (`F`/`U`/`I`), parallel to `fields`
    pub type_codes: Vec<String>,
    /// Per-field multiplicity; zero drops a field, negative strips padding
    pub count: Vec<i64>,
    pub width: usize,
    pub height: usize,
    /// Total number of points in the body
    pub points: usize,
    /// Sensor acquisition viewpoint: translation + quaternion
    pub viewpoint: [f64; 7],
    /// Body encoding
    pub data: Encoding,
}

/// Accumulates header keys as they are scanned; [`HeaderDraft::finalize`]
/// produces the immutable [`PcdMetadata`].
#[derive(Default)]
struct HeaderDraft {
    version: Option<String>,
    fields: Option<Vec<String>>,
    size: Option<Vec<usize>>,
    type_codes: Option<Vec<String>>,
    count: Option<Vec<i64>>,
    width: Option<usize>,
    height: Option<usize>,
    points: Option<usize>,
    viewpoint: Option<[f64; 7]>,
    data: Option<String>,
}

impl HeaderDraft {
    fn apply(&mut self, line: &str) {
        let Some((key, rest)) = split_key(line) else {
            warn!(line, "can't understand header line, skipping");
            return;
        };

        match key.to_ascii_lowercase().as_str() {
            "version" => self.version = Some(rest.to_string()),
            "fields" => {
                self.fields = Some(
                    rest.split_whitespace()
                        .map(|t| t.to_ascii_lowercase())
                        .collect(),
                )
            }
            "type" => {
                self.type_codes = Some(rest.split_whitespace().map(str::to_string).collect())
            }
            "size" => apply_list(&mut self.size, key, rest),
            "count" => apply_list(&mut self.count, key, rest),
            "width" => apply_scalar(&mut self.width, key, rest),
            "height" => apply_scalar(&mut self.height, key, rest),
            "points" => apply_scalar(&mut self.points, key, rest),
            "viewpoint" => match parse_list::<f64>(rest) {
                Ok(v) => match <[f64; 7]>::try_from(v) {
                    Ok(vp) => self.viewpoint = Some(vp),
                    Err(v) => warn!(
                        len = v.len(),
                        "VIEWPOINT does not hold 7 floats, skipping"
                    ),
                },
                Err(()) => warn!(line, "unparsable VIEWPOINT, skipping"),
            },
            "data" => self.data = Some(rest.trim().to_ascii_lowercase()),
            _ => warn!(key, "unrecognized header key, skipping"),
        }
    }

    fn finalize(self) -> Result<PcdMetadata> {
        let fields = self.fields.ok_or_else(|| Error::header("missing FIELDS"))?;
        let size = self.size.ok_or_else(|| Error::header("missing SIZE"))?;
        let type_codes = self.type_codes.ok_or_else(|| Error::header("missing TYPE"))?;
        let count = self.count.unwrap_or_else(|| vec![1; fields.len()]);

        if size.len() != fields.len()
            || type_codes.len() != fields.len()
            || count.len() != fields.len()
        {
            return Err(Error::header(format!(
                "FIELDS/SIZE/TYPE/COUNT lengths disagree: {}/{}/{}/{}",
                fields.len(),
                size.len(),
                type_codes.len(),
                count.len()
            )));
        }

        let data_str = self.data.ok_or_else(|| Error::header("missing DATA"))?;
        let data = Encoding::parse(&data_str)
            .ok_or_else(|| Error::header(format!("invalid pcd DATA: {data_str:?}")))?;

        let width = self.width.unwrap_or(0);
        let height = self.height.unwrap_or(0);
        let points = match self.points {
            Some(p) => p,
            // POINTS is not structurally required; WIDTH * HEIGHT covers
            // organized clouds that omit it
            None => match width * height {
                0 => return Err(Error::header("cannot determine point count")),
                p => p,
            },
        };

        Ok(PcdMetadata {
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            fields,
            size,
            type_codes,
            count,
            width,
            height,
            points,
            viewpoint: self.viewpoint.unwrap_or(DEFAULT_VIEWPOINT),
            data,
        })
    }
}

/// Scan the PCD header off the front of `reader`.
///
/// Consumes the stream up to and including the `DATA` line, leaving the
/// reader positioned at the first body byte.
pub fn parse_header<R: BufRead>(reader: &mut R) -> Result<PcdMetadata> {
    let mut draft = HeaderDraft::default();
    let mut line = String::new();

    for _ in 0..HEADER_SCAN_LIMIT {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        draft.apply(trimmed);
        if trimmed.starts_with("DATA") {
            return draft.finalize();
        }
    }

    Err(Error::header(format!(
        "no DATA line within the first {HEADER_SCAN_LIMIT} lines"
    )))
}

/// Split a header line into its key and the rest of the line.
///
/// Keys are single words (letters, digits, underscore); anything else is
/// unintelligible and the line gets skipped.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if key.is_empty()
        || rest.is_empty()
        || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }
    Some((key, rest))
}

fn parse_list<T: FromStr>(rest: &str) -> std::result::Result<Vec<T>, ()> {
    rest.split_whitespace()
        .map(|t| t.parse::<T>().map_err(|_| ()))
        .collect()
}

fn apply_list<T: FromStr>(slot: &mut Option<Vec<T>>, key: &str, rest: &str) {
    match parse_list(rest) {
        Ok(v) => *slot = Some(v),
        Err(()) => warn!(key, rest, "unparsable integer list, skipping"),
    }
}

fn apply_scalar(slot: &mut Option<usize>, key: &str, rest: &str) {
    match rest.parse::<usize>() {
        Ok(v) => *slot = Some(v),
        Err(_) => warn!(key, rest, "unparsable integer, skipping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn parse(s: &str) -> Result<PcdMetadata> {
        parse_header(&mut BufReader::new(s.as_bytes()))
    }

    const FULL_HEADER: &str = "\
# .PCD v0.7 - Point Cloud Data file format
VERSION 0.7
FIELDS x y z i
SIZE 4 4 4 4
TYPE F F F F
COUNT 1 1 1 1
WIDTH 2
HEIGHT 1
VIEWPOINT 0 0 0 1 0 0 0
POINTS 2
DATA binary
";

    #[test]
    fn test_parse_full_header() {
        let meta = parse(FULL_HEADER).unwrap();
        assert_eq!(meta.version, "0.7");
        assert_eq!(meta.fields, ["x", "y", "z", "i"]);
        assert_eq!(meta.size, [4, 4, 4, 4]);
        assert_eq!(meta.type_codes, ["F", "F", "F", "F"]);
        assert_eq!(meta.count, [1, 1, 1, 1]);
        assert_eq!(meta.width, 2);
        assert_eq!(meta.height, 1);
        assert_eq!(meta.points, 2);
        assert_eq!(meta.viewpoint, DEFAULT_VIEWPOINT);
        assert_eq!(meta.data, Encoding::Binary);
    }

    #[test]
    fn test_defaults_for_optional_keys() {
        let meta = parse(
            "FIELDS x y z\nSIZE 4 4 4\nTYPE F F F\nWIDTH 3\nHEIGHT 1\nPOINTS 3\nDATA ascii\n",
        )
        .unwrap();
        assert_eq!(meta.version, ".7");
        assert_eq!(meta.count, [1, 1, 1]);
        assert_eq!(meta.viewpoint, DEFAULT_VIEWPOINT);
    }

    #[test]
    fn test_fields_lower_cased() {
        let meta =
            parse("FIELDS X Y Z\nSIZE 4 4 4\nTYPE F F F\nPOINTS 1\nDATA ascii\n").unwrap();
        assert_eq!(meta.fields, ["x", "y", "z"]);
    }

    #[test]
    fn test_keys_case_insensitive() {
        let meta =
            parse("fields x\nsize 4\ntype F\npoints 1\nDATA ascii\n").unwrap();
        assert_eq!(meta.fields, ["x"]);
    }

    #[test]
    fn test_points_falls_back_to_width_times_height() {
        let meta =
            parse("FIELDS x\nSIZE 4\nTYPE F\nWIDTH 6\nHEIGHT 2\nDATA binary\n").unwrap();
        assert_eq!(meta.points, 12);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let meta = parse(
            "FIELDS x\nSIZE 4\nTYPE F\nWIDTH oops\nBOGUS-KEY 1\nPOINTS 1\nDATA ascii\n",
        )
        .unwrap();
        assert_eq!(meta.width, 0);
        assert_eq!(meta.points, 1);
    }

    #[test]
    fn test_missing_data_line() {
        let err = parse("FIELDS x\nSIZE 4\nTYPE F\nPOINTS 1\n").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_data_line_beyond_scan_limit() {
        let mut s = String::new();
        for i in 0..11 {
            s.push_str(&format!("# comment {i}\n"));
        }
        s.push_str("FIELDS x\nSIZE 4\nTYPE F\nPOINTS 1\nDATA ascii\n");
        assert!(matches!(parse(&s), Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn test_missing_required_keys() {
        for header in [
            "SIZE 4\nTYPE F\nPOINTS 1\nDATA ascii\n",
            "FIELDS x\nTYPE F\nPOINTS 1\nDATA ascii\n",
            "FIELDS x\nSIZE 4\nPOINTS 1\nDATA ascii\n",
        ] {
            assert!(matches!(parse(header), Err(Error::InvalidHeader(_))));
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = parse("FIELDS x y\nSIZE 4\nTYPE F F\nPOINTS 1\nDATA ascii\n").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let err =
            parse("FIELDS x\nSIZE 4\nTYPE F\nPOINTS 1\nDATA binary_zstd\n").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }

    #[test]
    fn test_bad_viewpoint_keeps_default() {
        let meta = parse(
            "FIELDS x\nSIZE 4\nTYPE F\nVIEWPOINT 1 2 3\nPOINTS 1\nDATA ascii\n",
        )
        .unwrap();
        assert_eq!(meta.viewpoint, DEFAULT_VIEWPOINT);
    }
}
