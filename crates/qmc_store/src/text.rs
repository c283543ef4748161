//! Whitespace-separated text stream format.
//!
//! ```text
//! bitsize s m
//! w(0,0) w(0,1) ... w(0,s-1)
//! ...
//! w(m-1,0) ... w(m-1,s-1)
//! [wafom [tvalue]]
//! ```
//!
//! The trailing quality metrics are optional; a missing or `nan` wafom and a
//! missing or negative t-value are read as absent.

use std::io::{self, Read, Write};
use std::str::{FromStr, SplitWhitespace};

use crate::error::ParseError;
use crate::record::{word_count, NetRecord};

/// Parses one record from a text stream.
///
/// # Errors
///
/// Returns `ParseError` for a missing or malformed header, an unsupported
/// bit size, a shape whose word count overflows, fewer than `s * m` words,
/// or an unparseable token.
///
/// # Examples
///
/// ```rust
/// use qmc_store::text::read_text;
///
/// let input = "32 2 2\n2147483648 2147483648\n1073741824 3221225472\n-4.5 0\n";
/// let record = read_text(input.as_bytes()).unwrap();
/// assert_eq!(record.bit_size, 32);
/// assert_eq!(record.words.len(), 4);
/// assert_eq!(record.wafom, Some(-4.5));
/// assert_eq!(record.tvalue, Some(0));
/// ```
pub fn read_text<R: Read>(mut reader: R) -> Result<NetRecord, ParseError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_text(&content)
}

/// Parses one record from an in-memory string.
///
/// # Errors
///
/// As [`read_text`].
pub fn parse_text(content: &str) -> Result<NetRecord, ParseError> {
    let mut tokens = content.split_whitespace();
    let bit_size: u32 = next_field(&mut tokens, "bit size")?;
    let dimension: usize = next_field(&mut tokens, "dimension")?;
    let precision: u32 = next_field(&mut tokens, "precision")?;
    if bit_size != 32 && bit_size != 64 {
        return Err(ParseError::UnsupportedBitSize(bit_size));
    }

    // The header is untrusted; words are only allocated as they are read.
    let expected = word_count(dimension, precision)?;
    let mut words = Vec::new();
    for token in tokens.by_ref().take(expected) {
        words.push(parse_token::<u64>(token, "matrix word")?);
    }
    if words.len() < expected {
        return Err(ParseError::TooFewWords {
            expected,
            actual: words.len(),
        });
    }

    let wafom = tokens
        .next()
        .map(|t| parse_token::<f64>(t, "wafom"))
        .transpose()?
        .filter(|w| !w.is_nan());
    let tvalue = tokens
        .next()
        .map(|t| parse_token::<i32>(t, "t-value"))
        .transpose()?
        .filter(|&t| t >= 0);

    Ok(NetRecord {
        bit_size,
        dimension,
        precision,
        words,
        wafom,
        tvalue,
    })
}

fn next_field<T: FromStr>(
    tokens: &mut SplitWhitespace<'_>,
    field: &'static str,
) -> Result<T, ParseError> {
    let token = tokens.next().ok_or(ParseError::Truncated("header"))?;
    parse_token(token, field)
}

fn parse_token<T: FromStr>(token: &str, field: &'static str) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidToken {
        field,
        token: token.to_string(),
    })
}

/// Writes a record in the text format, one bit row per line.
///
/// Only the first `s * m` words are written. An absent wafom followed by a
/// present t-value is written as `nan`.
///
/// # Errors
///
/// Propagates writer failures.
pub fn write_text<W: Write>(mut writer: W, record: &NetRecord) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {}",
        record.bit_size, record.dimension, record.precision
    )?;
    let used = record.dimension.saturating_mul(record.precision as usize);
    if record.dimension > 0 {
        for row in record.words[..used.min(record.words.len())].chunks(record.dimension) {
            let line: Vec<String> = row.iter().map(u64::to_string).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
    }
    match (record.wafom, record.tvalue) {
        (Some(w), Some(t)) => writeln!(writer, "{:e} {}", w, t)?,
        (Some(w), None) => writeln!(writer, "{:e}", w)?,
        (None, Some(t)) => writeln!(writer, "nan {}", t)?,
        (None, None) => {}
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_metrics_optional() {
        let record = parse_text("64 1 2 9223372036854775808 4611686018427387904").unwrap();
        assert_eq!(record.words, vec![1 << 63, 1 << 62]);
        assert_eq!(record.wafom, None);
        assert_eq!(record.tvalue, None);
    }

    #[test]
    fn test_nan_and_negative_metrics_absent() {
        let record = parse_text("64 1 1 1\nNaN -1\n").unwrap();
        assert_eq!(record.wafom, None);
        assert_eq!(record.tvalue, None);
    }

    #[test]
    fn test_too_few_words() {
        let result = parse_text("32 3 2 1 2 3 4");
        assert!(matches!(
            result,
            Err(ParseError::TooFewWords {
                expected: 6,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse_text("32 3"), Err(ParseError::Truncated("header"))));
    }

    #[test]
    fn test_overflowing_header_rejected() {
        let result = parse_text("64 9223372036854775807 4 1 2");
        assert!(matches!(
            result,
            Err(ParseError::ShapeOverflow { precision: 4, .. })
        ));
    }

    #[test]
    fn test_huge_header_reports_missing_words() {
        let result = parse_text("64 1000000000 63 1 2");
        assert!(matches!(
            result,
            Err(ParseError::TooFewWords {
                expected: 63_000_000_000,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_invalid_word() {
        let result = parse_text("32 1 2 1 x2");
        assert!(matches!(
            result,
            Err(ParseError::InvalidToken { field: "matrix word", .. })
        ));
    }

    #[test]
    fn test_unsupported_bit_size() {
        assert!(matches!(
            parse_text("16 1 1 1"),
            Err(ParseError::UnsupportedBitSize(16))
        ));
    }

    #[test]
    fn test_write_then_read() {
        let record = NetRecord {
            bit_size: 32,
            dimension: 3,
            precision: 2,
            words: vec![1, 2, 3, 4, 5, 6],
            wafom: None,
            tvalue: Some(2),
        };
        let mut out = Vec::new();
        write_text(&mut out, &record).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "32 3 2\n1 2 3\n4 5 6\nnan 2\n");
        assert_eq!(parse_text(&text).unwrap(), record);
    }

    #[test]
    fn test_wafom_exact_through_text() {
        let wafom = -12.345_678_901_234_567;
        let record = NetRecord {
            bit_size: 64,
            dimension: 1,
            precision: 1,
            words: vec![1 << 63],
            wafom: Some(wafom),
            tvalue: None,
        };
        let mut out = Vec::new();
        write_text(&mut out, &record).unwrap();
        assert_eq!(read_text(out.as_slice()).unwrap().wafom, Some(wafom));
    }
}
