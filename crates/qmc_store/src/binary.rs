//! Binary matrix file format.
//!
//! # Layout
//!
//! All integers little-endian:
//!
//! ```text
//! magic    : [u8; 8]
//! headers  : { s: u32, m: u32, offset: u64 } ... sorted by (s, m)
//! end      : { 0, 0, 0 }
//! records  : at each header's offset,
//!            s * m u64 words (row-major), wafom: f64, tvalue: i32
//! ```
//!
//! An absent wafom is stored as NaN and an absent t-value as -1.
//!
//! Lookups scan the header block in order and stop at the first header with
//! `s' > s && m' > m`, so a missing entry is detected without reading the
//! whole block.

use std::io::{self, Read, Seek, SeekFrom, Write};

use qmc_core::GeneratingMatrix;

use crate::error::ParseError;
use crate::record::{word_count, NetRecord};

/// File magic, `"DIGINET\x01"`.
pub const MAGIC: [u8; 8] = *b"DIGINET\x01";

/// Size of one header record in bytes.
pub const HEADER_SIZE: u64 = 16;

/// One entry of the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Dimension.
    pub s: u32,
    /// Precision.
    pub m: u32,
    /// Absolute byte offset of the data record.
    pub offset: u64,
}

impl Header {
    fn is_terminator(&self) -> bool {
        self.s == 0 && self.m == 0 && self.offset == 0
    }

    fn read<R: Read>(reader: &mut R) -> Result<Self, ParseError> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        read_exact(reader, &mut buf, "header")?;
        let mut s = [0u8; 4];
        let mut m = [0u8; 4];
        let mut offset = [0u8; 8];
        s.copy_from_slice(&buf[0..4]);
        m.copy_from_slice(&buf[4..8]);
        offset.copy_from_slice(&buf[8..16]);
        Ok(Self {
            s: u32::from_le_bytes(s),
            m: u32::from_le_bytes(m),
            offset: u64::from_le_bytes(offset),
        })
    }

    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.s.to_le_bytes())?;
        writer.write_all(&self.m.to_le_bytes())?;
        writer.write_all(&self.offset.to_le_bytes())
    }
}

fn read_exact<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), ParseError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ParseError::Truncated(what),
        _ => ParseError::Io(e),
    })
}

fn read_magic<R: Read>(reader: &mut R) -> Result<(), ParseError> {
    let mut magic = [0u8; 8];
    read_exact(reader, &mut magic, "magic number")?;
    if magic != MAGIC {
        return Err(ParseError::BadMagic {
            found: u64::from_le_bytes(magic),
        });
    }
    Ok(())
}

/// Reads every header up to the terminator.
///
/// # Errors
///
/// Returns `ParseError::BadMagic` for a foreign file and
/// `ParseError::Truncated` if the terminator is missing.
pub fn read_headers<R: Read>(reader: &mut R) -> Result<Vec<Header>, ParseError> {
    read_magic(reader)?;
    let mut headers = Vec::new();
    loop {
        let header = Header::read(reader)?;
        if header.is_terminator() {
            return Ok(headers);
        }
        headers.push(header);
    }
}

/// Looks up the header for `(s, m)`.
///
/// Returns `Ok(None)` at the terminator or at the first header past the
/// request.
pub fn find_header<R: Read>(reader: &mut R, s: u32, m: u32) -> Result<Option<Header>, ParseError> {
    read_magic(reader)?;
    loop {
        let header = Header::read(reader)?;
        if header.is_terminator() || (header.s > s && header.m > m) {
            return Ok(None);
        }
        if header.s == s && header.m == m {
            return Ok(Some(header));
        }
    }
}

/// Reads the matrix stored for exactly `(s, m)`.
///
/// Returns `Ok(None)` if the file holds no such entry.
///
/// # Errors
///
/// Returns `ParseError` on a magic mismatch, a truncated header block or
/// data record, or an underlying I/O failure.
pub fn read_binary<R: Read + Seek>(
    reader: &mut R,
    s: u32,
    m: u32,
) -> Result<Option<NetRecord>, ParseError> {
    let header = match find_header(reader, s, m)? {
        Some(header) => header,
        None => return Ok(None),
    };
    reader.seek(SeekFrom::Start(header.offset))?;

    let bytes = word_count(s as usize, m)?
        .checked_mul(8)
        .ok_or(ParseError::ShapeOverflow {
            dimension: s as usize,
            precision: m,
        })?;
    let mut buf = vec![0u8; bytes];
    read_exact(reader, &mut buf, "matrix words")?;
    let words = buf
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect();

    let mut wafom = [0u8; 8];
    read_exact(reader, &mut wafom, "wafom")?;
    let mut tvalue = [0u8; 4];
    read_exact(reader, &mut tvalue, "t-value")?;
    let wafom = f64::from_le_bytes(wafom);
    let tvalue = i32::from_le_bytes(tvalue);

    Ok(Some(NetRecord {
        bit_size: 64,
        dimension: s as usize,
        precision: m,
        words,
        wafom: (!wafom.is_nan()).then_some(wafom),
        tvalue: (tvalue >= 0).then_some(tvalue),
    }))
}

/// Writes 64-bit matrices in the binary layout.
///
/// Headers are sorted by `(s, m)`; data records follow the terminator in
/// the same order. If two matrices share a shape the first one wins on
/// lookup.
///
/// # Errors
///
/// Propagates writer failures.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use qmc_core::GeneratingMatrix;
/// use qmc_store::binary::{read_binary, write_binary};
///
/// let matrix = GeneratingMatrix::<u64>::van_der_corput(4).unwrap().with_tvalue(Some(0));
/// let mut buf = Cursor::new(Vec::new());
/// write_binary(&mut buf, &[matrix.clone()]).unwrap();
///
/// buf.set_position(0);
/// let record = read_binary(&mut buf, 1, 4).unwrap().unwrap();
/// assert_eq!(record.words, matrix.rows());
/// assert_eq!(record.tvalue, Some(0));
/// ```
pub fn write_binary<W: Write>(writer: &mut W, matrices: &[GeneratingMatrix<u64>]) -> io::Result<()> {
    let mut sorted: Vec<&GeneratingMatrix<u64>> = matrices.iter().collect();
    sorted.sort_by_key(|matrix| (matrix.dimension(), matrix.precision()));

    writer.write_all(&MAGIC)?;

    let mut offset = MAGIC.len() as u64 + HEADER_SIZE * (sorted.len() as u64 + 1);
    for matrix in &sorted {
        let s = u32::try_from(matrix.dimension())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "dimension exceeds u32"))?;
        Header {
            s,
            m: matrix.precision(),
            offset,
        }
        .write(writer)?;
        offset += record_size(matrix);
    }
    Header {
        s: 0,
        m: 0,
        offset: 0,
    }
    .write(writer)?;

    for matrix in &sorted {
        for word in matrix.rows() {
            writer.write_all(&word.to_le_bytes())?;
        }
        writer.write_all(&matrix.wafom().unwrap_or(f64::NAN).to_le_bytes())?;
        writer.write_all(&matrix.tvalue().unwrap_or(-1).to_le_bytes())?;
    }
    writer.flush()
}

fn record_size(matrix: &GeneratingMatrix<u64>) -> u64 {
    8 * matrix.rows().len() as u64 + 8 + 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn matrix(s: usize, m: u32, fill: u64) -> GeneratingMatrix<u64> {
        let rows = (0..s * m as usize).map(|i| fill.rotate_left(i as u32)).collect();
        GeneratingMatrix::new(s, m, rows).unwrap()
    }

    fn file(matrices: &[GeneratingMatrix<u64>]) -> Cursor<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        write_binary(&mut buf, matrices).unwrap();
        buf.set_position(0);
        buf
    }

    #[test]
    fn test_layout_sizes() {
        let buf = file(&[matrix(2, 3, 7)]).into_inner();
        // magic + 2 headers + 6 words + wafom + tvalue
        assert_eq!(buf.len(), 8 + 32 + 48 + 8 + 4);
        assert_eq!(&buf[..8], &MAGIC);
    }

    #[test]
    fn test_headers_sorted() {
        let mut buf = file(&[matrix(3, 2, 1), matrix(1, 5, 2), matrix(3, 1, 3)]);
        let headers = read_headers(&mut buf).unwrap();
        let shapes: Vec<(u32, u32)> = headers.iter().map(|h| (h.s, h.m)).collect();
        assert_eq!(shapes, vec![(1, 5), (3, 1), (3, 2)]);
    }

    #[test]
    fn test_lookup_each_entry() {
        let matrices = [
            matrix(2, 4, 0x0123_4567_89ab_cdef),
            matrix(4, 8, 0xfedc_ba98_7654_3210)
                .with_wafom(Some(-7.25))
                .with_tvalue(Some(3)),
        ];
        let mut buf = file(&matrices);
        for expected in &matrices {
            buf.set_position(0);
            let record = read_binary(
                &mut buf,
                expected.dimension() as u32,
                expected.precision(),
            )
            .unwrap()
            .unwrap();
            assert_eq!(record.words, expected.rows());
            assert_eq!(record.wafom, expected.wafom());
            assert_eq!(record.tvalue, expected.tvalue());
        }
    }

    #[test]
    fn test_missing_entry() {
        let mut buf = file(&[matrix(2, 4, 1), matrix(5, 9, 1)]);
        assert!(read_binary(&mut buf, 3, 4).unwrap().is_none());
        buf.set_position(0);
        assert!(read_binary(&mut buf, 9, 9).unwrap().is_none());
    }

    #[test]
    fn test_early_exit_does_not_need_terminator() {
        let mut bytes = file(&[matrix(1, 1, 1), matrix(4, 4, 1)]).into_inner();
        // Cut the file right after the second header.
        bytes.truncate(8 + 32);
        let mut buf = Cursor::new(bytes);
        assert!(find_header(&mut buf, 2, 2).unwrap().is_none());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = file(&[matrix(1, 1, 1)]).into_inner();
        bytes[0] = b'X';
        let result = read_binary(&mut Cursor::new(bytes), 1, 1);
        assert!(matches!(result, Err(ParseError::BadMagic { .. })));
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = file(&[matrix(2, 2, 1)]).into_inner();
        bytes.truncate(bytes.len() - 2);
        let result = read_binary(&mut Cursor::new(bytes), 2, 2);
        assert!(matches!(result, Err(ParseError::Truncated("t-value"))));
    }

    #[test]
    fn test_empty_file_is_truncated() {
        let result = read_binary(&mut Cursor::new(Vec::new()), 1, 1);
        assert!(matches!(result, Err(ParseError::Truncated("magic number"))));
    }
}
