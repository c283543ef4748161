//! Joe–Kuo direction-number files.
//!
//! One header line followed by one row per Sobol dimension:
//!
//! ```text
//! d       s       a       m_i
//! 2       1       0       1
//! 3       2       1       1 3
//! 4       3       1       1 3 1
//! ```
//!
//! `s` is the polynomial degree, `a` the packed inner coefficients and
//! `m_1 .. m_s` the initial direction numbers. Data row `k` (0-based) seeds
//! Sobol dimension `k + 1`; the `d` column is informational.

use std::io::{self, BufRead, Write};

use qmc_core::SobolSeed;

use crate::error::ParseError;

/// Reads at most `limit` seed rows (all rows when `None`).
///
/// # Errors
///
/// Returns `ParseError::SeedRow` for a row with too few columns, a
/// non-numeric column or a zero degree, and `ParseError::Io` on read
/// failures.
///
/// # Examples
///
/// ```rust
/// use qmc_store::joe_kuo::read_seed_table;
///
/// let file = "d s a m_i\n2 1 0 1\n3 2 1 1 3\n";
/// let seeds = read_seed_table(file.as_bytes(), None).unwrap();
/// assert_eq!(seeds.len(), 2);
/// assert_eq!(seeds[1].initial(), &[1, 3]);
/// ```
pub fn read_seed_table<R: BufRead>(
    reader: R,
    limit: Option<usize>,
) -> Result<Vec<SobolSeed>, ParseError> {
    let mut seeds = Vec::new();
    for (row, line) in data_lines(reader).enumerate() {
        if limit.is_some_and(|limit| seeds.len() >= limit) {
            break;
        }
        seeds.push(parse_seed_row(row, &line?)?);
    }
    Ok(seeds)
}

/// Number of data rows in a seed file.
///
/// # Errors
///
/// Returns `ParseError::Io` on read failures.
pub fn count_seed_rows<R: BufRead>(reader: R) -> Result<usize, ParseError> {
    let mut count = 0;
    for line in data_lines(reader) {
        line?;
        count += 1;
    }
    Ok(count)
}

/// Non-blank lines after the header.
fn data_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader
        .lines()
        .skip(1)
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
}

/// Parses one `d s a m_1 .. m_s` row.
pub fn parse_seed_row(row: usize, line: &str) -> Result<SobolSeed, ParseError> {
    let mut columns = line.split_whitespace().skip(1);
    let mut next = |name: &str| -> Result<u32, ParseError> {
        let token = columns.next().ok_or_else(|| ParseError::SeedRow {
            row,
            reason: format!("missing {}", name),
        })?;
        token.parse().map_err(|_| ParseError::SeedRow {
            row,
            reason: format!("invalid {} '{}'", name, token),
        })
    };

    let degree = next("degree")?;
    if degree == 0 {
        return Err(ParseError::SeedRow {
            row,
            reason: "degree 0".to_string(),
        });
    }
    let coefficient = next("coefficient")?;
    let initial = (0..degree)
        .map(|_| next("initial number"))
        .collect::<Result<Vec<u32>, _>>()?;
    Ok(SobolSeed::new(degree, coefficient, initial))
}

/// Writes seeds in the Joe–Kuo layout, numbering rows from dimension 2.
///
/// # Errors
///
/// Propagates writer failures.
pub fn write_seed_table<W: Write>(mut writer: W, seeds: &[SobolSeed]) -> io::Result<()> {
    writeln!(writer, "d\ts\ta\tm_i")?;
    for (k, seed) in seeds.iter().enumerate() {
        let initial: Vec<String> = seed.initial().iter().map(u32::to_string).collect();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            k + 2,
            seed.degree(),
            seed.coefficient(),
            initial.join(" ")
        )?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAD: &str = "d       s       a       m_i
2       1       0       1
3       2       1       1 3
4       3       1       1 3 1
5       3       2       1 1 1
";

    #[test]
    fn test_reads_all_rows() {
        let seeds = read_seed_table(HEAD.as_bytes(), None).unwrap();
        assert_eq!(seeds.len(), 4);
        assert_eq!(seeds[0], SobolSeed::new(1, 0, vec![1]));
        assert_eq!(seeds[3], SobolSeed::new(3, 2, vec![1, 1, 1]));
    }

    #[test]
    fn test_limit() {
        let seeds = read_seed_table(HEAD.as_bytes(), Some(2)).unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(read_seed_table(HEAD.as_bytes(), Some(0)).unwrap().len(), 0);
    }

    #[test]
    fn test_count_skips_header_and_blank_lines() {
        let text = format!("{}\n\n", HEAD);
        assert_eq!(count_seed_rows(text.as_bytes()).unwrap(), 4);
    }

    #[test]
    fn test_short_row() {
        let text = "d s a m_i\n2 1 0 1\n3 2 1 1\n";
        let result = read_seed_table(text.as_bytes(), None);
        match result {
            Err(ParseError::SeedRow { row, reason }) => {
                assert_eq!(row, 1);
                assert!(reason.contains("missing initial number"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_degree() {
        let result = parse_seed_row(0, "2 0 0");
        assert!(matches!(result, Err(ParseError::SeedRow { row: 0, .. })));
    }

    #[test]
    fn test_write_then_read() {
        let seeds = read_seed_table(HEAD.as_bytes(), None).unwrap();
        let mut out = Vec::new();
        write_seed_table(&mut out, &seeds).unwrap();
        assert_eq!(read_seed_table(out.as_slice(), None).unwrap(), seeds);
    }
}
