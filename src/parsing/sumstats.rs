//! Summary statistics text files: a header line of column names followed by one
//! whitespace-delimited record per line.

use std::io::BufRead;

use crate::parsing::ParseError;

/// Header tokens of a sumstats file and the number of physical lines consumed
/// reading them (leading blank lines included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumstatsHeader {
    pub columns: Vec<String>,
    pub lines_consumed: usize,
}

/// Split a line on runs of whitespace
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Read the header line, leaving `reader` positioned at the first data line.
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure or invalid UTF-8 and
/// `ParseError::InvalidFormat` if the input has no header line.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<SumstatsHeader, ParseError> {
    let mut line = String::new();
    let mut lines_consumed = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(ParseError::InvalidFormat(
                "Summary statistics file has no header line".to_string(),
            ));
        }
        lines_consumed += 1;

        let columns: Vec<String> = tokenize(&line).into_iter().map(String::from).collect();
        if !columns.is_empty() {
            return Ok(SumstatsHeader {
                columns,
                lines_consumed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_header() {
        let mut reader = Cursor::new("\nCHR\tPOS SNP\n1\t100\trs1\n");
        let header = read_header(&mut reader).unwrap();
        assert_eq!(header.columns, vec!["CHR", "POS", "SNP"]);
        assert_eq!(header.lines_consumed, 2);

        let mut rest = String::new();
        reader.read_line(&mut rest).unwrap();
        assert_eq!(rest, "1\t100\trs1\n");
    }

    #[test]
    fn test_read_header_empty() {
        let mut reader = Cursor::new("\n\n");
        assert!(matches!(
            read_header(&mut reader),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  1\t100  rs1\r\n"), vec!["1", "100", "rs1"]);
        assert!(tokenize("   \n").is_empty());
    }
}
