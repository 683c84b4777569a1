//! Capture preamble reader.

use tracing::{debug, warn};

use modraw_common::format::{
    HEADER_END, HEADER_LINES_PREFIX, HEADER_SIZE_PREFIX, HEADER_START, OFFSET_TIME_PREFIX,
};
use modraw_common::{Error, Result};

use super::cursor::ByteCursor;

/// The preamble of one capture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Every header byte, terminators included, for verbatim pass-through.
    pub text: Vec<u8>,
    /// Lines read, end marker included.
    pub line_count: usize,
    /// Seconds value of the last `OFFSET_TIME =` line, if any.
    pub year_offset: Option<i64>,
}

impl Header {
    pub fn text_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }
}

fn expect_line(
    cursor: &mut ByteCursor,
    header: &mut Header,
    prefix: &[u8],
    what: &str,
) -> Result<Vec<u8>> {
    let line = cursor.read_line().ok_or_else(|| Error::MalformedHeader {
        line: header.line_count + 1,
        reason: format!("input ended before the {what} line"),
    })?;
    header.line_count += 1;
    if !line.starts_with(prefix) {
        return Err(Error::MalformedHeader {
            line: header.line_count,
            reason: format!(
                "expected {what} line starting with '{}'",
                String::from_utf8_lossy(prefix)
            ),
        });
    }
    header.text.extend_from_slice(&line);
    Ok(line)
}

/// Digits of an `OFFSET_TIME` line, everything else stripped.
fn parse_year_offset(line: &[u8]) -> Option<i64> {
    let digits: String = line[OFFSET_TIME_PREFIX.len()..]
        .iter()
        .filter(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    digits.parse().ok()
}

/// Read and validate the preamble, leaving the cursor just past the end
/// marker line.
pub fn read_header(cursor: &mut ByteCursor) -> Result<Header> {
    let mut header = Header {
        text: Vec::new(),
        line_count: 0,
        year_offset: None,
    };

    expect_line(cursor, &mut header, HEADER_SIZE_PREFIX, "header size")?;
    expect_line(cursor, &mut header, HEADER_LINES_PREFIX, "header line count")?;
    expect_line(cursor, &mut header, HEADER_START, "header start")?;

    loop {
        let line = cursor.read_line().ok_or_else(|| Error::MalformedHeader {
            line: header.line_count + 1,
            reason: format!(
                "input ended before '{}'",
                String::from_utf8_lossy(HEADER_END)
            ),
        })?;
        header.line_count += 1;
        header.text.extend_from_slice(&line);

        if line.starts_with(OFFSET_TIME_PREFIX) {
            match parse_year_offset(&line) {
                Some(offset) => {
                    debug!(offset, line = header.line_count, "year offset");
                    header.year_offset = Some(offset);
                }
                None => warn!(line = header.line_count, "OFFSET_TIME line has no digits"),
            }
        }
        if line.starts_with(HEADER_END) {
            break;
        }
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &[u8] = b"header_file_size_inbytes = 120\n\
TOTAL_HEADER_LINES = 5\n\
*****START_FCTD_HEADER_START_RUN*****\n\
OFFSET_TIME = 1672531200\n\
%*****END_FCTD_HEADER_START_RUN*****\n";

    #[test]
    fn test_reads_valid_header() {
        let mut data = GOOD.to_vec();
        data.extend_from_slice(b"$SOM3");
        let mut cursor = ByteCursor::new(data);
        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header.text, GOOD);
        assert_eq!(header.line_count, 5);
        assert_eq!(header.year_offset, Some(1_672_531_200));
        assert_eq!(cursor.position(), GOOD.len());
        assert!(cursor.read_marker(b"$SOM"));
    }

    #[test]
    fn test_offset_digits_are_extracted() {
        assert_eq!(parse_year_offset(b"OFFSET_TIME = 1,234 s\r\n"), Some(1234));
        assert_eq!(parse_year_offset(b"OFFSET_TIME = none\n"), None);
    }

    #[test]
    fn test_header_without_offset() {
        let text = b"header_file_size_inbytes = 1\nTOTAL_HEADER_LINES = 4\n\
*****START_FCTD_HEADER_START_RUN*****\n%*****END_FCTD_HEADER_START_RUN*****\n";
        let header = read_header(&mut ByteCursor::new(text.to_vec())).unwrap();
        assert_eq!(header.year_offset, None);
        assert_eq!(header.line_count, 4);
    }

    #[test]
    fn test_wrong_first_line() {
        let err = read_header(&mut ByteCursor::new(b"garbage\n".to_vec())).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_wrong_start_marker() {
        let text = b"header_file_size_inbytes = 1\nTOTAL_HEADER_LINES = 4\nSTART\n";
        let err = read_header(&mut ByteCursor::new(text.to_vec())).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { line: 3, .. }));
    }

    #[test]
    fn test_missing_end_marker() {
        let text = &GOOD[..GOOD.len() - HEADER_END.len() - 1];
        let err = read_header(&mut ByteCursor::new(text.to_vec())).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { line: 5, .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = read_header(&mut ByteCursor::new(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader { line: 1, .. }));
    }
}
