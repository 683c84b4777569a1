//! Byte literals of the `.modraw` capture format.
//!
//! A capture file is a text preamble followed by a run of packets:
//!
//! ```text
//! header_file_size_inbytes = ...
//! TOTAL_HEADER_LINES = ...
//! *****START_FCTD_HEADER_START_RUN*****
//! ...free-form lines, including OFFSET_TIME = <seconds>...
//! %*****END_FCTD_HEADER_START_RUN*****
//! $SOM3,...$ENDSOM*4A\r\n          start-of-mission packet
//! T0000123456$EFE3,...*1F\r\n      timestamped packets
//! ...
//! %*****START_FCTD_TAILER_START_RUN*****   optional trailer (chunked captures)
//! ```

/// First header line: declared header size.
pub const HEADER_SIZE_PREFIX: &[u8] = b"header_file_size_inbytes =";

/// Second header line: declared header line count.
pub const HEADER_LINES_PREFIX: &[u8] = b"TOTAL_HEADER_LINES =";

/// Third header line.
pub const HEADER_START: &[u8] = b"*****START_FCTD_HEADER_START_RUN*****";

/// Last header line.
pub const HEADER_END: &[u8] = b"%*****END_FCTD_HEADER_START_RUN*****";

/// Header line carrying the year offset in seconds.
pub const OFFSET_TIME_PREFIX: &[u8] = b"OFFSET_TIME =";

/// Begins every timestamped packet, followed by the tick digits.
pub const TIME_MARKER: u8 = b'T';

/// Ends the tick digits and begins the signature.
pub const RECORD_SEPARATOR: u8 = b'$';

/// Signature of the mandatory first packet of a file.
pub const START_OF_MISSION: &[u8] = b"$SOM";

/// Format quirk: a start-of-mission packet cut short by the instrument ends
/// with this token right before its checksum.
pub const SOM_ABRUPT_FOOTER: &[u8] = b"$ENDSOM";

/// Opens the trailer block of a chunked capture file.
pub const TRAILER_MARKER: &[u8] = b"%*****START_FCTD_TAILER_START_RUN*****";

/// How far from the end of a buffer the trailer marker is searched for.
pub const TRAILER_SEARCH_SPAN: usize = 4096;

/// Shortest byte run that can hold a `*<hex><hex>\r\n` footer.
pub const MIN_FRAME_LEN: usize = 5;

/// Checksum footer start.
pub const CHECKSUM_STAR: u8 = b'*';

pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';

/// Ticks are hundredths of a second.
pub const MS_PER_TICK: i64 = 10;

/// Extension of capture files, compared case-insensitively.
pub const CAPTURE_EXTENSION: &str = "modraw";

/// True when `bytes` ends with a packet terminator: `\r\n`, or the
/// double-terminator quirk `\r\n\n`.
pub fn ends_with_terminator(bytes: &[u8]) -> bool {
    bytes.ends_with(&[CR, LF]) || bytes.ends_with(&[CR, LF, LF])
}
