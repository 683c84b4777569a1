//! Packet framing.
//!
//! Packets have no length prefix. A packet ends with a `*<hex><hex>\r\n`
//! checksum footer, but the same bytes can show up inside a payload, so a
//! footer only counts as a boundary when the byte after it starts the next
//! packet (`T`) or the buffer ends there.

use tracing::{debug, warn};

use modraw_common::format::{
    ends_with_terminator, CHECKSUM_STAR, CR, HEADER_END, LF, MIN_FRAME_LEN,
    SOM_ABRUPT_FOOTER, START_OF_MISSION, TIME_MARKER, TRAILER_MARKER, TRAILER_SEARCH_SPAN,
};

use super::cursor::ByteCursor;
use crate::packet::PartialPacket;

/// `*<hex><hex>\r\n` at the end of `frame`.
fn has_checksum_footer(frame: &[u8]) -> bool {
    match frame {
        [.., star, hi, lo, cr, lf] => {
            *star == CHECKSUM_STAR
                && hi.is_ascii_hexdigit()
                && lo.is_ascii_hexdigit()
                && *cr == CR
                && *lf == LF
        }
        _ => false,
    }
}

/// Format quirk: a start-of-mission packet cut short by the instrument ends in
/// `$ENDSOM` and has no `T` successor, so it closes on its own footer.
fn is_abrupt_start_packet(body: &[u8]) -> bool {
    body.starts_with(START_OF_MISSION) && body.ends_with(SOM_ABRUPT_FOOTER)
}

/// Does a framed start packet end in the `$ENDSOM` abrupt footer? Only such a
/// packet can be followed by the continuation of a cut packet.
pub fn closes_abruptly(frame: &[u8]) -> bool {
    let frame = frame
        .strip_suffix(&[LF])
        .filter(|trimmed| has_checksum_footer(trimmed))
        .unwrap_or(frame);
    has_checksum_footer(frame) && is_abrupt_start_packet(&frame[..frame.len() - MIN_FRAME_LEN])
}

/// Read the next packet's raw bytes.
///
/// Returns `None` when fewer than [`MIN_FRAME_LEN`] bytes were left; that
/// stub is consumed and dropped.
pub fn next_frame(cursor: &mut ByteCursor) -> Option<Vec<u8>> {
    let mut frame = Vec::new();
    while let Ok(byte) = cursor.read_byte() {
        frame.push(byte);
        if byte != LF || !has_checksum_footer(&frame) {
            continue;
        }
        let body_end = frame.len() - MIN_FRAME_LEN;

        // Format quirk: some captures terminate packets with `\r\n\n`.
        if cursor.peek() == Some(LF) {
            frame.push(LF);
            cursor.set_position(cursor.position() + 1);
        }

        if is_abrupt_start_packet(&frame[..body_end]) {
            break;
        }
        match cursor.peek() {
            None | Some(TIME_MARKER) => break,
            // Footer-looking bytes inside the payload.
            Some(_) => {}
        }
    }
    (frame.len() >= MIN_FRAME_LEN).then_some(frame)
}

/// Position of the trailer marker within the last [`TRAILER_SEARCH_SPAN`]
/// bytes, searching from the end.
fn find_trailer(buf: &[u8]) -> Option<usize> {
    let last = buf.len().checked_sub(TRAILER_MARKER.len())?;
    let first = buf.len().saturating_sub(TRAILER_SEARCH_SPAN);
    (first..=last)
        .rev()
        .find(|&at| buf[at..].starts_with(TRAILER_MARKER))
}

/// First byte after the header's end-marker line, or 0 without one.
fn header_end(buf: &[u8]) -> usize {
    let Some(marker_at) = buf
        .windows(HEADER_END.len())
        .position(|window| window == HEADER_END)
    else {
        return 0;
    };
    buf[marker_at..]
        .iter()
        .position(|&b| b == LF)
        .map_or(buf.len(), |lf| marker_at + lf + 1)
}

/// Start of the last packet in `bytes`: a `T` right after a terminator, at
/// or after `floor`.
fn find_last_packet_start(bytes: &[u8], floor: usize) -> Option<usize> {
    (floor.max(1)..bytes.len())
        .rev()
        .find(|&at| bytes[at] == TIME_MARKER && ends_with_terminator(&bytes[..at]))
}

/// Detach the truncated packet sitting right before the trailer of a chunked
/// capture, removing it from the buffer.
///
/// Returns `None` when there is no trailer, or when the bytes before it
/// already end with a terminator.
pub fn extract_partial_end_packet(cursor: &mut ByteCursor) -> Option<PartialPacket> {
    let marker_at = find_trailer(cursor.as_bytes())?;
    let before = &cursor.as_bytes()[..marker_at];
    if ends_with_terminator(before) {
        debug!(marker_at, "trailer follows a complete packet");
        return None;
    }

    // Header lines may also end in `\r\n` and start with `T`.
    let Some(start) = find_last_packet_start(before, header_end(before)) else {
        warn!(marker_at, "trailer follows unterminated bytes with no packet start");
        return None;
    };

    let bytes = cursor.remove_range(start..marker_at);
    debug!(start, len = bytes.len(), "detached partial packet");
    Some(PartialPacket::new(bytes))
}

/// Splice a partial packet from the previous file in at the read position.
pub fn insert_partial_end_packet(cursor: &mut ByteCursor, partial: PartialPacket) {
    debug!(at = cursor.position(), len = partial.len(), "splicing partial packet");
    cursor.splice_at_cursor(partial.as_bytes());
}
