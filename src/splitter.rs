//! Locating block records inside a raw block file
//!
//! Each candidate range starts at the declared-size field that follows a
//! marker, so both framings hand the block decoder the same layout.

use std::ops::Range;

use log::{debug, warn};
use memchr::memmem;

use crate::config::Framing;
use crate::constants::*;

/// The marker a buffer starts with, if it has one
pub fn leading_marker(buf: &[u8]) -> Option<[u8; MARKER_SIZE]> {
    let mut marker = [0u8; MARKER_SIZE];
    marker.copy_from_slice(buf.get(..MARKER_SIZE)?);
    Some(marker)
}

pub fn split_blocks(buf: &[u8], framing: Framing) -> Vec<Range<usize>> {
    match framing {
        Framing::Marker => split_on_marker(buf),
        Framing::SizePrefixed => split_size_prefixed(buf),
    }
}

/// Partition `buf` on every occurrence of its leading marker.
///
/// Each maximal run between consecutive markers is one candidate; the run
/// before the first marker is always empty and is dropped. Adjacent markers
/// yield empty candidates, which then fail to decode. A marker recurring
/// inside block content is not detected.
pub fn split_on_marker(buf: &[u8]) -> Vec<Range<usize>> {
    let Some(marker) = leading_marker(buf) else {
        warn!("buffer of {} bytes is too short to carry a marker", buf.len());
        return Vec::new();
    };

    let starts: Vec<usize> = memmem::find_iter(buf, &marker).collect();
    let mut ranges = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(buf.len());
        ranges.push(start + MARKER_SIZE..end);
    }

    debug!("marker {} delimits {} candidate blocks", hex::encode(marker), ranges.len());
    ranges
}

/// Walk marker, declared size, payload records back to back.
///
/// Stops at trailing zero padding, or with a warning at the first record
/// that does not begin with the leading marker. A record whose declared
/// size runs past the buffer is clamped to the end so the decoder reports it.
pub fn split_size_prefixed(buf: &[u8]) -> Vec<Range<usize>> {
    let Some(marker) = leading_marker(buf) else {
        warn!("buffer of {} bytes is too short to carry a marker", buf.len());
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut pos = 0usize;
    while pos < buf.len() {
        let rest = &buf[pos..];
        if rest.iter().all(|&b| b == 0) {
            debug!("{} bytes of zero padding after last record", rest.len());
            break;
        }
        if rest.get(..MARKER_SIZE) != Some(&marker[..]) {
            warn!("no marker at offset {}, stopping with {} bytes left", pos, rest.len());
            break;
        }

        let size_start = pos + MARKER_SIZE;
        let Some(size_bytes) = buf.get(size_start..size_start + SIZE_FIELD_SIZE) else {
            ranges.push(size_start..buf.len());
            break;
        };
        let mut size = [0u8; SIZE_FIELD_SIZE];
        size.copy_from_slice(size_bytes);
        let declared = u32::from_le_bytes(size) as usize;

        let end = size_start
            .saturating_add(SIZE_FIELD_SIZE)
            .saturating_add(declared);
        if end > buf.len() {
            warn!("record at offset {} declares {} bytes past end of buffer", pos, declared);
            ranges.push(size_start..buf.len());
            break;
        }
        ranges.push(size_start..end);
        pos = end;
    }

    debug!("size-prefixed walk found {} candidate blocks", ranges.len());
    ranges
}
