//! Parser for the `OpenHC32Boot A:0x<HEX> V:<version>` identifier line.
//!
//! The grammar is fixed, so it is matched by hand rather than with a regex:
//! literal prefix, a bounded run of uppercase hex digits, the ` V:` delimiter,
//! then the rest of the line.

use tracing::{debug, trace};

use crate::model::FirmwareIdentifier;

/// Literal text that opens every identifier line.
pub const MARKER_PREFIX: &str = "OpenHC32Boot A:0x";

/// Literal text separating the base address from the version.
pub const VERSION_DELIMITER: &str = " V:";

/// Base addresses are 32-bit, so at most eight hex digits.
pub const MAX_ADDRESS_DIGITS: usize = 8;

/// Decode an image lossily and search it for an identifier.
///
/// Bytes that are not valid UTF-8 become U+FFFD, which can never be part of
/// the ASCII marker, so binary content around the line is harmless.
pub fn extract_identifier(image: &[u8]) -> Option<FirmwareIdentifier> {
    let text = String::from_utf8_lossy(image);
    parse_identifier(&text)
}

/// Return the first complete identifier in `text`, if any.
///
/// A prefix occurrence that does not satisfy the rest of the grammar is
/// skipped and the search continues after it.
pub fn parse_identifier(text: &str) -> Option<FirmwareIdentifier> {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find(MARKER_PREFIX) {
        let start = search_from + offset;
        if let Some(identifier) = match_at(&text[start..]) {
            debug!(
                offset = start,
                app_base_address = identifier.app_base_address,
                "found firmware identifier"
            );
            return Some(identifier);
        }
        trace!(offset = start, "rejected identifier candidate");
        // The prefix starts with an ASCII byte, so `start + 1` is a char boundary.
        search_from = start + 1;
    }
    None
}

/// Match the full grammar at the start of `candidate`, which begins with the prefix.
fn match_at(candidate: &str) -> Option<FirmwareIdentifier> {
    let rest = candidate.strip_prefix(MARKER_PREFIX)?;

    let digits_len = rest.bytes().take_while(is_upper_hex_digit).count();
    if digits_len == 0 || digits_len > MAX_ADDRESS_DIGITS {
        return None;
    }
    let (digits, rest) = rest.split_at(digits_len);

    let rest = rest.strip_prefix(VERSION_DELIMITER)?;
    let version_len = rest.find(is_line_end).unwrap_or(rest.len());
    if version_len == 0 {
        return None;
    }
    let bootloader_version = &rest[..version_len];

    let app_base_address = u32::from_str_radix(digits, 16).ok()?;
    let raw_len = MARKER_PREFIX.len() + digits_len + VERSION_DELIMITER.len() + version_len;

    Some(FirmwareIdentifier {
        raw_marker: candidate[..raw_len].to_string(),
        app_base_address,
        bootloader_version: bootloader_version.to_string(),
    })
}

fn is_upper_hex_digit(byte: &u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'A'..=b'F')
}

fn is_line_end(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\0')
}
