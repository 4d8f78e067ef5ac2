use fwstamp_core::fwid::{extract_identifier, parse_identifier};

#[test]
fn parses_marker_at_start_of_text() {
    let id = parse_identifier("OpenHC32Boot A:0x4000 V:1.0.0\n").expect("identifier");
    assert_eq!(id.raw_marker, "OpenHC32Boot A:0x4000 V:1.0.0");
    assert_eq!(id.app_base_address, 0x4000);
    assert_eq!(id.bootloader_version, "1.0.0");
}

#[test]
fn version_runs_to_end_of_input_without_line_break() {
    let id = parse_identifier("OpenHC32Boot A:0x6000 V:main-deadbee+").expect("identifier");
    assert_eq!(id.bootloader_version, "main-deadbee+");
}

#[test]
fn version_keeps_trailing_spaces_and_stops_at_carriage_return() {
    let id = parse_identifier("OpenHC32Boot A:0x4000 V:1.0.0 \r\n").expect("identifier");
    assert_eq!(id.bootloader_version, "1.0.0 ");
}

#[test]
fn nul_terminates_version() {
    let id = parse_identifier("OpenHC32Boot A:0x8000 V:dev\0\u{1}junk").expect("identifier");
    assert_eq!(id.bootloader_version, "dev");
    assert_eq!(id.raw_marker, "OpenHC32Boot A:0x8000 V:dev");
}

#[test]
fn finds_marker_surrounded_by_invalid_utf8() {
    let mut image: Vec<u8> = (0x80u8..=0xFF).collect();
    image.extend_from_slice(b"OpenHC32Boot A:0xC000 V:main-1a2b3c4+\n\0");
    image.extend(std::iter::repeat(0xFEu8).take(64));

    let id = extract_identifier(&image).expect("identifier");
    assert_eq!(id.app_base_address, 0xC000);
    assert_eq!(id.bootloader_version, "main-1a2b3c4+");
}

#[test]
fn lowercase_hex_is_rejected() {
    assert!(parse_identifier("OpenHC32Boot A:0x4a00 V:1.0.0").is_none());
}

#[test]
fn missing_digits_or_version_is_rejected() {
    assert!(parse_identifier("OpenHC32Boot A:0x V:1.0.0").is_none());
    assert!(parse_identifier("OpenHC32Boot A:0x4000 V:").is_none());
    assert!(parse_identifier("OpenHC32Boot A:0x4000 V:\n1.0.0").is_none());
    assert!(parse_identifier("OpenHC32Boot A:0x4000V:1.0.0").is_none());
}

#[test]
fn more_than_eight_digits_is_rejected() {
    assert!(parse_identifier("OpenHC32Boot A:0x123456789 V:1.0.0").is_none());
    let id = parse_identifier("OpenHC32Boot A:0xFFFFFFFF V:max").expect("eight digits");
    assert_eq!(id.app_base_address, u32::MAX);
}

#[test]
fn malformed_candidate_does_not_hide_a_later_marker() {
    let text = "OpenHC32Boot A:0xZZ V:bad\nOpenHC32Boot A:0x2000 V:good\n";
    let id = parse_identifier(text).expect("second candidate");
    assert_eq!(id.app_base_address, 0x2000);
    assert_eq!(id.bootloader_version, "good");
}

#[test]
fn first_complete_marker_wins() {
    let text = "OpenHC32Boot A:0x4000 V:first\nOpenHC32Boot A:0x8000 V:second\n";
    let id = parse_identifier(text).expect("identifier");
    assert_eq!(id.bootloader_version, "first");
}

#[test]
fn text_without_marker_yields_none() {
    assert!(parse_identifier("").is_none());
    assert!(parse_identifier("OpenHC32Boot").is_none());
    assert!(extract_identifier(&[0u8; 4096]).is_none());
}
