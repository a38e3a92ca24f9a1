use std::io::Cursor;

use exif_container::{
    codec::{ExifCodec as _, RelocationDelta, TagTree, TiffCodec},
    config::Limits,
    error::{AccessorError, ErrorCode},
    factory::{AccessorFactory, ContainerKind},
    providers::jpeg::JpegError,
};
use exif_container_types::exif::Endianness;

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// SOS, some entropy-coded data (with a stuffed byte and a restart marker),
/// then EOI.
const SCAN: &[u8] = &[
    0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, //
    0xA1, 0xFF, 0x00, 0xB2, 0xFF, 0xD3, 0xC3, 0xD4, //
    0xFF, 0xD9,
];

fn segment(code: u8, payload: &[u8]) -> Vec<u8> {
    let mut v = vec![0xFF, code];
    v.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

fn exif_blob(make: &str) -> Vec<u8> {
    let mut tree = TagTree::new(Endianness::Big);
    tree.set("Make", make).unwrap();
    tree.set("Orientation", "1").unwrap();
    tree.set("DateTimeOriginal", "2024:06:01 12:30:00").unwrap();

    let mut blob = b"Exif\0\0".to_vec();
    blob.extend(TiffCodec.encode(&tree, RelocationDelta::ZERO, None).unwrap());
    blob
}

/// `SOI`, JFIF `APP0`, Exif `APP1`, a quantization table, then the scan.
fn jpeg_with_exif(blob: &[u8]) -> Vec<u8> {
    let mut v = vec![0xFF, 0xD8];
    v.extend(segment(0xE0, b"JFIF\0\x01\x02\0\0\x01\0\x01\0\0"));
    v.extend(segment(0xE1, blob));
    v.extend(segment(0xDB, &[0x00; 65]));
    v.extend_from_slice(SCAN);
    v
}

#[test]
fn blob_round_trip_is_byte_identical() {
    logger();

    let original = jpeg_with_exif(&exif_blob("Raves"));
    let mut handle = AccessorFactory::new()
        .open(Cursor::new(original.clone()))
        .unwrap();
    assert_eq!(handle.kind(), ContainerKind::Jpeg);

    let blob = handle.read_exif_blob().unwrap().unwrap();
    assert!(blob.as_slice().starts_with(b"Exif\0\0"));

    handle.write_exif_blob(blob.as_slice()).unwrap();
    let reread = handle.read_exif_blob().unwrap().unwrap();
    assert_eq!(reread, blob);

    // writing the same blob back changes nothing at all
    assert_eq!(handle.into_inner().into_inner(), original);
}

#[test]
fn size_changes_by_the_blob_difference() {
    logger();

    let old_blob = exif_blob("Raves");
    let new_blob = exif_blob("A much longer camera manufacturer name");
    let original = jpeg_with_exif(&old_blob);

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(original.clone()))
        .unwrap();
    handle.write_exif_blob(&new_blob).unwrap();
    let rewritten = handle.into_inner().into_inner();

    assert_eq!(
        rewritten.len() as i64 - original.len() as i64,
        new_blob.len() as i64 - old_blob.len() as i64
    );
    assert!(rewritten.ends_with(SCAN));
    assert_eq!(rewritten, jpeg_with_exif(&new_blob));
}

#[test]
fn tag_edits_survive_a_write() {
    logger();

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(jpeg_with_exif(&exif_blob("Raves"))))
        .unwrap();

    let tree = handle.read().unwrap();
    assert_eq!(tree.get("Make").as_deref(), Some("Raves"));
    assert_eq!(tree.endianness(), Endianness::Big);

    handle.set_value("Orientation", "8").unwrap();
    handle.set_value("BitsPerSample", "8,8,8").unwrap();
    handle.set_value("GPSLatitudeRef", "S").unwrap();
    handle.write().unwrap();

    let mut handle = AccessorFactory::new().open(handle.into_inner()).unwrap();
    handle.read().unwrap();
    assert_eq!(handle.get_value("Make").as_deref(), Some("Raves"));
    assert_eq!(handle.get_value("Orientation").as_deref(), Some("8"));
    assert_eq!(handle.get_value("BitsPerSample").as_deref(), Some("8 8 8"));
    assert_eq!(handle.get_value("GPSLatitudeRef").as_deref(), Some("S"));

    let bytes = handle.into_inner().into_inner();
    assert!(bytes.ends_with(SCAN));
}

#[test]
fn encoding_twice_is_idempotent() {
    logger();

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(jpeg_with_exif(&exif_blob("Raves"))))
        .unwrap();
    handle.read().unwrap();
    handle.write().unwrap();

    let once = handle.into_inner();
    let mut handle = AccessorFactory::new().open(once.clone()).unwrap();
    handle.read().unwrap();
    handle.write().unwrap();

    assert_eq!(handle.into_inner().into_inner(), once.into_inner());
}

#[test]
fn payload_boundary() {
    logger();

    let limits = Limits::default();
    let bare = {
        let mut v = vec![0xFF, 0xD8];
        v.extend_from_slice(SCAN);
        v
    };

    // the largest payload that fits, not counting the identifier
    let mut blob = b"Exif\0\0".to_vec();
    blob.resize(6 + limits.jpeg_max_payload, 0xAB);
    let mut handle = AccessorFactory::new()
        .open(Cursor::new(bare.clone()))
        .unwrap();
    handle.write_exif_blob(&blob).unwrap();
    let written = handle.into_inner().into_inner();
    assert_eq!(&written[2..6], &[0xFF, 0xE1, 0xFF, 0xFF]);
    assert_eq!(written.len(), bare.len() + 4 + blob.len());

    // one more byte is too many
    blob.push(0xAB);
    let mut handle = AccessorFactory::new()
        .open(Cursor::new(bare.clone()))
        .unwrap();
    let e = handle.write_exif_blob(&blob).unwrap_err();
    assert!(matches!(
        e,
        AccessorError::Jpeg(JpegError::PayloadTooLarge { .. })
    ));
    assert_eq!(e.code(), ErrorCode::WriteFailed);
    assert_eq!(handle.into_inner().into_inner(), bare);
}

#[test]
fn truncated_segments_are_reported() {
    logger();

    let mut file = jpeg_with_exif(&exif_blob("Raves"));
    file.truncate(30);

    let mut handle = AccessorFactory::new().open(Cursor::new(file)).unwrap();
    let e = handle.read().unwrap_err();
    assert!(matches!(e, AccessorError::Jpeg(_)));
    assert_eq!(e.code(), ErrorCode::SourceDataIncomplete);
}
