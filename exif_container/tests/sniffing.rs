use std::io::Cursor;

use exif_container::{
    error::{AccessorError, ErrorCode},
    factory::{AccessorFactory, ContainerKind},
};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// Checks that each magic number is routed to the right engine.
#[test]
fn routes_by_magic_number() {
    logger();

    let cases: &[(&[u8], ContainerKind)] = &[
        (&[0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x10], ContainerKind::Jpeg),
        (&[0xFF, 0xD8, 0xFF], ContainerKind::Jpeg),
        (b"\x89PNG\r\n\x1a\n", ContainerKind::Png),
        (b"II*\0\x08\0\0\0", ContainerKind::Tiff),
        (b"MM\0*\0\0\0\x08", ContainerKind::Tiff),
    ];

    for (bytes, kind) in cases {
        log::debug!("TEST: {kind:?} for bytes: `{bytes:02x?}`");

        assert_eq!(ContainerKind::sniff(bytes), Some(*kind));
        let handle = AccessorFactory::new()
            .open(Cursor::new(bytes.to_vec()))
            .unwrap();
        assert_eq!(handle.kind(), *kind);
    }
}

#[test]
fn unknown_formats() {
    logger();

    let cases: &[&[u8]] = &[
        b"",
        b"\xFF\xD8",
        b"GIF89a",
        b"RIFF\0\0\0\0WEBPVP8 ",
        b"\0\0\0\x18ftypheic",
        b"\x89PNG\r\n\x1a\x0b",
        b"MM\0+",
    ];

    for bytes in cases {
        assert_eq!(ContainerKind::sniff(bytes), None);

        let e = AccessorFactory::new()
            .open(Cursor::new(bytes.to_vec()))
            .unwrap_err();
        assert!(matches!(e, AccessorError::UnknownContainer));
        assert_eq!(e.code(), ErrorCode::ExifUnsupportedFormat);
    }
}

#[test]
fn every_kind_is_reachable() {
    logger();

    assert_eq!(
        ContainerKind::ALL,
        &[ContainerKind::Jpeg, ContainerKind::Png, ContainerKind::Tiff]
    );
}
