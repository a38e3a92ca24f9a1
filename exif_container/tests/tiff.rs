use std::{fs::OpenOptions, io::Cursor, path::PathBuf};

use exif_container::{
    codec::{ExifCodec as _, RelocationDelta, TagTree, TiffCodec},
    error::{AccessorError, ErrorCode},
    factory::{AccessorFactory, ContainerKind},
    providers::tiff::TiffError,
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

/// Pretend raw sensor data. Odd-sized, so appends need padding.
fn sensor_data() -> Vec<u8> {
    (0..=254_u8).cycle().take(777).collect()
}

fn tree(e: Endianness) -> TagTree {
    let mut t = TagTree::new(e);
    t.set("DNGVersion", "1 4 0 0").unwrap();
    t.set("Make", "Raves").unwrap();
    t.set("Model", "Sensor One").unwrap();
    t.set("Orientation", "1").unwrap();
    t.set("ExposureTime", "1/60").unwrap();
    t
}

/// Header and IFDs first, sensor data after. Like most cameras write them.
fn dng_ifds_first(e: Endianness) -> Vec<u8> {
    let mut file = TiffCodec
        .encode(&tree(e), RelocationDelta::ZERO, None)
        .unwrap();
    file.extend(sensor_data());
    file
}

/// Header, sensor data, then the IFDs at the very end.
fn dng_ifds_last(e: Endianness) -> Vec<u8> {
    let data = sensor_data();
    let pos = 8 + data.len() as u64 + 1;
    let delta = RelocationDelta::for_write_position(pos, pos).unwrap();
    let encoded = TiffCodec.encode(&tree(e), delta, Some(0)).unwrap();

    let mut file = encoded[..8].to_vec();
    file.extend(data);
    file.push(0);
    file.extend_from_slice(&encoded[8..]);
    file
}

fn ifd0(file: &[u8], e: Endianness) -> usize {
    e.u32_from([file[4], file[5], file[6], file[7]]) as usize
}

#[test]
fn ifds_at_the_end_are_rewritten_in_place() {
    logger();

    let e = Endianness::Little;
    let original = dng_ifds_last(e);
    let old_ifd0 = ifd0(&original, e);

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(original.clone()))
        .unwrap();
    assert_eq!(handle.kind(), ContainerKind::Tiff);
    handle.read().unwrap();
    assert_eq!(handle.get_value("Model").as_deref(), Some("Sensor One"));

    handle.set_value("Orientation", "3").unwrap();
    handle.set_value("ExposureTime", "0.5").unwrap();
    handle.write().unwrap();

    let out = handle.into_inner().into_inner();
    assert_eq!(ifd0(&out, e), old_ifd0);
    assert_eq!(out[..old_ifd0], original[..old_ifd0]);

    let mut handle = AccessorFactory::new().open(Cursor::new(out)).unwrap();
    handle.read().unwrap();
    assert_eq!(handle.get_value("Orientation").as_deref(), Some("3"));
    assert_eq!(handle.get_value("ExposureTime").as_deref(), Some("1/2"));
    assert_eq!(handle.get_value("DNGVersion").as_deref(), Some("1 4 0 0"));
}

#[test]
fn ifds_at_the_start_are_appended() {
    logger();

    let e = Endianness::Big;
    let original = dng_ifds_first(e);

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(original.clone()))
        .unwrap();
    handle.read().unwrap();
    handle.set_value("Make", "Someone Else").unwrap();
    handle.write().unwrap();

    let out = handle.into_inner().into_inner();

    // the old IFDs and every sensor byte are still there
    assert_eq!(out[..4], original[..4]);
    assert_eq!(out[8..original.len()], original[8..]);
    assert_eq!(ifd0(&out, e), original.len() + 1);

    let mut handle = AccessorFactory::new().open(Cursor::new(out)).unwrap();
    handle.read().unwrap();
    assert_eq!(handle.get_value("Make").as_deref(), Some("Someone Else"));
    assert_eq!(handle.get_value("Model").as_deref(), Some("Sensor One"));
}

#[test]
fn second_write_reuses_the_appended_space() {
    logger();

    let e = Endianness::Little;
    let mut handle = AccessorFactory::new()
        .open(Cursor::new(dng_ifds_first(e)))
        .unwrap();
    handle.read().unwrap();

    handle.set_value("Orientation", "6").unwrap();
    handle.write().unwrap();
    let first_len = handle.into_inner().get_ref().len();

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(dng_ifds_first(e)))
        .unwrap();
    handle.read().unwrap();
    handle.set_value("Orientation", "6").unwrap();
    handle.write().unwrap();
    handle.set_value("Orientation", "8").unwrap();
    handle.write().unwrap();

    // same tree size, written over the IFDs the first write appended
    let out = handle.into_inner().into_inner();
    assert_eq!(out.len(), first_len);
}

#[test]
fn created_exif_replaces_the_ifds() {
    logger();

    let e = Endianness::Big;
    let original = dng_ifds_first(e);

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(original.clone()))
        .unwrap();
    let tree = handle.create_exif_data().unwrap();
    assert_eq!(tree.endianness(), e);
    handle.set_value("Artist", "Someone").unwrap();
    handle.write().unwrap();

    let mut handle = AccessorFactory::new().open(handle.into_inner()).unwrap();
    handle.read().unwrap();
    assert_eq!(handle.get_value("Artist").as_deref(), Some("Someone"));
    assert_eq!(handle.get_value("Make"), None);
}

#[test]
fn broken_headers_fail_without_writing() {
    logger();

    let mut file = dng_ifds_first(Endianness::Little);
    file[4..8].copy_from_slice(&0x00FF_FFFF_u32.to_le_bytes());

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(file.clone()))
        .unwrap();
    let e = handle.read().unwrap_err();
    assert_eq!(e.code(), ErrorCode::ExifDecodeFailed);

    handle.create_exif_data().unwrap();
    handle.set_value("Make", "x").unwrap();
    let e = handle.write().unwrap_err();
    assert!(matches!(
        e,
        AccessorError::Tiff(TiffError::OffsetOutOfBounds { .. })
    ));
    assert_eq!(e.code(), ErrorCode::SourceDataInvalid);
    assert_eq!(handle.into_inner().into_inner(), file);
}

#[test]
fn file_backed_stream() {
    logger();

    let path: PathBuf = std::env::temp_dir().join(format!(
        "exif_container_tiff_test_{}.dng",
        std::process::id()
    ));
    let original = dng_ifds_first(Endianness::Little);
    std::fs::write(&path, &original).unwrap();

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&path)
        .unwrap();
    let mut handle = AccessorFactory::new().open(file).unwrap();
    handle.read().unwrap();
    handle.set_value("Model", "From A File").unwrap();
    handle.write().unwrap();
    drop(handle);

    let written = std::fs::read(&path).unwrap();
    _ = std::fs::remove_file(&path);
    assert_eq!(written[8..original.len()], original[8..]);

    let mut handle = AccessorFactory::new()
        .open(Cursor::new(written))
        .unwrap();
    handle.read().unwrap();
    assert_eq!(handle.get_value("Model").as_deref(), Some("From A File"));
}
