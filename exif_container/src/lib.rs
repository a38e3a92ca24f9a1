//! # `exif_container`
//!
//! A library to find, extract, and rewrite Exif metadata inside JPEG, PNG,
//! and TIFF-based (like DNG) files.
//!
//! It never decodes pixels. Every byte that isn't part of the Exif segment,
//! chunk, or IFD chain is copied through unchanged.
//!
//! ## Usage
//!
//! Open a stream with the [`AccessorFactory`](factory::AccessorFactory). It
//! sniffs the container type and hands back a
//! [`ContainerHandle`](handle::ContainerHandle):
//!
//! ```
//! use std::io::Cursor;
//!
//! use exif_container::factory::AccessorFactory;
//!
//! // a tiny JPEG: `SOI`, one empty scan, `EOI`
//! let jpeg: Vec<u8> = vec![0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02, 0xFF, 0xD9];
//!
//! let mut handle = AccessorFactory::new().open(Cursor::new(jpeg)).unwrap();
//! handle.create_exif_data().unwrap();
//! handle.set_value("Make", "Raves Camera Co.").unwrap();
//! handle.set_value("ExposureTime", "0.004").unwrap();
//! handle.write().unwrap();
//!
//! // read it back from the rewritten bytes
//! let mut handle = AccessorFactory::new().open(handle.into_inner()).unwrap();
//! handle.read().unwrap();
//! assert_eq!(handle.get_value("ExposureTime").as_deref(), Some("1/250"));
//! ```
//!
//! Values go through the [`ValueConverter`](converter::ValueConverter) before
//! they reach the tag tree, so malformed or out-of-range input fails early
//! with a specific [`ErrorCode`](error::ErrorCode).
//!
//! ## Containers
//!
//! - JPEG: Exif lives in an `APP1` segment. Read and write.
//! - PNG: Exif lives in an `eXIf` chunk, or hex-encoded in a text chunk.
//!   Read only.
//! - TIFF/DNG: the file's own IFD 0 chain is the metadata. Read and write.
//!
//! ## Logging
//!
//! This crate logs through the [`log`] facade, but never installs a logger.
//! Use whichever one your application prefers.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod converter;
pub mod data_buf;
pub mod error;
pub mod factory;
pub mod handle;
pub mod locator;
pub mod providers;
pub mod stream;

pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
