//! # `exif_container_types`
//!
//! Plain data types used by `exif_container` when it locates, decodes, and
//! rewrites Exif blobs.
//!
//! Nothing in here touches a container. These types describe the TIFF wire
//! format (primitive types, byte order, IFD groups) and the table of tags the
//! engine knows by name.

#![forbid(unsafe_code)]

pub mod exif;
