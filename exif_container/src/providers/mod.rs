//! # Providers
//!
//! One container engine per supported file format.
//!
//! Each engine works on a contiguous view of the whole file and returns the
//! complete rewritten file, never touching the stream itself. The
//! [`ContainerHandle`](crate::handle::ContainerHandle) picks the engine and
//! handles the stream.

pub mod jpeg;
pub mod png;
pub mod tiff;
