//! Runtime limits for the container engines.

/// Knobs that bound how much work (and memory) the engines will spend on one
/// container.
///
/// The defaults match what common writers produce. Pass a custom value
/// through [`AccessorFactory::with_limits`](crate::factory::AccessorFactory::with_limits).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Limits {
    /// The most bytes a `zTXt` or compressed `iTXt` chunk may inflate to.
    pub inflate_cap: usize,

    /// The largest Exif blob that fits in one JPEG APP1 segment.
    ///
    /// Eight bytes of the segment's 16-bit length go to the length field
    /// itself and the `Exif\0\0` identifier.
    pub jpeg_max_payload: usize,

    /// How close (in bytes) the end of a TIFF's IFD region must be to EOF
    /// for the IFDs to be rewritten in place instead of appended.
    pub tiff_end_slack: u64,
}

impl Limits {
    pub const DEFAULT_INFLATE_CAP: usize = 64 * 1024;
    pub const DEFAULT_JPEG_MAX_PAYLOAD: usize = 0xFFFF - 8;
    pub const DEFAULT_TIFF_END_SLACK: u64 = 10;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            inflate_cap: Self::DEFAULT_INFLATE_CAP,
            jpeg_max_payload: Self::DEFAULT_JPEG_MAX_PAYLOAD,
            tiff_end_slack: Self::DEFAULT_TIFF_END_SLACK,
        }
    }
}
